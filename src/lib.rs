pub mod config;
pub mod display;
pub mod error;
pub mod reader;
pub mod sequence;
pub mod spectrum;

pub use config::{AnalyzerConfig, ChannelPolicy, DisplayConfig};
pub use display::animate;
pub use error::AnalyzerError;
pub use reader::{read_chunks, AudioChunk, ChunkReader, ChunkSequence};
pub use sequence::FrameSequence;
pub use spectrum::{compute_frame, Frame, FrameProducer};

/// Read the configured source and wrap it in a frame sequence ready to play.
pub fn load(config: &AnalyzerConfig) -> error::Result<FrameSequence> {
    let (chunks, sample_rate) = read_chunks(config)?;
    Ok(FrameSequence::new(chunks, sample_rate, config.chunk_size))
}
