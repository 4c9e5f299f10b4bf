//! Chunked WAV decoding.
//!
//! A [`ChunkReader`] owns the open source for as long as it lives, so the file
//! handle is released as soon as the reader is dropped, whether reading
//! succeeded or not.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec};
use log::{debug, info};
use smallvec::SmallVec;

use crate::config::{validate_read_params, AnalyzerConfig, ChannelPolicy};
use crate::error::{AnalyzerError, Result};

/// Mono samples in `[-1, 1]`.
pub type AudioChunk = Vec<f32>;

/// Chunks in playback order.
pub type ChunkSequence = Vec<AudioChunk>;

/// Interleaved samples of one frame, one per channel.
type FrameBuf = SmallVec<[f32; 2]>;

/// Upper bound on samples reserved ahead of reading. The header's sample
/// count can't be trusted on a truncated file.
const PREALLOC_LIMIT: usize = 1 << 20;

/// Load up to `config.max_duration_seconds` of the configured source as
/// chunks of `config.chunk_size` mono samples.
pub fn read_chunks(config: &AnalyzerConfig) -> Result<(ChunkSequence, u32)> {
    config.validate()?;
    let mut reader = ChunkReader::open(&config.source_path, config.channel_policy)?;
    let chunks = reader.read_chunks(config.chunk_size, config.max_duration_seconds)?;
    Ok((chunks, reader.sample_rate()))
}

pub struct ChunkReader<R: Read> {
    reader: WavReader<R>,
    spec: WavSpec,
    samples_read: usize,
}

impl ChunkReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P, policy: ChannelPolicy) -> Result<Self> {
        let path = path.as_ref();
        debug!("opening audio source {}", path.display());
        let file = File::open(path).map_err(|source| AnalyzerError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(BufReader::new(file), policy)
    }
}

impl<R: Read> ChunkReader<R> {
    /// Wrap an already open WAV stream.
    pub fn new(inner: R, policy: ChannelPolicy) -> Result<Self> {
        let reader = WavReader::new(inner).map_err(AnalyzerError::from_header)?;
        Self::from_wav(reader, policy)
    }

    fn from_wav(reader: WavReader<R>, policy: ChannelPolicy) -> Result<Self> {
        let spec = reader.spec();
        info!("audio source spec: {:?}", spec);

        match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 8 | 16 | 24 | 32) | (SampleFormat::Float, 32) => {}
            (format, bits) => {
                return Err(AnalyzerError::UnsupportedFormat(format!(
                    "{bits}-bit {format:?} samples"
                )))
            }
        }
        if spec.sample_rate == 0 {
            return Err(AnalyzerError::UnsupportedFormat("sample rate of 0 Hz".into()));
        }
        if spec.channels == 0 {
            return Err(AnalyzerError::UnsupportedFormat("no channels".into()));
        }
        if spec.channels > 1 && policy == ChannelPolicy::Reject {
            return Err(AnalyzerError::UnsupportedFormat(format!(
                "{} channels, only mono sources are accepted",
                spec.channels
            )));
        }
        if spec.channels > 1 {
            debug!("downmixing {} channels to mono", spec.channels);
        }

        Ok(Self {
            reader,
            spec,
            samples_read: 0,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.spec.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.spec.channels
    }

    /// Whole frames the source still holds according to its header.
    pub fn remaining_frames(&self) -> usize {
        (self.reader.len() as usize).saturating_sub(self.samples_read) / self.spec.channels as usize
    }

    /// Read up to `chunk_size` mono samples. `None` means end of stream.
    pub fn next_chunk(&mut self, chunk_size: usize) -> Result<Option<AudioChunk>> {
        let channels = self.spec.channels as usize;
        let capacity = chunk_size.min(self.remaining_frames()).min(PREALLOC_LIMIT);
        let (chunk, taken) = match self.spec.sample_format {
            SampleFormat::Int => {
                let scale = (1i64 << (self.spec.bits_per_sample - 1)) as f32;
                let samples = self
                    .reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale));
                fill_chunk(samples, channels, chunk_size, capacity)?
            }
            SampleFormat::Float => {
                fill_chunk(self.reader.samples::<f32>(), channels, chunk_size, capacity)?
            }
        };
        self.samples_read += taken;

        if chunk.is_empty() {
            Ok(None)
        } else {
            Ok(Some(chunk))
        }
    }

    /// Read `floor(max_duration_seconds * sample_rate)` samples worth of
    /// chunks, stopping early at end of stream.
    pub fn read_chunks(
        &mut self,
        chunk_size: usize,
        max_duration_seconds: f64,
    ) -> Result<ChunkSequence> {
        validate_read_params(chunk_size, max_duration_seconds)?;
        // saturates at usize::MAX for absurd durations
        let total_samples = (max_duration_seconds * self.sample_rate() as f64).floor() as usize;
        let reads = total_samples.div_ceil(chunk_size);
        let available = self.remaining_frames().div_ceil(chunk_size);

        let mut chunks = ChunkSequence::with_capacity(reads.min(available).min(PREALLOC_LIMIT));
        for _ in 0..reads {
            match self.next_chunk(chunk_size)? {
                Some(chunk) => chunks.push(chunk),
                None => {
                    debug!("end of stream after {} chunks", chunks.len());
                    break;
                }
            }
        }

        info!(
            "read {} chunks of up to {} samples at {} Hz",
            chunks.len(),
            chunk_size,
            self.sample_rate()
        );
        Ok(chunks)
    }
}

/// Collect one chunk of mono samples, averaging each interleaved frame.
/// A trailing partial frame is dropped. Also returns the number of raw
/// samples consumed.
fn fill_chunk<I>(
    samples: I,
    channels: usize,
    chunk_size: usize,
    capacity: usize,
) -> Result<(AudioChunk, usize)>
where
    I: Iterator<Item = std::result::Result<f32, hound::Error>>,
{
    let mut chunk = AudioChunk::with_capacity(capacity);
    let mut frame = FrameBuf::new();
    let mut taken = 0;
    for sample in samples.take(chunk_size.saturating_mul(channels)) {
        taken += 1;
        frame.push(sample.map_err(AnalyzerError::Decode)?);
        if frame.len() == channels {
            chunk.push(frame.iter().sum::<f32>() / channels as f32);
            frame.clear();
        }
    }
    Ok((chunk, taken))
}
