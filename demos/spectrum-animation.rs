use anyhow::Context;
use spectral_frames::*;

// cargo run -r --example spectrum-animation
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AnalyzerConfig::default();
    let frames = load(&config)
        .with_context(|| format!("loading {}", config.source_path.display()))?;
    let display = DisplayConfig::new(config.chunk_size, frames.sample_rate());

    animate(frames, display).map_err(|e| anyhow::anyhow!("display failed: {e}"))
}
