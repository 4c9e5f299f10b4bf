use anyhow::Context;
use spectral_frames::*;

// cargo run -r --example frame-peaks
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AnalyzerConfig::new("sin440.wav").with_duration(3.0);
    let frames = load(&config)
        .with_context(|| format!("loading {}", config.source_path.display()))?;
    let interval = frames.interval();

    for (i, frame) in frames.enumerate() {
        let t = interval.as_secs_f64() * i as f64;
        match frame.peak_frequency() {
            Some(peak) => println!("{t:>8.3}s  peak {peak:>8.1} Hz"),
            None => println!("{t:>8.3}s  no spectrum"),
        }
    }
    Ok(())
}
