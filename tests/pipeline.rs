use std::f32::consts::PI;
use std::path::PathBuf;

use hound::{SampleFormat, WavSpec, WavWriter};
use spectral_frames::*;

fn temp_wav(name: &str, channels: u16, sample_rate: u32, frames: &[f32]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("spectral-frames-{}-{name}.wav", std::process::id()));
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    for &s in frames {
        for _ in 0..channels {
            writer.write_sample((s * i16::MAX as f32) as i16).unwrap();
        }
    }
    writer.finalize().unwrap();
    path
}

fn sine(freq: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
    let len = (sample_rate as f32 * seconds) as usize;
    (0..len)
        .map(|i| 0.8 * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}

#[test]
fn sine_440_peaks_at_bin_20() {
    let path = temp_wav("sine440", 1, 44100, &sine(440.0, 44100, 3.0));
    let config = AnalyzerConfig::new(&path).with_chunk_size(2048).with_duration(1.0);
    let (chunks, sample_rate) = read_chunks(&config).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(sample_rate, 44100);
    assert_eq!(chunks.len(), 22);
    assert!(chunks.iter().all(|c| c.len() == 2048));

    for chunk in &chunks {
        let frame = compute_frame(chunk, sample_rate);
        assert_eq!(frame.freq_axis.len(), 1024);
        let peak = frame
            .magnitude
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| k)
            .unwrap();
        assert_eq!(peak, 20);
        let bin_width = 44100.0 / 2048.0;
        assert!((frame.peak_frequency().unwrap() - 20.0 * bin_width).abs() < 1e-9);
    }
}

#[test]
fn duration_past_end_of_file_stops_early() {
    let path = temp_wav("short", 1, 8000, &sine(300.0, 8000, 0.5));
    let config = AnalyzerConfig::new(&path).with_chunk_size(1024).with_duration(10.0);
    let (chunks, _) = read_chunks(&config).unwrap();
    std::fs::remove_file(&path).unwrap();

    // 4000 samples available
    assert_eq!(chunks.len(), 4);
    assert_eq!(chunks.last().map(Vec::len), Some(4000 - 3 * 1024));
}

#[test]
fn chunk_size_one_has_empty_spectra() {
    let path = temp_wav("tiny", 1, 1000, &[0.1; 10]);
    let config = AnalyzerConfig::new(&path).with_chunk_size(1).with_duration(1.0);
    let frames: Vec<Frame> = load(&config).unwrap().collect();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(frames.len(), 10);
    for frame in frames {
        assert_eq!(frame.time_axis, vec![0.0]);
        assert!(frame.freq_axis.is_empty());
        assert!(frame.magnitude.is_empty());
    }
}

#[test]
fn stereo_source_downmixes_or_rejects() {
    let path = temp_wav("stereo", 2, 8000, &sine(1000.0, 8000, 0.25));
    let config = AnalyzerConfig::new(&path).with_chunk_size(512);
    let (chunks, _) = read_chunks(&config).unwrap();
    assert_eq!(chunks.iter().map(Vec::len).sum::<usize>(), 2000);

    let rejected = read_chunks(&config.clone().with_channel_policy(ChannelPolicy::Reject));
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(rejected, Err(AnalyzerError::UnsupportedFormat(_))));
}

#[test]
fn missing_source_is_unavailable() {
    let config = AnalyzerConfig::new("/nonexistent/dir/nothing.wav");
    match read_chunks(&config) {
        Err(AnalyzerError::SourceUnavailable { path, .. }) => {
            assert_eq!(path, PathBuf::from("/nonexistent/dir/nothing.wav"))
        }
        other => panic!("expected SourceUnavailable, got {other:?}"),
    }
}

#[test]
fn truncated_header_on_disk_is_a_decode_error() {
    let path = std::env::temp_dir().join(format!(
        "spectral-frames-{}-truncated-header.wav",
        std::process::id()
    ));
    std::fs::write(&path, b"RIFF\x24\x00").unwrap();
    let result = read_chunks(&AnalyzerConfig::new(&path));
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(AnalyzerError::Decode(_))), "got {result:?}");
}

#[test]
fn huge_duration_on_short_file() {
    let path = temp_wav("huge-duration", 1, 44100, &[0.25; 5000]);
    let config = AnalyzerConfig::new(&path).with_chunk_size(2048).with_duration(1e20);
    let (chunks, _) = read_chunks(&config).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[2].len(), 5000 - 2 * 2048);
}

#[test]
fn frame_sequence_covers_every_chunk() {
    let path = temp_wav("sequence", 1, 16000, &sine(2000.0, 16000, 0.3));
    let config = AnalyzerConfig::new(&path).with_chunk_size(1000);
    let mut frames = load(&config).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(frames.len(), 5);
    assert_eq!(frames.interval(), std::time::Duration::from_micros(62_500));
    let first = frames.next_frame(0).unwrap();
    assert_eq!(frames.by_ref().count(), 5);
    assert!(frames.next_frame(5).is_none());

    frames.restart_from(0);
    assert_eq!(frames.next(), Some(first));
    assert!((frames.next_frame(2).unwrap().peak_frequency().unwrap() - 2000.0).abs() < 1e-9);
}
