use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AnalyzerError, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 2048;
pub const DEFAULT_DURATION_SECS: f64 = 10.0;
pub const DEFAULT_SOURCE: &str = "c.wav";

/// Middle C, drawn as a marker on the spectrum.
pub const REFERENCE_PITCH_HZ: f64 = 261.63;

/// What to do with sources that have more than one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelPolicy {
    /// Average the channels of each frame into one sample.
    #[default]
    Downmix,
    /// Fail with `UnsupportedFormat`.
    Reject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub source_path: PathBuf,
    pub chunk_size: usize,
    pub max_duration_seconds: f64,
    pub channel_policy: ChannelPolicy,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_duration_seconds: DEFAULT_DURATION_SECS,
            channel_policy: ChannelPolicy::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn new<P: AsRef<Path>>(source_path: P) -> Self {
        Self {
            source_path: source_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.max_duration_seconds = seconds;
        self
    }

    pub fn with_channel_policy(mut self, policy: ChannelPolicy) -> Self {
        self.channel_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_read_params(self.chunk_size, self.max_duration_seconds)
    }

    /// Time one chunk takes to play back, used to pace the display.
    pub fn frame_interval(&self, sample_rate: u32) -> Duration {
        frame_interval(self.chunk_size, sample_rate)
    }
}

pub(crate) fn validate_read_params(chunk_size: usize, max_duration_seconds: f64) -> Result<()> {
    if chunk_size == 0 {
        return Err(AnalyzerError::InvalidConfig(
            "chunk size must be greater than zero".into(),
        ));
    }
    if !max_duration_seconds.is_finite() || max_duration_seconds <= 0.0 {
        return Err(AnalyzerError::InvalidConfig(format!(
            "duration must be a positive number of seconds, got {max_duration_seconds}"
        )));
    }
    Ok(())
}

pub fn frame_interval(chunk_size: usize, sample_rate: u32) -> Duration {
    if sample_rate == 0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(chunk_size as f64 / sample_rate as f64)
}

/// Static plot ranges. Data outside them is clipped by the plot, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    pub title: String,
    pub window_size: [f32; 2],
    pub waveform_x: [f64; 2],
    pub waveform_y: [f64; 2],
    pub spectrum_x: [f64; 2],
    pub spectrum_y: [f64; 2],
    pub reference_pitch_hz: f64,
}

impl DisplayConfig {
    pub fn new(chunk_size: usize, sample_rate: u32) -> Self {
        let waveform_x_max = if sample_rate == 0 {
            0.0
        } else {
            chunk_size as f64 / sample_rate as f64
        };
        Self {
            title: "Real-Time Audio Waveform and Frequency Spectrum".into(),
            window_size: [1400.0, 800.0],
            waveform_x: [0.0, waveform_x_max],
            waveform_y: [-1.0, 1.0],
            spectrum_x: [0.0, 5000.0],
            spectrum_y: [0.0, 50.0],
            reference_pitch_hz: REFERENCE_PITCH_HZ,
        }
    }
}
