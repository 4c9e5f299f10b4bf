use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;
use rustfft::FftPlanner;

/// Everything the display needs to draw one chunk.
///
/// `time_axis`/`amplitude` are the waveform, `freq_axis`/`magnitude` the
/// one-sided spectrum (DC up to, but excluding, the Nyquist bin).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub time_axis: Vec<f64>,
    pub amplitude: Vec<f32>,
    pub freq_axis: Vec<f64>,
    pub magnitude: Vec<f32>,
}

impl Frame {
    /// An empty frame marks the end of the sequence.
    pub fn is_empty(&self) -> bool {
        self.amplitude.is_empty()
    }

    pub fn waveform_points(&self) -> Vec<[f64; 2]> {
        self.time_axis
            .iter()
            .zip(&self.amplitude)
            .map(|(&t, &a)| [t, a as f64])
            .collect()
    }

    pub fn spectrum_points(&self) -> Vec<[f64; 2]> {
        self.freq_axis
            .iter()
            .zip(&self.magnitude)
            .map(|(&f, &m)| [f, m as f64])
            .collect()
    }

    /// Frequency of the strongest retained bin.
    pub fn peak_frequency(&self) -> Option<f64> {
        self.magnitude
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| self.freq_axis[k])
    }
}

/// Compute the waveform and magnitude spectrum of one chunk.
///
/// No window is applied before the transform, so energy between bins leaks
/// into the neighbours.
pub fn compute_frame(chunk: &[f32], sample_rate: u32) -> Frame {
    FrameProducer::new().compute(chunk, sample_rate)
}

/// Reuses FFT plans across chunks. Output is identical to [`compute_frame`].
pub struct FrameProducer {
    planner: FftPlanner<f32>,
}

impl Default for FrameProducer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameProducer {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    pub fn compute(&mut self, chunk: &[f32], sample_rate: u32) -> Frame {
        let n = chunk.len();
        if n == 0 {
            return Frame::default();
        }

        let time_axis = time_axis(n, sample_rate);

        let fft = self.planner.plan_fft_forward(n);
        let mut buffer: Vec<Complex<f32>> = vec![Complex::zero(); n];
        for (sample, input) in chunk.iter().zip(buffer.iter_mut()) {
            *input = Complex::new(*sample, 0.0);
        }
        fft.process(&mut buffer);

        let half = n / 2;
        let freq_axis = frequency_axis(n, sample_rate);
        let magnitude: Vec<f32> = buffer[..half].iter().map(|c| c.norm()).collect();

        Frame {
            time_axis,
            amplitude: chunk.to_vec(),
            freq_axis,
            magnitude,
        }
    }
}

/// `n` evenly spaced instants from 0 to the chunk duration `n / sample_rate`,
/// both ends included.
pub fn time_axis(n: usize, sample_rate: u32) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let duration = n as f64 / sample_rate as f64;
            let step = duration / (n - 1) as f64;
            (0..n).map(|k| k as f64 * step).collect()
        }
    }
}

/// Bin centre frequencies `k * sample_rate / n` for `k < n / 2`.
pub fn frequency_axis(n: usize, sample_rate: u32) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let bin_width = sample_rate as f64 / n as f64;
    (0..n / 2).map(|k| k as f64 * bin_width).collect()
}
