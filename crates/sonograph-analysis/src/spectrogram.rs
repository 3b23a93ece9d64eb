//! STFT-based spectrogram generation
//!
//! Provides time-frequency analysis through the Short-Time Fourier Transform.
//! Frames start every `hop_len` samples for as long as a whole window fits:
//! there is no zero padding and no boundary extension, so an `N`-sample input
//! yields `floor((N - window_len) / hop_len) + 1` frames and the first/last
//! half-window of the signal is only partially covered. Fine for display,
//! not for sample-accurate resynthesis.

use rustfft::num_complex::Complex;
use tracing::debug;

use crate::error::Result;
use crate::fft::{DB_EPSILON, Fft, bin_frequency, hann_window, magnitude_db};
use crate::params::{FrameParams, FrequencyBand, validate_sample_rate};

/// Complex STFT grid with its axes.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexStft {
    /// Frame centre times in seconds, strictly increasing.
    pub times: Vec<f32>,
    /// Bin frequencies in Hz, strictly increasing.
    pub frequencies: Vec<f32>,
    /// Complex values `[frame][bin]`, scaled by `1 / sum(window)`.
    pub frames: Vec<Vec<Complex<f32>>>,
}

impl ComplexStft {
    /// Number of time frames.
    pub fn num_frames(&self) -> usize {
        self.times.len()
    }

    /// Number of frequency bins.
    pub fn num_bins(&self) -> usize {
        self.frequencies.len()
    }

    /// Keep only the bins whose frequency lies inside `band`.
    pub fn restrict(&self, band: FrequencyBand) -> ComplexStft {
        let keep: Vec<usize> = self
            .frequencies
            .iter()
            .enumerate()
            .filter(|&(_, &f)| band.contains(f))
            .map(|(i, _)| i)
            .collect();

        ComplexStft {
            times: self.times.clone(),
            frequencies: keep.iter().map(|&i| self.frequencies[i]).collect(),
            frames: self
                .frames
                .iter()
                .map(|frame| keep.iter().map(|&i| frame[i]).collect())
                .collect(),
        }
    }

    /// Magnitudes `[frame][bin]`.
    pub fn magnitudes(&self) -> Vec<Vec<f32>> {
        self.frames
            .iter()
            .map(|frame| frame.iter().map(|c| c.norm()).collect())
            .collect()
    }

    /// Magnitude grid in dB: `20 * log10(|X| + 1e-10)`.
    pub fn to_db(&self) -> TimeFrequencyResult {
        TimeFrequencyResult {
            times: self.times.clone(),
            frequencies: self.frequencies.clone(),
            values: self.frames.iter().map(|frame| magnitude_db(frame)).collect(),
        }
    }
}

/// Real-valued time-frequency grid (dB) with its axes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeFrequencyResult {
    /// Frame centre times in seconds, strictly increasing.
    pub times: Vec<f32>,
    /// Bin frequencies in Hz, strictly increasing.
    pub frequencies: Vec<f32>,
    /// Values `[frame][bin]` in dB.
    pub values: Vec<Vec<f32>>,
}

impl TimeFrequencyResult {
    /// Number of time frames.
    pub fn num_frames(&self) -> usize {
        self.times.len()
    }

    /// Number of frequency bins.
    pub fn num_bins(&self) -> usize {
        self.frequencies.len()
    }

    /// Value at a frame/bin, `None` when out of bounds.
    pub fn get(&self, frame: usize, bin: usize) -> Option<f32> {
        self.values.get(frame).and_then(|f| f.get(bin)).copied()
    }
}

/// Mesh-grid layout for 3-D surface plots.
///
/// All three grids are `[bin][frame]`, matching `meshgrid(times, frequencies)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurfaceMesh {
    /// Time coordinate of every vertex.
    pub time: Vec<Vec<f32>>,
    /// Frequency coordinate of every vertex.
    pub frequency: Vec<Vec<f32>>,
    /// Magnitude in dB at every vertex.
    pub magnitude_db: Vec<Vec<f32>>,
}

impl SurfaceMesh {
    /// Reshape a `[frame][bin]` grid into `[bin][frame]` mesh grids.
    pub fn from_grid(grid: &TimeFrequencyResult) -> Self {
        let mut mesh = SurfaceMesh::default();
        for (bin, &freq) in grid.frequencies.iter().enumerate() {
            mesh.time.push(grid.times.clone());
            mesh.frequency.push(vec![freq; grid.times.len()]);
            mesh.magnitude_db
                .push(grid.values.iter().map(|frame| frame[bin]).collect());
        }
        mesh
    }
}

/// STFT (Short-Time Fourier Transform) analyzer with a symmetric Hann window
pub struct StftAnalyzer {
    params: FrameParams,
    sample_rate: u32,
    fft: Fft,
    window_coeffs: Vec<f32>,
}

impl StftAnalyzer {
    /// Create a new STFT analyzer
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    /// * `params` - Window length (also the FFT size) and hop length
    pub fn hann(sample_rate: u32, params: FrameParams) -> Result<Self> {
        validate_sample_rate(sample_rate)?;
        params.validate()?;

        Ok(Self {
            params,
            sample_rate,
            fft: Fft::new(params.window_len),
            window_coeffs: hann_window(params.window_len),
        })
    }

    /// Frame centre times in seconds
    pub fn frame_times(&self, num_frames: usize) -> Vec<f32> {
        let half = self.params.window_len as f32 / 2.0;
        (0..num_frames)
            .map(|k| (k as f32 * self.params.hop_len as f32 + half) / self.sample_rate as f32)
            .collect()
    }

    /// Bin frequencies, DC to Nyquist
    pub fn bin_frequencies(&self) -> Vec<f32> {
        (0..self.fft.num_bins())
            .map(|bin| bin_frequency(bin, self.params.window_len, self.sample_rate))
            .collect()
    }

    /// Complex STFT of the signal
    pub fn analyze(&self, signal: &[f32]) -> ComplexStft {
        let num_frames = self.params.num_frames(signal.len());
        let scale = 1.0 / self.window_coeffs.iter().sum::<f32>();

        let frames = (0..num_frames)
            .map(|k| {
                let frame = self.windowed_frame(signal, k, false);
                let mut spectrum = self.fft.forward(&frame);
                for c in spectrum.iter_mut() {
                    *c *= scale;
                }
                spectrum
            })
            .collect();

        debug!(
            num_frames,
            window_len = self.params.window_len,
            hop_len = self.params.hop_len,
            "stft"
        );

        ComplexStft {
            times: self.frame_times(num_frames),
            frequencies: self.bin_frequencies(),
            frames,
        }
    }

    /// One-sided power spectral density in dB, `10 * log10(PSD + 1e-10)`
    ///
    /// Each frame has its mean removed before windowing. Density scaling is
    /// `|X|^2 / (fs * sum(w^2))`, doubled for every bin except DC and Nyquist.
    pub fn power_spectral_density_db(&self, signal: &[f32]) -> TimeFrequencyResult {
        let num_frames = self.params.num_frames(signal.len());
        let window_power: f32 = self.window_coeffs.iter().map(|w| w * w).sum();
        let scale = 1.0 / (self.sample_rate as f32 * window_power);
        let num_bins = self.fft.num_bins();
        let nyquist_bin = if self.params.window_len % 2 == 0 {
            Some(num_bins - 1)
        } else {
            None
        };

        let values = (0..num_frames)
            .map(|k| {
                let frame = self.windowed_frame(signal, k, true);
                self.fft
                    .forward(&frame)
                    .iter()
                    .enumerate()
                    .map(|(bin, c)| {
                        let one_sided = if bin == 0 || Some(bin) == nyquist_bin {
                            1.0
                        } else {
                            2.0
                        };
                        let psd = c.norm_sqr() * scale * one_sided;
                        10.0 * (psd + DB_EPSILON).log10()
                    })
                    .collect()
            })
            .collect();

        TimeFrequencyResult {
            times: self.frame_times(num_frames),
            frequencies: self.bin_frequencies(),
            values,
        }
    }

    fn windowed_frame(&self, signal: &[f32], index: usize, detrend: bool) -> Vec<f32> {
        let start = index * self.params.hop_len;
        let mut frame = signal[start..start + self.params.window_len].to_vec();
        if detrend {
            let mean = frame.iter().sum::<f32>() / frame.len() as f32;
            for sample in frame.iter_mut() {
                *sample -= mean;
            }
        }
        for (sample, &coeff) in frame.iter_mut().zip(self.window_coeffs.iter()) {
            *sample *= coeff;
        }
        frame
    }
}

/// Complex Hann-windowed STFT over the full frequency range.
pub fn stft(samples: &[f32], sample_rate: u32, params: FrameParams) -> Result<ComplexStft> {
    Ok(StftAnalyzer::hann(sample_rate, params)?.analyze(samples))
}

/// Magnitude STFT in dB restricted to `band`.
pub fn stft_db(
    samples: &[f32],
    sample_rate: u32,
    params: FrameParams,
    band: FrequencyBand,
) -> Result<TimeFrequencyResult> {
    band.validate_for(sample_rate)?;
    Ok(stft(samples, sample_rate, params)?.restrict(band).to_db())
}

/// Power spectrogram in dB restricted to `band`.
pub fn spectrogram(
    samples: &[f32],
    sample_rate: u32,
    params: FrameParams,
    band: FrequencyBand,
) -> Result<TimeFrequencyResult> {
    band.validate_for(sample_rate)?;
    let analyzer = StftAnalyzer::hann(sample_rate, params)?;
    let full = analyzer.power_spectral_density_db(samples);
    Ok(restrict_grid(full, band))
}

/// Time/frequency/magnitude-dB mesh grids for a 3-D surface plot.
pub fn sfft3d(
    samples: &[f32],
    sample_rate: u32,
    params: FrameParams,
    band: FrequencyBand,
) -> Result<SurfaceMesh> {
    let grid = stft_db(samples, sample_rate, params, band)?;
    Ok(SurfaceMesh::from_grid(&grid))
}

fn restrict_grid(grid: TimeFrequencyResult, band: FrequencyBand) -> TimeFrequencyResult {
    let keep: Vec<usize> = grid
        .frequencies
        .iter()
        .enumerate()
        .filter(|&(_, &f)| band.contains(f))
        .map(|(i, _)| i)
        .collect();

    TimeFrequencyResult {
        frequencies: keep.iter().map(|&i| grid.frequencies[i]).collect(),
        values: grid
            .values
            .iter()
            .map(|frame| keep.iter().map(|&i| frame[i]).collect())
            .collect(),
        times: grid.times,
    }
}
