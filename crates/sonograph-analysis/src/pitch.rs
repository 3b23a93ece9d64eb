//! Fundamental frequency (pitch) estimation.
//!
//! Three independent strategies sit behind [`PitchEstimator`], so a caller
//! can switch between them without touching call sites:
//!
//! - **Spectral peak**: for every STFT frame, the frequency of the loudest
//!   bin inside a plausible fundamental band. This is a "loudest bin in
//!   range" tracker, not a true pitch detector: on inharmonic or noisy
//!   material, or when a harmonic is louder than the fundamental, it
//!   reports that other component.
//! - **Autocorrelation**: per sliding window, the lag of the strongest
//!   self-similarity beyond the zero-lag lobe, converted with `fs / lag`.
//!   Integer lags limit resolution to `fs / lag - fs / (lag + 1)`.
//! - **Hilbert instantaneous**: the phase derivative of the analytic signal.
//!   Only meaningful for essentially monophonic, narrow-band input.
//!
//! Every strategy returns a [`PitchSeries`] in which `0.0` marks a frame
//! without a usable estimate.

use tracing::debug;

use crate::error::Result;
use crate::fft::DB_EPSILON;
use crate::hilbert::instantaneous_frequency;
use crate::params::{FrameParams, FrequencyBand, validate_sample_rate};
use crate::spectrogram::{ComplexStft, stft};
use crate::xcorr::{autocorrelation, dominant_lag};

/// Window/hop trade-off for autocorrelation tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PitchProfile {
    /// 200 ms windows every 50 ms: steadier, slower to follow changes.
    #[default]
    Robust,
    /// 100 ms windows every 25 ms.
    Balanced,
}

impl PitchProfile {
    /// Parse a config/CLI name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "robust" => Some(Self::Robust),
            "balanced" => Some(Self::Balanced),
            _ => None,
        }
    }

    /// Canonical config/CLI name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Robust => "robust",
            Self::Balanced => "balanced",
        }
    }

    /// Window length in seconds.
    pub fn window_secs(&self) -> f32 {
        match self {
            Self::Robust => 0.2,
            Self::Balanced => 0.1,
        }
    }

    /// Hop length in seconds.
    pub fn hop_secs(&self) -> f32 {
        match self {
            Self::Robust => 0.05,
            Self::Balanced => 0.025,
        }
    }

    /// Window and hop in samples at `sample_rate`.
    pub fn frame_params(&self, sample_rate: u32) -> FrameParams {
        let fs = sample_rate as f32;
        FrameParams::new(
            (self.window_secs() * fs) as usize,
            (self.hop_secs() * fs) as usize,
        )
    }
}

/// One pitch estimate per analysis frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PitchSeries {
    /// Frame times in seconds.
    pub times: Vec<f32>,
    /// Estimated frequency in Hz; `0.0` for frames without an estimate.
    pub values: Vec<f32>,
}

/// Mean and spread of the voiced entries of a [`PitchSeries`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchStats {
    /// Mean frequency in Hz.
    pub mean: f32,
    /// Population standard deviation in Hz.
    pub std_dev: f32,
    /// Number of voiced entries averaged.
    pub count: usize,
}

impl PitchSeries {
    /// Number of frames.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no frame was analyzed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Strictly positive estimates.
    pub fn voiced(&self) -> impl Iterator<Item = f32> + '_ {
        self.values.iter().copied().filter(|&f| f > 0.0)
    }

    /// Mean of the voiced estimates, or `0.0` when there are none.
    pub fn mean_f0(&self) -> f32 {
        self.stats().map_or(0.0, |s| s.mean)
    }

    /// Mean ± standard deviation of the voiced estimates.
    pub fn stats(&self) -> Option<PitchStats> {
        let voiced: Vec<f64> = self.voiced().map(f64::from).collect();
        if voiced.is_empty() {
            return None;
        }
        let count = voiced.len();
        let mean = voiced.iter().sum::<f64>() / count as f64;
        let variance = voiced.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / count as f64;
        Some(PitchStats {
            mean: mean as f32,
            std_dev: variance.sqrt() as f32,
            count,
        })
    }
}

/// Pitch estimation strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PitchEstimator {
    /// Loudest STFT bin inside `band`, per frame.
    SpectralPeak {
        /// Range searched for the fundamental.
        band: FrequencyBand,
        /// STFT window and hop.
        stft: FrameParams,
    },
    /// Autocorrelation peak per sliding window.
    Autocorrelation {
        /// Window/hop trade-off.
        profile: PitchProfile,
    },
    /// Hilbert instantaneous frequency.
    HilbertInstantaneous {
        /// Optional display decimation budget.
        max_points: Option<usize>,
    },
}

impl Default for PitchEstimator {
    fn default() -> Self {
        Self::SpectralPeak {
            band: FrequencyBand::FUNDAMENTAL,
            stft: FrameParams::stft_default(),
        }
    }
}

impl PitchEstimator {
    /// Short strategy name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SpectralPeak { .. } => "spectral_peak",
            Self::Autocorrelation { .. } => "autocorrelation",
            Self::HilbertInstantaneous { .. } => "hilbert",
        }
    }

    /// Check the strategy's parameters against a sample rate.
    pub fn validate(&self, sample_rate: u32) -> Result<()> {
        validate_sample_rate(sample_rate)?;
        match self {
            Self::SpectralPeak { band, stft } => {
                band.validate_for(sample_rate)?;
                stft.validate()
            }
            Self::Autocorrelation { profile } => profile.frame_params(sample_rate).validate(),
            Self::HilbertInstantaneous { max_points } => {
                if *max_points == Some(0) {
                    Err(crate::AnalysisError::ZeroPreviewPoints)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Run the strategy over `samples`.
    pub fn estimate(&self, samples: &[f32], sample_rate: u32) -> Result<PitchSeries> {
        self.validate(sample_rate)?;
        let series = match *self {
            Self::SpectralPeak { band, stft: params } => {
                let grid = stft(samples, sample_rate, params)?;
                estimate_f0_by_spectral_peak(&grid, band)
            }
            Self::Autocorrelation { profile } => {
                estimate_pitch_by_autocorrelation(samples, sample_rate, profile)?
            }
            Self::HilbertInstantaneous { max_points } => {
                let trace = instantaneous_frequency(samples, sample_rate, max_points)?;
                PitchSeries {
                    times: trace.times,
                    values: trace.values,
                }
            }
        };
        debug!(
            strategy = self.name(),
            frames = series.len(),
            "pitch estimate"
        );
        Ok(series)
    }
}

/// Per-frame frequency of the strongest bin inside `band`.
///
/// Equal maxima resolve to the lowest bin. Frames get `0.0` when no bin falls inside the band or when the in-band
/// maximum is at the silence floor.
pub fn estimate_f0_by_spectral_peak(grid: &ComplexStft, band: FrequencyBand) -> PitchSeries {
    let candidates: Vec<usize> = grid
        .frequencies
        .iter()
        .enumerate()
        .filter(|&(_, &f)| band.contains(f))
        .map(|(i, _)| i)
        .collect();

    let values = grid
        .frames
        .iter()
        .map(|frame| {
            candidates
                .iter()
                .map(|&bin| (bin, frame[bin].norm()))
                .min_by(|(_, a), (_, b)| b.total_cmp(a))
                .filter(|&(_, mag)| mag > DB_EPSILON)
                .map_or(0.0, |(bin, _)| grid.frequencies[bin])
        })
        .collect();

    PitchSeries {
        times: grid.times.clone(),
        values,
    }
}

/// Autocorrelation pitch per sliding window.
///
/// Each full window has its mean removed, is autocorrelated, and the
/// strongest lag past the zero-lag lobe becomes `fs / lag`. Windows without
/// such a lag (silence, no periodicity) are skipped entirely, so the series
/// only holds voiced windows. Input shorter than one window gives an empty
/// series. A window ending exactly on the last sample is analyzed too.
pub fn estimate_pitch_by_autocorrelation(
    samples: &[f32],
    sample_rate: u32,
    profile: PitchProfile,
) -> Result<PitchSeries> {
    validate_sample_rate(sample_rate)?;
    let params = profile.frame_params(sample_rate);
    params.validate()?;

    let fs = sample_rate as f32;
    let mut series = PitchSeries::default();

    for k in 0..params.num_frames(samples.len()) {
        let start = k * params.hop_len;
        let window = &samples[start..start + params.window_len];
        let mean = window.iter().sum::<f32>() / window.len() as f32;
        let centred: Vec<f32> = window.iter().map(|x| x - mean).collect();

        let correlation = autocorrelation(&centred);
        if let Some(lag) = dominant_lag(&correlation) {
            series
                .times
                .push((start as f32 + params.window_len as f32 / 2.0) / fs);
            series.values.push(fs / lag as f32);
        }
    }

    Ok(series)
}
