//! Immutable bundle of every analysis parameter.

use crate::buffer::ChannelSelection;
use crate::dynamics::DEFAULT_PREVIEW_POINTS;
use crate::error::{AnalysisError, Result};
use crate::metrics::{DEFAULT_ROLLOFF_PERCENT, validate_rolloff};
use crate::params::{FrameParams, FrequencyBand, validate_decimation, validate_sample_rate};
use crate::pitch::PitchEstimator;

/// Everything one dashboard redraw needs to know.
///
/// Built once by the caller and passed by reference; the pipeline never
/// mutates or stores it. Use the `with_*` methods to derive variations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisRequest {
    /// Band shown by the spectrum, spectrogram and spectral metrics.
    pub band: FrequencyBand,
    /// Keep every n-th spectrum bin.
    pub decimation: usize,
    /// STFT window and hop for the spectrogram and spectral metrics.
    pub stft: FrameParams,
    /// Sliding RMS frame and hop.
    pub rms: FrameParams,
    /// Pitch strategy.
    pub pitch: PitchEstimator,
    /// Which channel(s) to analyze.
    pub channel: ChannelSelection,
    /// Display budget for the waveform, envelope and frequency trace.
    pub preview_points: usize,
    /// Roll-off fraction in `(0, 1]`.
    pub rolloff_percent: f32,
}

/// Bands are sized for 44.1 kHz and up; [`AnalysisRequest::for_sample_rate`]
/// fits them to slower files.
impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            band: FrequencyBand::AUDIBLE,
            decimation: 1,
            stft: FrameParams::stft_default(),
            rms: FrameParams::rms_default(),
            pitch: PitchEstimator::default(),
            channel: ChannelSelection::Mono,
            preview_points: DEFAULT_PREVIEW_POINTS,
            rolloff_percent: DEFAULT_ROLLOFF_PERCENT,
        }
    }
}

impl AnalysisRequest {
    /// Default request with its bands fitted under the Nyquist of `sample_rate`.
    pub fn for_sample_rate(sample_rate: u32) -> Self {
        Self::default().clamped_to(sample_rate)
    }

    /// Pull the display band and the spectral-peak pitch band down to Nyquist.
    ///
    /// Bands already below Nyquist come back unchanged. Lower edges are never
    /// moved, so a band starting above Nyquist still fails validation.
    pub fn clamped_to(self, sample_rate: u32) -> Self {
        let pitch = match self.pitch {
            PitchEstimator::SpectralPeak { band, stft } => PitchEstimator::SpectralPeak {
                band: band.clamped_to(sample_rate),
                stft,
            },
            other => other,
        };
        Self {
            band: self.band.clamped_to(sample_rate),
            pitch,
            ..self
        }
    }

    /// Replace the display band.
    pub fn with_band(self, band: FrequencyBand) -> Self {
        Self { band, ..self }
    }

    /// Replace the spectrum decimation factor.
    pub fn with_decimation(self, decimation: usize) -> Self {
        Self { decimation, ..self }
    }

    /// Replace the STFT parameters.
    pub fn with_stft(self, stft: FrameParams) -> Self {
        Self { stft, ..self }
    }

    /// Replace the RMS frame parameters.
    pub fn with_rms(self, rms: FrameParams) -> Self {
        Self { rms, ..self }
    }

    /// Replace the pitch strategy.
    pub fn with_pitch(self, pitch: PitchEstimator) -> Self {
        Self { pitch, ..self }
    }

    /// Replace the channel selection.
    pub fn with_channel(self, channel: ChannelSelection) -> Self {
        Self { channel, ..self }
    }

    /// Replace the display point budget.
    pub fn with_preview_points(self, preview_points: usize) -> Self {
        Self {
            preview_points,
            ..self
        }
    }

    /// Replace the roll-off fraction.
    pub fn with_rolloff_percent(self, rolloff_percent: f32) -> Self {
        Self {
            rolloff_percent,
            ..self
        }
    }

    /// Check every parameter against `sample_rate` before computing.
    pub fn validate(&self, sample_rate: u32) -> Result<()> {
        validate_sample_rate(sample_rate)?;
        self.band.validate_for(sample_rate)?;
        validate_decimation(self.decimation)?;
        self.stft.validate()?;
        self.rms.validate()?;
        self.pitch.validate(sample_rate)?;
        if self.preview_points == 0 {
            return Err(AnalysisError::ZeroPreviewPoints);
        }
        validate_rolloff(self.rolloff_percent)
    }
}
