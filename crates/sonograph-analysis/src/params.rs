//! Per-call analysis parameters.
//!
//! Nothing here is stored by the pipeline: every function receives the
//! parameters it needs and validates them before touching the samples.

use crate::error::{AnalysisError, Result};

/// Inclusive frequency interval `[fmin, fmax]` in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBand {
    /// Lower edge in Hz.
    pub fmin: f32,
    /// Upper edge in Hz.
    pub fmax: f32,
}

impl FrequencyBand {
    /// Band used by the spectrum views when nothing else is configured.
    pub const AUDIBLE: Self = Self::new(20.0, 20000.0);

    /// Plausible range for a fundamental frequency.
    pub const FUNDAMENTAL: Self = Self::new(20.0, 7500.0);

    /// Create a band. Call [`validate`](Self::validate) before use.
    pub const fn new(fmin: f32, fmax: f32) -> Self {
        Self { fmin, fmax }
    }

    /// The whole one-sided range `[0, sample_rate / 2]`.
    pub fn full(sample_rate: u32) -> Self {
        Self::new(0.0, nyquist(sample_rate))
    }

    /// Whether `freq` lies inside the band (edges included).
    pub fn contains(&self, freq: f32) -> bool {
        freq >= self.fmin && freq <= self.fmax
    }

    /// Band width in Hz.
    pub fn width(&self) -> f32 {
        self.fmax - self.fmin
    }

    /// Check ordering only: finite, non-negative, `fmin < fmax`.
    pub fn validate(&self) -> Result<()> {
        if !self.fmin.is_finite() || !self.fmax.is_finite() || self.fmin >= self.fmax {
            return Err(AnalysisError::InvalidBand {
                fmin: self.fmin,
                fmax: self.fmax,
            });
        }
        if self.fmin < 0.0 {
            return Err(AnalysisError::BandOutOfRange {
                fmin: self.fmin,
                fmax: self.fmax,
                nyquist: f32::INFINITY,
            });
        }
        Ok(())
    }

    /// Check ordering and that both edges lie in `[0, sample_rate / 2]`.
    pub fn validate_for(&self, sample_rate: u32) -> Result<()> {
        validate_sample_rate(sample_rate)?;
        self.validate()?;
        let nyquist = nyquist(sample_rate);
        if self.fmax > nyquist {
            return Err(AnalysisError::BandOutOfRange {
                fmin: self.fmin,
                fmax: self.fmax,
                nyquist,
            });
        }
        Ok(())
    }

    /// Pull `fmax` down to Nyquist when it overshoots.
    ///
    /// Callers use this for default bands that were chosen without knowing
    /// the file's sample rate. The result may still be invalid if `fmin`
    /// itself lies above Nyquist.
    pub fn clamped_to(&self, sample_rate: u32) -> Self {
        Self::new(self.fmin, self.fmax.min(nyquist(sample_rate)))
    }
}

impl Default for FrequencyBand {
    fn default() -> Self {
        Self::AUDIBLE
    }
}

/// Window/hop pair for framed analysis (STFT, sliding RMS).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameParams {
    /// Window length in samples.
    pub window_len: usize,
    /// Stride between consecutive frames in samples.
    pub hop_len: usize,
}

impl FrameParams {
    /// Create a window/hop pair. Call [`validate`](Self::validate) before use.
    pub const fn new(window_len: usize, hop_len: usize) -> Self {
        Self {
            window_len,
            hop_len,
        }
    }

    /// STFT defaults: 2048-sample window, 50% overlap.
    pub const fn stft_default() -> Self {
        Self::new(2048, 1024)
    }

    /// Sliding RMS defaults: 2048-sample frame, 512-sample hop.
    pub const fn rms_default() -> Self {
        Self::new(2048, 512)
    }

    /// Reject zero lengths and hops longer than the window.
    pub fn validate(&self) -> Result<()> {
        if self.window_len == 0 {
            return Err(AnalysisError::ZeroWindow);
        }
        if self.hop_len == 0 {
            return Err(AnalysisError::ZeroHop);
        }
        if self.hop_len > self.window_len {
            return Err(AnalysisError::HopExceedsWindow {
                hop: self.hop_len,
                window: self.window_len,
            });
        }
        Ok(())
    }

    /// Number of full windows that fit in `len` samples.
    ///
    /// `floor((len - window) / hop) + 1`, or 0 when the input is shorter
    /// than one window. No boundary padding.
    pub fn num_frames(&self, len: usize) -> usize {
        if len < self.window_len || self.hop_len == 0 {
            0
        } else {
            (len - self.window_len) / self.hop_len + 1
        }
    }
}

/// Nyquist frequency for a sample rate.
pub fn nyquist(sample_rate: u32) -> f32 {
    sample_rate as f32 / 2.0
}

/// Reject a zero sample rate.
pub fn validate_sample_rate(sample_rate: u32) -> Result<()> {
    if sample_rate == 0 {
        Err(AnalysisError::InvalidSampleRate)
    } else {
        Ok(())
    }
}

/// Reject a zero decimation factor.
pub fn validate_decimation(decimation: usize) -> Result<()> {
    if decimation == 0 {
        Err(AnalysisError::ZeroDecimation)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_rejects_inverted_edges() {
        let band = FrequencyBand::new(2000.0, 20.0);
        assert!(matches!(
            band.validate(),
            Err(AnalysisError::InvalidBand { .. })
        ));
    }

    #[test]
    fn band_rejects_equal_edges() {
        let band = FrequencyBand::new(440.0, 440.0);
        assert!(band.validate().is_err());
    }

    #[test]
    fn band_rejects_nan() {
        let band = FrequencyBand::new(f32::NAN, 1000.0);
        assert!(band.validate().is_err());
    }

    #[test]
    fn band_rejects_negative_fmin() {
        let band = FrequencyBand::new(-10.0, 1000.0);
        assert!(matches!(
            band.validate(),
            Err(AnalysisError::BandOutOfRange { .. })
        ));
    }

    #[test]
    fn band_rejects_above_nyquist() {
        let band = FrequencyBand::new(20.0, 20000.0);
        assert!(band.validate_for(44100).is_ok());
        assert!(matches!(
            band.validate_for(16000),
            Err(AnalysisError::BandOutOfRange { nyquist, .. }) if nyquist == 8000.0
        ));
    }

    #[test]
    fn band_clamps_to_nyquist() {
        let band = FrequencyBand::AUDIBLE.clamped_to(16000);
        assert_eq!(band.fmax, 8000.0);
        assert!(band.validate_for(16000).is_ok());
    }

    #[test]
    fn band_contains_edges() {
        let band = FrequencyBand::new(100.0, 200.0);
        assert!(band.contains(100.0));
        assert!(band.contains(200.0));
        assert!(!band.contains(99.9));
        assert!(!band.contains(200.1));
    }

    #[test]
    fn frame_params_validation() {
        assert!(FrameParams::stft_default().validate().is_ok());
        assert_eq!(
            FrameParams::new(0, 0).validate(),
            Err(AnalysisError::ZeroWindow)
        );
        assert_eq!(
            FrameParams::new(1024, 0).validate(),
            Err(AnalysisError::ZeroHop)
        );
        assert_eq!(
            FrameParams::new(512, 1024).validate(),
            Err(AnalysisError::HopExceedsWindow {
                hop: 1024,
                window: 512
            })
        );
    }

    #[test]
    fn frame_count_without_padding() {
        let params = FrameParams::new(2048, 1024);
        assert_eq!(params.num_frames(44100), (44100 - 2048) / 1024 + 1);
        assert_eq!(params.num_frames(2048), 1);
        assert_eq!(params.num_frames(2047), 0);
        assert_eq!(params.num_frames(0), 0);
    }

    #[test]
    fn zero_sample_rate_rejected() {
        assert_eq!(
            validate_sample_rate(0),
            Err(AnalysisError::InvalidSampleRate)
        );
        assert!(FrequencyBand::AUDIBLE.validate_for(0).is_err());
    }

    #[test]
    fn zero_decimation_rejected() {
        assert_eq!(validate_decimation(0), Err(AnalysisError::ZeroDecimation));
        assert!(validate_decimation(1).is_ok());
    }
}
