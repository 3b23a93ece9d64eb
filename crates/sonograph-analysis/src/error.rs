//! Error types for parameter validation.

use thiserror::Error;

/// Rejections raised before any computation starts.
///
/// Degenerate data (silence, empty bands, unvoiced frames) is never an error;
/// only malformed parameters or buffers are.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// `fmin` is not strictly below `fmax`, or either bound is not finite.
    #[error("invalid frequency band: fmin ({fmin} Hz) must be below fmax ({fmax} Hz)")]
    InvalidBand {
        /// Lower band edge in Hz.
        fmin: f32,
        /// Upper band edge in Hz.
        fmax: f32,
    },

    /// A band edge lies outside `[0, sample_rate / 2]`.
    #[error("frequency band {fmin}-{fmax} Hz exceeds the 0-{nyquist} Hz range")]
    BandOutOfRange {
        /// Lower band edge in Hz.
        fmin: f32,
        /// Upper band edge in Hz.
        fmax: f32,
        /// Nyquist frequency of the buffer being analyzed.
        nyquist: f32,
    },

    /// Decimation ("FFT scale") factor of zero.
    #[error("decimation factor must be at least 1")]
    ZeroDecimation,

    /// STFT or RMS window of zero samples.
    #[error("window length must be positive")]
    ZeroWindow,

    /// STFT or RMS hop of zero samples.
    #[error("hop length must be positive")]
    ZeroHop,

    /// Hop longer than the window it advances.
    #[error("hop length ({hop}) must not exceed window length ({window})")]
    HopExceedsWindow {
        /// Hop length in samples.
        hop: usize,
        /// Window length in samples.
        window: usize,
    },

    /// Sample rate of zero.
    #[error("sample rate must be positive")]
    InvalidSampleRate,

    /// Stereo channels of different lengths.
    #[error("channel length mismatch: left has {left} samples, right has {right}")]
    ChannelLengthMismatch {
        /// Left channel length.
        left: usize,
        /// Right channel length.
        right: usize,
    },

    /// Roll-off fraction outside `(0, 1]`.
    #[error("roll-off percent must be in (0, 1], got {0}")]
    InvalidRolloff(f32),

    /// Display point budget of zero.
    #[error("preview point count must be positive")]
    ZeroPreviewPoints,
}

/// Convenience result type for the analysis pipeline.
pub type Result<T> = std::result::Result<T, AnalysisError>;
