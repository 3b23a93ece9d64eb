//! Sonograph Analysis - Stateless signal-analysis pipeline
//!
//! Every function here takes samples plus explicit parameters and returns
//! plain numeric arrays. Nothing is cached between calls and nothing is
//! mutated after construction, so a caller can recompute any view whenever
//! its parameters change.
//!
//! - [`buffer`] - Immutable mono/stereo [`AudioBuffer`] and channel selection
//! - [`params`] - Frequency bands and window/hop pairs, with validation
//! - [`fft`] - FFT wrapper and the Hann analysis window
//! - [`spectrum`] - Normalized one-sided magnitude spectrum
//! - [`spectrogram`] - STFT, power spectrogram and 3-D surface mesh
//! - [`hilbert`] - Analytic signal, envelope and instantaneous frequency
//! - [`xcorr`] - FFT-based autocorrelation
//! - [`pitch`] - Spectral-peak, autocorrelation and Hilbert pitch tracking
//! - [`dynamics`] - RMS, peak, crest factor, sliding RMS, waveform preview
//! - [`metrics`] - Spectral centroid, roll-off and the scalar summary
//! - [`request`] / [`report`] - One request in, every view out
//! - [`export`] - CSV writers
//!
//! ## Example
//!
//! ```rust
//! use sonograph_analysis::{AnalysisRequest, AudioBuffer, FrequencyBand, analyze};
//! use std::f32::consts::PI;
//!
//! let samples: Vec<f32> = (0..44100)
//!     .map(|i| (2.0 * PI * 220.0 * i as f32 / 44100.0).sin())
//!     .collect();
//! let buffer = AudioBuffer::mono(samples, 44100).unwrap();
//!
//! let request = AnalysisRequest::default().with_band(FrequencyBand::new(20.0, 2000.0));
//! let report = analyze(&buffer, &request).unwrap();
//! assert!(report.metrics.crest_factor > 1.4);
//! ```
//!
//! ## Individual Views
//!
//! ```rust
//! use sonograph_analysis::{FrameParams, FrequencyBand, basic_spectrum, spectrogram};
//!
//! let samples = vec![0.0f32; 8192];
//! let spectrum = basic_spectrum(&samples, 44100, FrequencyBand::AUDIBLE, 1).unwrap();
//! assert!(spectrum.magnitudes.iter().all(|&m| m == 0.0));
//!
//! let grid = spectrogram(&samples, 44100, FrameParams::new(2048, 1024), FrequencyBand::AUDIBLE)
//!     .unwrap();
//! assert_eq!(grid.num_frames(), (8192 - 2048) / 1024 + 1);
//! ```

pub mod buffer;
pub mod dynamics;
pub mod error;
pub mod export;
pub mod fft;
pub mod hilbert;
pub mod metrics;
pub mod params;
pub mod pitch;
pub mod report;
pub mod request;
pub mod spectrogram;
pub mod spectrum;
pub mod xcorr;

// Re-export main types
pub use buffer::{AudioBuffer, ChannelSelection, Channels};
pub use dynamics::{
    RmsEnvelope, Waveform, crest_factor, peak, peak_db, rms, rms_db, sliding_rms,
    waveform_preview,
};
pub use error::{AnalysisError, Result};
pub use fft::{Fft, hann_window};
pub use hilbert::{
    Envelope, FrequencyTrace, HilbertTransform, hilbert_envelope, instantaneous_frequency,
};
pub use metrics::{
    MetricsSummary, compute_metrics, frame_mean_centroid, spectral_centroid, spectral_rolloff,
};
pub use params::{FrameParams, FrequencyBand};
pub use pitch::{
    PitchEstimator, PitchProfile, PitchSeries, PitchStats, estimate_f0_by_spectral_peak,
    estimate_pitch_by_autocorrelation,
};
pub use report::{AnalysisReport, analyze};
pub use request::AnalysisRequest;
pub use spectrogram::{
    ComplexStft, StftAnalyzer, SurfaceMesh, TimeFrequencyResult, sfft3d, spectrogram, stft,
    stft_db,
};
pub use spectrum::{ChannelSpectra, SpectrumResult, basic_spectrum, basic_spectrum_channels};
