//! WAV loading for the sonograph analysis pipeline.
//!
//! This crate turns files on disk into immutable
//! [`AudioBuffer`](sonograph_analysis::AudioBuffer)s and back:
//!
//! - **Loading**: [`load`] keeps up to two channels, [`load_mono`] averages them
//! - **Header only**: [`read_wav_info`] reports format and duration without decoding
//! - **Writing**: [`write_wav`] stores a buffer as 16/24-bit PCM or 32-bit float
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sonograph_io::load;
//! use sonograph_analysis::{AnalysisRequest, analyze};
//!
//! let buffer = load("take.wav")?;
//! let report = analyze(&buffer, &AnalysisRequest::default())?;
//! println!("mean F0: {:.1} Hz", report.metrics.mean_f0);
//! ```

use std::path::PathBuf;

use sonograph_analysis::AnalysisError;

mod wav;

pub use wav::{WavFormat, WavInfo, load, load_mono, read_wav_info, write_wav};

/// Error types for audio file operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The path does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// WAV file unparsable, unsupported, or failed to write.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Decoded data violates the buffer invariants (e.g. zero sample rate).
    #[error("invalid audio data: {0}")]
    Buffer(#[from] AnalysisError),

    /// Bit depth the writer cannot produce.
    #[error("unsupported bit depth: {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio file operations.
pub type Result<T> = std::result::Result<T, Error>;
