//! Analysis configuration for sonograph.
//!
//! Stores every analysis parameter in a small TOML file and turns it into
//! an immutable [`AnalysisRequest`](sonograph_analysis::AnalysisRequest).
//!
//! # Features
//!
//! - **Config files**: Load and save [`AnalysisConfig`] as TOML, every field optional
//! - **Requests**: [`AnalysisConfig::to_request`] checks names and parameter ranges
//! - **Paths**: Platform-specific config directory and default file
//!
//! # Example
//!
//! ```rust,no_run
//! use sonograph_config::{AnalysisConfig, default_config_path};
//!
//! // Load the user's defaults (or built-in defaults when there is no file)
//! let config = AnalysisConfig::load_or_default(None).unwrap();
//! let request = config.to_request().unwrap();
//!
//! // Tweak and save back
//! let mut config = config;
//! config.fft_scale = 4;
//! config.save(default_config_path()).unwrap();
//! # let _ = request;
//! ```

mod analysis_config;
mod error;

/// Platform-specific paths for configuration files.
pub mod paths;

pub use analysis_config::{AnalysisConfig, BandConfig, PitchConfig, RmsConfig, StftConfig};
pub use error::ConfigError;
pub use paths::{
    DEFAULT_CONFIG_FILE, default_config_path, ensure_user_config_dir, find_config,
    user_config_dir,
};
