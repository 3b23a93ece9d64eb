//! Analysis configuration file format and conversion to requests.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use sonograph_analysis::metrics::validate_rolloff;
use sonograph_analysis::params::validate_decimation;
use sonograph_analysis::{
    AnalysisError, AnalysisRequest, ChannelSelection, FrameParams, FrequencyBand,
    PitchEstimator, PitchProfile,
};

use crate::error::ConfigError;
use crate::paths::default_config_path;

const STRATEGIES: &str = "spectral_peak, autocorrelation, hilbert";
const PROFILES: &str = "robust, balanced";
const CHANNELS: &str = "mono, left, right, both";

/// Analysis settings as stored on disk.
///
/// Every field has a default, so a file only needs the values it changes.
/// Names (`channel`, `pitch.strategy`, `pitch.profile`) stay strings here
/// and are checked by [`to_request`](Self::to_request).
///
/// # TOML Format
///
/// ```toml
/// fft_scale = 1
/// channel = "mono"
/// preview_points = 8000
/// rolloff_percent = 0.85
///
/// [band]
/// fmin = 20.0
/// fmax = 20000.0
///
/// [stft]
/// window = 2048
/// hop = 1024
///
/// [rms]
/// frame = 2048
/// hop = 512
///
/// [pitch]
/// strategy = "spectral_peak"
/// profile = "robust"
/// fmin = 20.0
/// fmax = 7500.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Keep every n-th spectrum bin.
    pub fft_scale: usize,
    /// `mono`, `left`, `right` or `both`.
    pub channel: String,
    /// Display budget for waveform, envelope and frequency trace.
    pub preview_points: usize,
    /// Roll-off fraction in `(0, 1]`.
    pub rolloff_percent: f32,
    /// Display band.
    pub band: BandConfig,
    /// Spectrogram STFT.
    pub stft: StftConfig,
    /// Sliding RMS.
    pub rms: RmsConfig,
    /// Pitch tracking.
    pub pitch: PitchConfig,
}

/// `[band]` table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BandConfig {
    /// Lower edge in Hz.
    pub fmin: f32,
    /// Upper edge in Hz.
    pub fmax: f32,
}

/// `[stft]` table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StftConfig {
    /// Window length in samples.
    pub window: usize,
    /// Hop in samples.
    pub hop: usize,
}

/// `[rms]` table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RmsConfig {
    /// Frame length in samples.
    pub frame: usize,
    /// Hop in samples.
    pub hop: usize,
}

/// `[pitch]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PitchConfig {
    /// `spectral_peak`, `autocorrelation` or `hilbert`.
    pub strategy: String,
    /// Autocorrelation profile: `robust` or `balanced`.
    pub profile: String,
    /// Lower edge of the spectral-peak search band in Hz.
    pub fmin: f32,
    /// Upper edge of the spectral-peak search band in Hz.
    pub fmax: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::from_request(&AnalysisRequest::default())
    }
}

impl Default for BandConfig {
    fn default() -> Self {
        FrequencyBand::AUDIBLE.into()
    }
}

impl Default for StftConfig {
    fn default() -> Self {
        FrameParams::stft_default().into()
    }
}

impl Default for RmsConfig {
    fn default() -> Self {
        let params = FrameParams::rms_default();
        Self {
            frame: params.window_len,
            hop: params.hop_len,
        }
    }
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            strategy: "spectral_peak".to_string(),
            profile: PitchProfile::default().name().to_string(),
            fmin: FrequencyBand::FUNDAMENTAL.fmin,
            fmax: FrequencyBand::FUNDAMENTAL.fmax,
        }
    }
}

impl From<FrequencyBand> for BandConfig {
    fn from(band: FrequencyBand) -> Self {
        Self {
            fmin: band.fmin,
            fmax: band.fmax,
        }
    }
}

impl From<BandConfig> for FrequencyBand {
    fn from(band: BandConfig) -> Self {
        FrequencyBand::new(band.fmin, band.fmax)
    }
}

impl From<FrameParams> for StftConfig {
    fn from(params: FrameParams) -> Self {
        Self {
            window: params.window_len,
            hop: params.hop_len,
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&content)?;
        debug!(path = %path.display(), "loaded analysis config");
        Ok(config)
    }

    /// Load `path` when given, else the default file when it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let default_path = default_config_path();
        if default_path.is_file() {
            info!(path = %default_path.display(), "using default analysis config");
            Self::load(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Snapshot of an existing request.
    pub fn from_request(request: &AnalysisRequest) -> Self {
        let mut pitch = PitchConfig {
            strategy: request.pitch.name().to_string(),
            ..PitchConfig::default()
        };
        match request.pitch {
            PitchEstimator::SpectralPeak { band, .. } => {
                pitch.fmin = band.fmin;
                pitch.fmax = band.fmax;
            }
            PitchEstimator::Autocorrelation { profile } => {
                pitch.profile = profile.name().to_string();
            }
            PitchEstimator::HilbertInstantaneous { .. } => {}
        }

        Self {
            fft_scale: request.decimation,
            channel: request.channel.name().to_string(),
            preview_points: request.preview_points,
            rolloff_percent: request.rolloff_percent,
            band: request.band.into(),
            stft: request.stft.into(),
            rms: RmsConfig {
                frame: request.rms.window_len,
                hop: request.rms.hop_len,
            },
            pitch,
        }
    }

    /// Build the request these settings describe.
    ///
    /// Checks names and every sample-rate-independent constraint; the band
    /// against Nyquist can only be checked once a file is loaded.
    pub fn to_request(&self) -> Result<AnalysisRequest, ConfigError> {
        let channel =
            ChannelSelection::from_name(&self.channel).ok_or_else(|| ConfigError::UnknownValue {
                field: "channel",
                value: self.channel.clone(),
                expected: CHANNELS,
            })?;

        let stft = FrameParams::new(self.stft.window, self.stft.hop);
        let pitch_band = FrequencyBand::new(self.pitch.fmin, self.pitch.fmax);
        let pitch = match self.pitch.strategy.to_ascii_lowercase().as_str() {
            "spectral_peak" | "spectral-peak" | "peak" => PitchEstimator::SpectralPeak {
                band: pitch_band,
                stft,
            },
            "autocorrelation" | "acf" => PitchEstimator::Autocorrelation {
                profile: PitchProfile::from_name(&self.pitch.profile).ok_or_else(|| {
                    ConfigError::UnknownValue {
                        field: "pitch.profile",
                        value: self.pitch.profile.clone(),
                        expected: PROFILES,
                    }
                })?,
            },
            "hilbert" => PitchEstimator::HilbertInstantaneous {
                max_points: Some(self.preview_points),
            },
            _ => {
                return Err(ConfigError::UnknownValue {
                    field: "pitch.strategy",
                    value: self.pitch.strategy.clone(),
                    expected: STRATEGIES,
                });
            }
        };

        let request = AnalysisRequest {
            band: self.band.into(),
            decimation: self.fft_scale,
            stft,
            rms: FrameParams::new(self.rms.frame, self.rms.hop),
            pitch,
            channel,
            preview_points: self.preview_points,
            rolloff_percent: self.rolloff_percent,
        };
        validate_structure(&request)?;
        Ok(request)
    }
}

fn validate_structure(request: &AnalysisRequest) -> Result<(), AnalysisError> {
    request.band.validate()?;
    validate_decimation(request.decimation)?;
    request.stft.validate()?;
    request.rms.validate()?;
    if let PitchEstimator::SpectralPeak { band, .. } = request.pitch {
        band.validate()?;
    }
    if request.preview_points == 0 {
        return Err(AnalysisError::ZeroPreviewPoints);
    }
    validate_rolloff(request.rolloff_percent)
}
