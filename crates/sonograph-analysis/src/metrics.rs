//! Aggregate scalar metrics.
//!
//! The spectral centroid has two common formulations that disagree on
//! signals whose level or timbre changes over time:
//!
//! - **Grid-weighted** ([`spectral_centroid`]): one magnitude-weighted mean
//!   over every bin of every frame, so loud frames dominate.
//! - **Frame mean** ([`frame_mean_centroid`]): the centroid of each
//!   non-silent frame, averaged with equal weight per frame.
//!
//! [`compute_metrics`] reports the grid-weighted value and logs a warning
//! when the two differ by more than 1%. It never reconciles them.

use tracing::{debug, warn};

use crate::dynamics::{crest_factor, peak, rms};
use crate::error::{AnalysisError, Result};
use crate::fft::DB_EPSILON;
use crate::request::AnalysisRequest;
use crate::spectrogram::{ComplexStft, stft};

/// Relative divergence between centroid formulations that triggers a warning.
pub const CENTROID_DIVERGENCE_TOLERANCE: f32 = 0.01;

/// Default roll-off fraction.
pub const DEFAULT_ROLLOFF_PERCENT: f32 = 0.85;

/// Scalar summary of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricsSummary {
    /// Duration in seconds.
    pub duration_secs: f32,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Peak absolute sample value.
    pub peak: f32,
    /// RMS level (linear).
    pub rms: f32,
    /// Peak / RMS, 0 for silence.
    pub crest_factor: f32,
    /// Grid-weighted spectral centroid in Hz, 0 for silence.
    pub spectral_centroid: f32,
    /// Roll-off frequency in Hz, 0 for silence.
    pub spectral_rolloff: f32,
    /// Mean voiced F0 in Hz, 0 when nothing was voiced.
    pub mean_f0: f32,
}

/// Magnitude-weighted mean frequency over the whole grid.
///
/// Returns 0 when the grid carries no energy.
pub fn spectral_centroid(grid: &ComplexStft) -> f32 {
    let mut weighted = 0.0f64;
    let mut total = 0.0f64;
    for frame in &grid.frames {
        for (c, &f) in frame.iter().zip(&grid.frequencies) {
            let mag = f64::from(c.norm());
            weighted += mag * f64::from(f);
            total += mag;
        }
    }
    if total > f64::from(DB_EPSILON) {
        (weighted / total) as f32
    } else {
        0.0
    }
}

/// Mean of the per-frame centroids over non-silent frames.
///
/// Returns 0 when every frame is silent.
pub fn frame_mean_centroid(grid: &ComplexStft) -> f32 {
    let centroids: Vec<f64> = grid
        .frames
        .iter()
        .filter_map(|frame| {
            let (weighted, total) = frame.iter().zip(&grid.frequencies).fold(
                (0.0f64, 0.0f64),
                |(w, t), (c, &f)| {
                    let mag = f64::from(c.norm());
                    (w + mag * f64::from(f), t + mag)
                },
            );
            (total > f64::from(DB_EPSILON)).then(|| weighted / total)
        })
        .collect();

    if centroids.is_empty() {
        0.0
    } else {
        (centroids.iter().sum::<f64>() / centroids.len() as f64) as f32
    }
}

/// Lowest frequency at which the cumulative time-summed magnitude reaches
/// `percent` of the total.
///
/// `percent` must lie in `(0, 1]`. Returns 0 when the grid is silent.
pub fn spectral_rolloff(grid: &ComplexStft, percent: f32) -> Result<f32> {
    validate_rolloff(percent)?;

    let mut per_bin = vec![0.0f64; grid.num_bins()];
    for frame in &grid.frames {
        for (acc, c) in per_bin.iter_mut().zip(frame) {
            *acc += f64::from(c.norm());
        }
    }

    let total: f64 = per_bin.iter().sum();
    if total <= f64::from(DB_EPSILON) {
        return Ok(0.0);
    }

    let threshold = f64::from(percent) * total;
    let mut cumulative = 0.0f64;
    for (bin, &mag) in per_bin.iter().enumerate() {
        cumulative += mag;
        if cumulative >= threshold {
            return Ok(grid.frequencies[bin]);
        }
    }
    // Rounding can leave the last partial sum a hair under the threshold.
    Ok(grid.frequencies.last().copied().unwrap_or(0.0))
}

/// Reject roll-off fractions outside `(0, 1]`.
pub fn validate_rolloff(percent: f32) -> Result<()> {
    if percent > 0.0 && percent <= 1.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidRolloff(percent))
    }
}

/// Compute every scalar metric for one channel.
///
/// The spectral metrics run on the request's STFT restricted to its band;
/// mean F0 comes from the request's pitch estimator.
pub fn compute_metrics(
    samples: &[f32],
    sample_rate: u32,
    request: &AnalysisRequest,
) -> Result<MetricsSummary> {
    request.validate(sample_rate)?;

    let grid = stft(samples, sample_rate, request.stft)?.restrict(request.band);
    let centroid = spectral_centroid(&grid);
    let per_frame = frame_mean_centroid(&grid);
    if centroid > 0.0 {
        let divergence = (centroid - per_frame).abs() / centroid;
        if divergence > CENTROID_DIVERGENCE_TOLERANCE {
            warn!(
                grid_weighted = centroid,
                frame_mean = per_frame,
                divergence,
                "spectral centroid formulations disagree"
            );
        }
    }

    let mean_f0 = request.pitch.estimate(samples, sample_rate)?.mean_f0();

    let summary = MetricsSummary {
        duration_secs: samples.len() as f32 / sample_rate as f32,
        sample_rate,
        peak: peak(samples),
        rms: rms(samples),
        crest_factor: crest_factor(samples),
        spectral_centroid: centroid,
        spectral_rolloff: spectral_rolloff(&grid, request.rolloff_percent)?,
        mean_f0,
    };
    debug!(?summary, "metrics");
    Ok(summary)
}
