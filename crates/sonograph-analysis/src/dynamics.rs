//! Level and energy measurements
//!
//! - RMS level and peak level, linear and dB
//! - Crest factor (peak-to-RMS ratio)
//! - Framed sliding RMS envelope
//! - Strided waveform preview for display

use crate::error::{AnalysisError, Result};
use crate::params::{FrameParams, validate_sample_rate};
use tracing::debug;

/// Default point budget for display-only decimation.
pub const DEFAULT_PREVIEW_POINTS: usize = 8000;

/// Level reported for silence, in dB.
pub const SILENCE_DB: f32 = -200.0;

/// Compute RMS (Root Mean Square) level of a signal
///
/// Returns RMS value in linear scale (not dB). Empty input has RMS 0.
pub fn rms(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = signal.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    (sum_sq / signal.len() as f64).sqrt() as f32
}

/// Compute RMS level in dB
pub fn rms_db(signal: &[f32]) -> f32 {
    to_db(rms(signal))
}

/// Compute peak level (maximum absolute value)
pub fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0f32, |acc, x| acc.max(x.abs()))
}

/// Compute peak level in dB
pub fn peak_db(signal: &[f32]) -> f32 {
    to_db(peak(signal))
}

/// Compute crest factor (peak-to-RMS ratio)
///
/// Silence (RMS of zero) has a crest factor of 0, never NaN or infinity.
/// A full-scale sine sits at ~1.41.
pub fn crest_factor(signal: &[f32]) -> f32 {
    let rms_val = rms(signal);
    if rms_val > 0.0 {
        peak(signal) / rms_val
    } else {
        0.0
    }
}

fn to_db(level: f32) -> f32 {
    if level > 1e-10 {
        20.0 * level.log10()
    } else {
        SILENCE_DB
    }
}

/// Framed RMS values with their frame start times.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RmsEnvelope {
    /// Frame start times in seconds (`k * hop / fs`).
    pub times: Vec<f32>,
    /// RMS of each frame.
    pub values: Vec<f32>,
}

/// Sliding RMS over full frames of `frame.window_len` samples every `frame.hop_len`.
///
/// Input shorter than one frame yields a single value over the whole input;
/// empty input yields an empty envelope.
pub fn sliding_rms(samples: &[f32], sample_rate: u32, frame: FrameParams) -> Result<RmsEnvelope> {
    validate_sample_rate(sample_rate)?;
    frame.validate()?;

    if samples.is_empty() {
        return Ok(RmsEnvelope::default());
    }

    let values: Vec<f32> = if samples.len() < frame.window_len {
        vec![rms(samples)]
    } else {
        samples
            .windows(frame.window_len)
            .step_by(frame.hop_len)
            .map(rms)
            .collect()
    };

    let times = (0..values.len())
        .map(|k| (k * frame.hop_len) as f32 / sample_rate as f32)
        .collect();

    debug!(frames = values.len(), "sliding_rms");
    Ok(RmsEnvelope { times, values })
}

/// Waveform reduced for plotting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Waveform {
    /// Times in seconds, linearly spaced over the buffer duration.
    pub times: Vec<f32>,
    /// Strided sample values.
    pub values: Vec<f32>,
}

/// Stride the samples down to roughly `max_points` for display.
///
/// Not meant for further numeric analysis: the stride does no filtering.
pub fn waveform_preview(samples: &[f32], sample_rate: u32, max_points: usize) -> Result<Waveform> {
    validate_sample_rate(sample_rate)?;
    if max_points == 0 {
        return Err(AnalysisError::ZeroPreviewPoints);
    }

    let step = display_step(samples.len(), Some(max_points));
    let values: Vec<f32> = samples.iter().step_by(step).copied().collect();
    let duration = samples.len() as f32 / sample_rate as f32;

    Ok(Waveform {
        times: linspace(0.0, duration, values.len()),
        values,
    })
}

/// Stride that brings `len` samples down to about `max_points`.
///
/// `len / max_points` when the input is longer than the budget, else 1.
pub(crate) fn display_step(len: usize, max_points: Option<usize>) -> usize {
    match max_points {
        Some(points) if points > 0 && len > points => len / points,
        _ => 1,
    }
}

/// `count` evenly spaced values from `start` to `end` inclusive.
pub(crate) fn linspace(start: f32, end: f32, count: usize) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f32;
            (0..count).map(|i| start + step * i as f32).collect()
        }
    }
}
