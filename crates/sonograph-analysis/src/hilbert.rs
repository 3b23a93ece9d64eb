//! Analytic signal, Hilbert envelope and instantaneous frequency.
//!
//! `analytic(x) = x + i·H{x}` is built in the frequency domain over the whole
//! input, without padding: bins `1..ceil(N/2)` are doubled, the negative
//! half is cleared, and DC plus (for even `N`) the Nyquist bin pass through.
//! Its magnitude is the envelope; the per-sample change of its argument is
//! the instantaneous frequency.
//!
//! [`hilbert_envelope`] and [`instantaneous_frequency`] accept a point budget
//! and then work on every `step`-th sample. Rates derived from the strided
//! copy use `fs / step`.
//!
//! ```rust
//! use sonograph_analysis::hilbert::HilbertTransform;
//! use std::f32::consts::TAU;
//!
//! // 16 whole cycles: periodic in the window, so the envelope is flat
//! let tone: Vec<f32> = (0..1024)
//!     .map(|i| 0.5 * (TAU * 16.0 * i as f32 / 1024.0).cos())
//!     .collect();
//! let envelope = HilbertTransform::new(1024).instantaneous_amplitude(&tone);
//! assert!(envelope.iter().all(|&a| (a - 0.5).abs() < 1e-3));
//! ```

use crate::dynamics::{display_step, linspace};
use crate::error::{AnalysisError, Result};
use crate::fft::Fft;
use crate::params::validate_sample_rate;
use rustfft::num_complex::Complex;
use std::f32::consts::PI;
use tracing::debug;

/// Whole-buffer FFT Hilbert transform of a fixed size.
pub struct HilbertTransform {
    fft: Fft,
}

impl HilbertTransform {
    /// Transform for inputs of `fft_size` samples.
    ///
    /// Shorter input is zero-padded and longer input truncated, so pass the
    /// signal length for an exact whole-buffer transform.
    pub fn new(fft_size: usize) -> Self {
        Self {
            fft: Fft::new(fft_size),
        }
    }

    /// Transform length.
    pub fn fft_size(&self) -> usize {
        self.fft.size()
    }

    /// `x + i·H{x}`, one complex value per input sample (up to the FFT size).
    pub fn analytic_signal(&self, signal: &[f32]) -> Vec<Complex<f32>> {
        let size = self.fft_size();
        let n = signal.len().min(size);

        let mut spectrum = vec![Complex::new(0.0, 0.0); size];
        for (bin, &x) in spectrum.iter_mut().zip(&signal[..n]) {
            bin.re = x;
        }
        self.fft.forward_complex(&mut spectrum);

        // Positive bins run 1..ceil(N/2); for even N the Nyquist bin N/2 is
        // shared and stays as is. Everything above is a negative frequency.
        let positive_end = size.div_ceil(2);
        let negative_start = size / 2 + 1;
        for bin in &mut spectrum[1..positive_end] {
            *bin *= 2.0;
        }
        for bin in &mut spectrum[negative_start..] {
            *bin = Complex::new(0.0, 0.0);
        }

        self.fft.inverse_complex(&mut spectrum);
        spectrum.truncate(n);
        spectrum
    }

    /// Magnitude of the analytic signal.
    pub fn instantaneous_amplitude(&self, signal: &[f32]) -> Vec<f32> {
        self.analytic_signal(signal)
            .iter()
            .map(|c| c.norm())
            .collect()
    }

    /// Instantaneous frequency in Hz, one value per adjacent sample pair.
    ///
    /// Each phase step is `arg(z[n+1] * conj(z[n]))`: the first difference of
    /// the unwrapped phase, without a large running phase in `f32`. Scaled by
    /// `sample_rate / 2π`.
    pub fn instantaneous_frequency(&self, signal: &[f32], sample_rate: f32) -> Vec<f32> {
        let analytic = self.analytic_signal(signal);
        let scale = sample_rate / (2.0 * PI);

        analytic
            .windows(2)
            .map(|pair| (pair[1] * pair[0].conj()).arg() * scale)
            .collect()
    }
}

/// Amplitude envelope with its time axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Envelope {
    /// Times in seconds, linearly spaced over the buffer duration.
    pub times: Vec<f32>,
    /// Envelope values.
    pub values: Vec<f32>,
}

/// Instantaneous frequency trace with its time axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrequencyTrace {
    /// Times in seconds (the envelope time axis minus its first point).
    pub times: Vec<f32>,
    /// Frequency in Hz at each time.
    pub values: Vec<f32>,
    /// Sample rate the derivative was scaled with, after decimation.
    pub effective_sample_rate: f32,
}

/// Hilbert envelope `|analytic(x)|`.
///
/// With `max_points = Some(m)` and more than `m` samples, the envelope is
/// computed on every `len / m`-th sample and the time axis is spaced to match.
pub fn hilbert_envelope(
    samples: &[f32],
    sample_rate: u32,
    max_points: Option<usize>,
) -> Result<Envelope> {
    validate_sample_rate(sample_rate)?;
    check_points(max_points)?;
    if samples.is_empty() {
        return Ok(Envelope::default());
    }

    let step = display_step(samples.len(), max_points);
    let reduced: Vec<f32> = samples.iter().step_by(step).copied().collect();
    let duration = samples.len() as f32 / sample_rate as f32;

    let values = HilbertTransform::new(reduced.len()).instantaneous_amplitude(&reduced);
    debug!(step, points = values.len(), "hilbert_envelope");

    Ok(Envelope {
        times: linspace(0.0, duration, values.len()),
        values,
    })
}

/// Instantaneous frequency `diff(unwrap(arg(analytic(x)))) * fs_effective / 2π`.
///
/// `fs_effective = sample_rate / step` where `step` is the display decimation
/// (1 when `max_points` is `None` or the input is short enough). The output
/// has one point fewer than the (decimated) input time axis.
pub fn instantaneous_frequency(
    samples: &[f32],
    sample_rate: u32,
    max_points: Option<usize>,
) -> Result<FrequencyTrace> {
    validate_sample_rate(sample_rate)?;
    check_points(max_points)?;

    let step = display_step(samples.len(), max_points);
    let effective_sample_rate = sample_rate as f32 / step as f32;
    if samples.is_empty() {
        return Ok(FrequencyTrace {
            effective_sample_rate,
            ..FrequencyTrace::default()
        });
    }

    let reduced: Vec<f32> = samples.iter().step_by(step).copied().collect();
    let duration = samples.len() as f32 / sample_rate as f32;
    let times = linspace(0.0, duration, reduced.len());

    let values = HilbertTransform::new(reduced.len())
        .instantaneous_frequency(&reduced, effective_sample_rate);
    debug!(step, effective_sample_rate, points = values.len(), "instantaneous_frequency");

    Ok(FrequencyTrace {
        times: times[1..].to_vec(),
        values,
        effective_sample_rate,
    })
}

fn check_points(max_points: Option<usize>) -> Result<()> {
    if max_points == Some(0) {
        Err(AnalysisError::ZeroPreviewPoints)
    } else {
        Ok(())
    }
}
