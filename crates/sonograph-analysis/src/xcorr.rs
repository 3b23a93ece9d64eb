//! FFT-based autocorrelation.
//!
//! ```text
//! R_xx(τ) = Σ_{n} x[n] · x[n + τ]
//! ```
//!
//! The full autocorrelation is symmetric around lag 0, so only the
//! non-negative half `[R(0), R(1), …, R(N-1)]` is returned. It is computed
//! with the correlation theorem `R = IFFT(|X|²)`, zero-padded to at least
//! `2N - 1` points so the circular result does not wrap.
//!
//! Reference: Oppenheim & Schafer, "Discrete-Time Signal Processing" (3rd ed.), §2.8.

use crate::fft::Fft;
use rustfft::num_complex::Complex;

/// Non-negative-lag half of the full (unnormalized) autocorrelation.
///
/// Output length equals the input length; empty input gives an empty result.
pub fn autocorrelation(signal: &[f32]) -> Vec<f32> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    let fft_size = (2 * n - 1).next_power_of_two().max(2);
    let fft = Fft::new(fft_size);

    let mut buffer: Vec<Complex<f32>> = signal.iter().map(|&v| Complex::new(v, 0.0)).collect();
    buffer.resize(fft_size, Complex::new(0.0, 0.0));

    fft.forward_complex(&mut buffer);
    for c in buffer.iter_mut() {
        *c = Complex::new(c.norm_sqr(), 0.0);
    }
    fft.inverse_complex(&mut buffer);

    buffer.iter().take(n).map(|c| c.re).collect()
}

/// Lag of the strongest repetition, skipping the zero-lag main lobe.
///
/// The search starts at the first lag where the correlation drops to zero
/// or below, so the trivially large values next to lag 0 cannot win.
/// Equal peaks resolve to the shortest lag. Returns `None` when the
/// correlation never leaves the main lobe or the signal carries no energy.
pub fn dominant_lag(correlation: &[f32]) -> Option<usize> {
    let zero_lag = *correlation.first()?;
    if zero_lag <= 0.0 {
        return None;
    }

    let lobe_end = correlation.iter().position(|&r| r <= 0.0)?;

    correlation
        .iter()
        .enumerate()
        .skip(lobe_end.max(1))
        .min_by(|(_, a), (_, b)| b.total_cmp(a))
        .filter(|&(_, &r)| r > 0.0)
        .map(|(lag, _)| lag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn direct(signal: &[f32]) -> Vec<f32> {
        (0..signal.len())
            .map(|lag| {
                signal
                    .iter()
                    .zip(signal.iter().skip(lag))
                    .map(|(a, b)| a * b)
                    .sum()
            })
            .collect()
    }

    #[test]
    fn fft_matches_direct_sum() {
        let signal: Vec<f32> = (0..100).map(|i| ((i * 37 % 17) as f32 - 8.0) / 8.0).collect();
        let fast = autocorrelation(&signal);
        let slow = direct(&signal);

        assert_eq!(fast.len(), slow.len());
        for (lag, (a, b)) in fast.iter().zip(slow.iter()).enumerate() {
            assert!((a - b).abs() < 1e-3, "lag {lag}: {a} vs {b}");
        }
    }

    #[test]
    fn zero_lag_is_energy() {
        let signal = [1.0, -2.0, 3.0];
        let r = autocorrelation(&signal);
        assert!((r[0] - 14.0).abs() < 1e-4);
        assert!((r[1] - (-8.0)).abs() < 1e-4);
        assert!((r[2] - 3.0).abs() < 1e-4);
    }

    #[test]
    fn empty_and_single() {
        assert!(autocorrelation(&[]).is_empty());
        let r = autocorrelation(&[2.0]);
        assert_eq!(r.len(), 1);
        assert!((r[0] - 4.0).abs() < 1e-5);
    }

    #[test]
    fn dominant_lag_finds_period() {
        // Period of 50 samples
        let signal: Vec<f32> = (0..1000).map(|i| (2.0 * PI * i as f32 / 50.0).sin()).collect();
        let r = autocorrelation(&signal);
        assert_eq!(dominant_lag(&r), Some(50));
    }

    #[test]
    fn dominant_lag_tie_prefers_shortest() {
        assert_eq!(dominant_lag(&[4.0, 1.0, -1.0, 2.0, 0.5, 2.0]), Some(3));
    }

    #[test]
    fn dominant_lag_rejects_silence_and_monotone() {
        assert_eq!(dominant_lag(&[0.0; 16]), None);
        assert_eq!(dominant_lag(&[]), None);
        // Never crosses zero: no lobe end
        assert_eq!(dominant_lag(&[4.0, 3.0, 2.0, 1.0]), None);
    }
}
