//! One-shot magnitude spectrum with band mask and bin decimation.
//!
//! The whole buffer goes through a single real FFT (no window), giving bins
//! `0..=N/2` at `k * fs / N`. Bins are then **decimated first** (every
//! `decimation`-th bin, starting at DC) and **masked second** to the
//! requested band, so the surviving bins always lie on the same global
//! grid regardless of where the band edges fall. Magnitudes are divided by
//! their in-band maximum; an all-zero band is left as zeros.

use tracing::debug;

use crate::buffer::{AudioBuffer, ChannelSelection};
use crate::error::Result;
use crate::fft::{Fft, bin_frequency};
use crate::params::{FrequencyBand, validate_decimation};

/// Normalized magnitude spectrum of one channel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpectrumResult {
    /// Bin frequencies in Hz, strictly ascending.
    pub frequencies: Vec<f32>,
    /// Magnitudes in `[0, 1]`, same length as `frequencies`.
    pub magnitudes: Vec<f32>,
}

impl SpectrumResult {
    /// Number of bins that survived decimation and masking.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Whether no bin fell inside the band.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Frequency and magnitude of the strongest bin, the lowest one on a tie.
    pub fn peak(&self) -> Option<(f32, f32)> {
        self.magnitudes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| b.total_cmp(a))
            .map(|(i, &mag)| (self.frequencies[i], mag))
    }
}

/// Per-channel spectra sharing one frequency axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChannelSpectra {
    /// Bin frequencies in Hz, strictly ascending.
    pub frequencies: Vec<f32>,
    /// One normalized magnitude vector per selected channel.
    pub magnitudes: Vec<Vec<f32>>,
}

/// Normalized one-sided FFT magnitude spectrum restricted to `band`.
///
/// # Arguments
/// * `samples` - Input signal (the entire buffer is transformed)
/// * `sample_rate` - Sample rate in Hz
/// * `band` - Inclusive frequency range to keep
/// * `decimation` - Keep every n-th bin (1 keeps all)
///
/// # Errors
/// Rejects an invalid band, a band beyond Nyquist, or a zero decimation
/// factor before doing any work. Empty input is not an error and yields an
/// empty result.
pub fn basic_spectrum(
    samples: &[f32],
    sample_rate: u32,
    band: FrequencyBand,
    decimation: usize,
) -> Result<SpectrumResult> {
    band.validate_for(sample_rate)?;
    validate_decimation(decimation)?;

    if samples.is_empty() {
        return Ok(SpectrumResult::default());
    }

    let n = samples.len();
    let fft = Fft::new(n);
    let spectrum = fft.forward(samples);

    let (frequencies, mut magnitudes): (Vec<f32>, Vec<f32>) = spectrum
        .iter()
        .enumerate()
        .step_by(decimation)
        .map(|(bin, c)| (bin_frequency(bin, n, sample_rate), c.norm()))
        .filter(|&(freq, _)| band.contains(freq))
        .unzip();

    normalize_to_max(&mut magnitudes);

    debug!(
        fft_size = n,
        decimation,
        bins = frequencies.len(),
        "basic_spectrum"
    );

    Ok(SpectrumResult {
        frequencies,
        magnitudes,
    })
}

/// [`basic_spectrum`] for each channel picked by `selection`.
///
/// Every channel is normalized against its own in-band maximum.
pub fn basic_spectrum_channels(
    buffer: &AudioBuffer,
    selection: ChannelSelection,
    band: FrequencyBand,
    decimation: usize,
) -> Result<ChannelSpectra> {
    let mut result = ChannelSpectra::default();
    for channel in buffer.select(selection) {
        let spectrum = basic_spectrum(&channel, buffer.sample_rate(), band, decimation)?;
        result.frequencies = spectrum.frequencies;
        result.magnitudes.push(spectrum.magnitudes);
    }
    Ok(result)
}

/// Divide by the maximum value, unless that maximum is zero.
fn normalize_to_max(values: &mut [f32]) {
    let max = values.iter().copied().fold(0.0f32, f32::max);
    let divisor = if max == 0.0 { 1.0 } else { max };
    for v in values.iter_mut() {
        *v /= divisor;
    }
}
