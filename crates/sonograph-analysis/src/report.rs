//! One-call dashboard computation.

use tracing::{info, warn};

use crate::buffer::{AudioBuffer, ChannelSelection};
use crate::dynamics::{RmsEnvelope, Waveform, sliding_rms, waveform_preview};
use crate::error::Result;
use crate::hilbert::{Envelope, FrequencyTrace, hilbert_envelope, instantaneous_frequency};
use crate::metrics::{MetricsSummary, compute_metrics};
use crate::pitch::PitchSeries;
use crate::request::AnalysisRequest;
use crate::spectrogram::{TimeFrequencyResult, spectrogram};
use crate::spectrum::{ChannelSpectra, basic_spectrum_channels};

/// Every view of one buffer under one request.
///
/// The spectrum honours `ChannelSelection::Both` with one curve per channel;
/// every other field is computed on a single signal, the mono mix when
/// `Both` was requested.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Channel selection the report was computed for.
    pub channel: ChannelSelection,
    /// Strided waveform for plotting.
    pub waveform: Waveform,
    /// Normalized magnitude spectrum, one curve per selected channel.
    pub spectrum: ChannelSpectra,
    /// Power spectrogram in dB.
    pub spectrogram: TimeFrequencyResult,
    /// Pitch track from the request's estimator.
    pub pitch: PitchSeries,
    /// Hilbert amplitude envelope.
    pub envelope: Envelope,
    /// Hilbert instantaneous frequency.
    pub instantaneous_frequency: FrequencyTrace,
    /// Sliding RMS.
    pub rms: RmsEnvelope,
    /// Scalar summary.
    pub metrics: MetricsSummary,
}

/// Validate `request` against `buffer` and compute every view.
///
/// Nothing is cached: calling this again with a different request simply
/// recomputes everything.
pub fn analyze(buffer: &AudioBuffer, request: &AnalysisRequest) -> Result<AnalysisReport> {
    let sample_rate = buffer.sample_rate();
    request.validate(sample_rate)?;

    if request.channel == ChannelSelection::Both && buffer.is_stereo() {
        warn!("scalar views use the mono mix when both channels are selected");
    }
    let signal = buffer.select_one(request.channel);
    let points = Some(request.preview_points);

    let pitch = request.pitch.estimate(&signal, sample_rate)?;
    let metrics = compute_metrics(&signal, sample_rate, request)?;

    let report = AnalysisReport {
        channel: request.channel,
        waveform: waveform_preview(&signal, sample_rate, request.preview_points)?,
        spectrum: basic_spectrum_channels(
            buffer,
            request.channel,
            request.band,
            request.decimation,
        )?,
        spectrogram: spectrogram(&signal, sample_rate, request.stft, request.band)?,
        pitch,
        envelope: hilbert_envelope(&signal, sample_rate, points)?,
        instantaneous_frequency: instantaneous_frequency(&signal, sample_rate, points)?,
        rms: sliding_rms(&signal, sample_rate, request.rms)?,
        metrics,
    };

    info!(
        samples = buffer.len(),
        sample_rate,
        channel = request.channel.name(),
        frames = report.spectrogram.num_frames(),
        "analysis complete"
    );
    Ok(report)
}
