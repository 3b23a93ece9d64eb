//! Immutable audio buffer handed to the pipeline by its caller.

use std::borrow::Cow;

use crate::error::{AnalysisError, Result};
use crate::params::validate_sample_rate;

/// Sample storage: one or two equal-length channels.
#[derive(Debug, Clone, PartialEq)]
pub enum Channels {
    /// Single channel.
    Mono(Vec<f32>),
    /// Left and right channels of equal length.
    Stereo {
        /// Left channel samples.
        left: Vec<f32>,
        /// Right channel samples.
        right: Vec<f32>,
    },
}

/// Which channel(s) an analysis call should see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelSelection {
    /// Average of all channels.
    #[default]
    Mono,
    /// First channel only.
    Left,
    /// Second channel (the only channel for mono buffers).
    Right,
    /// Every channel, analyzed separately.
    Both,
}

impl ChannelSelection {
    /// Parse a config/CLI name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mono" | "mix" => Some(Self::Mono),
            "left" | "l" => Some(Self::Left),
            "right" | "r" => Some(Self::Right),
            "both" | "stereo" | "lr" => Some(Self::Both),
            _ => None,
        }
    }

    /// Canonical config/CLI name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mono => "mono",
            Self::Left => "left",
            Self::Right => "right",
            Self::Both => "both",
        }
    }
}

/// Floating-point samples plus their sample rate.
///
/// Created once on load, never mutated afterwards. Concurrent readers on
/// different threads are fine; there is no interior mutability.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: Channels,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Wrap a single channel.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        validate_sample_rate(sample_rate)?;
        Ok(Self {
            channels: Channels::Mono(samples),
            sample_rate,
        })
    }

    /// Wrap two channels. Both must have the same length.
    pub fn stereo(left: Vec<f32>, right: Vec<f32>, sample_rate: u32) -> Result<Self> {
        validate_sample_rate(sample_rate)?;
        if left.len() != right.len() {
            return Err(AnalysisError::ChannelLengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        Ok(Self {
            channels: Channels::Stereo { left, right },
            sample_rate,
        })
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Underlying channel storage.
    pub fn channels(&self) -> &Channels {
        &self.channels
    }

    /// Number of channels (1 or 2).
    pub fn num_channels(&self) -> usize {
        match self.channels {
            Channels::Mono(_) => 1,
            Channels::Stereo { .. } => 2,
        }
    }

    /// Whether the buffer carries two channels.
    pub fn is_stereo(&self) -> bool {
        matches!(self.channels, Channels::Stereo { .. })
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        match &self.channels {
            Channels::Mono(samples) => samples.len(),
            Channels::Stereo { left, .. } => left.len(),
        }
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.len() as f32 / self.sample_rate as f32
    }

    /// First channel.
    pub fn left(&self) -> &[f32] {
        match &self.channels {
            Channels::Mono(samples) => samples,
            Channels::Stereo { left, .. } => left,
        }
    }

    /// Second channel, or the only channel of a mono buffer.
    pub fn right(&self) -> &[f32] {
        match &self.channels {
            Channels::Mono(samples) => samples,
            Channels::Stereo { right, .. } => right,
        }
    }

    /// Channel average. Borrows when the buffer is already mono.
    pub fn to_mono(&self) -> Cow<'_, [f32]> {
        match &self.channels {
            Channels::Mono(samples) => Cow::Borrowed(samples),
            Channels::Stereo { left, right } => Cow::Owned(
                left.iter()
                    .zip(right.iter())
                    .map(|(l, r)| (l + r) * 0.5)
                    .collect(),
            ),
        }
    }

    /// Channel views for a selection, in left-to-right order.
    pub fn select(&self, selection: ChannelSelection) -> Vec<Cow<'_, [f32]>> {
        match selection {
            ChannelSelection::Mono => vec![self.to_mono()],
            ChannelSelection::Left => vec![Cow::Borrowed(self.left())],
            ChannelSelection::Right => vec![Cow::Borrowed(self.right())],
            ChannelSelection::Both => match &self.channels {
                Channels::Mono(samples) => vec![Cow::Borrowed(samples.as_slice())],
                Channels::Stereo { left, right } => {
                    vec![Cow::Borrowed(left.as_slice()), Cow::Borrowed(right.as_slice())]
                }
            },
        }
    }

    /// Single signal for scalar analyses: the selection collapsed to one channel.
    ///
    /// `Both` falls back to the mono mix.
    pub fn select_one(&self, selection: ChannelSelection) -> Cow<'_, [f32]> {
        match selection {
            ChannelSelection::Left => Cow::Borrowed(self.left()),
            ChannelSelection::Right => Cow::Borrowed(self.right()),
            ChannelSelection::Mono | ChannelSelection::Both => self.to_mono(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_length_mismatch_rejected() {
        let err = AudioBuffer::stereo(vec![0.0; 3], vec![0.0; 4], 44100).unwrap_err();
        assert_eq!(err, AnalysisError::ChannelLengthMismatch { left: 3, right: 4 });
    }

    #[test]
    fn zero_sample_rate_rejected() {
        assert_eq!(
            AudioBuffer::mono(vec![0.0; 10], 0).unwrap_err(),
            AnalysisError::InvalidSampleRate
        );
    }

    #[test]
    fn mono_mix_averages_channels() {
        let buffer = AudioBuffer::stereo(vec![1.0, 2.0], vec![3.0, 4.0], 48000).unwrap();
        assert_eq!(buffer.to_mono().as_ref(), &[2.0, 3.0]);
        assert_eq!(buffer.num_channels(), 2);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn mono_mix_borrows_mono_buffer() {
        let buffer = AudioBuffer::mono(vec![0.5; 4], 48000).unwrap();
        assert!(matches!(buffer.to_mono(), Cow::Borrowed(_)));
    }

    #[test]
    fn select_both_on_mono_yields_one_channel() {
        let buffer = AudioBuffer::mono(vec![0.1, 0.2], 8000).unwrap();
        assert_eq!(buffer.select(ChannelSelection::Both).len(), 1);
        assert_eq!(buffer.select(ChannelSelection::Right)[0].as_ref(), &[0.1, 0.2]);
    }

    #[test]
    fn select_both_on_stereo_yields_two_channels() {
        let buffer = AudioBuffer::stereo(vec![1.0], vec![-1.0], 8000).unwrap();
        let channels = buffer.select(ChannelSelection::Both);
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].as_ref(), &[1.0]);
        assert_eq!(channels[1].as_ref(), &[-1.0]);
    }

    #[test]
    fn duration_from_rate() {
        let buffer = AudioBuffer::mono(vec![0.0; 22050], 44100).unwrap();
        assert!((buffer.duration_secs() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn channel_selection_names_roundtrip() {
        for sel in [
            ChannelSelection::Mono,
            ChannelSelection::Left,
            ChannelSelection::Right,
            ChannelSelection::Both,
        ] {
            assert_eq!(ChannelSelection::from_name(sel.name()), Some(sel));
        }
        assert_eq!(ChannelSelection::from_name("surround"), None);
    }
}
