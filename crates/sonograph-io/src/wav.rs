//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use sonograph_analysis::{AudioBuffer, Channels};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone, PartialEq)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
///
/// Much faster than [`load`] when only the header matters.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = open(path.as_ref())?;
    let spec = reader.spec();
    let total_samples = u64::from(reader.len()); // total across all channels
    let num_frames = total_samples / u64::from(spec.channels.max(1));
    let duration_secs = if spec.sample_rate == 0 {
        0.0
    } else {
        num_frames as f64 / f64::from(spec.sample_rate)
    };

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// Load a WAV file into an [`AudioBuffer`].
///
/// Integer PCM (8/16/24/32-bit) is scaled by `1 / 2^(bits-1)`; float files
/// are taken as-is. Mono files give a mono buffer, stereo files a stereo
/// buffer, and files with more than two channels keep the first two.
///
/// # Example
/// ```ignore
/// let buffer = sonograph_io::load("input.wav")?;
/// println!("{} samples at {} Hz", buffer.len(), buffer.sample_rate());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<AudioBuffer> {
    let path = path.as_ref();
    let reader = open(path)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels);
    let interleaved = decode(reader)?;

    let buffer = match channels {
        0 | 1 => AudioBuffer::mono(interleaved, spec.sample_rate)?,
        _ => {
            if channels > 2 {
                warn!(channels, "keeping only the first two channels");
            }
            let frames = interleaved.len() / channels;
            let mut left = Vec::with_capacity(frames);
            let mut right = Vec::with_capacity(frames);
            for frame in interleaved.chunks_exact(channels) {
                left.push(frame[0]);
                right.push(frame[1]);
            }
            AudioBuffer::stereo(left, right, spec.sample_rate)?
        }
    };

    debug!(
        path = %path.display(),
        channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        frames = buffer.len(),
        "loaded WAV"
    );
    Ok(buffer)
}

/// Load a WAV file with its channels averaged to mono.
pub fn load_mono<P: AsRef<Path>>(path: P) -> Result<AudioBuffer> {
    let buffer = load(path)?;
    if !buffer.is_stereo() {
        return Ok(buffer);
    }
    let mixed = buffer.to_mono().into_owned();
    Ok(AudioBuffer::mono(mixed, buffer.sample_rate())?)
}

/// Write a buffer to a WAV file.
///
/// `bits` selects the encoding: 16 or 24 for integer PCM (clamped to the
/// representable range), 32 for IEEE float.
///
/// # Example
/// ```ignore
/// let buffer = AudioBuffer::mono(vec![0.0; 44100], 44100)?; // 1 second of silence
/// sonograph_io::write_wav("silence.wav", &buffer, 16)?;
/// ```
pub fn write_wav<P: AsRef<Path>>(path: P, buffer: &AudioBuffer, bits: u16) -> Result<()> {
    let sample_format = match bits {
        16 | 24 => SampleFormat::Int,
        32 => SampleFormat::Float,
        other => return Err(Error::UnsupportedBitDepth(other)),
    };
    let hound_spec = hound::WavSpec {
        channels: buffer.num_channels() as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: bits,
        sample_format,
    };
    let mut writer = WavWriter::create(path.as_ref(), hound_spec)?;

    let interleaved: Vec<f32> = match buffer.channels() {
        Channels::Mono(samples) => samples.clone(),
        Channels::Stereo { left, right } => left
            .iter()
            .zip(right.iter())
            .flat_map(|(&l, &r)| [l, r])
            .collect(),
    };

    if sample_format == SampleFormat::Float {
        for &sample in &interleaved {
            writer.write_sample(sample)?;
        }
    } else {
        let max_val = full_scale(bits);
        for &sample in &interleaved {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
    }

    writer.finalize()?;
    debug!(path = %path.as_ref().display(), bits, frames = buffer.len(), "wrote WAV");
    Ok(())
}

fn open(path: &Path) -> Result<WavReader<std::io::BufReader<std::fs::File>>> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    Ok(WavReader::open(path)?)
}

/// Interleaved samples as f32 in roughly [-1, 1].
fn decode<R: Read>(reader: WavReader<R>) -> Result<Vec<f32>> {
    let spec = reader.spec();
    let samples = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = full_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok(samples)
}

/// `2^(bits-1)`: integer full scale. Shifted as u64 so 32-bit files don't overflow.
fn full_scale(bits: u16) -> f32 {
    (1u64 << (bits.clamp(1, 32) - 1)) as f32
}
