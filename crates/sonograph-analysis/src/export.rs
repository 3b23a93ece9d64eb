//! CSV export for analysis results.
//!
//! Every writer takes any [`Write`] sink, so the same code serves files,
//! stdout and in-memory buffers. Values are written with six decimals.

use std::io::Write;

use crate::spectrogram::{SurfaceMesh, TimeFrequencyResult};
use crate::spectrum::ChannelSpectra;

/// Export per-channel spectra, one row per bin.
///
/// Header is `frequency_hz` followed by one column per channel, named from
/// `channel_names` (falling back to `ch{index}`).
///
/// # Example
///
/// ```rust,ignore
/// use sonograph_analysis::{basic_spectrum_channels, export::write_spectrum_csv};
///
/// let spectra = basic_spectrum_channels(&buffer, selection, band, 1)?;
/// write_spectrum_csv(&mut std::io::stdout(), &spectra, &["left", "right"])?;
/// ```
pub fn write_spectrum_csv<W: Write>(
    out: &mut W,
    spectra: &ChannelSpectra,
    channel_names: &[&str],
) -> std::io::Result<()> {
    write!(out, "frequency_hz")?;
    for ch in 0..spectra.magnitudes.len() {
        match channel_names.get(ch) {
            Some(name) => write!(out, ",{name}")?,
            None => write!(out, ",ch{ch}")?,
        }
    }
    writeln!(out)?;

    for (bin, freq) in spectra.frequencies.iter().enumerate() {
        write!(out, "{freq:.6}")?;
        for channel in &spectra.magnitudes {
            write!(out, ",{:.6}", channel.get(bin).copied().unwrap_or(0.0))?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Export a `times`/`values` series as two columns.
///
/// Rows stop at the shorter of the two slices.
pub fn write_series_csv<W: Write>(
    out: &mut W,
    value_name: &str,
    times: &[f32],
    values: &[f32],
) -> std::io::Result<()> {
    writeln!(out, "time_s,{value_name}")?;
    for (t, v) in times.iter().zip(values) {
        writeln!(out, "{t:.6},{v:.6}")?;
    }
    Ok(())
}

/// Export a time-frequency grid.
///
/// Time on rows and frequency bins on columns. The first row holds the
/// frequency labels and the first column the frame times.
pub fn write_grid_csv<W: Write>(out: &mut W, grid: &TimeFrequencyResult) -> std::io::Result<()> {
    write!(out, "time_s")?;
    for freq in &grid.frequencies {
        write!(out, ",{freq:.2}")?;
    }
    writeln!(out)?;

    for (time, frame) in grid.times.iter().zip(&grid.values) {
        write!(out, "{time:.6}")?;
        for value in frame {
            write!(out, ",{value:.6}")?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Export a surface mesh in long form: one `time_s,frequency_hz,magnitude_db`
/// row per vertex, bin-major.
pub fn write_mesh_csv<W: Write>(out: &mut W, mesh: &SurfaceMesh) -> std::io::Result<()> {
    writeln!(out, "time_s,frequency_hz,magnitude_db")?;
    for ((times, freqs), mags) in mesh
        .time
        .iter()
        .zip(&mesh.frequency)
        .zip(&mesh.magnitude_db)
    {
        for ((t, f), m) in times.iter().zip(freqs).zip(mags) {
            writeln!(out, "{t:.6},{f:.2},{m:.6}")?;
        }
    }
    Ok(())
}
