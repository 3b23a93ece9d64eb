//! Display WAV file metadata.

use clap::Args;
use serde_json::json;
use sonograph_analysis::params::nyquist;
use sonograph_io::{WavFormat, read_wav_info};
use std::path::PathBuf;

/// Display WAV file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the WAV file
    pub file: PathBuf,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.file)?;
    let file_size = std::fs::metadata(&args.file)?.len();

    let format_str = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };
    let layout = match info.channels {
        1 => "mono",
        2 => "stereo",
        _ => "multichannel, first two analyzed",
    };

    if args.json {
        let value = json!({
            "file": args.file.display().to_string(),
            "format": format_str,
            "bits_per_sample": info.bits_per_sample,
            "channels": info.channels,
            "sample_rate": info.sample_rate,
            "num_frames": info.num_frames,
            "duration_secs": info.duration_secs,
            "nyquist_hz": nyquist(info.sample_rate),
            "file_size": file_size,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("File:        {}", args.file.display());
    println!("Format:      {} {}-bit", format_str, info.bits_per_sample);
    println!("Channels:    {} ({layout})", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!("Nyquist:     {:.1} Hz", nyquist(info.sample_rate));
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );
    println!("File Size:   {}", format_bytes(file_size));

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
