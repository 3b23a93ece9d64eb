//! Sonograph CLI - Command-line front end for the sonograph analysis pipeline.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sonograph")]
#[command(author, version, about = "Sonograph audio analysis CLI", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Analysis config file (defaults to the user config file when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display WAV file information
    Info(commands::info::InfoArgs),

    /// Normalized magnitude spectrum
    Spectrum(commands::spectrum::SpectrumArgs),

    /// Power spectrogram in dB
    Spectrogram(commands::spectrogram::SpectrogramArgs),

    /// Time/frequency/dB mesh for a 3-D surface plot
    Surface(commands::spectrogram::SurfaceArgs),

    /// Pitch track
    Pitch(commands::pitch::PitchArgs),

    /// Hilbert envelope or instantaneous frequency
    Envelope(commands::envelope::EnvelopeArgs),

    /// Sliding RMS energy
    Rms(commands::dynamics::RmsArgs),

    /// Decimated waveform preview
    Waveform(commands::dynamics::WaveformArgs),

    /// Scalar metrics as JSON
    Metrics(commands::metrics::MetricsArgs),

    /// Every view at once as JSON
    Report(commands::metrics::ReportArgs),

    /// Generate test signals
    Generate(commands::generate::GenerateArgs),

    /// Show or create the analysis config
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Spectrum(args) => commands::spectrum::run(args, config),
        Commands::Spectrogram(args) => commands::spectrogram::run(args, config),
        Commands::Surface(args) => commands::spectrogram::run_surface(args, config),
        Commands::Pitch(args) => commands::pitch::run(args, config),
        Commands::Envelope(args) => commands::envelope::run(args, config),
        Commands::Rms(args) => commands::dynamics::run_rms(args, config),
        Commands::Waveform(args) => commands::dynamics::run_waveform(args, config),
        Commands::Metrics(args) => commands::metrics::run(args, config),
        Commands::Report(args) => commands::metrics::run_report(args, config),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Config(args) => commands::config::run(args, config),
    }
}

/// Logs go to stderr so CSV and JSON on stdout stay clean.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
