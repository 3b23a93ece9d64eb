//! Analysis config management.

use anyhow::bail;
use clap::{Args, Subcommand};
use sonograph_config::{AnalysisConfig, default_config_path};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective config as TOML and check it
    Show,

    /// Print the config file path in use
    Path,

    /// Write a config file holding the defaults
    Init {
        /// Target file (defaults to --config, then the user config file)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the config command.
pub fn run(args: ConfigArgs, config: Option<&Path>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let settings = AnalysisConfig::load_or_default(config)?;
            print!("{}", settings.to_toml()?);
            settings.to_request()?;
        }

        ConfigCommand::Path => {
            let path = config.map_or_else(default_config_path, Path::to_path_buf);
            let state = if path.is_file() { "" } else { " (not found)" };
            println!("{}{state}", path.display());
        }

        ConfigCommand::Init { path, force } => {
            let path = path
                .or_else(|| config.map(Path::to_path_buf))
                .unwrap_or_else(default_config_path);
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            AnalysisConfig::default().save(&path)?;
            println!("Wrote default config to {}", path.display());
        }
    }
    Ok(())
}
