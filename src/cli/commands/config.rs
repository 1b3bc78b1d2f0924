//! Config command - Configuration management

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use super::super::output::color;
use super::super::utils::load_config;
use crate::config::CONFIG_FILE_NAME;
use crate::Config;

/// Configuration management
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Action to perform
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show {
        /// Configuration file; defaults when omitted
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },

    /// Write a configuration file with default values
    Init {
        /// Where to write it
        #[arg(value_name = "PATH", default_value = CONFIG_FILE_NAME)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: ConfigArgs) -> Result<(), String> {
    match args.action {
        ConfigAction::Show { path } => {
            let config = load_config(path.as_deref())?;
            let text = config.to_toml_string().map_err(|e| e.to_string())?;
            print!("{}", text);
        }
        ConfigAction::Init { path, force } => {
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ));
            }
            let text = Config::default()
                .to_toml_string()
                .map_err(|e| e.to_string())?;
            fs::write(&path, text)
                .map_err(|e| format!("Failed to write config: {}", e))?;
            println!("{} Wrote {}", color("32", "✓"), path.display());
        }
    }

    Ok(())
}
