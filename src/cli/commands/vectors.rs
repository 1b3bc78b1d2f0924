//! Vectors command - word-vector file utilities

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::super::output::ok_mark;
use super::super::utils::load_vectors;

/// Word-vector file utilities
#[derive(Parser, Debug)]
pub struct VectorsArgs {
    /// Action to perform
    #[command(subcommand)]
    pub action: VectorsAction,
}

#[derive(Subcommand, Debug)]
pub enum VectorsAction {
    /// Convert between .json, .txt and their .gz variants
    Convert {
        /// Input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file; format chosen by extension
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

pub fn run(args: VectorsArgs) -> Result<(), String> {
    match args.action {
        VectorsAction::Convert { input, output } => {
            let vectors = load_vectors(&input)?;
            vectors
                .save(&output)
                .map_err(|e| format!("Failed to write {}: {}", output.display(), e))?;
            println!(
                "{} {} tokens x {} dimensions: {} -> {}",
                ok_mark(),
                vectors.len(),
                vectors.dim(),
                input.display(),
                output.display()
            );
        }
    }
    Ok(())
}
