//! Evaluate command - score predictions against gold attributions

use clap::Parser;
use std::path::PathBuf;

use super::super::output::write_output;
use super::super::utils::load_attributions;
use crate::{evaluate, PredictionSet};

/// Score predictions against gold attributions
#[derive(Parser, Debug)]
pub struct EvaluateArgs {
    /// Predictions written by `contes predict`
    #[arg(long, value_name = "PATH")]
    pub predictions: PathBuf,

    /// Gold attributions
    #[arg(long, value_name = "PATH")]
    pub attributions: PathBuf,

    /// Cut-off for accuracy@k
    #[arg(short = 'k', long = "top-k", default_value_t = 5)]
    pub k: usize,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Output file; stdout when omitted
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub fn run(args: EvaluateArgs) -> Result<(), String> {
    let predictions = PredictionSet::load(&args.predictions).map_err(|e| e.to_string())?;
    let gold = load_attributions(&args.attributions)?;
    let report = evaluate(&predictions, &gold, args.k);

    let content = if args.json {
        serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {}", e))?
    } else {
        report.summary()
    };
    write_output(&format!("{}\n", content), args.output.as_deref())
}
