//! CLI argument parsing and structure definitions

use clap::{ArgAction, Parser, Subcommand};

use super::commands;

/// Concept normalization by embedding projection
#[derive(Parser)]
#[command(name = "contes")]
#[command(
    author,
    version,
    about = "Concept normalization by projecting word embeddings into ontology space",
    long_about = r#"
contes - map terms onto ontology concepts

PIPELINE:
  1. Concept vectors from the ontology structure (ancestors or adjacency)
  2. Term vectors from averaged word embeddings
  3. Ridge-regression projection from term space to concept space
  4. Nearest-concept decoding by cosine similarity

EXAMPLES:
  contes train --ontology onto.obo --vectors vst.json.gz \
               --terms train_terms.json --attributions train_attr.json -o w.json
  contes predict --ontology onto.obo --vectors vst.json.gz \
                 --terms dev_terms.json --projection w.json -k 5 -o pred.json
  contes evaluate --predictions pred.json --attributions dev_attr.json
  contes info --ontology onto.obo
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Log filter implied by `--verbose` / `--quiet`.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fit a projection matrix on attributed terms
    #[command(visible_alias = "t")]
    Train(commands::TrainArgs),

    /// Rank concepts for terms with a trained projection
    #[command(visible_alias = "p")]
    Predict(commands::PredictArgs),

    /// Score predictions against gold attributions
    #[command(visible_alias = "e", alias = "eval")]
    Evaluate(commands::EvaluateArgs),

    /// Check input files for format and integrity errors
    #[command(visible_alias = "v")]
    Validate(commands::ValidateArgs),

    /// Show ontology and vocabulary statistics
    #[command(visible_alias = "i")]
    Info(commands::InfoArgs),

    /// Word-vector file utilities
    Vectors(commands::VectorsArgs),

    /// Show or create the configuration file
    Config(commands::ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
