//! contes - concept normalization CLI
//!
//! Maps multi-word terms onto ontology concepts by projecting averaged word
//! embeddings into a space built from the ontology structure.
//!
//! # Usage
//!
//! ```bash
//! # Fit the projection on attributed training terms
//! contes train --ontology onto.obo --vectors vst.json.gz \
//!     --terms train_terms.json --attributions train_attr.json -o w.json
//!
//! # Rank concepts for new terms
//! contes predict --ontology onto.obo --vectors vst.json.gz \
//!     --terms dev_terms.json --projection w.json -k 5 -o pred.json
//!
//! # Score against gold attributions
//! contes evaluate --predictions pred.json --attributions dev_attr.json
//! ```

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

fn main() -> ExitCode {
    use clap_complete::generate;
    use contes::cli::commands::*;
    use contes::cli::output::color;
    use contes::cli::parser::{Cli, Commands};

    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .format_timestamp(None)
        .init();

    let result: Result<(), String> = match cli.command {
        Commands::Train(args) => train::run(args),
        Commands::Predict(args) => predict::run(args),
        Commands::Evaluate(args) => evaluate::run(args),
        Commands::Validate(args) => validate::run(args),
        Commands::Info(args) => info::run(args),
        Commands::Vectors(args) => vectors::run(args),
        Commands::Config(args) => config::run(args),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "contes", &mut io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", color("31", "error:"), e);
            ExitCode::FAILURE
        }
    }
}
