//! Train command - fit the term → concept projection

use clap::Parser;
use std::path::PathBuf;

use super::super::output::{color, ok_mark};
use super::super::utils::{load_attributions, load_config, load_ontology, load_terms, load_vectors};
use crate::dataset::validate_attributions;
use crate::ConceptEncoding;

/// Fit a projection matrix on attributed terms
#[derive(Parser, Debug)]
pub struct TrainArgs {
    /// Ontology file (.obo or .json)
    #[arg(long, value_name = "PATH")]
    pub ontology: PathBuf,

    /// Word vectors (.json, .json.gz, .txt, .txt.gz)
    #[arg(long, value_name = "PATH")]
    pub vectors: PathBuf,

    /// Training terms
    #[arg(long, value_name = "PATH")]
    pub terms: PathBuf,

    /// Training attributions (term id → concept ids)
    #[arg(long, value_name = "PATH")]
    pub attributions: PathBuf,

    /// Where to write the projection (.json or .json.gz)
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Ridge regularization constant (overrides the config file)
    #[arg(long, value_name = "FLOAT")]
    pub lambda: Option<f64>,

    /// Concept encoding (overrides the config file)
    #[arg(long, value_enum)]
    pub encoding: Option<ConceptEncoding>,

    /// Configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also write the training report as JSON
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

pub fn run(args: TrainArgs) -> Result<(), String> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(lambda) = args.lambda {
        config.training.lambda = lambda;
    }
    if let Some(encoding) = args.encoding {
        config.embedding.encoding = encoding;
    }
    config.validate().map_err(|e| e.to_string())?;

    let ontology = load_ontology(&args.ontology)?;
    let vectors = load_vectors(&args.vectors)?;
    let terms = load_terms(&args.terms)?;
    let attributions = load_attributions(&args.attributions)?;
    validate_attributions(&attributions, &terms, &ontology).map_err(|e| e.to_string())?;

    let concepts = config.concept_embedder().embed(&ontology);
    let (projection, report) = config
        .trainer()
        .fit_with_report(&attributions, &terms, &vectors, &concepts)
        .map_err(|e| format!("Training failed: {}", e))?;

    projection
        .save(&args.output)
        .map_err(|e| format!("Failed to write projection {}: {}", args.output.display(), e))?;

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        std::fs::write(path, json)
            .map_err(|e| format!("Failed to write report {}: {}", path.display(), e))?;
    }

    println!(
        "{} Trained {}x{} projection on {} pairs ({} skipped, lambda {}, encoding {})",
        ok_mark(),
        report.term_dim,
        report.concept_dim,
        report.pairs,
        report.skipped.len(),
        report.lambda,
        concepts.encoding().name()
    );
    println!(
        "  training MSE {:.3e} -> {}",
        report.training_mse,
        color("36", &args.output.display().to_string())
    );
    Ok(())
}
