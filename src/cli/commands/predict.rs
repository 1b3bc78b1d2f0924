//! Predict command - rank concepts for new terms

use clap::Parser;
use std::path::PathBuf;

use super::super::output::{color, format_score, write_output};
use super::super::utils::{load_config, load_ontology, load_terms, load_vectors};
use crate::{ConceptEmbedder, ConceptPredictor, PredictionSet, ProjectionMatrix};

/// Rank concepts for terms with a trained projection
#[derive(Parser, Debug)]
pub struct PredictArgs {
    /// Ontology file (.obo or .json)
    #[arg(long, value_name = "PATH")]
    pub ontology: PathBuf,

    /// Word vectors (.json, .json.gz, .txt, .txt.gz)
    #[arg(long, value_name = "PATH")]
    pub vectors: PathBuf,

    /// Terms to normalize
    #[arg(long, value_name = "PATH")]
    pub terms: PathBuf,

    /// Projection written by `contes train`
    #[arg(long, value_name = "PATH")]
    pub projection: PathBuf,

    /// Output file (JSON); stdout when omitted
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Concepts to keep per term, 0 for all (overrides the config file)
    #[arg(short = 'k', long = "top-k", value_name = "N")]
    pub top_k: Option<usize>,

    /// Configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

pub fn run(args: PredictArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let k = args.top_k.unwrap_or(config.prediction.top_k);

    let ontology = load_ontology(&args.ontology)?;
    let vectors = load_vectors(&args.vectors)?;
    let terms = load_terms(&args.terms)?;
    let projection = ProjectionMatrix::load(&args.projection).map_err(|e| {
        format!(
            "Failed to load projection {}: {}",
            args.projection.display(),
            e
        )
    })?;

    // The target space must be the one the projection was trained for.
    let encoding = projection.meta().encoding;
    if encoding != config.embedding.encoding {
        log::warn!(
            "[cli] Projection was trained with {} encoding, ignoring configured {}",
            encoding.name(),
            config.embedding.encoding.name()
        );
    }
    let concepts = ConceptEmbedder::new().with_encoding(encoding).embed(&ontology);
    projection
        .check_dims(vectors.dim(), concepts.dim())
        .map_err(|e| e.to_string())?;

    let predictor = ConceptPredictor::new(&projection, &concepts).map_err(|e| e.to_string())?;
    let results = predictor.predict_batch(terms.terms(), &vectors, k);
    let set = PredictionSet::from_results(terms.terms(), results, &ontology)
        .map_err(|e| e.to_string())?;

    match &args.output {
        Some(path) => {
            set.save(path)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            for record in set.predictions.iter().take(5) {
                if let Some(best) = record.predictions.first() {
                    println!(
                        "  {} -> {} {} ({})",
                        record.term_id,
                        color("1;32", &best.concept_id),
                        best.label,
                        format_score(best.score)
                    );
                }
            }
            println!(
                "{} terms predicted, {} skipped -> {}",
                set.predictions.len(),
                set.skipped.len(),
                path.display()
            );
        }
        None => {
            let json = serde_json::to_string_pretty(&set)
                .map_err(|e| format!("Failed to serialize predictions: {}", e))?;
            write_output(&format!("{}\n", json), None)?;
        }
    }
    Ok(())
}
