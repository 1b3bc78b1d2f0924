//! Validate command - eager format and integrity checks

use clap::Parser;
use std::path::PathBuf;

use super::super::output::ok_mark;
use super::super::utils::{load_attributions, load_ontology, load_terms, load_vectors};
use crate::dataset::validate_attributions;

/// Check input files for format and integrity errors
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Ontology file (.obo or .json)
    #[arg(long, value_name = "PATH")]
    pub ontology: Option<PathBuf>,

    /// Word vectors
    #[arg(long, value_name = "PATH")]
    pub vectors: Option<PathBuf>,

    /// Term file
    #[arg(long, value_name = "PATH")]
    pub terms: Option<PathBuf>,

    /// Attribution file; references are checked when --terms and --ontology are given
    #[arg(long, value_name = "PATH")]
    pub attributions: Option<PathBuf>,
}

pub fn run(args: ValidateArgs) -> Result<(), String> {
    if args.ontology.is_none()
        && args.vectors.is_none()
        && args.terms.is_none()
        && args.attributions.is_none()
    {
        return Err("Nothing to validate: pass at least one of --ontology, --vectors, --terms, --attributions".to_string());
    }

    let ontology = match &args.ontology {
        Some(path) => {
            let ontology = load_ontology(path)?;
            println!(
                "{} ontology: {} concepts, {} roots ({})",
                ok_mark(),
                ontology.len(),
                ontology.roots().len(),
                path.display()
            );
            Some(ontology)
        }
        None => None,
    };

    if let Some(path) = &args.vectors {
        let vectors = load_vectors(path)?;
        println!(
            "{} vectors: {} tokens x {} dimensions ({})",
            ok_mark(),
            vectors.len(),
            vectors.dim(),
            path.display()
        );
    }

    let terms = match &args.terms {
        Some(path) => {
            let terms = load_terms(path)?;
            println!("{} terms: {} ({})", ok_mark(), terms.len(), path.display());
            Some(terms)
        }
        None => None,
    };

    if let Some(path) = &args.attributions {
        let attributions = load_attributions(path)?;
        match (&terms, &ontology) {
            (Some(terms), Some(ontology)) => {
                validate_attributions(&attributions, terms, ontology)
                    .map_err(|e| format!("{}: {}", path.display(), e))?;
                println!(
                    "{} attributions: {}, all references resolve ({})",
                    ok_mark(),
                    attributions.len(),
                    path.display()
                );
            }
            _ => {
                println!(
                    "{} attributions: {} ({}, references not checked)",
                    ok_mark(),
                    attributions.len(),
                    path.display()
                );
            }
        }
    }
    Ok(())
}
