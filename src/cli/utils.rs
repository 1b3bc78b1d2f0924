//! Utility functions for CLI commands
//!
//! Loaders convert library errors to `String` at the command boundary.

use std::path::Path;

use crate::dataset::{self, TermSet};
use crate::{Attribution, Config, OntologyGraph, WordVectors};

/// Load an ontology (OBO or JSON by extension).
pub fn load_ontology(path: &Path) -> Result<OntologyGraph, String> {
    let ontology = OntologyGraph::load(path)
        .map_err(|e| format!("Failed to load ontology {}: {}", path.display(), e))?;
    log::info!("[cli] {} concepts ({})", ontology.len(), path.display());
    Ok(ontology)
}

/// Load word vectors.
pub fn load_vectors(path: &Path) -> Result<WordVectors, String> {
    WordVectors::load(path)
        .map_err(|e| format!("Failed to load word vectors {}: {}", path.display(), e))
}

/// Load a term file.
pub fn load_terms(path: &Path) -> Result<TermSet, String> {
    TermSet::load(path).map_err(|e| format!("Failed to load terms {}: {}", path.display(), e))
}

/// Load an attribution file.
pub fn load_attributions(path: &Path) -> Result<Vec<Attribution>, String> {
    dataset::load_attributions(path)
        .map_err(|e| format!("Failed to load attributions {}: {}", path.display(), e))
}

/// Load the configuration file if one was given.
pub fn load_config(path: Option<&Path>) -> Result<Config, String> {
    Config::load_or_default(path).map_err(|e| e.to_string())
}
