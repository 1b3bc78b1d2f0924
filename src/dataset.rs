//! Term and attribution inputs.
//!
//! # Terms
//!
//! Either a JSON object keyed by term id (order preserved, ids unique):
//!
//! ```json
//! { "T1": ["lactic", "acid", "bacteria"], "T2": "gram negative rod" }
//! ```
//!
//! or an array of records `[{"id": "T1", "tokens": [...]}, {"id": "T2", "surface": "..."}]`.
//!
//! # Attributions
//!
//! Either `{ "T1": ["OBT:000001"], "T2": "OBT:000002" }` (one key per term) or
//! `[{"term_id": "T1", "concept_id": "OBT:000001"}, ...]`.
//!
//! Integrity (no dangling term or concept reference) is checked eagerly by
//! [`validate_attributions`] before any numeric work starts.

use crate::error::{Error, Result};
use crate::json::JsonDocument;
use contes_core::{Attribution, OntologyGraph, Term, TermId};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Ordered, id-indexed collection of terms.
#[derive(Debug, Clone, Default)]
pub struct TermSet {
    terms: Vec<Term>,
    index: HashMap<TermId, usize>,
}

impl TermSet {
    /// Build a term set.
    ///
    /// # Errors
    ///
    /// [`Error::DatasetFormat`] on an empty or duplicated term id.
    pub fn from_terms(source_name: &str, terms: Vec<Term>) -> Result<Self> {
        let mut index = HashMap::with_capacity(terms.len());
        for (i, term) in terms.iter().enumerate() {
            if term.id.trim().is_empty() {
                return Err(Error::dataset(source_name, format!("term[{i}] has an empty id")));
            }
            if index.insert(term.id.clone(), i).is_some() {
                return Err(Error::dataset(
                    source_name,
                    format!("duplicate term id '{}'", term.id),
                ));
            }
        }
        Ok(Self { terms, index })
    }

    /// Parse the JSON term format.
    ///
    /// # Errors
    ///
    /// [`Error::DatasetFormat`] on malformed input.
    pub fn from_json_str(source_name: &str, json: &str) -> Result<Self> {
        let document = JsonDocument::parse(json)
            .map_err(|e| Error::dataset(source_name, format!("invalid JSON: {e}")))?;

        let terms = match document {
            JsonDocument::Object(entries) => entries
                .into_iter()
                .map(|(id, tokens)| {
                    let term = term_from_value(source_name, &id, &tokens)?;
                    Ok(term)
                })
                .collect::<Result<Vec<Term>>>()?,
            JsonDocument::Array(records) => records
                .iter()
                .enumerate()
                .map(|(i, record)| {
                    let id = record.get("id").and_then(Value::as_str).ok_or_else(|| {
                        Error::dataset(source_name, format!("term[{i}]: missing string 'id'"))
                    })?;
                    let body = record
                        .get("tokens")
                        .or_else(|| record.get("surface"))
                        .ok_or_else(|| {
                            Error::dataset(
                                source_name,
                                format!("term '{id}': missing 'tokens' or 'surface'"),
                            )
                        })?;
                    term_from_value(source_name, id, body)
                })
                .collect::<Result<Vec<Term>>>()?,
        };
        Self::from_terms(source_name, terms)
    }

    /// Load a term file.
    ///
    /// # Errors
    ///
    /// IO failures and [`Error::DatasetFormat`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let content = std::fs::read_to_string(path)?;
        let terms = Self::from_json_str(&name, &content)?;
        log::info!("[dataset] {} terms ({})", terms.len(), name);
        Ok(terms)
    }

    /// Look up a term.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Term> {
        self.index.get(id).map(|&i| &self.terms[i])
    }

    /// True when the id is known.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Terms in input order.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when there is no term.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn term_from_value(source_name: &str, id: &str, value: &Value) -> Result<Term> {
    match value {
        Value::String(surface) => Ok(Term::from_surface(id, surface)),
        Value::Array(items) => {
            let tokens = items
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    t.as_str().map(str::to_string).ok_or_else(|| {
                        Error::dataset(source_name, format!("term '{id}': token {i} is not a string"))
                    })
                })
                .collect::<Result<Vec<String>>>()?;
            Ok(Term::new(id, tokens))
        }
        _ => Err(Error::dataset(
            source_name,
            format!("term '{id}': expected a token list or a surface string"),
        )),
    }
}

/// Parse the JSON attribution format.
///
/// # Errors
///
/// [`Error::DatasetFormat`] on malformed input.
pub fn attributions_from_json_str(source_name: &str, json: &str) -> Result<Vec<Attribution>> {
    let document = JsonDocument::parse(json)
        .map_err(|e| Error::dataset(source_name, format!("invalid JSON: {e}")))?;

    let mut out = Vec::new();
    match document {
        JsonDocument::Object(entries) => {
            for (term_id, concepts) in entries {
                match concepts {
                    Value::String(concept_id) => out.push(Attribution::new(term_id, concept_id)),
                    Value::Array(items) => {
                        for (i, item) in items.iter().enumerate() {
                            let concept_id = item.as_str().ok_or_else(|| {
                                Error::dataset(
                                    source_name,
                                    format!("term '{term_id}': concept {i} is not a string"),
                                )
                            })?;
                            out.push(Attribution::new(term_id.clone(), concept_id));
                        }
                    }
                    _ => {
                        return Err(Error::dataset(
                            source_name,
                            format!("term '{term_id}': expected a concept id or a list of them"),
                        ))
                    }
                }
            }
        }
        JsonDocument::Array(records) => {
            for (i, record) in records.iter().enumerate() {
                let field = |name: &str| {
                    record.get(name).and_then(Value::as_str).ok_or_else(|| {
                        Error::dataset(source_name, format!("attribution[{i}]: missing string '{name}'"))
                    })
                };
                out.push(Attribution::new(field("term_id")?, field("concept_id")?));
            }
        }
    }
    Ok(out)
}

/// Load an attribution file.
///
/// # Errors
///
/// IO failures and [`Error::DatasetFormat`].
pub fn load_attributions(path: impl AsRef<Path>) -> Result<Vec<Attribution>> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let content = std::fs::read_to_string(path)?;
    let attributions = attributions_from_json_str(&name, &content)?;
    log::info!("[dataset] {} attributions ({})", attributions.len(), name);
    Ok(attributions)
}

/// Check that every attribution references a known term and concept.
///
/// # Errors
///
/// [`contes_core::Error::DanglingReference`] for the first bad record.
pub fn validate_attributions(
    attributions: &[Attribution],
    terms: &TermSet,
    ontology: &OntologyGraph,
) -> Result<()> {
    for (i, attribution) in attributions.iter().enumerate() {
        if !terms.contains(&attribution.term_id) {
            return Err(contes_core::Error::dangling_term(
                &attribution.term_id,
                format!("attribution[{i}]"),
            )
            .into());
        }
        if !ontology.contains(&attribution.concept_id) {
            return Err(contes_core::Error::dangling_concept(
                &attribution.concept_id,
                format!("attribution[{i}] (term '{}')", attribution.term_id),
            )
            .into());
        }
    }
    Ok(())
}
