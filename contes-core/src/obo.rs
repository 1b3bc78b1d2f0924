//! Minimal OBO flat-file reader.
//!
//! Only `[Term]` stanzas are read, and only the tags needed for the concept
//! graph: `id`, `name`, `is_a`, `synonym` and `is_obsolete`. Obsolete terms
//! are dropped along with any `is_a` edge pointing at them. Other stanzas
//! (`[Typedef]`, `[Instance]`) and tags are ignored.

use crate::concept::Concept;
use crate::error::{Error, Result};
use std::collections::BTreeSet;

#[derive(Default)]
struct Stanza {
    line: usize,
    id: Option<String>,
    name: String,
    parents: Vec<String>,
    synonyms: Vec<String>,
    obsolete: bool,
}

/// Parse OBO text into concept records (not yet validated as a graph).
///
/// # Errors
///
/// [`Error::OntologyFormat`] when a `[Term]` stanza has no `id` or a tag
/// line has no value.
pub fn parse(source_name: &str, text: &str) -> Result<Vec<Concept>> {
    let mut stanzas: Vec<Stanza> = Vec::new();
    let mut current: Option<Stanza> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('!') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            if let Some(stanza) = current.take() {
                stanzas.push(stanza);
            }
            if line == "[Term]" {
                current = Some(Stanza {
                    line: line_no,
                    ..Stanza::default()
                });
            }
            continue;
        }

        // Header tags and non-Term stanzas.
        let Some(stanza) = current.as_mut() else {
            continue;
        };

        let Some((tag, value)) = line.split_once(':') else {
            return Err(Error::ontology_format(
                source_name,
                format!("line {line_no}"),
                format!("expected 'tag: value', got '{line}'"),
            ));
        };
        let value = strip_comment(value.trim());

        match tag.trim() {
            "id" => {
                if value.is_empty() {
                    return Err(Error::ontology_format(
                        source_name,
                        format!("line {line_no}: id"),
                        "empty id",
                    ));
                }
                stanza.id = Some(value.to_string());
            }
            "name" => stanza.name = value.to_string(),
            "is_a" => {
                // `is_a: X {source="..."}` qualifiers
                let target = value.split_whitespace().next().unwrap_or_default();
                if target.is_empty() {
                    return Err(Error::ontology_format(
                        source_name,
                        format!("line {line_no}: is_a"),
                        "empty is_a target",
                    ));
                }
                stanza.parents.push(target.to_string());
            }
            "synonym" => {
                if let Some(synonym) = quoted(value) {
                    stanza.synonyms.push(synonym.to_string());
                }
            }
            "is_obsolete" => stanza.obsolete = value == "true",
            _ => {}
        }
    }
    if let Some(stanza) = current.take() {
        stanzas.push(stanza);
    }

    let mut obsolete: BTreeSet<String> = BTreeSet::new();
    let mut live: Vec<(String, Stanza)> = Vec::with_capacity(stanzas.len());
    for stanza in stanzas {
        let Some(id) = stanza.id.clone() else {
            return Err(Error::ontology_format(
                source_name,
                format!("[Term] at line {}", stanza.line),
                "missing id",
            ));
        };
        if stanza.obsolete {
            obsolete.insert(id);
        } else {
            live.push((id, stanza));
        }
    }

    let concepts = live
        .into_iter()
        .map(|(id, stanza)| {
            let mut concept = Concept::new(id, stanza.name);
            for parent in stanza.parents {
                if obsolete.contains(&parent) {
                    log::warn!(
                        "[obo] Dropping is_a edge {} -> {} (obsolete target)",
                        concept.id,
                        parent
                    );
                    continue;
                }
                concept.parents.insert(parent);
            }
            concept.synonyms.extend(stanza.synonyms);
            concept
        })
        .collect();

    Ok(concepts)
}

/// Remove a trailing ` ! comment`. A ` !` inside a double-quoted string is
/// part of the value.
fn strip_comment(value: &str) -> &str {
    let bytes = value.as_bytes();
    let mut in_quotes = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_quotes => i += 1,
            b'"' => in_quotes = !in_quotes,
            b'!' if !in_quotes && i > 0 && bytes[i - 1].is_ascii_whitespace() => {
                return value[..i].trim_end();
            }
            _ => {}
        }
        i += 1;
    }
    value
}

/// Extract the first double-quoted string, honouring `\"` escapes.
fn quoted(value: &str) -> Option<&str> {
    let start = value.find('"')? + 1;
    let bytes = value.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(&value[start..i]),
            _ => i += 1,
        }
    }
    None
}
