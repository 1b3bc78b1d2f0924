//! In-memory ontology graph.
//!
//! Concepts live in a flat table keyed by id; parent and child relations are
//! id sets. Every traversal is queue based over ids, which handles
//! multiple inheritance (diamonds) and terminates even if a malformed
//! ontology contains a cycle.
//!
//! # Example
//!
//! ```
//! use contes_core::{Concept, OntologyGraph};
//!
//! let graph = OntologyGraph::from_concepts(
//!     "inline",
//!     vec![
//!         Concept::new("A", "root"),
//!         Concept::new("B", "left").with_parent("A"),
//!         Concept::new("C", "right").with_parent("A"),
//!     ],
//! )
//! .unwrap();
//!
//! let ancestors = graph.ancestors_of("B").unwrap();
//! assert!(ancestors.contains("A") && ancestors.contains("B"));
//! assert_eq!(graph.all_concept_ids(), vec!["A", "B", "C"]);
//! ```

use crate::concept::{Concept, ConceptId};
use crate::error::{Error, Result};
use crate::obo;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::Path;

/// Directed concept graph built from an ontology source.
///
/// Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct OntologyGraph {
    concepts: BTreeMap<ConceptId, Concept>,
    source_name: String,
}

impl OntologyGraph {
    /// Build a graph from concept records, validating them.
    ///
    /// Child edges declared on a record and the inverse of declared parent
    /// edges are merged, so `parents_of` and `children_of` always agree.
    ///
    /// # Errors
    ///
    /// [`Error::OntologyFormat`] when a record has an empty id, an id is
    /// duplicated, or a parent/child reference points to an unknown concept.
    pub fn from_concepts(source_name: impl Into<String>, records: Vec<Concept>) -> Result<Self> {
        let source_name = source_name.into();
        let mut concepts: BTreeMap<ConceptId, Concept> = BTreeMap::new();

        for (index, record) in records.into_iter().enumerate() {
            let id = record.id.trim().to_string();
            if id.is_empty() {
                return Err(Error::ontology_format(
                    &source_name,
                    format!("record[{index}].id"),
                    "missing concept id",
                ));
            }
            if concepts.contains_key(&id) {
                return Err(Error::ontology_format(
                    &source_name,
                    format!("record[{index}].id"),
                    format!("duplicate concept id '{id}'"),
                ));
            }
            concepts.insert(id.clone(), Concept { id, ..record });
        }

        let mut inverse: Vec<(ConceptId, ConceptId)> = Vec::new();
        for concept in concepts.values() {
            for parent in &concept.parents {
                if !concepts.contains_key(parent) {
                    return Err(Error::ontology_format(
                        &source_name,
                        format!("{}.parents", concept.id),
                        format!("dangling parent reference '{parent}'"),
                    ));
                }
                inverse.push((parent.clone(), concept.id.clone()));
            }
            for child in &concept.children {
                if !concepts.contains_key(child) {
                    return Err(Error::ontology_format(
                        &source_name,
                        format!("{}.children", concept.id),
                        format!("dangling child reference '{child}'"),
                    ));
                }
            }
        }

        // Declared children imply parent edges too.
        let declared_children: Vec<(ConceptId, ConceptId)> = concepts
            .values()
            .flat_map(|c| c.children.iter().map(move |ch| (c.id.clone(), ch.clone())))
            .collect();

        for (parent, child) in inverse {
            if let Some(p) = concepts.get_mut(&parent) {
                p.children.insert(child);
            }
        }
        for (parent, child) in declared_children {
            if let Some(c) = concepts.get_mut(&child) {
                c.parents.insert(parent);
            }
        }

        log::debug!(
            "[ontology] Loaded {} concepts from {}",
            concepts.len(),
            source_name
        );

        Ok(Self {
            concepts,
            source_name,
        })
    }

    /// Parse a JSON array of concept records.
    ///
    /// # Errors
    ///
    /// [`Error::OntologyFormat`] when the JSON is malformed or fails validation.
    pub fn from_json_str(source_name: impl Into<String>, json: &str) -> Result<Self> {
        let source_name = source_name.into();
        let records: Vec<Concept> = serde_json::from_str(json).map_err(|e| {
            Error::ontology_format(&source_name, format!("line {}", e.line()), e.to_string())
        })?;
        Self::from_concepts(source_name, records)
    }

    /// Parse an OBO flat file.
    ///
    /// # Errors
    ///
    /// [`Error::OntologyFormat`] when a stanza is malformed or fails validation.
    pub fn from_obo_str(source_name: impl Into<String>, obo: &str) -> Result<Self> {
        let source_name = source_name.into();
        let records = obo::parse(&source_name, obo)?;
        Self::from_concepts(source_name, records)
    }

    /// Load an ontology file; `.obo` files are read as OBO, anything else as JSON.
    ///
    /// # Errors
    ///
    /// IO failures and every error of [`Self::from_obo_str`] / [`Self::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let name = path.display().to_string();
        let is_obo = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("obo"))
            .unwrap_or(false);

        let graph = if is_obo {
            Self::from_obo_str(name, &content)?
        } else {
            Self::from_json_str(name, &content)?
        };
        log::info!(
            "[ontology] {} concepts, {} roots ({})",
            graph.len(),
            graph.roots().len(),
            graph.source_name
        );
        Ok(graph)
    }

    /// Name of the source the graph was loaded from.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Number of concepts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// True when the ontology has no concept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Look up a concept.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Concept> {
        self.concepts.get(id)
    }

    /// True when `id` names a concept of this ontology.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.concepts.contains_key(id)
    }

    /// Label of a concept, if known.
    #[must_use]
    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.concepts.get(id).map(|c| c.label.as_str())
    }

    /// All concepts, in id order.
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values()
    }

    /// All concept ids sorted lexicographically.
    ///
    /// This order fixes the coordinate layout of structural concept vectors.
    #[must_use]
    pub fn all_concept_ids(&self) -> Vec<&str> {
        self.concepts.keys().map(String::as_str).collect()
    }

    /// Direct parents of a concept.
    #[must_use]
    pub fn parents_of(&self, id: &str) -> Option<&BTreeSet<ConceptId>> {
        self.concepts.get(id).map(|c| &c.parents)
    }

    /// Direct children of a concept.
    #[must_use]
    pub fn children_of(&self, id: &str) -> Option<&BTreeSet<ConceptId>> {
        self.concepts.get(id).map(|c| &c.children)
    }

    /// Transitive closure over parent edges, including `id` itself.
    ///
    /// Returns `None` for an unknown id.
    #[must_use]
    pub fn ancestors_of(&self, id: &str) -> Option<BTreeSet<&str>> {
        self.closure(id, |c| &c.parents)
    }

    /// Transitive closure over child edges, including `id` itself.
    ///
    /// Returns `None` for an unknown id.
    #[must_use]
    pub fn descendants_of(&self, id: &str) -> Option<BTreeSet<&str>> {
        self.closure(id, |c| &c.children)
    }

    /// Concepts without a parent, in id order.
    #[must_use]
    pub fn roots(&self) -> Vec<&str> {
        self.concepts
            .values()
            .filter(|c| c.is_root())
            .map(|c| c.id.as_str())
            .collect()
    }

    /// Length of the shortest parent path from `id` to a root.
    ///
    /// Roots have depth 0. Returns `None` for an unknown id, or when no
    /// root is reachable (only possible in a cyclic ontology).
    #[must_use]
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        let start = self.concepts.get_key_value(id)?.0.as_str();
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
        seen.insert(start);
        queue.push_back((start, 0));

        while let Some((current, depth)) = queue.pop_front() {
            let concept = self.concepts.get(current)?;
            if concept.is_root() {
                return Some(depth);
            }
            for parent in &concept.parents {
                if seen.insert(parent.as_str()) {
                    queue.push_back((parent.as_str(), depth + 1));
                }
            }
        }
        None
    }

    /// Largest `depth_of` over all concepts.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.concepts
            .keys()
            .filter_map(|id| self.depth_of(id))
            .max()
            .unwrap_or(0)
    }

    fn closure<'a, F>(&'a self, id: &str, edges: F) -> Option<BTreeSet<&'a str>>
    where
        F: Fn(&'a Concept) -> &'a BTreeSet<ConceptId>,
    {
        let (start, _) = self.concepts.get_key_value(id)?;
        let mut visited: BTreeSet<&'a str> = BTreeSet::new();
        let mut queue: VecDeque<&'a str> = VecDeque::new();
        visited.insert(start.as_str());
        queue.push_back(start.as_str());

        while let Some(current) = queue.pop_front() {
            let Some(concept) = self.concepts.get(current) else {
                continue;
            };
            for next in edges(concept) {
                if visited.insert(next.as_str()) {
                    queue.push_back(next.as_str());
                }
            }
        }
        Some(visited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> OntologyGraph {
        // A
        // |\
        // B C
        // |/
        // D
        OntologyGraph::from_concepts(
            "diamond",
            vec![
                Concept::new("A", "root"),
                Concept::new("B", "b").with_parent("A"),
                Concept::new("C", "c").with_parent("A"),
                Concept::new("D", "d").with_parent("B").with_parent("C"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_ancestors_include_self_and_diamond_paths() {
        let g = diamond();
        let anc = g.ancestors_of("D").unwrap();
        assert_eq!(anc.into_iter().collect::<Vec<_>>(), vec!["A", "B", "C", "D"]);
        assert_eq!(g.ancestors_of("A").unwrap().len(), 1);
        assert!(g.ancestors_of("missing").is_none());
    }

    #[test]
    fn test_children_are_inverse_of_parents() {
        let g = diamond();
        let children: Vec<_> = g.children_of("A").unwrap().iter().cloned().collect();
        assert_eq!(children, vec!["B", "C"]);
        assert_eq!(g.descendants_of("B").unwrap().len(), 2);
    }

    #[test]
    fn test_declared_children_become_parents() {
        let g = OntologyGraph::from_concepts(
            "children",
            vec![Concept::new("A", "a").with_child("B"), Concept::new("B", "b")],
        )
        .unwrap();
        assert!(g.parents_of("B").unwrap().contains("A"));
        assert_eq!(g.roots(), vec!["A"]);
    }

    #[test]
    fn test_depth() {
        let g = diamond();
        assert_eq!(g.depth_of("A"), Some(0));
        assert_eq!(g.depth_of("D"), Some(2));
        assert_eq!(g.max_depth(), 2);
    }

    #[test]
    fn test_cycle_terminates() {
        let g = OntologyGraph::from_concepts(
            "cycle",
            vec![
                Concept::new("A", "a").with_parent("B"),
                Concept::new("B", "b").with_parent("A"),
            ],
        )
        .unwrap();
        assert_eq!(g.ancestors_of("A").unwrap().len(), 2);
        assert_eq!(g.depth_of("A"), None);
    }

    #[test]
    fn test_dangling_parent_rejected() {
        let err = OntologyGraph::from_concepts("bad", vec![Concept::new("A", "a").with_parent("Z")])
            .unwrap_err();
        assert!(matches!(err, Error::OntologyFormat { .. }));
        assert!(err.to_string().contains("'Z'"));
    }

    #[test]
    fn test_missing_and_duplicate_ids_rejected() {
        assert!(OntologyGraph::from_concepts("bad", vec![Concept::new(" ", "blank")]).is_err());
        assert!(OntologyGraph::from_concepts(
            "bad",
            vec![Concept::new("A", "a"), Concept::new("A", "again")]
        )
        .is_err());
    }

    #[test]
    fn test_json_source() {
        let g = OntologyGraph::from_json_str(
            "inline.json",
            r#"[{"id": "A", "label": "root"}, {"id": "B", "parents": ["A"], "synonyms": ["bee"]}]"#,
        )
        .unwrap();
        assert_eq!(g.label_of("A"), Some("root"));
        assert!(g.get("B").unwrap().synonyms.contains("bee"));

        let err = OntologyGraph::from_json_str("broken.json", "[{\"label\": 1}]").unwrap_err();
        assert!(matches!(err, Error::OntologyFormat { .. }));
    }

    #[test]
    fn test_load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let obo = dir.path().join("onto.OBO");
        std::fs::write(&obo, "[Term]\nid: A\nname: root\n\n[Term]\nid: B\nis_a: A\n").unwrap();
        let g = OntologyGraph::load(&obo).unwrap();
        assert_eq!(g.len(), 2);
        assert_eq!(g.depth_of("B"), Some(1));

        let json = dir.path().join("onto.json");
        std::fs::write(&json, r#"[{"id": "A", "label": "root"}]"#).unwrap();
        assert_eq!(OntologyGraph::load(&json).unwrap().roots(), vec!["A"]);

        let missing = OntologyGraph::load(dir.path().join("missing.obo")).unwrap_err();
        assert!(matches!(missing, Error::Io(_)));
    }
}
