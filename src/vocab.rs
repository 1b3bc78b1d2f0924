//! Word-vector vocabularies.
//!
//! [`WordVectors`] maps tokens to fixed-length vectors produced by the
//! upstream embedding stage. Two exchange formats are supported, both
//! optionally gzip-compressed (detected by a trailing `.gz`):
//!
//! - **JSON**: a single object `{"token": [f64, ...], ...}`
//! - **Text**: one `token<TAB>[v1, v2, ...]` line per token
//!
//! Files ending in `.txt` / `.txt.gz` use the text format; everything else
//! is read as JSON. All entries are validated eagerly: a malformed value or
//! a vector whose length disagrees with the others fails the whole load.

use crate::error::{Error, Result};
use crate::json::JsonDocument;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::{Array1, ArrayView1};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// On-disk layout of a vocabulary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorFormat {
    /// `{"token": [..]}`
    Json,
    /// `token\t[..]` lines
    Text,
}

impl VectorFormat {
    /// Infer format and compression from a file name.
    #[must_use]
    pub fn detect(path: &Path) -> (Self, bool) {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (stem, gz) = match name.strip_suffix(".gz") {
            Some(stem) => (stem.to_string(), true),
            None => (name, false),
        };
        let format = if stem.ends_with(".txt") {
            VectorFormat::Text
        } else {
            VectorFormat::Json
        };
        (format, gz)
    }
}

/// Immutable token → vector mapping with a fixed dimension.
#[derive(Debug, Clone)]
pub struct WordVectors {
    dim: usize,
    vectors: HashMap<String, Array1<f64>>,
}

impl WordVectors {
    /// Build a vocabulary from raw entries.
    ///
    /// # Errors
    ///
    /// [`Error::VocabularyFormat`] when the vocabulary is empty, a vector is
    /// empty or non-finite, or vector lengths differ.
    pub fn from_entries<I>(source_name: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<f64>)>,
    {
        let mut dim: Option<usize> = None;
        let mut vectors: HashMap<String, Array1<f64>> = HashMap::new();

        for (token, values) in entries {
            if values.is_empty() {
                return Err(Error::vocabulary(
                    source_name,
                    format!("token '{token}' has an empty vector"),
                ));
            }
            if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
                return Err(Error::vocabulary(
                    source_name,
                    format!("token '{token}' has a non-finite value at index {pos}"),
                ));
            }
            match dim {
                None => dim = Some(values.len()),
                Some(d) if d != values.len() => {
                    return Err(Error::vocabulary(
                        source_name,
                        format!(
                            "token '{}' has {} dimensions, expected {}",
                            token,
                            values.len(),
                            d
                        ),
                    ));
                }
                Some(_) => {}
            }
            if vectors.insert(token.clone(), Array1::from(values)).is_some() {
                return Err(Error::vocabulary(
                    source_name,
                    format!("duplicate token '{token}'"),
                ));
            }
        }

        let dim = dim.ok_or_else(|| Error::vocabulary(source_name, "empty vocabulary"))?;
        Ok(Self { dim, vectors })
    }

    /// Parse the JSON exchange format.
    ///
    /// # Errors
    ///
    /// [`Error::VocabularyFormat`] on malformed JSON or entries, including a
/// token key that appears twice.
    pub fn from_json_reader<R: Read>(source_name: &str, reader: R) -> Result<Self> {
        let document = JsonDocument::from_reader(reader)
            .map_err(|e| Error::vocabulary(source_name, format!("invalid JSON: {e}")))?;
        let JsonDocument::Object(object) = document else {
            return Err(Error::vocabulary(
                source_name,
                "expected a JSON object of token vectors",
            ));
        };

        let mut entries = Vec::with_capacity(object.len());
        for (token, value) in object {
            let array = value.as_array().ok_or_else(|| {
                Error::vocabulary(source_name, format!("token '{token}': value is not an array"))
            })?;
            let mut values = Vec::with_capacity(array.len());
            for (i, item) in array.iter().enumerate() {
                let v = item.as_f64().ok_or_else(|| {
                    Error::vocabulary(
                        source_name,
                        format!("token '{token}': element {i} is not a number"),
                    )
                })?;
                values.push(v);
            }
            entries.push((token, values));
        }
        Self::from_entries(source_name, entries)
    }

    /// Parse the text exchange format.
    ///
    /// # Errors
    ///
    /// [`Error::VocabularyFormat`] on a malformed line.
    pub fn from_text_reader<R: Read>(source_name: &str, reader: R) -> Result<Self> {
        let mut entries = Vec::new();
        for (index, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let line_no = index + 1;
            let (token, rest) = line.split_once('\t').ok_or_else(|| {
                Error::vocabulary(source_name, format!("line {line_no}: missing tab separator"))
            })?;
            let body = rest
                .trim()
                .strip_prefix('[')
                .and_then(|r| r.strip_suffix(']'))
                .ok_or_else(|| {
                    Error::vocabulary(
                        source_name,
                        format!("line {line_no}: vector must be enclosed in brackets"),
                    )
                })?;
            let values = body
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<f64>().map_err(|e| {
                        Error::vocabulary(source_name, format!("line {line_no}: '{s}': {e}"))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            entries.push((token.to_string(), values));
        }
        Self::from_entries(source_name, entries)
    }

    /// Load a vocabulary file, choosing format and compression from its name.
    ///
    /// # Errors
    ///
    /// IO failures and [`Error::VocabularyFormat`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let (format, gz) = VectorFormat::detect(path);
        let file = File::open(path)?;
        let reader: Box<dyn Read> = if gz {
            Box::new(GzDecoder::new(BufReader::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        let vectors = match format {
            VectorFormat::Json => Self::from_json_reader(&name, reader)?,
            VectorFormat::Text => Self::from_text_reader(&name, reader)?,
        };
        log::info!(
            "[vocab] {} tokens x {} dimensions ({})",
            vectors.len(),
            vectors.dim(),
            name
        );
        Ok(vectors)
    }

    /// Write the vocabulary, choosing format and compression from the name.
    ///
    /// Tokens are written in sorted order so output is reproducible.
    ///
    /// # Errors
    ///
    /// IO failures.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let (format, gz) = VectorFormat::detect(path);
        let file = BufWriter::new(File::create(path)?);
        if gz {
            let mut encoder = GzEncoder::new(file, Compression::default());
            self.write_to(format, &mut encoder)?;
            encoder.finish()?.flush()?;
        } else {
            let mut file = file;
            self.write_to(format, &mut file)?;
            file.flush()?;
        }
        Ok(())
    }

    fn write_to<W: Write>(&self, format: VectorFormat, out: &mut W) -> Result<()> {
        let tokens = self.tokens();
        match format {
            VectorFormat::Json => {
                let mut object = serde_json::Map::with_capacity(tokens.len());
                for token in tokens {
                    if let Some(v) = self.vectors.get(token) {
                        object.insert(token.to_string(), serde_json::to_value(v.to_vec())?);
                    }
                }
                serde_json::to_writer(&mut *out, &object)?;
            }
            VectorFormat::Text => {
                for token in tokens {
                    if let Some(v) = self.vectors.get(token) {
                        let body: Vec<String> = v.iter().map(|x| format!("{x:?}")).collect();
                        writeln!(out, "{}\t[{}]", token, body.join(", "))?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Vector dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Always false: an empty vocabulary cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector of a token.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<ArrayView1<'_, f64>> {
        self.vectors.get(token).map(Array1::view)
    }

    /// True when the token has a vector.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.vectors.contains_key(token)
    }

    /// All tokens, sorted.
    #[must_use]
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.vectors.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }
}
