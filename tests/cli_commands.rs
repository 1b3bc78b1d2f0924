//! CLI tests: train, predict, evaluate, validate, info, vectors, config

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ONTOLOGY: &str = "\
format-version: 1.2

[Term]
id: OBT:0001
name: bacteria

[Term]
id: OBT:0002
name: gram positive
is_a: OBT:0001 ! bacteria

[Term]
id: OBT:0003
name: gram negative
is_a: OBT:0001 ! bacteria

[Term]
id: OBT:0004
name: retired
is_obsolete: true
";

const VECTORS: &str = r#"{"lactic": [1.0, 0.0], "acid": [0.8, 0.2], "rod": [0.0, 1.0], "negative": [0.1, 0.9]}"#;

fn contes(args: &[&str]) -> Assert {
    Command::cargo_bin("contes").unwrap().args(args).assert()
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let write = |name: &str, content: &str| {
            fs::write(dir.path().join(name), content).expect("Failed to write fixture");
        };
        write("onto.obo", ONTOLOGY);
        write("vst.json", VECTORS);
        write(
            "train_terms.json",
            r#"{"T1": "lactic acid", "T2": "negative rod", "T3": "unknown words"}"#,
        );
        write(
            "train_attr.json",
            r#"{"T1": ["OBT:0002"], "T2": "OBT:0003", "T3": "OBT:0001"}"#,
        );
        write(
            "dev_terms.json",
            r#"[{"id": "D1", "surface": "lactic"}, {"id": "D2", "tokens": ["rod"]}, {"id": "D3", "surface": "nothing here"}]"#,
        );
        write("dev_attr.json", r#"{"D1": "OBT:0002", "D2": "OBT:0003", "D3": "OBT:0001"}"#);
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn arg(&self, name: &str) -> String {
        self.path(name).to_string_lossy().to_string()
    }

    fn train(&self, output: &Path) -> Assert {
        contes(&[
            "train",
            "--ontology",
            &self.arg("onto.obo"),
            "--vectors",
            &self.arg("vst.json"),
            "--terms",
            &self.arg("train_terms.json"),
            "--attributions",
            &self.arg("train_attr.json"),
            "-o",
            &output.to_string_lossy(),
        ])
    }
}

#[test]
fn test_train_predict_evaluate() {
    let fx = Fixture::new();
    let projection = fx.path("w.json");
    fx.train(&projection)
        .success()
        .stdout(predicate::str::contains("2 pairs (1 skipped"));
    assert!(projection.exists());

    let predictions = fx.path("pred.json");
    contes(&[
        "predict",
        "--ontology",
        &fx.arg("onto.obo"),
        "--vectors",
        &fx.arg("vst.json"),
        "--terms",
        &fx.arg("dev_terms.json"),
        "--projection",
        &fx.arg("w.json"),
        "-k",
        "2",
        "-o",
        &predictions.to_string_lossy(),
    ])
        .success()
        .stdout(predicate::str::contains("2 terms predicted, 1 skipped"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&predictions).unwrap()).unwrap();
    assert_eq!(written["predictions"][0]["term_id"], "D1");
    assert_eq!(written["predictions"][0]["predictions"][0]["concept_id"], "OBT:0002");
    assert_eq!(written["predictions"][0]["predictions"][0]["label"], "gram positive");
    assert_eq!(written["predictions"][0]["predictions"].as_array().unwrap().len(), 2);
    assert_eq!(written["skipped"][0]["term_id"], "D3");

    contes(&[
        "evaluate",
        "--predictions",
        &predictions.to_string_lossy(),
        "--attributions",
        &fx.arg("dev_attr.json"),
        "--json",
    ])
        .success()
        .stdout(predicate::str::contains("\"total_terms\": 3"))
        .stdout(predicate::str::contains("\"missing_predictions\": 1"));
}

#[test]
fn test_predict_to_stdout() {
    let fx = Fixture::new();
    fx.train(&fx.path("w.json.gz")).success();
    contes(&[
        "p",
        "--ontology",
        &fx.arg("onto.obo"),
        "--vectors",
        &fx.arg("vst.json"),
        "--terms",
        &fx.arg("dev_terms.json"),
        "--projection",
        &fx.arg("w.json.gz"),
    ])
        .success()
        .stdout(predicate::str::contains("\"term_id\": \"D2\""))
        .stdout(predicate::str::contains("OBT:0003"));
}

/// Predict re-embeds the ontology with the encoding recorded at training
/// time. With D1 trained towards the root, adjacency decoding ranks the root
/// first while ancestor decoding would rank OBT:0002 first.
#[test]
fn test_predict_uses_trained_encoding() {
    let fx = Fixture::new();
    fs::write(fx.path("train_attr.json"), r#"{"T1": "OBT:0001", "T2": "OBT:0003"}"#).unwrap();
    let projection = fx.path("w.json");
    contes(&[
        "train",
        "--ontology",
        &fx.arg("onto.obo"),
        "--vectors",
        &fx.arg("vst.json"),
        "--terms",
        &fx.arg("train_terms.json"),
        "--attributions",
        &fx.arg("train_attr.json"),
        "-o",
        &projection.to_string_lossy(),
        "--encoding",
        "adjacency",
    ])
        .success()
        .stdout(predicate::str::contains("encoding adjacency"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&projection).unwrap()).unwrap();
    assert_eq!(written["meta"]["encoding"], "adjacency");

    fs::write(fx.path("ancestors.toml"), "[embedding]\nencoding = \"ancestors\"\n").unwrap();
    for config in [None, Some(fx.arg("ancestors.toml"))] {
        let predictions = fx.path("pred.json");
        let mut args = vec![
            "predict".to_string(),
            "--ontology".to_string(),
            fx.arg("onto.obo"),
            "--vectors".to_string(),
            fx.arg("vst.json"),
            "--terms".to_string(),
            fx.arg("dev_terms.json"),
            "--projection".to_string(),
            projection.to_string_lossy().to_string(),
            "-o".to_string(),
            predictions.to_string_lossy().to_string(),
        ];
        if let Some(config) = &config {
            args.push("--config".to_string());
            args.push(config.clone());
        }
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        contes(&args).success();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&predictions).unwrap()).unwrap();
        assert_eq!(written["predictions"][0]["term_id"], "D1");
        assert_eq!(
            written["predictions"][0]["predictions"][0]["concept_id"], "OBT:0001",
            "config {config:?}"
        );
    }
}

#[test]
fn test_train_without_usable_pairs_writes_nothing() {
    let fx = Fixture::new();
    fs::write(fx.path("train_attr.json"), r#"{"T3": "OBT:0001"}"#).unwrap();
    let projection = fx.path("w.json");
    fx.train(&projection)
        .failure()
        .stderr(predicate::str::contains("Insufficient training data"));
    assert!(!projection.exists());
}

#[test]
fn test_train_dangling_concept_fails() {
    let fx = Fixture::new();
    // obsolete terms are not part of the graph
    fs::write(fx.path("train_attr.json"), r#"{"T1": "OBT:0004"}"#).unwrap();
    fx.train(&fx.path("w.json"))
        .failure()
        .stderr(predicate::str::contains("OBT:0004"));
}

#[test]
fn test_train_negative_lambda_rejected() {
    let fx = Fixture::new();
    contes(&[
        "train",
        "--ontology",
        &fx.arg("onto.obo"),
        "--vectors",
        &fx.arg("vst.json"),
        "--terms",
        &fx.arg("train_terms.json"),
        "--attributions",
        &fx.arg("train_attr.json"),
        "-o",
        &fx.arg("w.json"),
        "--lambda=-1",
    ])
        .failure()
        .stderr(predicate::str::contains("lambda"));
}

#[test]
fn test_predict_dimension_mismatch() {
    let fx = Fixture::new();
    fx.train(&fx.path("w.json")).success();
    fs::write(fx.path("vst3.json"), r#"{"lactic": [1.0, 0.0, 0.0]}"#).unwrap();
    contes(&[
        "predict",
        "--ontology",
        &fx.arg("onto.obo"),
        "--vectors",
        &fx.arg("vst3.json"),
        "--terms",
        &fx.arg("dev_terms.json"),
        "--projection",
        &fx.arg("w.json"),
    ])
        .failure()
        .stderr(predicate::str::contains("Dimension mismatch"));
}

#[test]
fn test_validate() {
    let fx = Fixture::new();
    contes(&[
        "validate",
        "--ontology",
        &fx.arg("onto.obo"),
        "--terms",
        &fx.arg("train_terms.json"),
        "--attributions",
        &fx.arg("train_attr.json"),
    ])
        .success()
        .stdout(predicate::str::contains("3 concepts"))
        .stdout(predicate::str::contains("all references resolve"));

    fs::write(fx.path("bad_attr.json"), r#"{"T9": "OBT:0001"}"#).unwrap();
    contes(&[
        "v",
        "--ontology",
        &fx.arg("onto.obo"),
        "--terms",
        &fx.arg("train_terms.json"),
        "--attributions",
        &fx.arg("bad_attr.json"),
    ])
        .failure()
        .stderr(predicate::str::contains("T9"));

    contes(&["validate"])
        .failure()
        .stderr(predicate::str::contains("Nothing to validate"));
}

#[test]
fn test_validate_malformed_vectors() {
    let fx = Fixture::new();
    fs::write(fx.path("bad.json"), r#"{"a": [1.0, 2.0], "b": [1.0]}"#).unwrap();
    contes(&["validate", "--vectors", &fx.arg("bad.json")])
        .failure()
        .stderr(predicate::str::contains("Vocabulary format error"));
}

#[test]
fn test_info() {
    let fx = Fixture::new();
    contes(&["info", "--ontology", &fx.arg("onto.obo"), "--vectors", &fx.arg("vst.json")])
        .success()
        .stdout(predicate::str::contains("concepts   3"))
        .stdout(predicate::str::contains("max depth  1"))
        .stdout(predicate::str::contains("dimension  2"));
}

#[test]
fn test_vectors_convert() {
    let fx = Fixture::new();
    let txt = fx.path("vst.txt.gz");
    contes(&["vectors", "convert", &fx.arg("vst.json"), &txt.to_string_lossy()])
        .success()
        .stdout(predicate::str::contains("4 tokens x 2 dimensions"));
    let back = contes::WordVectors::load(&txt).unwrap();
    assert_eq!(back.len(), 4);
    assert_eq!(back.get("rod").unwrap().to_vec(), vec![0.0, 1.0]);
}

#[test]
fn test_config_init_and_show() {
    let fx = Fixture::new();
    let path = fx.path("contes.toml");
    contes(&["config", "init", &path.to_string_lossy()])
        .success();
    assert!(path.exists());

    contes(&["config", "init", &path.to_string_lossy()])
        .failure()
        .stderr(predicate::str::contains("already exists"));

    fs::write(&path, "[training]\nlambda = 0.5\n").unwrap();
    contes(&["config", "show", &path.to_string_lossy()])
        .success()
        .stdout(predicate::str::contains("lambda = 0.5"))
        .stdout(predicate::str::contains("encoding = \"ancestors\""));
}

#[test]
fn test_completions() {
    contes(&["completions", "bash"])
        .success()
        .stdout(predicate::str::contains("contes"));
}
