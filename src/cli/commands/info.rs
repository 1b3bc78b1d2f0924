//! Info command - ontology and vocabulary statistics

use clap::Parser;
use std::path::PathBuf;

use super::super::output::{color, heading};
use super::super::utils::{load_ontology, load_vectors};

/// Show ontology and vocabulary statistics
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Ontology file (.obo or .json)
    #[arg(long, value_name = "PATH")]
    pub ontology: PathBuf,

    /// Word vectors
    #[arg(long, value_name = "PATH")]
    pub vectors: Option<PathBuf>,
}

/// Roots listed before eliding.
const MAX_ROOTS_SHOWN: usize = 10;

pub fn run(args: InfoArgs) -> Result<(), String> {
    let ontology = load_ontology(&args.ontology)?;

    println!();
    println!("{}", color("1;36", "contes"));
    println!("  version {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("{}:", heading("Ontology"));
    println!("  source     {}", ontology.source_name());
    println!("  concepts   {}", ontology.len());
    println!("  max depth  {}", ontology.max_depth());
    let roots = ontology.roots();
    println!("  roots      {}", roots.len());
    for root in roots.iter().take(MAX_ROOTS_SHOWN) {
        println!(
            "    {} {}",
            color("32", root),
            ontology.label_of(root).unwrap_or_default()
        );
    }
    if roots.len() > MAX_ROOTS_SHOWN {
        println!("    ... {} more", roots.len() - MAX_ROOTS_SHOWN);
    }

    if let Some(path) = &args.vectors {
        let vectors = load_vectors(path)?;
        println!();
        println!("{}:", heading("Word vectors"));
        println!("  tokens     {}", vectors.len());
        println!("  dimension  {}", vectors.dim());
        let covered = ontology
            .concepts()
            .filter(|c| {
                c.label
                    .split_whitespace()
                    .any(|token| vectors.contains(token))
            })
            .count();
        println!("  labels with a known token  {}/{}", covered, ontology.len());
    }

    println!();
    println!("{}:", heading("Enabled Features"));
    let mut features: Vec<&str> = vec!["cli"];
    #[cfg(feature = "parallel")]
    features.push("parallel");
    println!("  {}", features.join(", "));
    println!();
    Ok(())
}
