use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use facsearch_core::persist::{save_snapshot, IndexPaths};
use facsearch_core::{DocRecord, DocStore, Document, Snapshot};
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: String,
    /// Normalized (lemmatized) text from the scraping pipeline.
    text: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Parser)]
#[command(name = "facsearch-indexer")]
#[command(about = "Train the TF-IDF model and build index + embeddings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a snapshot from input JSON/JSONL files or a directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output } => build(&input, &output),
    }
}

fn build(input: &str, output: &str) -> Result<()> {
    let records = read_records(Path::new(input))?;
    tracing::info!(num_records = records.len(), "loaded corpus");

    let corpus: Vec<Document> = records
        .iter()
        .map(|r| Document::new(r.id.clone(), r.text.clone()))
        .collect();
    let snapshot = Snapshot::build(&corpus).context("building snapshot")?;

    let out_paths = IndexPaths::new(output);
    save_snapshot(&out_paths, &snapshot)?;

    let docstore = DocStore::open(out_paths.root.join("docstore"))?;
    for record in &records {
        let meta = DocRecord {
            title: record.title.clone().unwrap_or_else(|| record.id.clone()),
            url: record.url.clone(),
            summary: record.summary.clone().unwrap_or_default(),
        };
        docstore.put(&record.id, &meta)?;
    }
    docstore.flush()?;

    tracing::info!(output, num_docs = corpus.len(), "index build complete");
    Ok(())
}

fn read_records(input: &Path) -> Result<Vec<InputDoc>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
        files.sort();
    } else {
        files.push(input.to_path_buf());
    }

    let mut records = Vec::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut records)?;
        } else {
            read_json(&file, &mut records)?;
        }
    }
    Ok(records)
}

fn read_jsonl(file: &Path, records: &mut Vec<InputDoc>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        // One malformed record must not abort the whole build.
        match serde_json::from_str::<InputDoc>(&line) {
            Ok(doc) => records.push(doc),
            Err(err) => {
                tracing::warn!(file = %file.display(), lineno = lineno + 1, %err, "skipping malformed record");
            }
        }
    }
    Ok(())
}

fn read_json(file: &Path, records: &mut Vec<InputDoc>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                match serde_json::from_value::<InputDoc>(v) {
                    Ok(doc) => records.push(doc),
                    Err(err) => {
                        tracing::warn!(file = %file.display(), %err, "skipping malformed record");
                    }
                }
            }
        }
        other => match serde_json::from_value::<InputDoc>(other) {
            Ok(doc) => records.push(doc),
            Err(err) => {
                tracing::warn!(file = %file.display(), %err, "skipping malformed record");
            }
        },
    }
    Ok(())
}
