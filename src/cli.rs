//! Minimal CLI: check responses against declared shapes, print skeletons,
//! list what the catalog declares.
use std::path::PathBuf;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;

use shape_check::catalog::{self, endpoints};
use shape_check::{skeleton, MatchResult, Registry, Verifier};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// verify JSON responses against the declared Spotify Web API shapes
#[derive(Parser, Debug)]
#[command(name = "spotify-shape-check", version, about)]
pub struct CommandLineInterface {
    /// more logging; repeat for more (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// check each input document against an endpoint's return type or a named shape
    Check(CheckOut),
    /// print the simplified shape of each input document
    Skeleton(SkeletonOut),
    /// list declared shapes or endpoints
    List(ListOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
struct Target {
    /// client endpoint whose declared return type to check against (e.g. `playlist_items`)
    #[arg(long)]
    endpoint: Option<String>,

    /// declared shape name to check against (e.g. `Track`)
    #[arg(long = "type")]
    type_name: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    target: Target,

    /// extra shape catalog (JSON `{name: description}`), merged with the built-in one
    #[arg(long)]
    types: Option<PathBuf>,

    /// report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// print the simplified shape of failing documents
    #[arg(long)]
    skeleton: bool,
}

#[derive(clap::Parser, Debug)]
struct SkeletonOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

#[derive(clap::Parser, Debug)]
struct ListOut {
    #[arg(value_enum)]
    what: ListWhat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ListWhat {
    Types,
    Endpoints,
}

/// One parsed input value, labelled with where it came from.
struct Document {
    source: String,
    value: Value,
}

#[derive(Serialize)]
struct Report<'a> {
    source: &'a str,
    passed: bool,
    result: MatchResult,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .map_err(|error| anyhow!("failed to resolve input file paths: {error}"))?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            if self.ndjson {
                for (line_no, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let label = format!("{source_path_str}:{}", line_no + 1);
                    let value = serde_json::from_str::<Value>(line)
                        .with_context(|| format!("failed to parse JSON line ({label})"))?;
                    out.push(self.select(label, value)?);
                }
            } else {
                let value = serde_json::from_str::<Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
                out.push(self.select(source_path_str, value)?);
            }
        }
        Ok(out)
    }

    fn select(&self, source: String, value: Value) -> Result<Document> {
        let Some(pointer) = self.json_pointer.as_deref() else {
            return Ok(Document { source, value });
        };
        match value.pointer(pointer) {
            Some(selected) => Ok(Document { value: selected.clone(), source }),
            None => bail!("JSON pointer `{pointer}` selects nothing in {source}"),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// `Ok(false)` when at least one document failed its check.
    pub fn run(&self) -> Result<bool> {
        match &self.cmd {
            Command::Check(target) => target.run(),
            Command::Skeleton(target) => {
                for document in target.input_settings.load_documents()? {
                    let simplified = skeleton::simplify(&document.value);
                    println!("// {}", document.source);
                    println!("{}", serde_json::to_string_pretty(&simplified)?);
                }
                Ok(true)
            }
            Command::List(target) => {
                match target.what {
                    ListWhat::Types => catalog::registry().names().for_each(|name| println!("{name}")),
                    ListWhat::Endpoints => endpoints::names().for_each(|name| println!("{name}")),
                }
                Ok(true)
            }
        }
    }
}

impl CheckOut {
    fn run(&self) -> Result<bool> {
        let verifier = match self.types.as_ref() {
            None => Verifier::new(),
            Some(path) => {
                let extra: Registry = shape_check::path_de::load_registry(path)?;
                tracing::info!(path = %path.display(), types = extra.len(), "loaded extra shapes");
                Verifier::with_extra(extra)?
            }
        };

        let documents = self.input_settings.load_documents()?;
        tracing::debug!(documents = documents.len(), "checking inputs");

        // the matcher is pure; documents are independent
        let results = documents
            .par_iter()
            .map(|document| match (&self.target.endpoint, &self.target.type_name) {
                (Some(endpoint), _) => verifier.verify_endpoint(&document.value, endpoint),
                (None, Some(name)) => verifier.verify_type(&document.value, name),
                (None, None) => unreachable!("clap requires one target"),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let passed = results.iter().all(|result| !result.has_errors());
        match self.format {
            Format::Text => {
                for (document, result) in documents.iter().zip(&results) {
                    self.print_text(document, result);
                }
            }
            Format::Json => {
                let reports = documents
                    .iter()
                    .zip(results)
                    .map(|(document, result)| Report {
                        source: &document.source,
                        passed: !result.has_errors(),
                        result,
                    })
                    .collect::<Vec<_>>();
                println!("{}", serde_json::to_string_pretty(&reports)?);
            }
        }
        Ok(passed)
    }

    fn print_text(&self, document: &Document, result: &MatchResult) {
        if !result.has_errors() {
            println!("{} {}", "PASS".green().bold(), document.source);
            return;
        }
        println!("{} {}", "FAIL".red().bold(), document.source);
        println!("{}", result.pretty());
        if self.skeleton {
            let simplified = skeleton::simplify(&document.value);
            match serde_json::to_string_pretty(&simplified) {
                Ok(text) => println!("{}\n{text}", "skeleton:".dimmed()),
                Err(error) => tracing::warn!(%error, "could not render skeleton"),
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                return Err(format!("glob pattern matched no files: {pattern}").into());
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
