//! Minimal CLI: resolve unions in JSON documents, or decode and re-encode them.
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value as Json;

use crate::navigator::{JsonNavigator, Model};
use crate::path_de::PathError;
use crate::types::TypeDescriptor;
use crate::union::{Resolution, UnionResolver};
use crate::value::Decoded;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// resolve union-typed JSON documents to their concrete member types
#[derive(Parser, Debug)]
#[command(name = "json-union")]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print which member type each document resolves to
    Resolve(ResolveOut),
    /// decode each document as the given type and encode it back
    Decode(DecodeOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// type descriptor as JSON (`{"name": "union", "params": [...]}`) or a bare type name
    #[arg(long = "type", short = 't')]
    ty: String,

    /// class model JSON file (`{"classes": {...}}`)
    #[arg(long)]
    model: Option<PathBuf>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct ResolveOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

#[derive(clap::Parser, Debug)]
struct DecodeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One JSON document and where it came from (`path` or `path:line`).
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub source: String,
    pub json: Json,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> anyhow::Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")?;
        let mut documents = Vec::new();
        for source_path in source_paths {
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file {}", source_path.display()))?;
            for document in parse_documents(&source_path, &source, self.ndjson)? {
                documents.push(self.select(document)?);
            }
        }
        Ok(documents)
    }

    fn select(&self, document: Document) -> anyhow::Result<Document> {
        let Some(pointer) = self.json_pointer.as_deref() else {
            return Ok(document);
        };
        let json = document
            .json
            .pointer(pointer)
            .cloned()
            .ok_or_else(|| anyhow!("JSON pointer {pointer} matched nothing in {}", document.source))?;
        Ok(Document { source: document.source, json })
    }

    fn load_model(&self) -> anyhow::Result<Model> {
        let Some(path) = self.model.as_ref() else {
            return Ok(Model::new());
        };
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read model file {}", path.display()))?;
        Model::from_json_slice(&bytes).with_context(|| format!("failed to load model {}", path.display()))
    }

    fn type_descriptor(&self) -> anyhow::Result<TypeDescriptor> {
        parse_type(&self.ty)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Resolve(target) => target.run(),
            Command::Decode(target) => target.run(),
        }
    }
}

impl ResolveOut {
    fn run(&self) -> anyhow::Result<()> {
        let ty = self.input_settings.type_descriptor()?;
        if !ty.is_union() {
            bail!("`{ty}` is not a union type");
        }
        let documents = self.input_settings.load_documents()?;

        let outcomes: Vec<_> = documents
            .par_iter()
            .map(|doc| UnionResolver.resolve(Decoded::Tree(&doc.json), &ty))
            .collect();

        let mut failures = 0usize;
        for (doc, outcome) in documents.iter().zip(outcomes) {
            match outcome {
                Ok(Resolution::Discriminated(concrete)) => {
                    println!("{}: {} {}", doc.source, "discriminator".green(), concrete);
                }
                Ok(Resolution::Matched(concrete)) => {
                    println!("{}: {} {}", doc.source, "candidate".green(), concrete);
                }
                Ok(Resolution::Unresolved) => {
                    println!("{}: {}", doc.source, "unresolved".yellow());
                }
                Err(error) => {
                    failures += 1;
                    println!("{}: {} {error}", doc.source, "error".red());
                }
            }
        }
        report_failures(failures, documents.len())
    }
}

impl DecodeOut {
    fn run(&self) -> anyhow::Result<()> {
        let ty = self.input_settings.type_descriptor()?;
        let model = self.input_settings.load_model()?;
        let documents = self.input_settings.load_documents()?;

        let outcomes: Vec<_> = documents
            .par_iter()
            .map(|doc| decode_document(&model, &doc.json, &ty))
            .collect();

        let mut encoded = Vec::with_capacity(outcomes.len());
        let mut failures = 0usize;
        for (doc, outcome) in documents.iter().zip(outcomes) {
            match outcome {
                Ok(json) => encoded.push(json),
                Err(error) => {
                    failures += 1;
                    eprintln!("{}: {} {error}", doc.source, "error".red());
                }
            }
        }

        let output = render_output(&encoded, self.input_settings.ndjson)?;
        if let Some(out) = self.out.as_ref() {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, &output).with_context(|| format!("failed to write {}", out.display()))?;
        } else {
            println!("{output}");
        }
        report_failures(failures, documents.len())
    }
}

/// Decodes `json` as `ty` and encodes the result back; absent results become `null`.
pub fn decode_document(model: &Model, json: &Json, ty: &TypeDescriptor) -> crate::Result<Json> {
    let mut nav = JsonNavigator::new(model);
    let Some(value) = nav.deserialize(json, ty)? else {
        return Ok(Json::Null);
    };
    Ok(nav.serialize(&value, ty)?.unwrap_or(Json::Null))
}

/// Accepts a JSON type descriptor, or falls back to a bare type name.
pub fn parse_type(src: &str) -> anyhow::Result<TypeDescriptor> {
    let trimmed = src.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('"') {
        return crate::path_de::from_str_with_path(trimmed)
            .map_err(PathError::into_type_error)
            .with_context(|| format!("failed to parse type argument `{trimmed}`"));
    }
    if trimmed.is_empty() {
        bail!("empty type name");
    }
    Ok(TypeDescriptor::named(trimmed))
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn parse_documents(path: &Path, source: &str, ndjson: bool) -> anyhow::Result<Vec<Document>> {
    let path_str = path.to_string_lossy();
    if !ndjson {
        let json = serde_json::from_str::<Json>(source)
            .with_context(|| format!("failed to parse JSON source file ({path_str})"))?;
        return Ok(vec![Document { source: path_str.into_owned(), json }]);
    }
    let mut out = Vec::new();
    for (index, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let source = format!("{path_str}:{}", index + 1);
        let json = serde_json::from_str::<Json>(line)
            .with_context(|| format!("failed to parse NDJSON line ({source})"))?;
        out.push(Document { source, json });
    }
    Ok(out)
}

fn render_output(encoded: &[Json], ndjson: bool) -> anyhow::Result<String> {
    if ndjson {
        let lines = encoded
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(lines.join("\n"));
    }
    Ok(match encoded {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(many)?,
    })
}

fn report_failures(failures: usize, total: usize) -> anyhow::Result<()> {
    if failures > 0 {
        bail!("{failures} of {total} documents failed");
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = Vec::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if !pattern.contains(['*', '?', '[']) {
            out.push(PathBuf::from(pattern));
            continue;
        }
        let before = out.len();
        for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern `{pattern}`"))? {
            out.push(entry.with_context(|| format!("unreadable match for `{pattern}`"))?);
        }
        if out.len() == before {
            bail!("glob pattern matched no files: {pattern}");
        }
    }
    Ok(out)
}
