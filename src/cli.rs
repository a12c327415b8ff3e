//! Minimal CLI: JSON types/values in → (stripped | resolved | lifted | checked) out
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;

use mnt_lift::error::LiftError;
use mnt_lift::lift::{mnt_type_strip, MntOpts};
use mnt_lift::notation;
use mnt_lift::path::{split_path, typed_dict_path_type, typed_dict_path_val};
use mnt_lift::types::Type;
use mnt_lift::value::{conforms, Value};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// lift leaf ops and resolve field paths over JSON-encoded types and values
#[derive(Parser, Debug)]
#[command(name = "mnt-lift", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the type an op's transform would be handed
    Strip(StripOut),
    /// resolve a dotted/starred field path (e.g. `*.t_2.a`)
    Path(PathOut),
    /// lift a builtin op over types or values
    Apply(ApplyOut),
    /// check that values inhabit a type
    Check(CheckOut),
    /// list builtin ops and their lifting options
    Ops,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat every input file (types or values) as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct LiftSettings {
    /// JSON file with lift options, e.g. {"dims": 1, "tags": true}
    #[arg(long)]
    opts: Option<PathBuf>,

    /// list dimensions the transform consumes
    #[arg(long)]
    dims: Option<usize>,

    /// hand tagged values to the transform instead of unwrapping them
    #[arg(long, default_value_t = false)]
    tags: bool,

    /// hand nones to the transform instead of passing them through
    #[arg(long, default_value_t = false)]
    nones: bool,

    /// maximum wrapper nesting before giving up
    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(clap::Parser, Debug)]
struct StripOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    lift_settings: LiftSettings,
}

#[derive(clap::Parser, Debug)]
struct PathOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// dotted field reference; `*` matches every key or element
    #[arg(long)]
    path: String,

    /// inputs are values rather than types
    #[arg(long, default_value_t = false)]
    values: bool,
}

#[derive(clap::Parser, Debug)]
struct ApplyOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// builtin op name (see `ops`)
    #[arg(long)]
    op: String,

    /// inputs are values rather than types
    #[arg(long, default_value_t = false)]
    values: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// type file the values are checked against
    #[arg(long = "type")]
    type_file: PathBuf,
}

/// One decoded JSON document and where it came from.
struct Document {
    source: String,
    json: serde_json::Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut documents = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            if self.ndjson {
                for (line_no, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let json = serde_json::from_str::<serde_json::Value>(line).with_context(|| {
                        format!("failed to parse NDJSON line {} ({source_path_str})", line_no + 1)
                    })?;
                    documents.push(Document { source: format!("{source_path_str}:{}", line_no + 1), json });
                }
            } else {
                let json = serde_json::from_str::<serde_json::Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
                documents.push(Document { source: source_path_str, json });
            }
        }
        tracing::debug!(count = documents.len(), "loaded input documents");
        Ok(documents)
    }

    fn write_outputs(&self, outputs: Vec<serde_json::Value>) -> Result<()> {
        let mut rendered = Vec::with_capacity(outputs.len());
        for output in &outputs {
            rendered.push(serde_json::to_string_pretty(output)?);
        }
        let rendered = rendered.join("\n");
        match self.out.as_ref() {
            Some(out) => {
                if let Some(parent) = out.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                std::fs::write(out, &rendered)
                    .with_context(|| format!("failed to write {}", out.display()))?;
            }
            None => println!("{rendered}"),
        }
        Ok(())
    }
}

impl LiftSettings {
    fn resolve(&self) -> Result<MntOpts> {
        let mut opts = match self.opts.as_ref() {
            Some(path) => {
                let source = read_file(path)?;
                notation::from_str_with_path::<MntOpts>(&source)
                    .with_context(|| format!("invalid lift options ({})", path.display()))?
            }
            None => MntOpts::default(),
        };
        if let Some(dims) = self.dims { opts.dims = dims; }
        if let Some(max_depth) = self.max_depth { opts.max_depth = max_depth; }
        opts.tags |= self.tags;
        opts.nones |= self.nones;
        Ok(opts)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Strip(target) => {
                let opts = target.lift_settings.resolve()?;
                let documents = target.input_settings.load_documents()?;
                let outputs = documents
                    .par_iter()
                    .map(|doc| {
                        let ty = decode_type(doc)?;
                        type_outcome(doc, mnt_type_strip(&ty, &opts))
                    })
                    .collect::<Result<Vec<_>>>()?;
                target.input_settings.write_outputs(outputs)
            }
            Command::Path(target) => {
                let path = split_path(&target.path);
                let documents = target.input_settings.load_documents()?;
                let outputs = documents
                    .par_iter()
                    .map(|doc| {
                        if target.values {
                            let value = Value::from(doc.json.clone());
                            value_outcome(doc, typed_dict_path_val(&value, &path))
                        } else {
                            let ty = decode_type(doc)?;
                            type_outcome(doc, typed_dict_path_type(&ty, &path))
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;
                target.input_settings.write_outputs(outputs)
            }
            Command::Apply(target) => {
                let Some(op) = mnt_lift::builtins::lookup(&target.op) else {
                    bail!("unknown op `{}` (try the `ops` subcommand)", target.op);
                };
                let documents = target.input_settings.load_documents()?;
                let outputs = documents
                    .par_iter()
                    .map(|doc| {
                        if target.values {
                            let value = Value::from(doc.json.clone());
                            value_outcome(doc, op.resolve(&value))
                        } else {
                            let ty = decode_type(doc)?;
                            type_outcome(doc, op.output_type(&ty))
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;
                target.input_settings.write_outputs(outputs)
            }
            Command::Check(target) => {
                let ty = notation::parse_type(&read_file(&target.type_file)?)
                    .with_context(|| format!("invalid type ({})", target.type_file.display()))?;
                let documents = target.input_settings.load_documents()?;
                let failures = documents
                    .par_iter()
                    .filter(|doc| !conforms(&ty, &Value::from(doc.json.clone())))
                    .map(|doc| doc.source.clone())
                    .collect::<Vec<_>>();
                for source in &failures {
                    eprintln!("{} {source} does not inhabit {ty}", "✗".red());
                }
                if !failures.is_empty() {
                    bail!("{} of {} documents do not conform", failures.len(), documents.len());
                }
                eprintln!("{} {} documents conform to {ty}", "✓".green(), documents.len());
                Ok(())
            }
            Command::Ops => {
                for op in mnt_lift::builtins::all() {
                    println!(
                        "{:<14} dims={} tags={} nones={}",
                        op.name, op.opts.dims, op.opts.tags, op.opts.nones
                    );
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn decode_type(doc: &Document) -> Result<Type> {
    serde_json::from_value::<Type>(doc.json.clone())
        .with_context(|| format!("input is not a type ({})", doc.source))
}

/// Invalid shapes are reported per document; deeper failures abort the run.
fn type_outcome(doc: &Document, result: Result<Type, LiftError>) -> Result<serde_json::Value> {
    match result {
        Ok(ty) => serde_json::to_value(&ty).with_context(|| format!("failed to encode {}", doc.source)),
        Err(err @ LiftError::Invalid { .. }) => {
            eprintln!("{} {}: {err}", "invalid".yellow(), doc.source);
            Ok(serde_json::Value::from("invalid"))
        }
        Err(err) => Err(err).with_context(|| format!("failed on {}", doc.source)),
    }
}

fn value_outcome(doc: &Document, result: Result<Value, LiftError>) -> Result<serde_json::Value> {
    match result {
        Ok(value) => Ok(serde_json::Value::from(value)),
        Err(err @ LiftError::Invalid { .. }) => {
            eprintln!("{} {}: {err}", "invalid".yellow(), doc.source);
            Ok(serde_json::Value::Null)
        }
        Err(err) => Err(err).with_context(|| format!("failed on {}", doc.source)),
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
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
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
