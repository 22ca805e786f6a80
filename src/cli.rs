//! Minimal CLI: render | parse | tokenize
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use indexmap::IndexMap;
use serde::Serialize;

use schema_form::{FormGenerator, Identifier, Schema, codec, path_de};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// render a form schema into control descriptors, or rebuild nested data from flat control values
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// render the schema and print the control descriptors as JSON
    Render(RenderOut),
    /// parse a flat `identifier -> value` JSON object into the nested result
    Parse(ParseOut),
    /// split an identifier into its field/index tokens
    Tokenize(TokenizeOut),
}

#[derive(Args, Debug, Clone)]
struct SchemaSettings {
    /// schema JSON file
    #[arg(long, short)]
    schema: PathBuf,
}

#[derive(clap::Parser, Debug)]
struct RenderOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// row count for an array field, e.g. `things=3` or `things-0.tags=2` (repeatable)
    #[arg(long, value_parser = parse_rows)]
    rows: Vec<(String, usize)>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ParseOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// flat JSON object of identifier -> string value
    #[arg(long)]
    values: PathBuf,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct TokenizeOut {
    identifier: String,
}

#[derive(Serialize)]
struct Tokenized {
    tokens: Vec<codec::Token>,
    field_path: Vec<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SchemaSettings {
    fn load(&self) -> Result<Schema> {
        let source = std::fs::read_to_string(&self.schema)
            .with_context(|| format!("failed to read schema file {}", self.schema.display()))?;
        Schema::from_json_str(&source)
            .with_context(|| format!("invalid schema in {}", self.schema.display()))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Render(target) => {
                let schema = target.schema_settings.load()?;
                let mut form = FormGenerator::create(schema, "form", |_| {});
                for (array, count) in &target.rows {
                    form.set_rows(&Identifier::from(array.as_str()), *count)?;
                }
                let controls = form.render()?;
                tracing::info!(controls = controls.len(), "rendered");
                emit(target.out.as_deref(), &serde_json::to_string_pretty(&controls)?)
            }
            Command::Parse(target) => {
                let schema = target.schema_settings.load()?;
                let source = std::fs::read_to_string(&target.values)
                    .with_context(|| format!("failed to read values file {}", target.values.display()))?;
                let values: IndexMap<String, String> = path_de::from_str_with_path(&source)
                    .with_context(|| format!("invalid values in {}", target.values.display()))?;
                let form = FormGenerator::create(schema, "form", |_| {});
                let parsed = form.parse(&values)?;
                emit(target.out.as_deref(), &serde_json::to_string_pretty(&parsed)?)
            }
            Command::Tokenize(target) => {
                let out = Tokenized {
                    tokens: codec::tokenize(&target.identifier),
                    field_path: codec::field_path(&target.identifier),
                };
                emit(None, &serde_json::to_string_pretty(&out)?)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn emit(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn parse_rows(raw: &str) -> Result<(String, usize)> {
    let (array, count) = raw
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("expected <array-identifier>=<count>, got `{raw}`"))?;
    let count = count.parse::<usize>().with_context(|| format!("bad row count in `{raw}`"))?;
    Ok((array.to_string(), count))
}
