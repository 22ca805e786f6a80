//! Fixture runner: for every `<dir>/*/schema.json`, mount the form into a
//! headless toolkit, type `values.json` into it, submit, and diff the parsed
//! result against `expected.json`. Optional `rows.json` pins array row counts.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use indexmap::IndexMap;
use serde_json::Value;

use schema_form::{FormGenerator, Identifier, MemoryToolkit, Schema, path_de};

fn main() -> Result<()> {
    let root = std::env::args().nth(1).unwrap_or_else(|| "fixtures".to_string());
    let pattern = format!("{root}/*/schema.json");

    let mut failures = 0usize;
    let mut total = 0usize;
    for entry in glob::glob(&pattern)? {
        let schema_path = entry?;
        let Some(dir) = schema_path.parent() else { continue };
        total += 1;
        match run_fixture(dir) {
            Ok(()) => eprintln!("✅ {}", dir.display().to_string().green()),
            Err(error) => {
                failures += 1;
                eprintln!("❌ {}: {error:#}", dir.display().to_string().red());
            }
        }
    }

    eprintln!("{} fixtures, {} failed", total, failures);
    if total == 0 {
        anyhow::bail!("no fixtures matched {pattern}");
    }
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn run_fixture(dir: &Path) -> Result<()> {
    let schema = Schema::from_json_str(&read(&dir.join("schema.json"))?)?;
    let values: IndexMap<String, String> = load(&dir.join("values.json"))?;
    let expected: Value = load(&dir.join("expected.json"))?;

    let mut submitted = None;
    let mut form = FormGenerator::create(schema, "fixture", |v| submitted = Some(v));

    let rows_path = dir.join("rows.json");
    if rows_path.exists() {
        let rows: IndexMap<String, usize> = load(&rows_path)?;
        for (array, count) in rows {
            form.set_rows(&Identifier::from(array), count)?;
        }
    }

    let mut toolkit = MemoryToolkit::new();
    form.mount(&mut toolkit)?;
    for (id, value) in values {
        toolkit.set_value(&id, value)?;
    }
    form.handle_event("fixture+submit", &mut toolkit)?;
    drop(form);

    let parsed = submitted.context("submit handler was not called")?;
    if parsed != expected {
        anyhow::bail!(
            "parsed result differs\n--- expected\n{}\n--- parsed\n{}",
            serde_json::to_string_pretty(&expected)?,
            serde_json::to_string_pretty(&parsed)?,
        );
    }
    Ok(())
}

fn read(path: &PathBuf) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(path_de::from_slice_with_path(&bytes).with_context(|| format!("in {}", path.display()))?)
}
