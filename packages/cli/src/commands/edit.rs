use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pageblocks_editor::{AttributeDelta, Document, Mutation};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Page file to edit
    pub file: String,

    /// Block id to remove (with its nested blocks)
    pub id: String,
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Page file to edit
    pub file: String,

    /// Block id to update
    pub id: String,

    /// Field assignments such as `width=60%`, `level=2` or `alt=null`
    #[arg(required = true)]
    pub fields: Vec<String>,
}

pub fn remove(args: RemoveArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut doc = Document::load(PathBuf::from(cwd).join(&args.file), &config.validation())?;

    doc.apply(Mutation::remove(&args.id))?;
    doc.save()?;

    println!("{} Removed {} from {}", "✓".green(), args.id.bright_white(), args.file);
    Ok(())
}

pub fn merge(args: MergeArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut doc = Document::load(PathBuf::from(cwd).join(&args.file), &config.validation())?;

    let mut delta = AttributeDelta::new();
    for assignment in &args.fields {
        let (field, value) = parse_assignment(assignment)?;
        delta.insert(field, value);
    }

    let fields = delta.len();
    doc.apply(Mutation::merge(&args.id, delta))?;
    doc.save()?;

    println!(
        "{} Updated {} field(s) on {}",
        "✓".green(),
        fields,
        args.id.bright_white()
    );
    Ok(())
}

/// Split `field=value`; the value is read as JSON, falling back to a string
fn parse_assignment(assignment: &str) -> Result<(String, Value)> {
    let (field, raw) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected field=value, got {:?}", assignment))?;
    let field = field.trim();
    if field.is_empty() {
        anyhow::bail!("Missing field name in {:?}", assignment);
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((field.to_string(), value))
}
