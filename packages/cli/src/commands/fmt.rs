use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pageblocks_editor::Document;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct FmtArgs {
    /// Page file to format
    pub file: String,

    /// Write the result back instead of printing it
    #[arg(short, long)]
    pub write: bool,

    /// Fill missing alignment with the configured default
    #[arg(long)]
    pub fill_alignment: bool,
}

pub fn fmt(args: FmtArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = PathBuf::from(cwd).join(&args.file);
    let mut doc = Document::load(path, &config.validation())?;

    if args.fill_alignment {
        let changed = doc.fill_default_alignment(config.surface.default_alignment);
        tracing::debug!(changed, "filled default alignment");
    }

    if args.write {
        doc.save()?;
        println!("{} Formatted {}", "✓".green(), args.file);
    } else {
        println!("{}", doc.to_json()?);
    }

    Ok(())
}
