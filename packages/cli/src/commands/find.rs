use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pageblocks_editor::Document;
use pageblocks_model::{block_path, find_block};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct FindArgs {
    /// Page file to search
    pub file: String,

    /// Block id to look up
    pub id: String,
}

pub fn find(args: FindArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let doc = Document::load(PathBuf::from(cwd).join(&args.file), &config.validation())?;

    let block = find_block(doc.content(), &args.id).ok_or_else(|| anyhow!("Block not found: {}", args.id))?;
    let path = block_path(doc.content(), &args.id).ok_or_else(|| anyhow!("Block not found: {}", args.id))?;

    println!("{} {}", block.block_type().to_string().cyan(), path.to_string().bright_white());
    println!("{}", serde_json::to_string_pretty(block)?);

    Ok(())
}
