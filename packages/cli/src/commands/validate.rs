use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pageblocks_common::BlockStats;
use pageblocks_editor::{Document, EditorError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Page file or directory to validate
    #[arg(default_value = ".")]
    pub path: String,

    /// Ignore unknown fields even if the config is strict
    #[arg(long)]
    pub lenient: bool,
}

pub fn validate(args: ValidateArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut validation = config.validation();
    if args.lenient {
        validation.mode = pageblocks_model::ParseMode::Lenient;
    }

    let target = PathBuf::from(cwd).join(&args.path);
    let files = find_page_files(&target)?;

    if files.is_empty() {
        println!("{} No page files found", "⚠️".yellow());
        return Ok(());
    }

    let mut failed = 0;
    for file in &files {
        match check_file(file, &validation) {
            Ok(stats) => {
                println!(
                    "{} {} ({} blocks, depth {})",
                    "✓".green(),
                    file.display(),
                    stats.total,
                    stats.max_depth
                );
            }
            Err(err) => {
                failed += 1;
                println!("{} {}", "✗".red(), file.display().to_string().bold());
                println!("    {}", err.to_string().red());
            }
        }
    }

    println!();
    if failed > 0 {
        anyhow::bail!("{} of {} documents failed validation", failed, files.len());
    }

    println!("{} {} documents valid", "✅".green(), files.len());
    Ok(())
}

/// Load one file through the same path the editor uses
pub fn check_file(path: &Path, validation: &pageblocks_model::ValidationConfig) -> Result<BlockStats, EditorError> {
    let source = std::fs::read_to_string(path)?;
    let doc = Document::from_json(path.to_path_buf(), &source, validation)?;
    Ok(BlockStats::collect(doc.content()))
}

fn find_page_files(target: &Path) -> Result<Vec<PathBuf>> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(target)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_json = path.extension().and_then(|s| s.to_str()) == Some("json");
        let is_config = path.file_name().and_then(|s| s.to_str()) == Some(DEFAULT_CONFIG_NAME);
        if path.is_file() && is_json && !is_config {
            files.push(path.to_path_buf());
        }
    }
    files.sort();

    Ok(files)
}
