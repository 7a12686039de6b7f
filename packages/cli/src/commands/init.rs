use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pageblocks_model::{to_json_pretty, ContentBlock, PageContent};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory for page documents
    #[arg(short, long, default_value = "pages")]
    pub pages_dir: String,

    /// Maximum Columns nesting depth
    #[arg(long, default_value_t = pageblocks_model::MAX_NESTING_DEPTH)]
    pub max_depth: usize,

    /// Ignore unknown fields instead of rejecting them
    #[arg(long)]
    pub lenient: bool,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing pageblocks project...".bright_blue().bold());

    // Create pages directory if it doesn't exist
    let pages_dir = PathBuf::from(cwd).join(&args.pages_dir);
    if !pages_dir.exists() {
        fs::create_dir_all(&pages_dir)?;
        println!("  {} Created {}/", "✓".green(), args.pages_dir);
    }

    // Create example page
    let example_file = pages_dir.join("example.json");
    if !example_file.exists() {
        let example = PageContent::new(vec![
            ContentBlock::heading("welcome", 1, "Welcome"),
            ContentBlock::paragraph("intro", "Edit this page with pageblocks."),
            ContentBlock::image("hero", "/media/hero.png"),
        ]);
        fs::write(&example_file, to_json_pretty(&example)?)?;
        println!("  {} Created example.json", "✓".green());
    }

    // Create config
    let config = Config {
        max_depth: args.max_depth,
        strict: !args.lenient,
        ..Config::default()
    };

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/example.json", args.pages_dir);
    println!("  2. Run: pageblocks validate {}", args.pages_dir);
    println!("  3. Run: pageblocks tree {}/example.json", args.pages_dir);

    Ok(())
}
