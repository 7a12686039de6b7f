mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    find, fmt, init, merge, remove, tree, validate, FindArgs, FmtArgs, InitArgs, MergeArgs, RemoveArgs, TreeArgs,
    ValidateArgs,
};
use tracing_subscriber::EnvFilter;

/// Pageblocks CLI - inspect and edit block-based page documents
#[derive(Parser, Debug)]
#[command(name = "pageblocks")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new pageblocks project
    Init(InitArgs),

    /// Check page files for structural errors
    Validate(ValidateArgs),

    /// Normalize a page file's JSON
    Fmt(FmtArgs),

    /// Print the block outline of a page
    Tree(TreeArgs),

    /// Show one block and where it lives
    Find(FindArgs),

    /// Remove a block and everything nested in it
    Remove(RemoveArgs),

    /// Update fields on one block
    Merge(MergeArgs),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Validate(args) => validate(args, &cwd),
                Command::Fmt(args) => fmt(args, &cwd),
                Command::Tree(args) => tree(args, &cwd),
                Command::Find(args) => find(args, &cwd),
                Command::Remove(args) => remove(args, &cwd),
                Command::Merge(args) => merge(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
