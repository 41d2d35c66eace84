#![forbid(unsafe_code)]

mod commands;
mod config;
mod exit_code;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use docvfs_core::{CachedVfs, ErrorPresenter, LocalProvider};
use tracing_subscriber::EnvFilter;

use crate::commands::{cat, ls, mkdir, roots, stat, stats, tree, write};
use crate::config::Config;

#[derive(Parser)]
#[command(name = "docvfs")]
#[command(author, version, about = "Browse and edit a document tree through a path cache")]
#[command(propagate_version = true)]
struct Cli {
    /// Root directory or tree document URI
    #[arg(long, env = "DOCVFS_ROOT", global = true)]
    root: Option<String>,

    /// Configuration file (default: config.toml in the config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the names directly under the root
    Roots,

    /// List directory contents
    Ls(ls::Args),

    /// Show directory tree
    Tree(tree::Args),

    /// Read and output file contents
    Cat(cat::Args),

    /// Write stdin to a file
    Write(write::Args),

    /// Create a directory and any missing parents
    Mkdir(mkdir::Args),

    /// Show one cached entry
    Stat(stat::Args),

    /// Scan the tree and show cache statistics
    Stats(stats::Args),
}

/// Presents root failures on stderr, where a terminal user sees them.
struct StderrPresenter;

impl ErrorPresenter for StderrPresenter {
    fn present(&self, message: &str) {
        eprintln!("{message}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code::for_error(&e))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let root = cli
        .root
        .or_else(|| config.root.clone())
        .ok_or_else(|| anyhow::anyhow!("--root is required (or set DOCVFS_ROOT)"))?;
    let locator = config.resolve_root(&root)?;
    tracing::debug!(root = %locator, "Using root");

    let vfs = CachedVfs::with_config(LocalProvider, config.cache)
        .with_presenter(Arc::new(StderrPresenter));
    vfs.set_root(Some(&locator));

    match cli.command {
        Commands::Roots => roots::execute(&vfs),
        Commands::Ls(args) => ls::execute(&vfs, &args),
        Commands::Tree(args) => tree::execute(&vfs, &args),
        Commands::Cat(args) => cat::execute(&vfs, &args),
        Commands::Write(args) => write::execute(&vfs, &args),
        Commands::Mkdir(args) => mkdir::execute(&vfs, &args),
        Commands::Stat(args) => stat::execute(&vfs, &args),
        Commands::Stats(args) => stats::execute(&vfs, &args),
    }
}
