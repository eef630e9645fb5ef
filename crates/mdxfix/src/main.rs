//! mdxfix CLI - escape markup-like text in Markdown and MDX prose.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use commands::RunArgs;

#[derive(Parser)]
#[command(name = "mdxfix")]
#[command(about = "Escape markup-like text in Markdown and MDX prose")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to mdxfix.toml config file
    #[arg(short, long, default_value = "mdxfix.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite documents in place
    Fix {
        #[command(flatten)]
        run: RunArgs,

        /// Do not create .bak files before the first write
        #[arg(long)]
        no_backup: bool,
    },

    /// Report documents that need rewriting without touching them
    Check {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Write a default mdxfix.toml
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so JSON reports on stdout stay parseable.
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Fix { run, no_backup } => {
            commands::fix::run(&cli.config, &run, no_backup)?;
        }
        Commands::Check { run } => {
            commands::check::run(&cli.config, &run)?;
        }
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
    }

    Ok(())
}
