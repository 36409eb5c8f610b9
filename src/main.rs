// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::info;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Derive {
            input,
            output,
            config,
        } => {
            info!("Deriving from {}", input.display());
            commands::cmd_derive(&input, &output, &config, cli.quiet)
        }
        Commands::Flatten {
            srcdir,
            root,
            output,
            config,
        } => commands::cmd_flatten(srcdir.as_deref(), &root, &output, &config, cli.quiet),
        Commands::Check { files, config } => commands::cmd_check(&files, &config, cli.quiet),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "relib", &mut std::io::stdout());
            Ok(())
        }
    }
}
