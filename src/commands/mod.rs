// src/commands/mod.rs
//! Command handlers for the relib CLI

mod check;
mod derive;
mod flatten;

pub use check::cmd_check;
pub use derive::cmd_derive;
pub use flatten::cmd_flatten;

use crate::cli::ConfigArgs;
use anyhow::{Context, Result};
use relib::{DeriveConfig, Diagnostics, OutputLayout};
use std::path::PathBuf;
use tracing::debug;

/// Load the configuration file (if any) and apply command-line overrides
pub fn load_config(args: &ConfigArgs, quiet: bool) -> Result<DeriveConfig> {
    let mut config = match &args.config {
        Some(path) => DeriveConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DeriveConfig::default(),
    };

    if let Some(name) = &args.name {
        config.library_name = name.clone();
    }
    if let Some(prefix) = &args.prefix {
        config.identifier_prefix = prefix.clone();
    }
    if let Some(year) = args.year {
        config.copyright_year = Some(year);
    }
    if let Some(tag) = &args.version_tag {
        config.derived_version = Some(tag.clone());
    }
    if args.per_file {
        config.layout = OutputLayout::PerFile;
    }
    if quiet {
        config.verbose = false;
    }

    config.validate()?;
    debug!(
        "Using library '{}' with prefix '{}'",
        config.library_name, config.identifier_prefix
    );
    Ok(config)
}

/// Print the files written by a run
pub fn print_written(written: &[PathBuf]) {
    for path in written {
        println!("Wrote {}", path.display());
    }
}

/// Report leak findings when the run is verbose
pub fn report_diagnostics(config: &DeriveConfig, diagnostics: &Diagnostics) {
    if !config.verbose || diagnostics.is_empty() {
        return;
    }

    diagnostics.report();
    println!(
        "\n{} line(s) still mention '{}':",
        diagnostics.leaks().len(),
        config.markers.forbidden_token
    );
    for leak in diagnostics.leaks() {
        println!("  {}", leak);
    }
}
