// src/commands/derive.rs

//! Derive a renamed, relicensed distribution from a source distribution

use super::{load_config, print_written, report_diagnostics};
use crate::cli::ConfigArgs;
use anyhow::{Context, Result};
use relib::{Pipeline, SourceTree, write_outputs};
use std::path::Path;
use tracing::info;

pub fn cmd_derive(input: &Path, output: &Path, args: &ConfigArgs, quiet: bool) -> Result<()> {
    let config = load_config(args, quiet)?;

    info!("Reading distribution from {}", input.display());
    let tree = SourceTree::open(input, &config.markers)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let derivation = Pipeline::new(&config).derive(&tree)?;
    let written = write_outputs(&derivation.outputs, output)
        .with_context(|| format!("Failed to write outputs to {}", output.display()))?;

    print_written(&written);
    report_diagnostics(&config, &derivation.diagnostics);
    Ok(())
}
