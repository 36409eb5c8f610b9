// src/commands/flatten.rs

//! Merge an already-derived tree into a header, a source file and a harness

use super::{load_config, print_written, report_diagnostics};
use crate::cli::ConfigArgs;
use anyhow::{Context, Result};
use relib::{Pipeline, SourceTree, discover_flat_dir, write_outputs};
use std::path::Path;
use tracing::info;

pub fn cmd_flatten(
    srcdir: Option<&Path>,
    root: &Path,
    output: &Path,
    args: &ConfigArgs,
    quiet: bool,
) -> Result<()> {
    let config = load_config(args, quiet)?;

    let srcdir = match srcdir {
        Some(dir) => dir.to_path_buf(),
        None => {
            let dir = discover_flat_dir(root, &config.source_namespace).with_context(|| {
                format!("Failed to find a derived tree under {}", root.display())
            })?;
            info!("Auto-detected derived tree at {}", dir.display());
            dir
        }
    };

    let tree = SourceTree::from_glob(&srcdir, &config.markers)
        .with_context(|| format!("Failed to read {}", srcdir.display()))?;

    let derivation = Pipeline::new(&config).flatten(&tree)?;
    let written = write_outputs(&derivation.outputs, output)
        .with_context(|| format!("Failed to write outputs to {}", output.display()))?;

    print_written(&written);
    report_diagnostics(&config, &derivation.diagnostics);
    Ok(())
}
