// src/commands/check.rs

//! Standalone provenance leak scan

use super::load_config;
use crate::cli::ConfigArgs;
use anyhow::{Context, Result};
use relib::{Diagnostics, LeakChecker};
use std::path::PathBuf;

/// Scan files for the forbidden token; fails when anything is found
pub fn cmd_check(files: &[PathBuf], args: &ConfigArgs, quiet: bool) -> Result<()> {
    let config = load_config(args, quiet)?;
    let checker = LeakChecker::from_markers(&config.markers);

    let mut diagnostics = Diagnostics::new();
    for path in files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        diagnostics.extend(checker.scan_text(&path.display().to_string(), &text));
    }

    if diagnostics.is_empty() {
        if !quiet {
            println!("No provenance leaks in {} file(s)", files.len());
        }
        return Ok(());
    }

    for leak in diagnostics.leaks() {
        println!("{}", leak);
    }
    Err(anyhow::anyhow!(
        "{} line(s) mention '{}'",
        diagnostics.leaks().len(),
        config.markers.forbidden_token
    ))
}
