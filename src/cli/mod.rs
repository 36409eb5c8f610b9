// src/cli/mod.rs
//! CLI definitions for relib
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! - `derive` - Rewrite a source distribution into the derived library
//! - `flatten` - Merge an already-derived tree into three files
//! - `check` - Scan files for provenance leaks
//! - `completions` - Generate shell completion scripts

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "relib")]
#[command(author = "Relib Contributors")]
#[command(version)]
#[command(about = "Rewrites a C source distribution into a renamed, relicensed derived distribution", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Only log warnings and errors, and skip the leak report
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Configuration file plus per-run overrides
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Name of the derived library
    #[arg(short, long)]
    pub name: Option<String>,

    /// Function-name prefix of the derived library
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Copyright year substituted into the license texts
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Record "Derived from <lib> version <v>" at the top of every output
    #[arg(long)]
    pub version_tag: Option<String>,

    /// Write every transformed input under its renamed filename
    #[arg(long)]
    pub per_file: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive a renamed, relicensed distribution
    ///
    /// The input is an unpacked distribution directory or a .tar.gz archive
    /// of it. Outputs are only written once the whole run has succeeded.
    Derive {
        /// Distribution directory or archive
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Merge an already-derived tree into one header, source and test file
    Flatten {
        /// Directory holding the derived tree (auto-detected when omitted)
        srcdir: Option<PathBuf>,

        /// Directory searched when auto-detecting the derived tree
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Scan files for leftover provenance tokens
    Check {
        /// Files to scan
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
