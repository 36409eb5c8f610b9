// src/lib.rs

//! Relib: derived C source distribution rewriter
//!
//! Turns a one-function-per-file C library distribution into a renamed,
//! relicensed derived distribution, or flattens an already-derived tree into
//! a single header, source file and test harness.
//!
//! # Architecture
//!
//! - Two phases: the whole input tree and the macro catalog exist before
//!   any output is built
//! - Explicit state machines: one per file kind, in `rewrite`
//! - In-memory outputs: nothing is written until a run has succeeded
//! - Leaks are diagnostics: provenance findings never abort a run

pub mod assemble;
pub mod config;
mod error;
pub mod leak;
pub mod license;
pub mod pipeline;
pub mod rewrite;
pub mod source;

pub use assemble::{AssemblyMode, Assembler, OutputFile, TransformedFile, order_headers};
pub use config::{DeriveConfig, Markers, OutputLayout};
pub use error::{Error, Result};
pub use leak::{Diagnostics, LeakChecker, LeakFinding};
pub use license::{LicenseKind, LicenseText};
pub use pipeline::{Derivation, Pipeline, write_outputs};
pub use rewrite::{MacroCatalog, RenameRule, TransformContext, Transformer};
pub use source::{Classifier, FileKind, SourceFile, SourceTree, discover_flat_dir};
