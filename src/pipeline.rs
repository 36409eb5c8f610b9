// src/pipeline.rs

//! The two-phase derivation driver
//!
//! Phase one reads the whole input tree, validates its roles and builds the
//! macro catalog. Phase two transforms every file, assembles the outputs,
//! runs the global macro rename and scans the result for provenance leaks.
//! Nothing touches the filesystem until [`write_outputs`] is called with a
//! finished result.

use crate::assemble::{AssemblyMode, Assembler, OutputFile, TransformedFile, order_headers};
use crate::config::DeriveConfig;
use crate::error::{Error, Result};
use crate::leak::{Diagnostics, LeakChecker};
use crate::rewrite::{
    HarnessTransformer, HeaderTransformer, MacroCatalog, SourceTransformer, TransformContext,
    Transformer,
};
use crate::source::{SourceFile, SourceTree};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Outputs of a successful run, plus its warnings
#[derive(Debug, Clone)]
pub struct Derivation {
    pub mode: AssemblyMode,
    pub outputs: Vec<OutputFile>,
    pub diagnostics: Diagnostics,
}

pub struct Pipeline<'a> {
    config: &'a DeriveConfig,
    ctx: TransformContext,
    leaks: LeakChecker,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a DeriveConfig) -> Self {
        Self {
            config,
            ctx: TransformContext::new(config),
            leaks: LeakChecker::from_markers(&config.markers),
        }
    }

    /// Derive a renamed, relicensed distribution from a source tree
    pub fn derive(&self, tree: &SourceTree) -> Result<Derivation> {
        // Phase one: roles and macro catalog
        let macro_header = tree.macro_header()?;
        let harness = tree.test_harness()?;
        let headers = order_headers(tree.headers())?;
        let sources = tree.sources();
        if sources.is_empty() {
            return Err(Error::MissingInput("no library sources found".to_string()));
        }

        let catalog = MacroCatalog::build(
            macro_header.lines(),
            &self.config.markers.macro_denylist,
            &self.config.library_name,
        )?;
        info!(
            "Deriving {} from {} headers, {} sources ({} macros)",
            self.config.library_name,
            headers.len(),
            sources.len(),
            catalog.len()
        );

        // Phase two: transform, assemble, rename, check
        let header_transformer = HeaderTransformer::new(&self.ctx);
        let source_transformer = SourceTransformer::new(&self.ctx);
        let harness_transformer = HarnessTransformer::new(&self.ctx);

        let headers = headers
            .into_iter()
            .map(|file| self.run(&header_transformer, file))
            .collect::<Result<Vec<_>>>()?;
        let sources = sources
            .into_iter()
            .map(|file| self.run(&source_transformer, file))
            .collect::<Result<Vec<_>>>()?;
        let harness = self.run(&harness_transformer, harness)?;

        let assembler = Assembler::new(self.config);
        let mut outputs = assembler.assemble_derived(&headers, &sources, &harness)?;
        for output in &mut outputs {
            catalog.apply_all(&mut output.body);
        }

        Ok(self.finish(AssemblyMode::Derive, outputs))
    }

    /// Merge an already-derived, one-file-per-function tree
    pub fn flatten(&self, tree: &SourceTree) -> Result<Derivation> {
        let harness = tree.test_harness()?;
        let headers = order_headers(tree.headers())?;
        let sources = tree.sources();
        if sources.is_empty() {
            return Err(Error::MissingInput("no library sources found".to_string()));
        }
        info!(
            "Flattening {} headers and {} sources into {}",
            headers.len(),
            sources.len(),
            self.config.library_name
        );

        let assembler = Assembler::new(self.config);
        let outputs = assembler.assemble_flattened(&headers, &sources, harness)?;
        Ok(self.finish(AssemblyMode::Flatten, outputs))
    }

    fn run(&self, transformer: &dyn Transformer, file: &SourceFile) -> Result<TransformedFile> {
        debug!("Transforming {}", file.name());
        let lines = transformer.transform(file.name(), file.lines())?;
        if lines.iter().all(|l| l.trim().is_empty()) {
            return Err(Error::structure(
                file.name(),
                "transformed file has no content",
            ));
        }
        Ok(TransformedFile {
            name: self.ctx.rule.rename_file(file.name()),
            kind: file.kind(),
            lines,
        })
    }

    fn finish(&self, mode: AssemblyMode, outputs: Vec<OutputFile>) -> Derivation {
        let mut diagnostics = Diagnostics::new();
        for output in &outputs {
            diagnostics.extend(self.leaks.scan(&output.name, output.lines()));
        }
        Derivation {
            mode,
            outputs,
            diagnostics,
        }
    }
}

/// Write outputs into `dir`, creating it if needed
///
/// Each file is written to a temporary file in `dir` and then persisted over
/// its final name, so a failed run never leaves a half-written output.
pub fn write_outputs(outputs: &[OutputFile], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(outputs.len());
    for output in outputs {
        let path = dir.join(&output.name);
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(output.contents().as_bytes())?;
        temp.flush()?;
        temp.persist(&path).map_err(|e| e.error)?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}
