// src/assemble.rs

//! Cross-file assembly
//!
//! Orders headers (macro definitions first), concatenates per-file results
//! into the output files, fixes includes between merged files, and pairs
//! every output with its trailing license.
//!
//! Two modes:
//! - [`AssemblyMode::Derive`] concatenates the outputs of the per-file
//!   transformers.
//! - [`AssemblyMode::Flatten`] merges an already-derived tree, splicing each
//!   header between its banner comment and its final `__cplusplus` block.

use crate::config::{DeriveConfig, OutputLayout};
use crate::error::{Error, Result};
use crate::license::LicenseText;
use crate::rewrite::{extract_content, ident::spaced, split_regions};
use crate::source::{FileKind, SourceFile};
use tracing::{debug, warn};

const CPLUSPLUS_GUARD: &str = "#ifdef __cplusplus";

/// How per-file content is merged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyMode {
    Derive,
    Flatten,
}

/// One rewritten input, without any trailing license
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedFile {
    /// Output name derived from the input name
    pub name: String,
    pub kind: FileKind,
    pub lines: Vec<String>,
}

/// A finished output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    /// Body content; the global macro rename applies here only
    pub body: Vec<String>,
    pub license: Vec<String>,
}

impl OutputFile {
    pub fn lines(&self) -> impl Iterator<Item = &String> {
        self.body.iter().chain(self.license.iter())
    }

    /// Full text with a trailing newline
    pub fn contents(&self) -> String {
        let mut text = String::new();
        for line in self.lines() {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

/// Put the macro-definitions header first, the rest in filename order
///
/// Exactly two headers are expected, one of them the macro header.
pub fn order_headers(headers: Vec<&SourceFile>) -> Result<Vec<&SourceFile>> {
    let (mut macros, mut others): (Vec<&SourceFile>, Vec<&SourceFile>) = headers
        .into_iter()
        .partition(|h| h.kind() == FileKind::MacroDefinitions);

    match macros.len() {
        1 => {}
        0 => {
            return Err(Error::MissingInput(
                "no macro-definitions header found".to_string(),
            ));
        }
        _ => {
            return Err(Error::ambiguous(
                "more than one macro-definitions header; the macro definitions have to come first",
                macros.iter().map(|h| h.name().to_string()).collect(),
            ));
        }
    }
    if others.len() != 1 {
        let mut names: Vec<String> = macros.iter().map(|h| h.name().to_string()).collect();
        names.extend(others.iter().map(|h| h.name().to_string()));
        return Err(Error::ambiguous("expected exactly two header files", names));
    }

    others.sort_by(|a, b| a.name().cmp(b.name()));
    macros.extend(others);
    Ok(macros)
}

/// Target of an `#include` line, quoted or angled
fn include_target(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('#')?.trim_start();
    let rest = rest.strip_prefix("include")?.trim();
    let (open, close) = match rest.chars().next()? {
        '"' => ('"', '"'),
        '<' => ('<', '>'),
        _ => return None,
    };
    let inner = rest.strip_prefix(open)?;
    let end = inner.find(close)?;
    Some(&inner[..end])
}

/// Rewrite includes between files merged into one output
///
/// Includes of `dropped` names disappear; includes of `redirected` names
/// become a quoted include of `target`.
fn fix_includes(
    lines: &[String],
    dropped: &[String],
    redirected: &[String],
    target: &str,
) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| match include_target(line) {
            Some(name) if dropped.iter().any(|d| d == name) => None,
            Some(name) if redirected.iter().any(|r| r == name) => {
                Some(format!("#include \"{}\"", target))
            }
            _ => Some(line.clone()),
        })
        .collect()
}

pub struct Assembler<'a> {
    config: &'a DeriveConfig,
    trailing: Vec<String>,
}

impl<'a> Assembler<'a> {
    pub fn new(config: &'a DeriveConfig) -> Self {
        let trailing = LicenseText::trailing(config.trailing_license_text.clone()).render(
            &config.library_name,
            config.year(),
            &config.markers.license_boundary,
        );
        Self {
            config,
            trailing,
        }
    }

    /// `//Derived from` banner, when a version is configured
    fn version_banner(&self) -> Vec<String> {
        match &self.config.derived_version {
            Some(version) => vec![
                format!(
                    "//Derived from {} version {}",
                    self.config.library_name, version
                ),
                String::new(),
            ],
            None => Vec::new(),
        }
    }

    /// Opening lines of the combined source file
    fn source_preamble(&self) -> Vec<String> {
        let mut lines = self.version_banner();
        lines.extend([
            format!("#include \"{}\"", self.config.header_name()),
            String::new(),
            "#include <stdio.h>".to_string(),
            "#include <string.h>".to_string(),
            "#include <stdlib.h>".to_string(),
            String::new(),
        ]);
        lines
    }

    /// Opening lines of a flattened header
    fn flat_header_preamble(&self) -> Vec<String> {
        let name = &self.config.library_name;
        let upper = name.to_uppercase();
        let banner_name = format!("{} . h", spaced(name));
        let dashes = vec!["-"; name.chars().count() + 3].join(" ");

        let mut lines = self.version_banner();
        lines.extend([
            format!("#ifndef {}HDEF", upper),
            format!("#define {}HDEF", upper),
            String::new(),
            "#include <math.h>".to_string(),
            String::new(),
            "/*".to_string(),
            format!("**  {}", dashes),
            format!("**   {}", banner_name),
            format!("**  {}", dashes),
            "**".to_string(),
            format!(
                "**  Prototype function declarations and macros for {} library.",
                name
            ),
            "**".to_string(),
            "*/".to_string(),
        ]);
        lines
    }

    fn ensure_content(name: &str, body: &[String]) -> Result<()> {
        if body.iter().all(|l| l.trim().is_empty()) {
            return Err(Error::structure(name, "assembled output has no content"));
        }
        Ok(())
    }

    fn output(&self, name: String, body: Vec<String>, license: Vec<String>) -> Result<OutputFile> {
        Self::ensure_content(&name, &body)?;
        debug!("Assembled {} ({} lines)", name, body.len());
        Ok(OutputFile {
            name,
            body,
            license,
        })
    }

    /// Assemble transformed files produced in [`AssemblyMode::Derive`]
    ///
    /// `headers` must already be in header order.
    pub fn assemble_derived(
        &self,
        headers: &[TransformedFile],
        sources: &[TransformedFile],
        harness: &TransformedFile,
    ) -> Result<Vec<OutputFile>> {
        match self.config.layout {
            OutputLayout::PerFile => self.assemble_per_file(headers, sources, harness),
            OutputLayout::Combined => self.assemble_combined(headers, sources, harness),
        }
    }

    fn assemble_per_file(
        &self,
        headers: &[TransformedFile],
        sources: &[TransformedFile],
        harness: &TransformedFile,
    ) -> Result<Vec<OutputFile>> {
        headers
            .iter()
            .chain(sources)
            .chain(std::iter::once(harness))
            .map(|file| {
                let mut body = self.version_banner();
                body.extend(file.lines.iter().cloned());
                self.output(file.name.clone(), body, self.trailing.clone())
            })
            .collect()
    }

    fn assemble_combined(
        &self,
        headers: &[TransformedFile],
        sources: &[TransformedFile],
        harness: &TransformedFile,
    ) -> Result<Vec<OutputFile>> {
        let header_name = self.config.header_name();
        let macro_names: Vec<String> = headers
            .iter()
            .filter(|h| h.kind == FileKind::MacroDefinitions)
            .map(|h| h.name.clone())
            .collect();
        let main_names: Vec<String> = headers
            .iter()
            .filter(|h| h.kind == FileKind::Header)
            .map(|h| h.name.clone())
            .collect();

        let mut header_body = self.version_banner();
        for header in headers {
            header_body.extend(fix_includes(
                &header.lines,
                &macro_names,
                &main_names,
                &header_name,
            ));
        }

        let mut source_body = self.source_preamble();
        for (idx, source) in sources.iter().enumerate() {
            if idx > 0 {
                source_body.push(String::new());
            }
            let content = extract_content(&source.lines, &self.config.markers.license_boundary);
            source_body.extend(content.body);
        }

        let mut test_body = self.version_banner();
        test_body.extend(fix_includes(
            &harness.lines,
            &macro_names,
            &main_names,
            &header_name,
        ));

        Ok(vec![
            self.output(header_name, header_body, self.trailing.clone())?,
            self.output(self.config.source_name(), source_body, self.trailing.clone())?,
            self.output(self.config.test_name(), test_body, self.trailing.clone())?,
        ])
    }

    /// Merge an already-derived tree ([`AssemblyMode::Flatten`])
    ///
    /// Licenses carried by the inputs are preserved, the last one seen
    /// winning; the rendered template is only used when an output's inputs
    /// carry none.
    pub fn assemble_flattened(
        &self,
        headers: &[&SourceFile],
        sources: &[&SourceFile],
        harness: &SourceFile,
    ) -> Result<Vec<OutputFile>> {
        if self.config.layout == OutputLayout::PerFile {
            warn!("Per-file layout does not apply when flattening; writing combined files");
        }
        let boundary = &self.config.markers.license_boundary;
        let header_name = self.config.header_name();

        let mut header_body = self.flat_header_preamble();
        let mut header_license = Vec::new();
        let mut opens_extern = false;
        for header in headers {
            let content = extract_content(header.lines(), boundary);
            let spliced = splice_header(header.name(), &content.body)?;
            opens_extern |= spliced.iter().any(|l| l.starts_with("extern \"C\""));
            header_body.extend(spliced.iter().cloned());
            if content.has_license() {
                header_license = content.license;
            }
        }
        if opens_extern {
            header_body.extend([
                CPLUSPLUS_GUARD.to_string(),
                "}".to_string(),
                "#endif".to_string(),
                String::new(),
            ]);
        }
        header_body.extend(["#endif".to_string(), String::new()]);

        let mut source_body = self.source_preamble();
        let mut source_license = Vec::new();
        for source in sources {
            let content = extract_content(source.lines(), boundary);
            source_body.extend(content.body.iter().cloned());
            if content.has_license() {
                source_license = content.license;
            }
        }

        let macro_names: Vec<String> = headers
            .iter()
            .filter(|h| h.kind() == FileKind::MacroDefinitions)
            .map(|h| h.name().to_string())
            .collect();
        let main_names: Vec<String> = headers
            .iter()
            .filter(|h| h.kind() == FileKind::Header)
            .map(|h| h.name().to_string())
            .collect();
        let harness_regions = split_regions(harness.lines(), boundary);
        let mut test_body = self.version_banner();
        test_body.extend(fix_includes(
            &harness_regions.body,
            &macro_names,
            &main_names,
            &header_name,
        ));

        Ok(vec![
            self.output(header_name, header_body, self.or_template(header_license))?,
            self.output(self.config.source_name(), source_body, self.or_template(source_license))?,
            self.output(
                self.config.test_name(),
                test_body,
                self.or_template(harness_regions.license),
            )?,
        ])
    }

    fn or_template(&self, license: Vec<String>) -> Vec<String> {
        if license.is_empty() {
            self.trailing.clone()
        } else {
            license
        }
    }
}

/// Content of a header between its banner comment and its closing guards
///
/// Starts after the first `*/` line and stops before the last
/// `#ifdef __cplusplus`, or before the last `#endif` when there is none.
pub fn splice_header<'l>(name: &str, content: &'l [String]) -> Result<&'l [String]> {
    let header_end = content
        .iter()
        .position(|l| l.starts_with("*/"))
        .ok_or_else(|| Error::structure(name, "never found comment end"))?;

    let upto = content
        .iter()
        .rposition(|l| l.starts_with(CPLUSPLUS_GUARD))
        .or_else(|| content.iter().rposition(|l| l.starts_with("#endif")))
        .ok_or_else(|| Error::structure(name, "no closing #ifdef __cplusplus or #endif"))?;

    if upto <= header_end {
        return Err(Error::structure(
            name,
            "closing guard precedes the end of the banner comment",
        ));
    }

    Ok(&content[header_end + 1..upto])
}
