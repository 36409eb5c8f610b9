// src/rewrite/source.rs

//! Source-file transformer
//!
//! Each input source holds exactly one function: a signature, its
//! documentation comment, the body, and a trailing license block that sits
//! just before the closing brace. The transformer renames identifiers and
//! strips the provenance sub-regions of the documentation comment:
//!
//! - the `Status:  canonical` annotation
//! - the "part of the International ..." disclaimer paragraph
//! - the revision/release/copyright sub-block, replaced by the inline license
//!
//! At the license boundary the function is closed with `}` and the rest of
//! the file is dropped.

use super::{TransformContext, Transformer, is_blank_comment, is_comment_end, split_regions};
use crate::error::{Error, Result};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceState {
    /// Before the function signature
    FunctionHeader,
    Body,
    /// Dropping the disclaimer paragraph up to its closing blank comment line
    Disclaimer,
    /// Dropping the copyright sub-block up to the comment terminator
    Copyright,
}

pub struct SourceTransformer<'a> {
    ctx: &'a TransformContext,
}

impl<'a> SourceTransformer<'a> {
    pub fn new(ctx: &'a TransformContext) -> Self {
        Self { ctx }
    }
}

impl Transformer for SourceTransformer<'_> {
    fn transform(&self, name: &str, lines: &[String]) -> Result<Vec<String>> {
        let rule = &self.ctx.rule;
        let markers = &self.ctx.markers;
        let regions = split_regions(lines, &markers.license_boundary);

        let mut out: Vec<String> = Vec::with_capacity(regions.body.len() + 1);
        let mut state = SourceState::FunctionHeader;
        let mut banner = rule.spaced_prefix_once();

        for line in &regions.body {
            match state {
                SourceState::FunctionHeader => {
                    if line.contains(rule.source_prefix()) {
                        out.push(rule.rewrite_all(line));
                        state = SourceState::Body;
                    } else {
                        out.push(rule.rewrite_namespace(line));
                    }
                }
                SourceState::Disclaimer => {
                    if is_blank_comment(line) {
                        state = SourceState::Body;
                    }
                }
                SourceState::Copyright => {
                    if is_comment_end(line) {
                        out.push(line.clone());
                        state = SourceState::Body;
                    }
                }
                SourceState::Body => {
                    if line.contains(&markers.canonical_status) {
                        if out.last().is_some_and(|prev| is_blank_comment(prev)) {
                            out.pop();
                        }
                    } else if line.contains(&markers.function_disclaimer) {
                        state = SourceState::Disclaimer;
                    } else if line.contains(&markers.revision) {
                        out.extend(self.ctx.inline_license.iter().cloned());
                        state = SourceState::Copyright;
                    } else if let Some(renamed) = banner.apply(line) {
                        out.push(renamed);
                    } else {
                        out.push(rule.rewrite_all(line));
                    }
                }
            }
        }

        match state {
            SourceState::Copyright => {
                return Err(Error::structure(
                    name,
                    "copyright sub-block is never closed by a comment terminator",
                ));
            }
            SourceState::Disclaimer => {
                return Err(Error::structure(
                    name,
                    "disclaimer paragraph is never closed by a blank comment line",
                ));
            }
            SourceState::FunctionHeader | SourceState::Body => {}
        }

        if regions.has_license() {
            out.push("}".to_string());
        }

        debug!(
            "Transformed source {}: {} -> {} lines",
            name,
            lines.len(),
            out.len()
        );
        Ok(out)
    }
}
