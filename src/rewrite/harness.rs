// src/rewrite/harness.rs

//! Test-harness transformer
//!
//! The validation harness has a simpler layout than library sources: one
//! header comment carrying a release notice, then plain test functions.
//! Only the release notice is stripped; every other line is renamed.

use super::{TransformContext, Transformer, is_comment_end, split_regions};
use crate::error::{Error, Result};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HarnessState {
    Header,
    /// Dropping the release notice up to the comment terminator
    ReleaseNotice,
    Body,
}

pub struct HarnessTransformer<'a> {
    ctx: &'a TransformContext,
}

impl<'a> HarnessTransformer<'a> {
    pub fn new(ctx: &'a TransformContext) -> Self {
        Self { ctx }
    }
}

impl Transformer for HarnessTransformer<'_> {
    fn transform(&self, name: &str, lines: &[String]) -> Result<Vec<String>> {
        let rule = &self.ctx.rule;
        let regions = split_regions(lines, &self.ctx.markers.license_boundary);

        let mut out = Vec::with_capacity(regions.body.len());
        let mut state = HarnessState::Header;
        let mut banner = rule.spaced_namespace_once();

        for line in &regions.body {
            match state {
                HarnessState::Header => {
                    if line.contains(&self.ctx.markers.release_notice) {
                        state = HarnessState::ReleaseNotice;
                    } else if let Some(renamed) = banner.apply(line) {
                        out.push(renamed);
                    } else {
                        out.push(rule.rewrite_all(line));
                    }
                }
                HarnessState::ReleaseNotice => {
                    if is_comment_end(line) {
                        out.push(line.clone());
                        state = HarnessState::Body;
                    }
                }
                HarnessState::Body => out.push(rule.rewrite_all(line)),
            }
        }

        if state == HarnessState::ReleaseNotice {
            return Err(Error::structure(
                name,
                "release notice is never closed by a comment terminator",
            ));
        }

        debug!("Transformed test harness {}: {} lines", name, out.len());
        Ok(out)
    }
}
