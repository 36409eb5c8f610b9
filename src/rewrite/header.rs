// src/rewrite/header.rs

//! Header-file transformer
//!
//! Walks the body of a prototype or macro header. The directive block at the
//! top (include guard) only gets its namespace renamed. In the banner
//! comment, the organization disclaimer is replaced by the inline license
//! and the rest of the provenance notice is dropped up to the comment
//! terminator. The license region is discarded; the trailing license is
//! regenerated by the assembler.

use super::{TransformContext, Transformer, is_banner, is_comment_end, split_regions};
use crate::error::{Error, Result};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderState {
    /// Leading preprocessor block (include guard)
    DirectiveHeader,
    /// Outside any comment
    Declarations,
    /// Inside a `/* ... */` banner comment
    BannerComment,
    /// After the disclaimer, dropping lines until the comment terminator
    Provenance,
}

pub struct HeaderTransformer<'a> {
    ctx: &'a TransformContext,
}

impl<'a> HeaderTransformer<'a> {
    pub fn new(ctx: &'a TransformContext) -> Self {
        Self { ctx }
    }
}

impl Transformer for HeaderTransformer<'_> {
    fn transform(&self, name: &str, lines: &[String]) -> Result<Vec<String>> {
        let rule = &self.ctx.rule;
        let markers = &self.ctx.markers;
        let regions = split_regions(lines, &markers.license_boundary);

        let mut out = Vec::with_capacity(regions.body.len());
        let mut state = HeaderState::DirectiveHeader;
        let mut done_header = false;
        let mut spaced_name = rule.spaced_namespace_once();

        for line in &regions.body {
            if state == HeaderState::DirectiveHeader {
                if line.starts_with('#') {
                    out.push(rule.rewrite_namespace(line));
                    continue;
                }
                state = HeaderState::Declarations;
            }

            match state {
                HeaderState::Provenance => {
                    if is_comment_end(line) {
                        out.push(line.clone());
                        state = HeaderState::Declarations;
                    }
                }
                HeaderState::BannerComment => {
                    if !done_header && line.contains(&markers.file_disclaimer) {
                        out.extend(self.ctx.inline_license.iter().cloned());
                        done_header = true;
                        state = HeaderState::Provenance;
                    } else if is_comment_end(line) {
                        out.push(rule.rewrite_namespace(line));
                        state = HeaderState::Declarations;
                    } else if let Some(renamed) = spaced_name.apply(line) {
                        out.push(renamed);
                    } else {
                        out.push(rule.rewrite_namespace(line));
                    }
                }
                HeaderState::Declarations | HeaderState::DirectiveHeader => {
                    if line.starts_with("/*") && !line.contains("*/") {
                        out.push(rule.rewrite_namespace(line));
                        state = HeaderState::BannerComment;
                    } else if is_banner(line) {
                        out.push(rule.rewrite_namespace(line));
                    } else if line.starts_with('#') {
                        out.push(rule.rewrite_all(line));
                    } else {
                        out.push(rule.rewrite_prefix(line));
                    }
                }
            }
        }

        if state == HeaderState::Provenance {
            return Err(Error::structure(
                name,
                "provenance notice is never closed by a comment terminator",
            ));
        }

        debug!(
            "Transformed header {}: {} -> {} lines (license block: {})",
            name,
            lines.len(),
            out.len(),
            regions.has_license()
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::fixtures::{SOFA_H, SOFAM_H, context, lines};

    #[test]
    fn test_guard_and_banner_renamed() {
        let ctx = context();
        let out = HeaderTransformer::new(&ctx)
            .transform("sofa.h", &lines(SOFA_H))
            .unwrap();

        assert_eq!(out[0], "#ifndef ERFAHDEF");
        assert_eq!(out[1], "#define ERFAHDEF");
        assert!(out.contains(&"**   e r f a . h".to_string()));
        assert!(out.contains(&"**  Prototype function declarations for ERFA library.".to_string()));
    }

    #[test]
    fn test_disclaimer_replaced_by_inline_license() {
        let ctx = context();
        let out = HeaderTransformer::new(&ctx)
            .transform("sofa.h", &lines(SOFA_H))
            .unwrap();
        let text = out.join("\n");

        assert_eq!(text.matches(&ctx.inline_license[0]).count(), 1);
        assert!(!text.contains("This file is part of"));
        assert!(!text.contains("IAU SOFA Board"));
        assert!(!text.contains("This revision"));
        // Comment terminator survives
        let license_pos = out.iter().position(|l| *l == ctx.inline_license[0]).unwrap();
        assert_eq!(out[license_pos + 1], "*/");
    }

    #[test]
    fn test_declarations_and_includes_renamed() {
        let ctx = context();
        let out = HeaderTransformer::new(&ctx)
            .transform("sofa.h", &lines(SOFA_H))
            .unwrap();

        assert!(out.contains(&"#include \"erfam.h\"".to_string()));
        assert!(out.contains(&"double eraAnp(double a);".to_string()));
        assert!(out.contains(&"#ifdef __cplusplus".to_string()));
    }

    #[test]
    fn test_license_region_discarded() {
        let ctx = context();
        let out = HeaderTransformer::new(&ctx)
            .transform("sofam.h", &lines(SOFAM_H))
            .unwrap();

        assert_eq!(out.last().map(String::as_str), Some(""));
        assert!(!out.iter().any(|l| l.contains("Standards Of Fundamental Astronomy")));
        assert!(out.contains(&"#define D2PI (6.283185307179586476925287)".to_string()));
        assert!(out.contains(&"**   e r f a m . h".to_string()));
    }

    #[test]
    fn test_missing_boundary_is_not_an_error() {
        let ctx = context();
        let input = lines("#ifndef SOFAHDEF\n#define SOFAHDEF\nint iauX(void);\n#endif");
        let out = HeaderTransformer::new(&ctx).transform("x.h", &input).unwrap();
        assert_eq!(out, vec!["#ifndef ERFAHDEF", "#define ERFAHDEF", "int eraX(void);", "#endif"]);
    }

    #[test]
    fn test_unterminated_provenance_is_structural_error() {
        let ctx = context();
        let input = lines("/*\n**  This file is part of the International Astronomical Union's\n**  more");
        let err = HeaderTransformer::new(&ctx).transform("bad.h", &input).unwrap_err();
        assert!(matches!(err, Error::StructureError { .. }));
    }
}
