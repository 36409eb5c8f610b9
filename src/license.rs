// src/license.rs

//! License templates and their rendering as C comment lines
//!
//! Templates recognize three placeholders:
//! - `{library-name-uppercase}`
//! - `{library-name}`
//! - `{current-year}`

/// Closing rule of a trailing license comment
pub const LICENSE_CLOSING_RULE: &str =
    "**--------------------------------------------------------------------*/";

const PLACEHOLDER_UPPER: &str = "{library-name-uppercase}";
const PLACEHOLDER_NAME: &str = "{library-name}";
const PLACEHOLDER_YEAR: &str = "{current-year}";

/// Where a license text is placed in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseKind {
    /// Embedded inside a documentation comment
    Inline,
    /// Appended once at the end of an output file
    Trailing,
}

/// A license template
#[derive(Debug, Clone)]
pub struct LicenseText {
    kind: LicenseKind,
    template: String,
}

impl LicenseText {
    pub fn inline(template: impl Into<String>) -> Self {
        Self {
            kind: LicenseKind::Inline,
            template: template.into(),
        }
    }

    pub fn trailing(template: impl Into<String>) -> Self {
        Self {
            kind: LicenseKind::Trailing,
            template: template.into(),
        }
    }

    pub fn kind(&self) -> LicenseKind {
        self.kind
    }

    /// Substitute placeholders, returning plain text lines
    pub fn substitute(&self, library_name: &str, year: i32) -> Vec<String> {
        self.template
            .replace(PLACEHOLDER_UPPER, &library_name.to_uppercase())
            .replace(PLACEHOLDER_NAME, library_name)
            .replace(PLACEHOLDER_YEAR, &year.to_string())
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect()
    }

    /// Render as comment lines ready to be spliced into C source
    ///
    /// Inline licenses become `**  text` lines for an enclosing doc comment.
    /// Trailing licenses become a complete comment that opens with
    /// `boundary` so the output can itself be split again.
    pub fn render(&self, library_name: &str, year: i32, boundary: &str) -> Vec<String> {
        let body = self.substitute(library_name, year).into_iter().map(|line| {
            if line.is_empty() {
                "**".to_string()
            } else {
                format!("**  {}", line)
            }
        });

        match self.kind {
            LicenseKind::Inline => body.collect(),
            LicenseKind::Trailing => {
                let mut lines = vec![boundary.to_string(), "**".to_string()];
                lines.extend(body);
                lines.push("**".to_string());
                lines.push(LICENSE_CLOSING_RULE.to_string());
                lines
            }
        }
    }
}
