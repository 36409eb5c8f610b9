// src/rewrite/macros.rs

//! Macro catalog and the global macro rename pass
//!
//! The catalog is built from the macro-definitions header before any output
//! is finalized, then applied to every assembled output. Names are matched
//! as whole words, so `DPI` never matches inside `DPIX`.

use crate::error::Result;
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

static DEFINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*define\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Ordered mapping from raw macro names to their namespaced form
#[derive(Debug, Clone, Default)]
pub struct MacroCatalog {
    names: Vec<String>,
    renames: HashMap<String, String>,
    pattern: Option<Regex>,
}

/// Defined macro names in first-seen order, without duplicates or denied names
pub fn defined_macros(lines: &[String], denylist: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for line in lines {
        if let Some(caps) = DEFINE_RE.captures(line) {
            let name = &caps[1];
            if denylist.iter().any(|d| d == name) {
                continue;
            }
            if seen.insert(name.to_string()) {
                names.push(name.to_string());
            }
        }
    }

    names
}

impl MacroCatalog {
    /// Build the catalog from the macro-definitions file
    ///
    /// Each name maps to `<LIBRARY>_<NAME>`, both upper-cased.
    pub fn build(lines: &[String], denylist: &[String], library_name: &str) -> Result<Self> {
        let names = defined_macros(lines, denylist);
        let prefix = library_name.to_uppercase();

        let renames = names
            .iter()
            .map(|name| (name.clone(), format!("{}_{}", prefix, name.to_uppercase())))
            .collect();

        let pattern = if names.is_empty() {
            None
        } else {
            let alternation: Vec<String> = names.iter().map(|n| regex::escape(n)).collect();
            Some(Regex::new(&format!(r"\b(?:{})\b", alternation.join("|")))?)
        };

        debug!("Macro catalog holds {} names", names.len());
        Ok(Self {
            names,
            renames,
            pattern,
        })
    }

    /// Raw macro names in first-seen order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Namespaced form of `name`, if it is in the catalog
    pub fn renamed(&self, name: &str) -> Option<&str> {
        self.renames.get(name).map(String::as_str)
    }

    /// Replace every whole-word catalog name in `line`
    pub fn apply(&self, line: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern
                .replace_all(line, |caps: &Captures| {
                    self.renames
                        .get(&caps[0])
                        .cloned()
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned(),
            None => line.to_string(),
        }
    }

    /// Apply the rename to every line in place
    pub fn apply_all(&self, lines: &mut [String]) {
        if self.pattern.is_none() {
            return;
        }
        for line in lines.iter_mut() {
            *line = self.apply(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    fn macro_header() -> Vec<String> {
        lines(
            "#ifndef SOFAMHDEF\n\
             #define SOFAMHDEF\n\
             \n\
             /* Pi */\n\
             #define DPI (3.141592653589793238462643)\n\
             # define D2PI (6.283185307179586476925287)\n\
             #define dint(A) ((A)<0.0?ceil(A):floor(A))\n\
             #define DPI (3.0)\n\
             #endif",
        )
    }

    #[test]
    fn test_catalog_order_and_denylist() {
        let names = defined_macros(&macro_header(), &["SOFAMHDEF".to_string()]);
        assert_eq!(names, vec!["DPI", "D2PI", "dint"]);
    }

    #[test]
    fn test_renamed_form_is_uppercase() {
        let catalog = MacroCatalog::build(&macro_header(), &["SOFAMHDEF".to_string()], "erfa").unwrap();
        assert_eq!(catalog.renamed("dint"), Some("ERFA_DINT"));
        assert_eq!(catalog.renamed("DPI"), Some("ERFA_DPI"));
        assert_eq!(catalog.renamed("SOFAMHDEF"), None);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_word_boundary_safety() {
        let catalog = MacroCatalog::build(&lines("#define FOO 1"), &[], "erfa").unwrap();
        assert_eq!(catalog.apply("x = FOO + FOOBAR + XFOO;"), "x = ERFA_FOO + FOOBAR + XFOO;");
        assert_eq!(catalog.apply("y = FOO_2;"), "y = FOO_2;");
    }

    #[test]
    fn test_overlapping_names() {
        let catalog =
            MacroCatalog::build(&lines("#define DJ 1\n#define DJM 2"), &[], "erfa").unwrap();
        assert_eq!(catalog.apply("DJ + DJM"), "ERFA_DJ + ERFA_DJM");
    }

    #[test]
    fn test_function_like_macro_use() {
        let catalog = MacroCatalog::build(&macro_header(), &["SOFAMHDEF".to_string()], "erfa").unwrap();
        assert_eq!(catalog.apply("   w = dint(a) * D2PI;"), "   w = ERFA_DINT(a) * ERFA_D2PI;");
    }

    #[test]
    fn test_empty_catalog_is_identity() {
        let catalog = MacroCatalog::build(&lines("int x;"), &[], "erfa").unwrap();
        assert!(catalog.is_empty());
        let mut text = lines("DPI\nFOO");
        catalog.apply_all(&mut text);
        assert_eq!(text, vec!["DPI", "FOO"]);
    }
}
