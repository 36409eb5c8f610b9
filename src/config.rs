// src/config.rs

//! Derivation configuration
//!
//! Everything the rewriting engine needs to know about the source
//! distribution (its tokens and structural markers) and about the derived
//! library (name, prefix, license templates) lives here and is passed
//! explicitly into each component.
//!
//! # Example relib.toml
//!
//! ```toml
//! library_name = "erfa"
//! identifier_prefix = "era"
//! copyright_year = 2021
//! derived_version = "2.0.0"
//! layout = "combined"
//!
//! [markers]
//! forbidden_token = "sofa"
//! allow_list = ["Derived, with permission, from the SOFA library"]
//! ```

use crate::error::{Error, Result};
use crate::rewrite::RenameRule;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Short license embedded in each function's documentation comment
pub const DEFAULT_INLINE_LICENSE: &str =
    "Derived, with permission, from the SOFA library.  See notes at end of file.";

/// Full license appended once to the end of every output file
pub const DEFAULT_TRAILING_LICENSE: &str = r#"Copyright (C) {current-year}, {library-name-uppercase} authors
All rights reserved.

Redistribution and use in source and binary forms, with or without
modification, are permitted provided that the following conditions are met:

1 Redistributions of source code must retain the above copyright notice,
  this list of conditions and the following disclaimer.

2 Redistributions in binary form must reproduce the above copyright notice,
  this list of conditions and the following disclaimer in the documentation
  and/or other materials provided with the distribution.

3 Neither the name of the {library-name-uppercase} authors nor the names of
  its contributors may be used to endorse or promote products derived from
  this software without specific prior written permission.

THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
POSSIBILITY OF SUCH DAMAGE.

The {library-name-uppercase} library is derived, with permission, from the
International Astronomical Union's "Standards of Fundamental Astronomy"
library, available from http://www.iausofa.org."#;

/// How assembled output is laid out on disk
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputLayout {
    /// One header, one source file and one test harness (default)
    #[default]
    Combined,
    /// Every transformed input written under its renamed filename
    PerFile,
}

/// Top-level configuration for a derivation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveConfig {
    /// Name of the derived library (output filenames, namespace tokens)
    #[serde(default = "default_library_name")]
    pub library_name: String,

    /// Function-name prefix of the derived library
    #[serde(default = "default_identifier_prefix")]
    pub identifier_prefix: String,

    /// Namespace token of the source distribution
    #[serde(default = "default_source_namespace")]
    pub source_namespace: String,

    /// Function-name prefix of the source distribution
    #[serde(default = "default_source_prefix")]
    pub source_prefix: String,

    /// Inline license template
    #[serde(default = "default_inline_license")]
    pub inline_license_text: String,

    /// Trailing license template
    #[serde(default = "default_trailing_license")]
    pub trailing_license_text: String,

    /// Year substituted for `{current-year}` (current year when unset)
    #[serde(default)]
    pub copyright_year: Option<i32>,

    /// Version recorded in a `//Derived from` banner at the top of outputs
    #[serde(default)]
    pub derived_version: Option<String>,

    /// Report leak findings and progress
    #[serde(default = "default_verbose")]
    pub verbose: bool,

    #[serde(default)]
    pub layout: OutputLayout,

    #[serde(default)]
    pub markers: Markers,
}

/// Structural markers recognized in the source distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Markers {
    /// Horizontal-rule comment opening the trailing license block
    #[serde(default = "default_license_boundary")]
    pub license_boundary: String,

    /// Organization disclaimer in header file banners
    #[serde(default = "default_file_disclaimer")]
    pub file_disclaimer: String,

    /// Organization disclaimer in function documentation
    #[serde(default = "default_function_disclaimer")]
    pub function_disclaimer: String,

    #[serde(default = "default_canonical_status")]
    pub canonical_status: String,

    /// Opens the copyright/revision sub-block of a function comment
    #[serde(default = "default_revision")]
    pub revision: String,

    /// Opens the release notice in the test harness header
    #[serde(default = "default_release_notice")]
    pub release_notice: String,

    /// Filename suffix of the macro-definitions header
    #[serde(default = "default_macro_suffix")]
    pub macro_suffix: String,

    /// Regex matched against filenames to find the test harness
    #[serde(default = "default_test_pattern")]
    pub test_pattern: String,

    /// Macro names never added to the catalog
    #[serde(default = "default_macro_denylist")]
    pub macro_denylist: Vec<String>,

    /// Provenance token reported by the leak checker (case-insensitive)
    #[serde(default = "default_forbidden_token")]
    pub forbidden_token: String,

    /// Phrases that excuse a line containing the forbidden token
    #[serde(default = "default_allow_list")]
    pub allow_list: Vec<String>,
}

fn default_library_name() -> String {
    "erfa".to_string()
}

fn default_identifier_prefix() -> String {
    "era".to_string()
}

fn default_source_namespace() -> String {
    "sofa".to_string()
}

fn default_source_prefix() -> String {
    "iau".to_string()
}

fn default_inline_license() -> String {
    DEFAULT_INLINE_LICENSE.to_string()
}

fn default_trailing_license() -> String {
    DEFAULT_TRAILING_LICENSE.to_string()
}

fn default_verbose() -> bool {
    true
}

fn default_license_boundary() -> String {
    "/*----------------------------------------------------------------------".to_string()
}

fn default_file_disclaimer() -> String {
    "This file is part of the International".to_string()
}

fn default_function_disclaimer() -> String {
    "This function is part of the International".to_string()
}

fn default_canonical_status() -> String {
    "Status:  canonical".to_string()
}

fn default_revision() -> String {
    "This revision:".to_string()
}

fn default_release_notice() -> String {
    "SOFA release".to_string()
}

fn default_macro_suffix() -> String {
    "m.h".to_string()
}

fn default_test_pattern() -> String {
    r"^t_.*_c\.c$".to_string()
}

fn default_macro_denylist() -> Vec<String> {
    vec!["SOFAMHDEF".to_string()]
}

fn default_forbidden_token() -> String {
    "sofa".to_string()
}

fn default_allow_list() -> Vec<String> {
    vec![
        "Derived, with permission, from the SOFA library".to_string(),
        "www.iausofa.org".to_string(),
    ]
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            license_boundary: default_license_boundary(),
            file_disclaimer: default_file_disclaimer(),
            function_disclaimer: default_function_disclaimer(),
            canonical_status: default_canonical_status(),
            revision: default_revision(),
            release_notice: default_release_notice(),
            macro_suffix: default_macro_suffix(),
            test_pattern: default_test_pattern(),
            macro_denylist: default_macro_denylist(),
            forbidden_token: default_forbidden_token(),
            allow_list: default_allow_list(),
        }
    }
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            library_name: default_library_name(),
            identifier_prefix: default_identifier_prefix(),
            source_namespace: default_source_namespace(),
            source_prefix: default_source_prefix(),
            inline_license_text: default_inline_license(),
            trailing_license_text: default_trailing_license(),
            copyright_year: None,
            derived_version: None,
            verbose: default_verbose(),
            layout: OutputLayout::default(),
            markers: Markers::default(),
        }
    }
}

impl DeriveConfig {
    /// Load a configuration file, filling unset keys with defaults
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: DeriveConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the names are usable as C identifiers and markers are set
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("library_name", &self.library_name),
            ("identifier_prefix", &self.identifier_prefix),
            ("source_namespace", &self.source_namespace),
            ("source_prefix", &self.source_prefix),
        ] {
            if !is_c_identifier(value) {
                return Err(Error::ConfigError(format!(
                    "{} must be a non-empty C identifier, got '{}'",
                    field, value
                )));
            }
        }

        if self.markers.license_boundary.is_empty() {
            return Err(Error::ConfigError(
                "markers.license_boundary must not be empty".to_string(),
            ));
        }
        if self.markers.forbidden_token.is_empty() {
            return Err(Error::ConfigError(
                "markers.forbidden_token must not be empty".to_string(),
            ));
        }
        if let Some(year) = self.copyright_year
            && year <= 0
        {
            return Err(Error::ConfigError(format!("Invalid copyright year: {}", year)));
        }

        Ok(())
    }

    /// Year used for `{current-year}`
    pub fn year(&self) -> i32 {
        self.copyright_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    /// Rename rule mapping source tokens to the derived library's tokens
    pub fn rename_rule(&self) -> RenameRule {
        RenameRule::new(
            &self.source_prefix,
            &self.identifier_prefix,
            &self.source_namespace,
            &self.library_name,
        )
    }

    /// Combined header output filename
    pub fn header_name(&self) -> String {
        format!("{}.h", self.library_name)
    }

    /// Combined source output filename
    pub fn source_name(&self) -> String {
        format!("{}.c", self.library_name)
    }

    /// Test harness output filename
    pub fn test_name(&self) -> String {
        format!("test_{}.c", self.library_name)
    }
}

fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
