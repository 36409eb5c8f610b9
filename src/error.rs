// src/error.rs

//! Error types for the derivation pipeline
//!
//! Structural and ambiguity errors are fatal and abort the run before any
//! output is written. Provenance leaks are not errors; they are collected
//! as diagnostics (see [`crate::leak`]).

use thiserror::Error;

/// Errors that can occur while deriving or flattening a distribution
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Archive error: {0}")]
    ArchiveError(String),

    /// An expected structural marker is absent where it is required
    #[error("Unexpected structure in {file}: {reason}")]
    StructureError { file: String, reason: String },

    /// More (or fewer) inputs matched a uniqueness assumption than allowed
    #[error("Ambiguous input, {what}: {}", candidates.join(", "))]
    AmbiguousInput {
        what: String,
        candidates: Vec<String>,
    },

    #[error("Missing required input: {0}")]
    MissingInput(String),
}

impl Error {
    pub(crate) fn structure(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::StructureError {
            file: file.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn ambiguous(what: impl Into<String>, candidates: Vec<String>) -> Self {
        Error::AmbiguousInput {
            what: what.into(),
            candidates,
        }
    }
}

/// Result type for derivation operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_message_names_candidates() {
        let err = Error::ambiguous("two macro headers", vec!["am.h".into(), "bm.h".into()]);
        assert_eq!(err.to_string(), "Ambiguous input, two macro headers: am.h, bm.h");
    }

    #[test]
    fn test_structure_message() {
        let err = Error::structure("sofa.h", "no comment terminator");
        assert_eq!(err.to_string(), "Unexpected structure in sofa.h: no comment terminator");
    }
}
