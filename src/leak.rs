// src/leak.rs

//! Provenance leak checker
//!
//! Reports output lines that still mention the origin organization. The
//! checker never changes output; findings go to a [`Diagnostics`] collection
//! that the caller reports after a successful write.

use crate::config::Markers;
use std::fmt;
use tracing::warn;

/// A line that mentions the forbidden token without an allow-listed phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeakFinding {
    pub file: String,
    /// 1-based
    pub line_number: usize,
    pub line: String,
}

impl fmt::Display for LeakFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line_number, self.line.trim())
    }
}

#[derive(Debug, Clone)]
pub struct LeakChecker {
    token: String,
    allow_list: Vec<String>,
}

impl LeakChecker {
    pub fn new(token: &str, allow_list: &[String]) -> Self {
        Self {
            token: token.to_lowercase(),
            allow_list: allow_list.to_vec(),
        }
    }

    pub fn from_markers(markers: &Markers) -> Self {
        Self::new(&markers.forbidden_token, &markers.allow_list)
    }

    /// Whether `line` would be reported
    pub fn is_leak(&self, line: &str) -> bool {
        if self.token.is_empty() || !line.to_lowercase().contains(&self.token) {
            return false;
        }
        !self.allow_list.iter().any(|phrase| line.contains(phrase.as_str()))
    }

    /// Scan the lines of one output file
    pub fn scan<'a, I>(&self, file: &str, lines: I) -> Vec<LeakFinding>
    where
        I: IntoIterator<Item = &'a String>,
    {
        lines
            .into_iter()
            .enumerate()
            .filter(|(_, line)| self.is_leak(line))
            .map(|(idx, line)| LeakFinding {
                file: file.to_string(),
                line_number: idx + 1,
                line: line.clone(),
            })
            .collect()
    }

    /// Scan already-joined text
    pub fn scan_text(&self, file: &str, text: &str) -> Vec<LeakFinding> {
        let lines: Vec<String> = text.lines().map(String::from).collect();
        self.scan(file, &lines)
    }
}

/// Warnings collected during a run
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    leaks: Vec<LeakFinding>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, findings: Vec<LeakFinding>) {
        self.leaks.extend(findings);
    }

    pub fn leaks(&self) -> &[LeakFinding] {
        &self.leaks
    }

    pub fn is_empty(&self) -> bool {
        self.leaks.is_empty()
    }

    /// Emit every finding on the warning channel
    pub fn report(&self) {
        for leak in &self.leaks {
            warn!("Possible provenance leak: {}", leak);
        }
    }
}
