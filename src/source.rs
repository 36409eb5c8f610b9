// src/source.rs

//! Input enumeration and classification
//!
//! The rewriting engine consumes `(name, text)` pairs. This module produces
//! them from a directory tree, a flat source directory, or a `.tar.gz`
//! distribution archive, and classifies each file by its role.

use crate::config::Markers;
use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tar::Archive;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Role of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileKind {
    /// Prototype header
    Header,
    /// Header holding the macro definitions (sorted first)
    MacroDefinitions,
    /// One-function-per-file library source
    Source,
    /// Validation harness
    Test,
    /// Anything else; ignored
    Other,
}

impl FileKind {
    pub fn is_header(self) -> bool {
        matches!(self, FileKind::Header | FileKind::MacroDefinitions)
    }
}

/// A classified input file, immutable once read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    kind: FileKind,
    lines: Vec<String>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, kind: FileKind, text: &str) -> Self {
        Self {
            name: name.into(),
            kind,
            lines: text.lines().map(String::from).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Assigns a [`FileKind`] from a file name
#[derive(Debug, Clone)]
pub struct Classifier {
    macro_suffix: String,
    test_pattern: Regex,
}

impl Classifier {
    pub fn new(markers: &Markers) -> Result<Self> {
        Ok(Self {
            macro_suffix: markers.macro_suffix.clone(),
            test_pattern: Regex::new(&markers.test_pattern)?,
        })
    }

    pub fn classify(&self, name: &str) -> FileKind {
        if name.ends_with(".h") {
            if name.ends_with(&self.macro_suffix) {
                FileKind::MacroDefinitions
            } else {
                FileKind::Header
            }
        } else if name.ends_with(".c") {
            if self.test_pattern.is_match(name) {
                FileKind::Test
            } else {
                FileKind::Source
            }
        } else {
            FileKind::Other
        }
    }
}

/// The relevant files of a distribution, sorted by name
#[derive(Debug, Clone, Default)]
pub struct SourceTree {
    files: Vec<SourceFile>,
}

/// Basename of a path or archive entry name
fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn is_candidate(name: &str) -> bool {
    name.ends_with(".c") || name.ends_with(".h")
}

impl SourceTree {
    /// Build a tree from `(path, text)` pairs
    ///
    /// Files are keyed by basename; two relevant files sharing a basename is
    /// an ambiguity error.
    pub fn from_entries<I, N, T>(entries: I, markers: &Markers) -> Result<Self>
    where
        I: IntoIterator<Item = (N, T)>,
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let classifier = Classifier::new(markers)?;
        let mut by_name: BTreeMap<String, (String, SourceFile)> = BTreeMap::new();

        for (path, text) in entries {
            let path = path.as_ref();
            let name = base_name(path);
            let kind = classifier.classify(name);
            if kind == FileKind::Other {
                continue;
            }

            if let Some((previous, _)) = by_name.get(name) {
                return Err(Error::ambiguous(
                    format!("two inputs named '{}'", name),
                    vec![previous.clone(), path.to_string()],
                ));
            }
            by_name.insert(
                name.to_string(),
                (path.to_string(), SourceFile::new(name, kind, text.as_ref())),
            );
        }

        let files: Vec<SourceFile> = by_name.into_values().map(|(_, file)| file).collect();
        debug!("Collected {} relevant input files", files.len());
        Ok(Self { files })
    }

    /// Open a directory tree or a distribution archive
    pub fn open(path: &Path, markers: &Markers) -> Result<Self> {
        if path.is_dir() {
            Self::from_dir(path, markers)
        } else if is_archive(path) {
            Self::from_archive(path, markers)
        } else {
            Err(Error::MissingInput(format!(
                "{} is neither a directory nor a .tar/.tar.gz archive",
                path.display()
            )))
        }
    }

    /// Recursively collect `.c` and `.h` files below `root`
    pub fn from_dir(root: &Path, markers: &Markers) -> Result<Self> {
        info!("Reading source tree {}", root.display());
        let mut entries = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::IoError(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let name = path.to_string_lossy().into_owned();
            if !is_candidate(base_name(&name)) {
                continue;
            }
            entries.push((name, read_text(path)?));
        }

        Self::from_entries(entries, markers)
    }

    /// Collect `*.c` and `*.h` directly inside `dir` (no recursion)
    pub fn from_glob(dir: &Path, markers: &Markers) -> Result<Self> {
        info!("Reading source directory {}", dir.display());
        let mut entries = Vec::new();

        for suffix in ["*.c", "*.h"] {
            let pattern = dir.join(suffix);
            let paths = glob::glob(&pattern.to_string_lossy())
                .map_err(|e| Error::ConfigError(format!("Invalid glob pattern: {}", e)))?;
            for path in paths {
                let path = path.map_err(|e| Error::IoError(e.into()))?;
                if path.is_file() {
                    entries.push((path.to_string_lossy().into_owned(), read_text(&path)?));
                }
            }
        }

        Self::from_entries(entries, markers)
    }

    /// Collect `.c` and `.h` entries from a `.tar`, `.tar.gz` or `.tgz` archive
    pub fn from_archive(path: &Path, markers: &Markers) -> Result<Self> {
        info!("Reading distribution archive {}", path.display());
        let file = File::open(path)?;
        let name = path.to_string_lossy();
        let reader: Box<dyn Read> = if name.ends_with(".gz") || name.ends_with(".tgz") {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let mut archive = Archive::new(reader);
        let mut entries = Vec::new();

        let archive_entries = archive
            .entries()
            .map_err(|e| Error::ArchiveError(format!("Failed to read {}: {}", name, e)))?;
        for entry in archive_entries {
            let mut entry =
                entry.map_err(|e| Error::ArchiveError(format!("Corrupt entry in {}: {}", name, e)))?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let entry_path = entry
                .path()
                .map_err(|e| Error::ArchiveError(format!("Bad entry path in {}: {}", name, e)))?
                .to_string_lossy()
                .into_owned();
            if !is_candidate(base_name(&entry_path)) {
                continue;
            }

            let mut content = Vec::new();
            entry.read_to_end(&mut content)?;
            entries.push((entry_path, String::from_utf8_lossy(&content).into_owned()));
        }

        Self::from_entries(entries, markers)
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// All headers, macro header included, in filename order
    pub fn headers(&self) -> Vec<&SourceFile> {
        self.files.iter().filter(|f| f.kind.is_header()).collect()
    }

    /// Library sources in filename order
    pub fn sources(&self) -> Vec<&SourceFile> {
        self.files
            .iter()
            .filter(|f| f.kind == FileKind::Source)
            .collect()
    }

    /// The single macro-definitions header
    pub fn macro_header(&self) -> Result<&SourceFile> {
        self.unique(FileKind::MacroDefinitions, "macro-definitions header")
    }

    /// The single validation harness
    pub fn test_harness(&self) -> Result<&SourceFile> {
        self.unique(FileKind::Test, "test harness")
    }

    fn unique(&self, kind: FileKind, role: &str) -> Result<&SourceFile> {
        let matches: Vec<&SourceFile> = self.files.iter().filter(|f| f.kind == kind).collect();
        match matches.as_slice() {
            [file] => Ok(file),
            [] => Err(Error::MissingInput(format!("no {} found", role))),
            _ => Err(Error::ambiguous(
                format!("more than one {}", role),
                matches.iter().map(|f| f.name.clone()).collect(),
            )),
        }
    }
}

fn is_archive(path: &Path) -> bool {
    let name = path.to_string_lossy();
    name.ends_with(".tar.gz") || name.ends_with(".tgz") || name.ends_with(".tar")
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Find the single subdirectory of `root` that looks like a derived tree
///
/// A candidate holds exactly two headers whose path lengths differ by one
/// (`x.h` and `xm.h`) and whose names do not contain `source_namespace`.
pub fn discover_flat_dir(root: &Path, source_namespace: &str) -> Result<PathBuf> {
    let namespace = source_namespace.to_lowercase();
    let mut candidates = Vec::new();

    let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    for dir in dirs {
        let pattern = dir.join("*.h");
        let headers: Vec<PathBuf> = match glob::glob(&pattern.to_string_lossy()) {
            Ok(paths) => paths.filter_map(|p| p.ok()).collect(),
            Err(_) => continue,
        };
        if headers.len() != 2 {
            continue;
        }

        let lengths: Vec<usize> = headers.iter().map(|h| h.as_os_str().len()).collect();
        let differ_by_one = lengths[0].abs_diff(lengths[1]) == 1;
        let foreign = headers
            .iter()
            .any(|h| h.to_string_lossy().to_lowercase().contains(&namespace));

        if differ_by_one && !foreign {
            debug!("Candidate source directory: {}", dir.display());
            candidates.push(dir);
        }
    }

    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        0 => Err(Error::MissingInput(format!(
            "no directory under {} looks like a derived source tree",
            root.display()
        ))),
        _ => Err(Error::ambiguous(
            "several directories look like derived source trees",
            candidates
                .iter()
                .map(|d| d.display().to_string())
                .collect(),
        )),
    }
}
