// src/rewrite/region.rs

//! Region extraction: split a file into its body and trailing license block
//!
//! The license block starts at the license-boundary marker, a horizontal-rule
//! comment line, and runs to the end of the file. A file without the marker
//! is all body.

/// The two regions of a source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Regions {
    pub body: Vec<String>,
    /// Boundary line and everything after it (empty when no marker)
    pub license: Vec<String>,
}

impl Regions {
    pub fn has_license(&self) -> bool {
        !self.license.is_empty()
    }
}

/// Split `lines` at the first line starting with `marker`
pub fn split_regions(lines: &[String], marker: &str) -> Regions {
    let mut regions = Regions::default();
    let mut in_license = false;

    for line in lines {
        if !in_license && line.starts_with(marker) {
            in_license = true;
        }
        if in_license {
            regions.license.push(line.clone());
        } else {
            regions.body.push(line.clone());
        }
    }

    regions
}

/// Split like [`split_regions`], dropping `#include` lines from the body
///
/// A blank (or bare `**`) line directly after an include run is dropped as
/// well, and a single blank line stands in for the boundary in the body.
/// Used when flattening an already-derived tree, where includes between the
/// merged files no longer resolve.
pub fn extract_content(lines: &[String], marker: &str) -> Regions {
    let mut regions = Regions::default();
    let mut in_license = false;
    let mut after_include = false;

    for line in lines {
        if in_license {
            regions.license.push(line.clone());
        } else if line.starts_with("#include") {
            after_include = true;
        } else if after_include && matches!(line.trim(), "" | "**") {
            after_include = false;
        } else if line.starts_with(marker) {
            regions.body.push(String::new());
            regions.license.push(line.clone());
            in_license = true;
        } else {
            regions.body.push(line.clone());
            after_include = false;
        }
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "/*------";

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    #[test]
    fn test_split_reconstitutes_line_count() {
        let input = lines("int f(void)\n{\n   return 0;\n/*------------\n**  Copyright\n*/\n}");
        let regions = split_regions(&input, MARKER);

        assert_eq!(regions.body.len() + regions.license.len(), input.len());
        assert_eq!(regions.body.len(), 3);
        assert_eq!(regions.license[0], "/*------------");
        assert_eq!(regions.license.last().map(String::as_str), Some("}"));
    }

    #[test]
    fn test_split_flips_once() {
        let input = lines("a\n/*------ one\nb\n/*------ two\nc");
        let regions = split_regions(&input, MARKER);

        assert_eq!(regions.body, vec!["a"]);
        assert_eq!(regions.license.len(), 4);
    }

    #[test]
    fn test_missing_marker_is_all_body() {
        let input = lines("a\nb\nc");
        let regions = split_regions(&input, MARKER);

        assert_eq!(regions.body, input);
        assert!(!regions.has_license());
    }

    #[test]
    fn test_marker_must_start_the_line() {
        let input = lines("a\n   /*------ indented\nb");
        let regions = split_regions(&input, MARKER);
        assert!(!regions.has_license());
    }

    #[test]
    fn test_extract_content_drops_includes() {
        let input = lines(
            "#include \"erfa.h\"\n#include \"erfam.h\"\n\nint eraF(void)\n{\n}\n/*------\n**  License\n",
        );
        let regions = extract_content(&input, MARKER);

        assert_eq!(regions.body, vec!["int eraF(void)", "{", "}", ""]);
        assert_eq!(regions.license, vec!["/*------", "**  License"]);
    }

    #[test]
    fn test_extract_content_keeps_unrelated_blank_lines() {
        let input = lines("#include <math.h>\n**\nint x;\n\nint y;");
        let regions = extract_content(&input, MARKER);

        assert_eq!(regions.body, vec!["int x;", "", "int y;"]);
        assert!(!regions.has_license());
    }
}
