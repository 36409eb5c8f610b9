// src/rewrite/ident.rs

//! Identifier rewriting
//!
//! Plain literal substitution of the source distribution's tokens:
//! - the internal function prefix (`iau` in `iauCal2jd`)
//! - the library namespace, upper and lower case (`SOFA`, `sofa`)
//! - the spaced forms of both (`i a u`, `s o f a`) found in banner art
//!
//! Spaced forms are only ever rewritten through a [`OneShot`], because after
//! the first hit any further spaced match is unrelated banner art.

/// Token mapping from the source distribution to the derived library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRule {
    source_prefix: String,
    target_prefix: String,
    source_namespace: String,
    target_namespace: String,
}

/// Separate every character of `token` with a single space
pub fn spaced(token: &str) -> String {
    let chars: Vec<String> = token.chars().map(String::from).collect();
    chars.join(" ")
}

impl RenameRule {
    pub fn new(
        source_prefix: &str,
        target_prefix: &str,
        source_namespace: &str,
        target_namespace: &str,
    ) -> Self {
        Self {
            source_prefix: source_prefix.to_string(),
            target_prefix: target_prefix.to_string(),
            source_namespace: source_namespace.to_lowercase(),
            target_namespace: target_namespace.to_lowercase(),
        }
    }

    pub fn source_prefix(&self) -> &str {
        &self.source_prefix
    }

    pub fn target_prefix(&self) -> &str {
        &self.target_prefix
    }

    pub fn source_namespace(&self) -> &str {
        &self.source_namespace
    }

    pub fn target_namespace(&self) -> &str {
        &self.target_namespace
    }

    /// Replace the internal function prefix
    pub fn rewrite_prefix(&self, line: &str) -> String {
        line.replace(&self.source_prefix, &self.target_prefix)
    }

    /// Replace the upper- and lower-case namespace tokens
    pub fn rewrite_namespace(&self, line: &str) -> String {
        line.replace(
            &self.source_namespace.to_uppercase(),
            &self.target_namespace.to_uppercase(),
        )
        .replace(&self.source_namespace, &self.target_namespace)
    }

    /// Prefix, then namespace
    pub fn rewrite_all(&self, line: &str) -> String {
        self.rewrite_namespace(&self.rewrite_prefix(line))
    }

    /// Renames a filename, e.g. `t_sofa_c.c` to `t_erfa_c.c`
    pub fn rename_file(&self, name: &str) -> String {
        name.replace(&self.source_namespace, &self.target_namespace)
    }

    /// One-shot rewrite of the spaced prefix (`i a u` to `e r a`)
    pub fn spaced_prefix_once(&self) -> OneShot {
        OneShot::new(spaced(&self.source_prefix), spaced(&self.target_prefix))
    }

    /// One-shot rewrite of the spaced namespace (`s o f a` to `e r f a`)
    pub fn spaced_namespace_once(&self) -> OneShot {
        OneShot::new(
            spaced(&self.source_namespace),
            spaced(&self.target_namespace),
        )
    }
}

/// A substitution that fires on the first matching line only
///
/// Each transformer run owns its own instances, so the flag is per file.
#[derive(Debug, Clone)]
pub struct OneShot {
    pattern: String,
    replacement: String,
    fired: bool,
}

impl OneShot {
    pub fn new(pattern: String, replacement: String) -> Self {
        Self {
            pattern,
            replacement,
            fired: false,
        }
    }

    /// Rewrite `line` if this is the first line containing the pattern
    pub fn apply(&mut self, line: &str) -> Option<String> {
        if self.fired || self.pattern.is_empty() || !line.contains(&self.pattern) {
            return None;
        }
        self.fired = true;
        Some(line.replacen(&self.pattern, &self.replacement, 1))
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> RenameRule {
        RenameRule::new("iau", "era", "sofa", "erfa")
    }

    #[test]
    fn test_spaced() {
        assert_eq!(spaced("iau"), "i a u");
        assert_eq!(spaced(""), "");
    }

    #[test]
    fn test_prefix_and_namespace() {
        let rule = rule();
        assert_eq!(rule.rewrite_prefix("int iauCal2jd(int iy)"), "int eraCal2jd(int iy)");
        assert_eq!(rule.rewrite_namespace("#include \"sofam.h\""), "#include \"erfam.h\"");
        assert_eq!(rule.rewrite_namespace("#ifndef SOFAHDEF"), "#ifndef ERFAHDEF");
        assert_eq!(
            rule.rewrite_all("   iauA2af(SOFA, sofa);"),
            "   eraA2af(ERFA, erfa);"
        );
    }

    #[test]
    fn test_compact_rename_leaves_spaced_banner_alone() {
        let rule = rule();
        assert_eq!(rule.rewrite_all("**   i a u C a l 2 j d"), "**   i a u C a l 2 j d");
    }

    #[test]
    fn test_one_shot_banner_rename() {
        let rule = rule();
        let mut banner = rule.spaced_prefix_once();

        let first = banner.apply("**   i a u C a l 2 j d");
        let second = banner.apply("**   i a u C a l 2 j d");

        assert_eq!(first.as_deref(), Some("**   e r a C a l 2 j d"));
        assert_eq!(second, None);
        assert!(banner.has_fired());
    }

    #[test]
    fn test_one_shot_ignores_non_matching_lines() {
        let mut banner = rule().spaced_namespace_once();
        assert_eq!(banner.apply("**  - - - - - - -"), None);
        assert!(!banner.has_fired());
        assert_eq!(
            banner.apply("**   s o f a . h").as_deref(),
            Some("**   e r f a . h")
        );
    }

    #[test]
    fn test_rename_file() {
        let rule = rule();
        assert_eq!(rule.rename_file("t_sofa_c.c"), "t_erfa_c.c");
        assert_eq!(rule.rename_file("cal2jd.c"), "cal2jd.c");
    }
}
