//! Alias table for route patterns.
//!
//! Aliases let route authors write `:num` instead of `[0-9]+`. The table is
//! an insertion-ordered list of `(needle, replacement)` pairs consumed by
//! the pattern compiler in definition order.

/// Insertion-ordered mapping from pattern needles to regex fragments.
///
/// Positions 0 and 1 are always the seeded base pair: `*` → `.*` and
/// `/` → `\/`. User aliases are appended after them and wrapped in a
/// capture group, so every alias contributes one positional parameter.
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self {
            entries: vec![("*".to_string(), ".*".to_string()), ("/".to_string(), "\\/".to_string())],
        }
    }

    /// Append an alias. A leading colon on `needle` is optional; the stored
    /// needle always carries exactly one. The fragment is wrapped in `(...)`
    /// so matches are captured positionally.
    ///
    /// Duplicate needles are allowed; the compiler tries entries in
    /// insertion order, so the first definition wins.
    pub fn define(&mut self, needle: &str, fragment: &str) {
        let needle = format!(":{}", needle.trim_start_matches(':'));
        self.entries.push((needle, format!("({fragment})")));
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::new()
    }
}
