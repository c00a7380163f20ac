//! Route pattern compilation and matching.
//!
//! # Responsibilities
//! - Exact-match fast path for static routes and the `*` catch-all
//! - Alias substitution and regex compilation for parameterized routes
//! - Positional capture extraction
//!
//! # Design Decisions
//! - The fast path runs before any regex work, so static routes never pay
//!   for compilation
//! - Substitution is a single left-to-right pass: replacements are never
//!   re-scanned, and needles are tried in table order at each position
//! - Literal regex metacharacters outside an alias are passed through
//!   verbatim; pattern correctness is the route author's responsibility
//! - "No match" is `None`, distinct from a match with zero parameters

use regex::RegexBuilder;

use crate::error::Error;
use crate::routing::alias::AliasTable;

/// Match `pattern` against `path`, returning the extracted positional
/// parameters on success.
///
/// Capture groups come back in left-to-right order; a group that did not
/// participate in the match contributes an empty string at its position so
/// positional binding to the target's parameter list stays stable.
pub(crate) fn match_pattern(
    pattern: &str,
    path: &str,
    aliases: &AliasTable,
) -> Result<Option<Vec<String>>, Error> {
    // Static routes and the catch-all match without compilation.
    if pattern == path || pattern == "*" {
        return Ok(Some(Vec::new()));
    }

    let expr = substitute(pattern, aliases);
    let regex = RegexBuilder::new(&format!("^{expr}$"))
        .case_insensitive(true)
        .build()
        .map_err(|source| Error::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

    match regex.captures(path) {
        Some(caps) => {
            let params = (1..caps.len())
                .map(|i| caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect();
            Ok(Some(params))
        }
        None => Ok(None),
    }
}

/// Substitute aliases into a pattern in one left-to-right pass.
///
/// At each position the table's needles are tried in insertion order and
/// the first hit is emitted; scanning resumes after the consumed needle,
/// so replacements are never themselves substituted.
fn substitute(pattern: &str, aliases: &AliasTable) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    'scan: while !rest.is_empty() {
        for (needle, replacement) in aliases.iter() {
            if let Some(tail) = rest.strip_prefix(needle) {
                out.push_str(replacement);
                rest = tail;
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
        }
        rest = chars.as_str();
    }

    out
}
