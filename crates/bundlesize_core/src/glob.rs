//! Restricted glob dialect used by file groups.
//!
//! - `*` matches any run of characters, including `/` (it is not segment-aware)
//! - `?` matches exactly one character
//! - everything else is literal
//!
//! Matching is anchored: the whole path has to match, not a substring.

use log::trace;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Self {
        let mut expr = String::with_capacity(pattern.len() * 2 + 8);
        expr.push_str("(?s)^");
        let mut literal = String::new();
        for c in pattern.chars() {
            match c {
                '*' | '?' => {
                    expr.push_str(&regex::escape(&literal));
                    literal.clear();
                    expr.push_str(if c == '*' { ".*" } else { "." });
                }
                _ => literal.push(c),
            }
        }
        expr.push_str(&regex::escape(&literal));
        expr.push('$');
        trace!("Compiled glob '{}' to regex '{}'", pattern, expr);

        // Every metacharacter is escaped, so the expression is always valid.
        let regex = Regex::new(&expr).expect("escaped glob compiles");
        GlobPattern { source: pattern.to_string(), regex }
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// One-off match of `path` against `pattern`.
pub fn match_glob(pattern: &str, path: &str) -> bool {
    GlobPattern::new(pattern).is_match(path)
}
