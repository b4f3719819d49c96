//! Wildcard pattern matching shared by scope checks.
//!
//! A pattern is one of:
//! - `*` — matches anything, including the empty string.
//! - an exact string — matches only itself.
//! - `prefix:*` — matches `prefix:` and anything starting with it, but not
//!   the bare `prefix` (no colon).

/// Returns true if `pattern` matches `value` under the three-way rule above.
pub fn matches(pattern: &str, value: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix("*") {
        if let Some(stripped_prefix) = prefix.strip_suffix(':') {
            return value == prefix || value.starts_with(&format!("{stripped_prefix}:"));
        }
        return value.starts_with(prefix);
    }
    pattern == value
}

/// Returns true if any pattern in `patterns` matches `value`.
pub fn any_matches<'a>(patterns: impl IntoIterator<Item = &'a str>, value: &str) -> bool {
    patterns.into_iter().any(|p| matches(p, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_matches_anything_including_empty() {
        assert!(matches("*", "payment:transfer"));
        assert!(matches("*", ""));
    }

    #[test]
    fn exact_pattern_matches_only_itself() {
        assert!(matches("read_file", "read_file"));
        assert!(!matches("read_file", "write_file"));
    }

    #[test]
    fn prefix_wildcard_matches_colon_prefixed_values() {
        assert!(matches("payment:*", "payment:transfer"));
        assert!(matches("payment:*", "payment:refund"));
        assert!(matches("a:*", "a:"));
        assert!(matches("a:*", "a:x"));
    }

    #[test]
    fn prefix_wildcard_does_not_match_bare_prefix_without_colon() {
        assert!(!matches("a:*", "a"));
    }

    #[test]
    fn prefix_wildcard_does_not_match_unrelated_prefix() {
        assert!(!matches("payment:*", "payments:x"));
    }

    #[test]
    fn any_matches_checks_all_patterns() {
        let patterns = vec!["read_file", "write_file"];
        assert!(any_matches(patterns.iter().copied(), "write_file"));
        assert!(!any_matches(patterns.iter().copied(), "delete_file"));
    }
}
