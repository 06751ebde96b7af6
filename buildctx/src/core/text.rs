//! String comparison rules shared by trust evaluation and tag detection.
//!
//! Provider metadata arrives with unpredictable casing and padding. Every
//! comparison against it goes through this module so the rules stay identical
//! everywhere: ordinal, case-insensitive, never locale-aware.

/// Case-insensitive ordinal equality.
///
/// Characters are folded one by one to their uppercase form, so the result
/// does not depend on the host locale. A character whose uppercase form spans
/// several characters (`ß` → `SS`) is left as is.
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    if left.is_ascii() && right.is_ascii() {
        return left.eq_ignore_ascii_case(right);
    }
    left.chars().map(fold).eq(right.chars().map(fold))
}

fn fold(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}

/// Case-insensitive equality where a missing value never matches.
pub fn matches_ignore_case(value: Option<&str>, expected: &str) -> bool {
    value.is_some_and(|value| eq_ignore_case(value, expected))
}

/// True when the value is absent, empty, or whitespace only.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|value| value.trim().is_empty())
}

/// Trim a value, mapping empty/whitespace-only input to `None`.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_ignore_case_folds_ascii() {
        assert!(eq_ignore_case("Octokit/Octokit.Net", "octokit/octokit.net"));
        assert!(eq_ignore_case("MASTER", "master"));
        assert!(!eq_ignore_case("master ", "master"));
        assert!(!eq_ignore_case("main", "master"));
    }

    #[test]
    fn eq_ignore_case_folds_non_ascii() {
        assert!(eq_ignore_case("ÉTÉ", "été"));
        assert!(!eq_ignore_case("ete", "été"));
    }

    #[test]
    fn eq_ignore_case_never_expands_characters() {
        assert!(!eq_ignore_case("straße", "STRASSE"));
        assert!(eq_ignore_case("Straße", "STRAße"));
    }

    #[test]
    fn matches_ignore_case_rejects_missing() {
        assert!(!matches_ignore_case(None, "master"));
        assert!(matches_ignore_case(Some("Master"), "master"));
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some(" \t\n")));
        assert!(!is_blank(Some(" v1 ")));
        assert_eq!(non_blank(Some("  v1.2.3 ")), Some("v1.2.3"));
        assert_eq!(non_blank(Some("   ")), None);
    }
}
