use std::sync::LazyLock;

use regex::Regex;

/// Longest field value, in characters, that is still believed to be a title or company.
pub const FIELD_LENGTH_LIMIT: usize = 140;

static STYLE_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{.*:.*;").expect("style rule pattern"));

static JOB_POST_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*-+\s*job post\s*$").expect("job post suffix pattern"));

/// Separators that introduce ratings or other annotations after a company name.
const COMPANY_META_SEPARATORS: &[char] = &['·', '•'];

/// Collapses whitespace runs to one space and trims both ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn looks_like_style_rule(s: &str) -> bool {
    STYLE_RULE.is_match(s)
}

/// Text-level part of the field validity predicate. Rendering is checked by the caller.
pub fn passes_field_checks(raw: &str) -> bool {
    let normalized = normalize_whitespace(raw);
    !normalized.is_empty()
        && normalized.chars().count() <= FIELD_LENGTH_LIMIT
        && !looks_like_style_rule(&normalized)
}

pub fn clean_title(raw: &str) -> String {
    let normalized = normalize_whitespace(raw);
    normalize_whitespace(&JOB_POST_SUFFIX.replace(&normalized, ""))
}

/// Keeps the first line, up to the first rating/meta separator.
pub fn clean_company(raw: &str) -> String {
    let first_line = raw.trim_start().lines().next().unwrap_or_default();
    let name = first_line
        .split(COMPANY_META_SEPARATORS)
        .next()
        .unwrap_or_default();
    normalize_whitespace(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_collapsed_and_trimmed() {
        assert_eq!(normalize_whitespace("  Senior \n\t Engineer  "), "Senior Engineer");
        assert_eq!(normalize_whitespace(" \n "), "");
    }

    #[test]
    fn suffix_match_is_case_insensitive() {
        assert_eq!(clean_title("Nurse -- Job Post"), "Nurse");
        assert_eq!(clean_title("Post-job posting"), "Post-job posting");
    }

    #[test]
    fn company_without_annotations_is_kept() {
        assert_eq!(clean_company("  Acme Corp  "), "Acme Corp");
        assert_eq!(clean_company("Acme • Remote"), "Acme");
    }
}
