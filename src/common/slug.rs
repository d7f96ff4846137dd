/// URL slug in the style used for strain, assay, cohort and veterinary
/// lookups: ASCII letters and digits lowercased, runs of whitespace,
/// hyphens and underscores collapsed to one hyphen, everything else dropped.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_hyphen = false;

    for c in value.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_hyphen = true;
        }
    }

    slug
}

/// Slug to store on save: the explicit one when given, else derived from `name`.
pub fn slug_or_name(slug: Option<&str>, name: &str) -> String {
    match slug.map(str::trim) {
        Some(explicit) if !explicit.is_empty() => slugify(explicit),
        _ => slugify(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("C57BL/6", "c57bl6")]
    #[case("Ob/Ob  Knockout", "obob-knockout")]
    #[case("  Body Weight ", "body-weight")]
    #[case("Leptin-Deficient__Line", "leptin-deficient-line")]
    #[case("Glucose (fasted)", "glucose-fasted")]
    #[case("", "")]
    fn test_slugify(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[test]
    fn test_slug_or_name_prefers_explicit_slug() {
        assert_eq!(slug_or_name(Some("ob-ob"), "Leptin Knockout"), "ob-ob");
        assert_eq!(slug_or_name(Some("  "), "Leptin Knockout"), "leptin-knockout");
        assert_eq!(slug_or_name(None, "Leptin Knockout"), "leptin-knockout");
    }
}
