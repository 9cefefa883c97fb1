pub mod profile;
pub mod vehicle;

/// Lowercases a free-form tag and collapses `_`, `-`, `/` and whitespace runs
/// into single spaces so `Royal-Enfield` and `royal enfield` compare equal.
pub fn normalize_tag(value: &str) -> String {
    value
        .to_ascii_lowercase()
        .replace(['_', '-', '/'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::normalize_tag;

    #[test]
    fn normalize_tag_folds_case_and_separators() {
        assert_eq!(normalize_tag("Royal-Enfield"), "royal enfield");
        assert_eq!(normalize_tag("  royal   enfield "), "royal enfield");
        assert_eq!(normalize_tag("disc_brake/ABS"), "disc brake abs");
        assert_eq!(normalize_tag(""), "");
    }
}
