use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating report identifiers
    /// Uppercase prefix, four digit year, then a sequence of at least three digits
    /// - Valid: "CR-2025-001", "CR-2025-1042", "RPT-2024-0000001"
    /// - Invalid: "cr-2025-001", "CR-25-001", "CR-2025-01", "CR2025001"
    pub static ref REPORT_ID_REGEX: Regex = Regex::new(r"^[A-Z]{2,4}-\d{4}-\d{3,}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_id_regex_valid() {
        assert!(REPORT_ID_REGEX.is_match("CR-2025-001"));
        assert!(REPORT_ID_REGEX.is_match("CR-2025-1042"));
        assert!(REPORT_ID_REGEX.is_match("RPT-2024-0000001"));
    }

    #[test]
    fn test_report_id_regex_invalid() {
        assert!(!REPORT_ID_REGEX.is_match("cr-2025-001")); // lowercase prefix
        assert!(!REPORT_ID_REGEX.is_match("CR-25-001")); // short year
        assert!(!REPORT_ID_REGEX.is_match("CR-2025-01")); // short sequence
        assert!(!REPORT_ID_REGEX.is_match("CR2025001")); // no separators
        assert!(!REPORT_ID_REGEX.is_match("")); // empty
        assert!(!REPORT_ID_REGEX.is_match("CR-2025-001 ")); // trailing space
    }
}
