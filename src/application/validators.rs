/// Trims and lowercases an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal syntactic check applied to an already normalized address:
/// non-empty and containing both `@` and `.`.
pub fn is_valid_email(normalized: &str) -> bool {
    !normalized.is_empty() && normalized.contains('@') && normalized.contains('.')
}

/// Normalizes an optional referrer code. Blank codes count as absent.
pub fn normalize_referrer(referrer: Option<&str>) -> Option<String> {
    referrer
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@B.com "), "a@b.com");
        assert_eq!(normalize_email("User.Name@Example.ORG"), "user.name@example.org");
    }

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("user.name@domain.co.uk"));
        assert!(is_valid_email("user+tag@example.org"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing-dot@localhost"));
        assert!(!is_valid_email("missing.at.example.com"));
    }

    #[test]
    fn test_whitespace_only_email_is_invalid_after_normalizing() {
        assert!(!is_valid_email(&normalize_email("   ")));
    }

    #[test]
    fn test_normalize_referrer() {
        assert_eq!(normalize_referrer(None), None);
        assert_eq!(normalize_referrer(Some("")), None);
        assert_eq!(normalize_referrer(Some("   ")), None);
        assert_eq!(normalize_referrer(Some(" ABCD2345 ")), Some("ABCD2345".into()));
    }
}
