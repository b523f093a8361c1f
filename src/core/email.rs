use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use crate::models::UserId;

lazy_static! {
    /// Lowercase local part, optionally split once by `.` or `_`, then `@domain.tld`
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[a-z0-9]+[._]?[a-z0-9]+@\w+\.\w+$").expect("email pattern compiles");
}

/// Outcome of validating a candidate email address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    InvalidSyntax,
    /// Address is already held by the given user
    DuplicateEmail(UserId),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Read access to stored users needed by the uniqueness check
#[async_trait]
pub trait UserLookup: Send + Sync {
    type Error: Send;

    /// Id of the user whose email equals `email` exactly, if any
    async fn find_owner_by_email(&self, email: &str) -> Result<Option<UserId>, Self::Error>;
}

/// Pattern check only, no storage access
#[inline]
pub fn is_valid_syntax(candidate: &str) -> bool {
    EMAIL_PATTERN.is_match(candidate)
}

/// Classify a candidate address as valid, malformed, or already in use
///
/// The uniqueness lookup only runs once the syntax check passes. Matching
/// is exact and case-sensitive.
pub async fn validate_email<L>(candidate: &str, lookup: &L) -> Result<ValidationResult, L::Error>
where
    L: UserLookup + ?Sized,
{
    if !is_valid_syntax(candidate) {
        return Ok(ValidationResult::InvalidSyntax);
    }

    match lookup.find_owner_by_email(candidate).await? {
        Some(owner) => Ok(ValidationResult::DuplicateEmail(owner)),
        None => Ok(ValidationResult::Valid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::convert::Infallible;

    struct Owners(HashMap<String, UserId>);

    #[async_trait]
    impl UserLookup for Owners {
        type Error = Infallible;

        async fn find_owner_by_email(&self, email: &str) -> Result<Option<UserId>, Infallible> {
            Ok(self.0.get(email).copied())
        }
    }

    fn owners() -> Owners {
        Owners(HashMap::from([("rohan@example.com".to_string(), 5)]))
    }

    #[test]
    fn test_syntax_accepts_common_forms() {
        assert!(is_valid_syntax("valid@example.com"));
        assert!(is_valid_syntax("first.last@example.com"));
        assert!(is_valid_syntax("first_last@mail.org"));
        assert!(is_valid_syntax("user42@host_name.io"));
    }

    #[test]
    fn test_syntax_rejects_malformed() {
        for bad in [
            "invalidexamplecom",
            "a@example.com",
            "Upper@example.com",
            "two..dots@example.com",
            "a.b.c@example.com",
            "user@example",
            "user@sub.example.com",
            " user@example.com",
            "user@example.com ",
            "user@example.com\n",
            "",
        ] {
            assert!(!is_valid_syntax(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_invalid_syntax_skips_lookup() {
        let mut taken = owners();
        taken.0.insert("invalidexamplecom".to_string(), 9);

        let result = tokio_test::block_on(validate_email("invalidexamplecom", &taken)).unwrap();
        assert_eq!(result, ValidationResult::InvalidSyntax);
    }

    #[test]
    fn test_duplicate_reports_owner() {
        let result = tokio_test::block_on(validate_email("rohan@example.com", &owners())).unwrap();
        assert_eq!(result, ValidationResult::DuplicateEmail(5));
        assert!(!result.is_valid());
    }

    #[test]
    fn test_unused_address_is_valid() {
        let result = tokio_test::block_on(validate_email("valid@example.com", &owners())).unwrap();
        assert_eq!(result, ValidationResult::Valid);
    }
}
