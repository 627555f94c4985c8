//! Required-field checks.
//!
//! Format rules (email shape, date ranges, lengths) belong to the caller. The services only
//! refuse blank values for required strings, both on create and when an update supplies one.

use crate::error::ServiceError;

/// Fails when `value` is empty or whitespace.
pub fn require(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

/// Like [`require`], but `None` (field not being changed) passes.
pub fn require_if_present(field: &str, value: Option<&str>) -> Result<(), ServiceError> {
    match value {
        Some(value) => require(field, value),
        None => Ok(()),
    }
}

/// Trim a supplied value, turning a blank one into `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert!(require("name", "Ana").is_ok());
        assert_eq!(
            require("name", "  "),
            Err(ServiceError::Validation("name must not be blank".into()))
        );
    }

    #[test]
    fn test_require_if_present() {
        assert!(require_if_present("email", None).is_ok());
        assert!(require_if_present("email", Some("")).is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  x ".into())), Some("x".into()));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }
}
