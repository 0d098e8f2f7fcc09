//! Identifier validation shared by every request

use crate::error::{Result, TfeError};

/// Check that a user-supplied identifier is safe to place in a URL path
///
/// Accepts non-empty values made of ASCII letters, digits, `-`, `_` and `.`.
/// Organization names, workspace names and resource IDs all fit this set.
pub fn valid_string_id(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Validate an identifier, naming the field on failure
pub fn validate_id(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(TfeError::invalid(field, "is required"));
    }
    if !valid_string_id(value) {
        return Err(TfeError::invalid(
            field,
            format!(
                "'{}' may only contain letters, digits, '-', '_' and '.'",
                value
            ),
        ));
    }
    // "." and ".." would be collapsed by URL normalisation
    if value.chars().all(|c| c == '.') {
        return Err(TfeError::invalid(field, format!("'{}' is not a valid identifier", value)));
    }
    Ok(())
}

/// Validate and percent-escape an identifier path segment
pub fn escape_id(field: &str, value: &str) -> Result<String> {
    validate_id(field, value)?;
    Ok(urlencoding::encode(value).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_valid_ids() {
        for id in ["acme", "ws-abc123", "my_org.prod", "A1"] {
            assert!(valid_string_id(id), "{} should be valid", id);
        }
    }

    #[test]
    fn test_invalid_ids() {
        for id in ["", "bad id", "a/b", "org?x", "name%20", "ünï", "a#b"] {
            assert!(!valid_string_id(id), "{:?} should be invalid", id);
        }
    }

    #[test]
    fn test_validate_names_field() {
        let err = validate_id("workspace", "bad id").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.field(), Some("workspace"));
    }

    #[test]
    fn test_validate_empty_is_required() {
        let err = validate_id("organization", "").unwrap_err();
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn test_dot_segments_rejected() {
        assert!(validate_id("organization", "..").is_err());
        assert!(validate_id("organization", ".").is_err());
        assert!(validate_id("organization", "a.b").is_ok());
    }

    #[test]
    fn test_escape_id_passthrough() {
        assert_eq!(escape_id("run", "run-abc.1_x").unwrap(), "run-abc.1_x");
    }
}
