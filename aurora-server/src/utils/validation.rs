//! Input validation helpers
//!
//! Payload structs derive [`validator::Validate`] with the user-facing message
//! on each rule. This module flattens a [`ValidationErrors`] tree into the
//! `errors` list of the response envelope and holds the checks the derive
//! attributes cannot express.

use std::borrow::Cow;

use shared::{AppError, AppResult};
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Flatten nested validation errors into human-readable messages
///
/// Messages are ordered by field path so responses are stable.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut out: Vec<(String, String)> = Vec::new();
    collect(errors, "", &mut out);
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out.into_iter().map(|(_, msg)| msg).collect()
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let msg = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{path} is invalid"));
                    out.push((path.clone(), msg));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    collect(inner, &format!("{path}[{idx}]"), out);
                }
            }
        }
    }
}

/// Run derive-based validation and convert failures into a 400 error
pub fn validate_payload<T: Validate>(payload: &T) -> AppResult<()> {
    payload
        .validate()
        .map_err(|e| AppError::validation_errors(validation_messages(&e)))
}

/// Merge derive-based failures with additional messages
pub fn validate_with<T: Validate>(payload: &T, extra: Vec<String>) -> AppResult<()> {
    let mut messages = match payload.validate() {
        Ok(()) => Vec::new(),
        Err(e) => validation_messages(&e),
    };
    messages.extend(extra);
    if messages.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation_errors(messages))
    }
}

/// Trim in place; blank becomes `None`
pub fn clean(value: &mut Option<String>) {
    if let Some(v) = value.take() {
        let trimmed = v.trim();
        if !trimmed.is_empty() {
            *value = Some(trimmed.to_string());
        }
    }
}

/// Trim in place, keeping an explicit blank as `Some("")`
pub fn trim(value: &mut Option<String>) {
    if let Some(v) = value.as_mut() {
        let trimmed = v.trim();
        if trimmed.len() != v.len() {
            *v = trimmed.to_string();
        }
    }
}

/// A required field that was supplied but left blank
pub fn require_non_blank(value: &Option<String>, message: &str, errors: &mut Vec<String>) {
    if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
        errors.push(message.to_string());
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Email format check; an empty string clears the address and passes
pub fn email_or_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(invalid("email", "Please enter a valid email"))
    }
}

/// Inventory count bounds with distinct messages per bound
pub fn item_count(value: i64) -> Result<(), ValidationError> {
    if value < 1 {
        Err(invalid("count", "Count must be at least 1"))
    } else if value > 1000 {
        Err(invalid("count", "Count cannot exceed 1000"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Form {
        #[validate(required(message = "Name is required"), length(max = 5, message = "Name too long"))]
        name: Option<String>,
        #[validate(custom(function = "email_or_empty"))]
        email: Option<String>,
        #[validate(nested)]
        rows: Vec<Row>,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Row {
        #[validate(range(min = 0.0, message = "Value cannot be negative"))]
        value: f64,
    }

    #[test]
    fn test_messages_are_flattened_and_ordered() {
        let form = Form {
            name: None,
            email: Some("not-an-email".into()),
            rows: vec![Row { value: 1.0 }, Row { value: -1.0 }],
        };
        let err = validate_payload(&form).unwrap_err();
        assert_eq!(
            err.errors,
            vec![
                "Please enter a valid email",
                "Name is required",
                "Value cannot be negative"
            ]
        );
    }

    #[test]
    fn test_valid_payload_passes() {
        let form = Form {
            name: Some("Ann".into()),
            email: Some(String::new()),
            rows: vec![],
        };
        assert!(validate_payload(&form).is_ok());
    }

    #[test]
    fn test_validate_with_extra_messages() {
        let form = Form {
            name: Some("Ann".into()),
            email: None,
            rows: vec![],
        };
        let err = validate_with(&form, vec!["Phone number is required".into()]).unwrap_err();
        assert_eq!(err.errors, vec!["Phone number is required"]);
        assert!(validate_with(&form, vec![]).is_ok());
    }

    #[test]
    fn test_clean_and_trim() {
        let mut v = Some("  12B ".to_string());
        clean(&mut v);
        assert_eq!(v.as_deref(), Some("12B"));

        let mut v = Some("   ".to_string());
        clean(&mut v);
        assert_eq!(v, None);

        let mut v = Some("   ".to_string());
        trim(&mut v);
        assert_eq!(v.as_deref(), Some(""));

        let mut errors = Vec::new();
        require_non_blank(&v, "Tenant name is required", &mut errors);
        require_non_blank(&None, "unused", &mut errors);
        assert_eq!(errors, vec!["Tenant name is required"]);
    }

    #[test]
    fn test_item_count_bounds() {
        assert!(item_count(1).is_ok());
        assert!(item_count(1000).is_ok());
        assert_eq!(
            item_count(0).unwrap_err().message.unwrap(),
            "Count must be at least 1"
        );
        assert_eq!(
            item_count(1001).unwrap_err().message.unwrap(),
            "Count cannot exceed 1000"
        );
    }
}
