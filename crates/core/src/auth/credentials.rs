//! Strict parsing of inbound login payloads.
//!
//! Login payloads arrive as loosely-typed external input. Everything that
//! reaches the credential service must first pass through this parse step;
//! anything structurally invalid is rejected here with a validation error
//! and never touches the user store.

use serde_json::Value;
use thiserror::Error;

/// Errors produced while parsing a login payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// The payload was not a JSON object.
    #[error("login payload must be a JSON object")]
    NotAnObject,

    /// A required field was missing, not a string, or empty.
    #[error("missing or empty credential field: {0}")]
    MissingField(&'static str),
}

impl From<CredentialError> for flutr_shared::AppError {
    fn from(err: CredentialError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// A structurally validated credential pair.
///
/// Construction is only possible through [`Credentials::parse`], so holding
/// a value of this type means both fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login email, trimmed of surrounding whitespace.
    pub email: String,
    /// Presented password, verbatim (passwords may contain spaces).
    pub password: String,
}

impl Credentials {
    /// Parses a loosely-typed login payload into validated credentials.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::NotAnObject` if the payload is not an
    /// object, and `CredentialError::MissingField` if either field is
    /// absent, not a string, or empty.
    pub fn parse(payload: &Value) -> Result<Self, CredentialError> {
        let obj = payload.as_object().ok_or(CredentialError::NotAnObject)?;

        let email = obj
            .get("email")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(CredentialError::MissingField("email"))?;

        let password = obj
            .get("password")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(CredentialError::MissingField("password"))?;

        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_payload() {
        let creds = Credentials::parse(&json!({
            "email": "staff@butterflyhouse.org",
            "password": "hunter2!"
        }))
        .unwrap();

        assert_eq!(creds.email, "staff@butterflyhouse.org");
        assert_eq!(creds.password, "hunter2!");
    }

    #[test]
    fn test_parse_trims_email_but_not_password() {
        let creds = Credentials::parse(&json!({
            "email": "  staff@butterflyhouse.org  ",
            "password": " spaced password "
        }))
        .unwrap();

        assert_eq!(creds.email, "staff@butterflyhouse.org");
        assert_eq!(creds.password, " spaced password ");
    }

    #[test]
    fn test_parse_rejects_missing_email() {
        let err = Credentials::parse(&json!({ "password": "x" })).unwrap_err();
        assert_eq!(err, CredentialError::MissingField("email"));
    }

    #[test]
    fn test_parse_rejects_empty_password() {
        let err = Credentials::parse(&json!({
            "email": "staff@butterflyhouse.org",
            "password": ""
        }))
        .unwrap_err();
        assert_eq!(err, CredentialError::MissingField("password"));
    }

    #[test]
    fn test_parse_rejects_blank_email() {
        let err = Credentials::parse(&json!({ "email": "   ", "password": "x" })).unwrap_err();
        assert_eq!(err, CredentialError::MissingField("email"));
    }

    #[test]
    fn test_parse_rejects_non_string_fields() {
        let err = Credentials::parse(&json!({ "email": 42, "password": "x" })).unwrap_err();
        assert_eq!(err, CredentialError::MissingField("email"));

        let err = Credentials::parse(&json!({
            "email": "staff@butterflyhouse.org",
            "password": {"nested": true}
        }))
        .unwrap_err();
        assert_eq!(err, CredentialError::MissingField("password"));
    }

    #[test]
    fn test_parse_rejects_non_object_payloads() {
        assert_eq!(
            Credentials::parse(&json!("just a string")).unwrap_err(),
            CredentialError::NotAnObject
        );
        assert_eq!(
            Credentials::parse(&json!(null)).unwrap_err(),
            CredentialError::NotAnObject
        );
        assert_eq!(
            Credentials::parse(&json!(["email", "password"])).unwrap_err(),
            CredentialError::NotAnObject
        );
    }
}
