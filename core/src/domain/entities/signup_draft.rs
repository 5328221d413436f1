//! Pending registration payload held between "start signup" and account creation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Profile fields submitted with the signup request
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SignupDraftInput {
    pub first_name: String,
    pub last_name: String,
    pub sex: String,
    pub password: String,
}

impl std::fmt::Debug for SignupDraftInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupDraftInput")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("sex", &self.sex)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Stored signup draft.
///
/// `password` is plaintext awaiting account creation; it is never logged and
/// is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SignupDraft {
    pub first_name: String,
    pub last_name: String,
    pub sex: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl SignupDraft {
    /// Build a draft from raw input, trimming profile fields.
    ///
    /// The password is kept verbatim; strength rules belong to the caller.
    pub fn from_input(input: SignupDraftInput, created_at: DateTime<Utc>) -> Result<Self, ValidationError> {
        let first_name = required("first_name", input.first_name.trim())?;
        let last_name = required("last_name", input.last_name.trim())?;
        let sex = required("sex", input.sex.trim())?;
        if input.password.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "password".to_string(),
            });
        }

        Ok(Self {
            first_name,
            last_name,
            sex,
            password: input.password,
            created_at,
        })
    }

    pub fn expires_at(&self, lifetime: Duration) -> DateTime<Utc> {
        self.created_at + lifetime
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>, lifetime: Duration) -> bool {
        now >= self.expires_at(lifetime)
    }
}

impl std::fmt::Debug for SignupDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupDraft")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("sex", &self.sex)
            .field("password", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

fn required(field: &str, value: &str) -> Result<String, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> SignupDraftInput {
        SignupDraftInput {
            first_name: "  Ada ".to_string(),
            last_name: "Lovelace".to_string(),
            sex: " female".to_string(),
            password: " s3cret pass ".to_string(),
        }
    }

    #[test]
    fn test_from_input_trims_profile_fields() {
        let now = Utc::now();
        let draft = SignupDraft::from_input(input(), now).unwrap();

        assert_eq!(draft.first_name, "Ada");
        assert_eq!(draft.sex, "female");
        assert_eq!(draft.password, " s3cret pass ");
        assert_eq!(draft.created_at, now);
    }

    #[test]
    fn test_from_input_requires_fields() {
        let mut missing_name = input();
        missing_name.first_name = "   ".to_string();
        assert_eq!(
            SignupDraft::from_input(missing_name, Utc::now()).unwrap_err(),
            ValidationError::RequiredField {
                field: "first_name".to_string()
            }
        );

        let mut missing_password = input();
        missing_password.password = String::new();
        assert!(matches!(
            SignupDraft::from_input(missing_password, Utc::now()),
            Err(ValidationError::RequiredField { field }) if field == "password"
        ));
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let draft = SignupDraft::from_input(input(), now).unwrap();
        let lifetime = Duration::minutes(30);

        assert!(!draft.is_expired_at(now + Duration::minutes(29), lifetime));
        assert!(draft.is_expired_at(now + Duration::minutes(30), lifetime));
    }

    #[test]
    fn test_debug_redacts_password() {
        let draft = SignupDraft::from_input(input(), Utc::now()).unwrap();
        assert!(!format!("{:?}", draft).contains("s3cret"));
        assert!(!format!("{:?}", input()).contains("s3cret"));
    }

    #[test]
    fn test_input_deserializes_from_json() {
        let input: SignupDraftInput = serde_json::from_str(
            r#"{"first_name":"Ada","last_name":"Lovelace","sex":"female","password":"pw"}"#,
        )
        .unwrap();
        assert_eq!(input.first_name, "Ada");
    }
}
