//! User aggregate and the value types guarding its invariants.
//!
//! Inbound payload parsing stays outside the domain: handlers construct
//! [`EmailAddress`] and friends before talking to a service, so every
//! repository sees normalized data.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned when parsing an [`EmailAddress`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailValidationError {
    /// Input was empty once trimmed.
    #[error("email must not be empty")]
    Empty,
    /// Input does not look like an address at all.
    #[error("email must contain an '@' separator")]
    MissingSeparator,
}

/// Normalized e-mail address.
///
/// ## Invariants
/// - Lower-cased and trimmed, so uniqueness checks and login lookups are
///   case/whitespace-insensitive.
///
/// # Examples
/// ```
/// use nutrifix_backend::domain::EmailAddress;
///
/// let email = EmailAddress::parse("  Ada@Example.COM ").unwrap();
/// assert_eq!(email.as_str(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalize and validate a raw address.
    pub fn parse(raw: &str) -> Result<Self, EmailValidationError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if !normalized.contains('@') {
            return Err(EmailValidationError::MissingSeparator);
        }
        Ok(Self(normalized))
    }

    /// Borrow the normalized address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume the wrapper, yielding the normalized address.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored user record, including the password credential.
///
/// Never serialized directly; the HTTP layer only ever sees the
/// [`PublicUser`] projection.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Primary identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Normalized e-mail address.
    pub email: String,
    /// bcrypt hash of the password; the plaintext is never persisted.
    pub password_hash: String,
    /// Age in years.
    pub age: Option<i32>,
    /// Body weight in kilograms.
    pub weight: Option<f64>,
    /// Height in centimetres.
    pub height: Option<f64>,
    /// Free-form activity level (e.g. "moderate").
    pub activity_level: Option<String>,
    /// Free-form goal (e.g. "muscle gain").
    pub goal: Option<String>,
    /// Target protein grams per day.
    pub target_protein: Option<f64>,
    /// Target carbohydrate grams per day.
    pub target_carbs: Option<f64>,
    /// Target fat grams per day.
    pub target_fats: Option<f64>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Last profile mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Sanitized projection with the password credential stripped.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            age: self.age,
            weight: self.weight,
            height: self.height,
            activity_level: self.activity_level.clone(),
            goal: self.goal.clone(),
            target_protein: self.target_protein,
            target_carbs: self.target_carbs,
            target_fats: self.target_fats,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// User projection safe to return to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// Primary identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Normalized e-mail address.
    pub email: String,
    /// Age in years.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    /// Body weight in kilograms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Height in centimetres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Free-form activity level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    /// Free-form goal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    /// Target protein grams per day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_protein: Option<f64>,
    /// Target carbohydrate grams per day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_carbs: Option<f64>,
    /// Target fat grams per day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_fats: Option<f64>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Last profile mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    /// New display name.
    pub name: Option<String>,
    /// New age in years.
    pub age: Option<i32>,
    /// New body weight in kilograms.
    pub weight: Option<f64>,
    /// New height in centimetres.
    pub height: Option<f64>,
    /// New activity level.
    pub activity_level: Option<String>,
    /// New goal.
    pub goal: Option<String>,
    /// New protein target in grams.
    pub target_protein: Option<f64>,
    /// New carbohydrate target in grams.
    pub target_carbs: Option<f64>,
    /// New fat target in grams.
    pub target_fats: Option<f64>,
}

impl ProfileChanges {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.weight.is_none()
            && self.height.is_none()
            && self.activity_level.is_none()
            && self.goal.is_none()
            && self.target_protein.is_none()
            && self.target_carbs.is_none()
            && self.target_fats.is_none()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for e-mail normalization and sanitization.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Ada@Example.COM", "ada@example.com")]
    #[case("  padded@mail.io  ", "padded@mail.io")]
    #[case("MIXED@CASE.DEV", "mixed@case.dev")]
    fn parse_normalizes(#[case] raw: &str, #[case] expected: &str) {
        let email = EmailAddress::parse(raw).expect("valid email");
        assert_eq!(email.as_str(), expected);
    }

    #[rstest]
    #[case("", EmailValidationError::Empty)]
    #[case("   ", EmailValidationError::Empty)]
    #[case("not-an-email", EmailValidationError::MissingSeparator)]
    fn parse_rejects_invalid(#[case] raw: &str, #[case] expected: EmailValidationError) {
        let err = EmailAddress::parse(raw).expect_err("invalid email");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn public_projection_drops_credential() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$2b$10$secret".into(),
            age: Some(30),
            weight: Some(62.5),
            height: None,
            activity_level: None,
            goal: Some("maintenance".into()),
            target_protein: Some(120.0),
            target_carbs: None,
            target_fats: None,
            created_at: now,
            updated_at: now,
        };

        let public = user.to_public();
        let json = serde_json::to_string(&public).expect("serialise");
        assert!(!json.contains("secret"));
        assert!(!json.contains("passwordHash"));
        assert!(json.contains("ada@example.com"));
    }

    #[rstest]
    fn empty_changes_detected() {
        assert!(ProfileChanges::default().is_empty());
        let changes = ProfileChanges {
            goal: Some("cut".into()),
            ..ProfileChanges::default()
        };
        assert!(!changes.is_empty());
    }
}
