//! Schema validation for user records.
//!
//! Incoming JSON is deserialized into [`NewUser`] / [`UserPatch`] and then
//! checked against the field rules here, producing a normalized
//! [`UserDraft`] or a [`ValidationFailure`] listing every failing field.
//! Validation is independent of the persistence layer so it can be unit
//! tested without a live store.

use serde::Deserialize;

use userhub_core::Email;

use crate::models::User;

/// Minimum trimmed length of a user's name.
pub const NAME_MIN_LENGTH: usize = 2;
/// Maximum trimmed length of a user's name.
pub const NAME_MAX_LENGTH: usize = 50;
/// Maximum accepted age.
pub const AGE_MAX: i32 = 120;

/// Request body for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub phone: Option<String>,
}

/// Request body for partially updating a user.
///
/// Absent fields leave the stored record untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub phone: Option<String>,
}

impl UserPatch {
    /// Whether the patch supplies at least one field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none() && self.phone.is_none()
    }
}

/// A single failed field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable reason.
    pub message: String,
}

/// One or more field constraints were violated.
///
/// Rules are applied independently so every failing field is reported,
/// not just the first.
#[derive(Debug, Clone)]
pub struct ValidationFailure(Vec<FieldError>);

impl std::error::Error for ValidationFailure {}

impl ValidationFailure {
    /// The individual field failures.
    #[must_use]
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for err in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Collects field errors while the independent rules run.
#[derive(Debug, Default)]
struct Violations(Vec<FieldError>);

impl Violations {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn finish(self) -> Result<(), ValidationFailure> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure(self.0))
        }
    }
}

/// A validated, normalized candidate user record.
///
/// Carries no id or timestamps - those are assigned by the store.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub name: String,
    pub email: Email,
    pub age: Option<i32>,
    pub phone: Option<String>,
}

impl UserDraft {
    /// Validate a creation request.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationFailure`] listing every failing field.
    pub fn from_new(input: &NewUser) -> Result<Self, ValidationFailure> {
        let mut violations = Violations::default();

        let name = check_name(&input.name, &mut violations);
        let email = check_email(&input.email, &mut violations);
        let age = input.age.map(|age| check_age(age, &mut violations));
        let phone = input.phone.as_deref().map(normalize_phone);

        violations.finish()?;

        // finish() returned Ok, so both checks produced values.
        match (name, email) {
            (Some(name), Some(email)) => Ok(Self {
                name,
                email,
                age,
                phone,
            }),
            _ => unreachable!("validation passed with missing required fields"),
        }
    }

    /// Validate a partial update against an existing record.
    ///
    /// Supplied fields are validated and applied; absent fields are copied
    /// from the stored record. The merged result honors the full rule set.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationFailure`] listing every failing field.
    pub fn from_patch(existing: &User, patch: &UserPatch) -> Result<Self, ValidationFailure> {
        let mut violations = Violations::default();

        let name = match &patch.name {
            Some(name) => check_name(name, &mut violations),
            None => Some(existing.name.clone()),
        };
        let email = match &patch.email {
            Some(email) => check_email(email, &mut violations),
            None => Some(existing.email.clone()),
        };
        let age = match patch.age {
            Some(age) => Some(check_age(age, &mut violations)),
            None => existing.age,
        };
        let phone = match &patch.phone {
            Some(phone) => Some(normalize_phone(phone)),
            None => existing.phone.clone(),
        };

        violations.finish()?;

        match (name, email) {
            (Some(name), Some(email)) => Ok(Self {
                name,
                email,
                age,
                phone,
            }),
            _ => unreachable!("validation passed with missing required fields"),
        }
    }
}

/// `name` is required, trimmed, length 2-50.
fn check_name(name: &str, violations: &mut Violations) -> Option<String> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len < NAME_MIN_LENGTH {
        violations.push(
            "name",
            format!("must be at least {NAME_MIN_LENGTH} characters"),
        );
        return None;
    }
    if len > NAME_MAX_LENGTH {
        violations.push(
            "name",
            format!("must be at most {NAME_MAX_LENGTH} characters"),
        );
        return None;
    }
    Some(trimmed.to_owned())
}

/// `email` is required and must parse as a normalized [`Email`].
fn check_email(email: &str, violations: &mut Violations) -> Option<Email> {
    match Email::parse(email) {
        Ok(email) => Some(email),
        Err(err) => {
            violations.push("email", err.to_string());
            None
        }
    }
}

/// `age`, if present, must be an integer in [0, 120].
fn check_age(age: i32, violations: &mut Violations) -> i32 {
    if !(0..=AGE_MAX).contains(&age) {
        violations.push("age", format!("must be between 0 and {AGE_MAX}"));
    }
    age
}

/// `phone` has no format constraint beyond trimming.
fn normalize_phone(phone: &str) -> String {
    phone.trim().to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use userhub_core::UserId;

    use super::*;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_owned(),
            email: email.to_owned(),
            age: None,
            phone: None,
        }
    }

    fn existing_user() -> User {
        let now = Utc::now();
        User {
            id: UserId::parse("64f1a2b3c4d5e6f708192a3b").unwrap(),
            name: "Jane Doe".to_owned(),
            email: Email::parse("jane@example.com").unwrap(),
            age: Some(28),
            phone: Some("555-0100".to_owned()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_valid_creation() {
        let draft = UserDraft::from_new(&NewUser {
            name: "  Jane Doe  ".to_owned(),
            email: "JANE@Example.com".to_owned(),
            age: Some(28),
            phone: Some(" 555-0100 ".to_owned()),
        })
        .unwrap();

        assert_eq!(draft.name, "Jane Doe");
        assert_eq!(draft.email.as_str(), "jane@example.com");
        assert_eq!(draft.age, Some(28));
        assert_eq!(draft.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_name_length_boundaries() {
        assert!(UserDraft::from_new(&new_user("J", "j@example.com")).is_err());
        assert!(UserDraft::from_new(&new_user("Jo", "j@example.com")).is_ok());
        assert!(UserDraft::from_new(&new_user(&"a".repeat(50), "j@example.com")).is_ok());
        assert!(UserDraft::from_new(&new_user(&"a".repeat(51), "j@example.com")).is_err());
    }

    #[test]
    fn test_name_trimmed_before_length_check() {
        // One character once trimmed.
        assert!(UserDraft::from_new(&new_user("  J  ", "j@example.com")).is_err());
    }

    #[test]
    fn test_age_boundaries() {
        let age_user = |age| NewUser {
            age: Some(age),
            ..new_user("Jane", "jane@example.com")
        };
        assert!(UserDraft::from_new(&age_user(-1)).is_err());
        assert!(UserDraft::from_new(&age_user(0)).is_ok());
        assert!(UserDraft::from_new(&age_user(120)).is_ok());
        assert!(UserDraft::from_new(&age_user(121)).is_err());
    }

    #[test]
    fn test_all_failures_collected() {
        let err = UserDraft::from_new(&NewUser {
            name: "J".to_owned(),
            email: "not-an-email".to_owned(),
            age: Some(200),
            phone: None,
        })
        .unwrap_err();

        let fields: Vec<&str> = err.fields().iter().map(|f| f.field).collect();
        assert_eq!(fields, vec!["name", "email", "age"]);
    }

    #[test]
    fn test_failure_display_joins_fields() {
        let err = UserDraft::from_new(&new_user("J", "bad")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("name:"));
        assert!(message.contains("email:"));
        assert!(message.contains("; "));
    }

    #[test]
    fn test_patch_keeps_absent_fields() {
        let user = existing_user();
        let draft = UserDraft::from_patch(
            &user,
            &UserPatch {
                age: Some(30),
                ..UserPatch::default()
            },
        )
        .unwrap();

        assert_eq!(draft.name, "Jane Doe");
        assert_eq!(draft.email.as_str(), "jane@example.com");
        assert_eq!(draft.age, Some(30));
        assert_eq!(draft.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_patch_validates_supplied_fields() {
        let user = existing_user();
        let err = UserDraft::from_patch(
            &user,
            &UserPatch {
                name: Some("X".to_owned()),
                ..UserPatch::default()
            },
        )
        .unwrap_err();

        assert_eq!(err.fields().len(), 1);
        assert_eq!(err.fields().first().map(|f| f.field), Some("name"));
    }

    #[test]
    fn test_patch_normalizes_email() {
        let user = existing_user();
        let draft = UserDraft::from_patch(
            &user,
            &UserPatch {
                email: Some("  NEW@Example.COM ".to_owned()),
                ..UserPatch::default()
            },
        )
        .unwrap();

        assert_eq!(draft.email.as_str(), "new@example.com");
    }

    #[test]
    fn test_empty_patch_is_valid() {
        let user = existing_user();
        let patch = UserPatch::default();
        assert!(patch.is_empty());

        let draft = UserDraft::from_patch(&user, &patch).unwrap();
        assert_eq!(draft.name, user.name);
        assert_eq!(draft.age, user.age);
    }
}
