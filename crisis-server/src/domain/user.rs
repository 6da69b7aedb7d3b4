use chrono::{DateTime, Utc};
use validator::ValidateEmail;

use super::comment::Comment;
use super::error::DomainError;

const PASSWORD_MISMATCH: &str = "Passwords do not match!";

/// Пароли, которые отклоняются независимо от длины.
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "1234567890",
    "qwertyui",
    "qwerty123",
    "iloveyou",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "welcome1",
    "letmein1",
    "trustno1",
    "superman",
    "passw0rd",
    "11111111",
    "abc12345",
];

#[derive(Debug, Clone)]
pub(crate) struct RegisterRequest {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) password_confirmation: String,
}

impl RegisterRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = normalize_username(&self.username)?;
        let email = normalize_email(&self.email)?;
        validate_new_password(
            &self.password,
            &self.password_confirmation,
            &username,
            &email,
        )?;

        Ok(Self {
            username,
            email,
            password: self.password,
            password_confirmation: self.password_confirmation,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = self.username.trim();
        if username.is_empty() || username.chars().count() > 64 {
            return Err(DomainError::validation("username", "must be 1..64 chars"));
        }

        if self.password.is_empty() {
            return Err(DomainError::validation("password", "must not be empty"));
        }
        Ok(Self {
            username: username.to_string(),
            password: self.password,
        })
    }
}

/// Partial profile update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub(crate) struct UpdateProfileRequest {
    pub(crate) username: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) password_confirmation: Option<String>,
}

impl UpdateProfileRequest {
    /// Normalizes the provided fields against the current account state.
    pub(crate) fn validate(self, current: &User) -> Result<Self, DomainError> {
        let username = self.username.as_deref().map(normalize_username).transpose()?;
        let email = self.email.as_deref().map(normalize_email).transpose()?;

        let password = match (self.password, self.password_confirmation) {
            (None, None) => None,
            (Some(password), Some(confirmation)) => {
                validate_new_password(
                    &password,
                    &confirmation,
                    username.as_deref().unwrap_or(&current.username),
                    email.as_deref().unwrap_or(&current.email),
                )?;
                Some(password)
            }
            (Some(_), None) => {
                return Err(DomainError::validation(
                    "password_confirmation",
                    "is required when changing password",
                ));
            }
            (None, Some(_)) => {
                return Err(DomainError::validation(
                    "password",
                    "is required with password_confirmation",
                ));
            }
        };

        Ok(Self {
            username,
            email,
            password_confirmation: None,
            password,
        })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::validation("id", "must be > 0"));
        }
        let username = normalize_username(&username.into())?;
        let email = normalize_email(&email.into())?;

        Ok(Self {
            id,
            username,
            email,
            created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Profile {
    pub(crate) user: User,
    pub(crate) comments: Vec<Comment>,
}

fn normalize_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    let username_len = username.chars().count();
    if !(3..=64).contains(&username_len) {
        return Err(DomainError::validation("username", "must be 3..64 chars"));
    }
    Ok(username.to_string())
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::validation("email", "must be a valid email"));
    }
    Ok(email)
}

/// Confirmation check runs first so a typo is reported before policy failures.
pub(crate) fn validate_new_password(
    password: &str,
    confirmation: &str,
    username: &str,
    email: &str,
) -> Result<(), DomainError> {
    if password != confirmation {
        return Err(DomainError::validation("password", PASSWORD_MISMATCH));
    }
    validate_password_strength(password, username, email)
}

fn validate_password_strength(
    password: &str,
    username: &str,
    email: &str,
) -> Result<(), DomainError> {
    let password_len = password.chars().count();
    if !(8..=128).contains(&password_len) {
        return Err(DomainError::validation("password", "must be 8..128 chars"));
    }

    if password.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(DomainError::validation("password", "must not be entirely numeric"));
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        return Err(DomainError::validation("password", "is too common"));
    }

    let email_local = email.split('@').next().unwrap_or_default();
    let personal = [username, email_local];
    if personal
        .iter()
        .map(|value| value.to_lowercase())
        .any(|value| value.chars().count() >= 3 && lowered.contains(&value))
    {
        return Err(DomainError::validation(
            "password",
            "is too similar to the username or email",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        DomainError, LoginRequest, RegisterRequest, UpdateProfileRequest, User, normalize_email,
        normalize_username, validate_new_password,
    };
    use chrono::Utc;

    fn register(password: &str, confirmation: &str) -> RegisterRequest {
        RegisterRequest {
            username: "valid_user".to_string(),
            email: "test@example.com".to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.to_string(),
        }
    }

    fn assert_password_error(err: DomainError, expected: &str) {
        match err {
            DomainError::Validation { field, message } => {
                assert_eq!(field, "password");
                assert_eq!(message, expected);
            }
            other => panic!("expected password validation error, got {other:?}"),
        }
    }

    #[test]
    fn user_new_rejects_non_positive_id() {
        let result = User::new(0, "valid_user", "test@example.com", Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        let value = normalize_email("  TeSt@Example.COM ").expect("must be valid");
        assert_eq!(value, "test@example.com");
    }

    #[test]
    fn username_rules_are_applied() {
        assert!(normalize_username("ab").is_err());
        assert!(normalize_username("valid_user").is_ok());
    }

    #[test]
    fn username_length_counts_characters_not_bytes() {
        let cyrillic = "д".repeat(40);
        assert_eq!(
            normalize_username(&cyrillic).expect("40 chars must be valid"),
            cyrillic
        );
        assert!(normalize_username(&"д".repeat(65)).is_err());
        assert!(normalize_username("дд").is_err());

        let req = RegisterRequest {
            username: cyrillic.clone(),
            ..register("correct-horse-battery", "correct-horse-battery")
        };
        let validated = req.validate().expect("multibyte username must be accepted");
        assert_eq!(validated.username, cyrillic);
    }

    #[test]
    fn login_accepts_long_multibyte_username() {
        let req = LoginRequest {
            username: "ж".repeat(64),
            password: "secret".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn short_multibyte_username_is_not_matched_against_password() {
        // два символа, но четыре байта
        let err = validate_new_password(
            "correct-жж-battery",
            "correct-жж-battery",
            "жж",
            "reporter@example.com",
        );
        assert!(err.is_ok());
    }

    #[test]
    fn register_rejects_mismatched_confirmation() {
        let err = register("correct-horse-battery", "correct-horse-batterz")
            .validate()
            .expect_err("mismatch must be rejected");
        assert_password_error(err, "Passwords do not match!");
    }

    #[test]
    fn register_rejects_weak_passwords() {
        let short = register("short1", "short1").validate();
        assert!(short.is_err());

        let numeric = register("1234987654", "1234987654")
            .validate()
            .expect_err("numeric password must be rejected");
        assert_password_error(numeric, "must not be entirely numeric");

        let common = register("Password123", "Password123")
            .validate()
            .expect_err("common password must be rejected");
        assert_password_error(common, "is too common");

        let similar = register("my-valid_user-pass", "my-valid_user-pass")
            .validate()
            .expect_err("password containing username must be rejected");
        assert_password_error(similar, "is too similar to the username or email");
    }

    #[test]
    fn register_normalizes_valid_request() {
        let req = RegisterRequest {
            username: "  valid_user ".to_string(),
            email: " TEST@Example.com ".to_string(),
            password: "correct-horse-battery".to_string(),
            password_confirmation: "correct-horse-battery".to_string(),
        };
        let validated = req.validate().expect("must be valid");
        assert_eq!(validated.username, "valid_user");
        assert_eq!(validated.email, "test@example.com");
    }

    #[test]
    fn password_mismatch_is_reported_before_strength() {
        let err = validate_new_password("123", "456", "user", "u@example.com")
            .expect_err("must fail");
        assert_password_error(err, "Passwords do not match!");
    }

    #[test]
    fn profile_update_requires_confirmation_with_password() {
        let current = User::new(1, "valid_user", "test@example.com", Utc::now())
            .expect("user must be valid");
        let req = UpdateProfileRequest {
            password: Some("correct-horse-battery".to_string()),
            ..Default::default()
        };

        let err = req.validate(&current).expect_err("must fail");
        assert!(matches!(
            err,
            DomainError::Validation {
                field: "password_confirmation",
                ..
            }
        ));
    }

    #[test]
    fn profile_update_normalizes_only_provided_fields() {
        let current = User::new(1, "valid_user", "test@example.com", Utc::now())
            .expect("user must be valid");
        let req = UpdateProfileRequest {
            email: Some("  NEW@Example.com ".to_string()),
            ..Default::default()
        };

        let validated = req.validate(&current).expect("must be valid");
        assert_eq!(validated.email.as_deref(), Some("new@example.com"));
        assert!(validated.username.is_none());
        assert!(validated.password.is_none());
        assert!(!validated.is_empty());
    }
}
