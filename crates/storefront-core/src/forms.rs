//! Login and signup form models

use serde::{Deserialize, Serialize};
use storefront_auth::Role;

pub const USERNAME_REQUIRED: &str = "Username is required";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const FIRST_NAME_REQUIRED: &str = "First Name is required";

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub first_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.username.is_none() && self.password.is_none()
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn required(value: &str, message: &str) -> Option<String> {
    value.trim().is_empty().then(|| message.to_string())
}

/// Login form
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    /// Both fields must be non-blank
    pub fn validate(&self) -> Result<(), FieldErrors> {
        FieldErrors {
            first_name: None,
            username: required(&self.username, USERNAME_REQUIRED),
            password: required(&self.password, PASSWORD_REQUIRED),
        }
        .into_result()
    }
}

/// Signup form
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

impl SignupForm {
    /// First name, username and password must be non-blank; last name is optional
    pub fn validate(&self) -> Result<(), FieldErrors> {
        FieldErrors {
            first_name: required(&self.first_name, FIRST_NAME_REQUIRED),
            username: required(&self.username, USERNAME_REQUIRED),
            password: required(&self.password, PASSWORD_REQUIRED),
        }
        .into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_username_and_password() {
        let errors = LoginForm::default().validate().unwrap_err();

        assert_eq!(errors.username.as_deref(), Some(USERNAME_REQUIRED));
        assert_eq!(errors.password.as_deref(), Some(PASSWORD_REQUIRED));
        assert_eq!(errors.first_name, None);
    }

    #[test]
    fn test_login_blank_fields_are_trimmed() {
        let form = LoginForm {
            username: "   ".to_string(),
            password: "secret".to_string(),
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.username.as_deref(), Some(USERNAME_REQUIRED));
        assert_eq!(errors.password, None);
    }

    #[test]
    fn test_login_valid() {
        let form = LoginForm {
            username: "alice".to_string(),
            password: " secret ".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_signup_validation() {
        let form = SignupForm {
            last_name: "Only".to_string(),
            ..Default::default()
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.first_name.as_deref(), Some(FIRST_NAME_REQUIRED));
        assert_eq!(errors.username.as_deref(), Some(USERNAME_REQUIRED));
        assert_eq!(errors.password.as_deref(), Some(PASSWORD_REQUIRED));
    }

    #[test]
    fn test_signup_last_name_optional_and_role_defaults_to_user() {
        let form = SignupForm {
            first_name: "Alice".to_string(),
            username: "alice".to_string(),
            password: "pw".to_string(),
            ..Default::default()
        };

        assert!(form.validate().is_ok());
        assert_eq!(form.role, Role::User);
    }
}
