//! User - Profiles and Credentials

use serde::{Deserialize, Serialize};

use crate::constants::MIN_PASSWORD_LEN;
use crate::error::{Error, Result};

/// Cached profile of a user
///
/// The users service answers with `user_id`; older cache entries used `_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "user_id", alias = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Login payload for `/users/login-json`
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration payload for `/users/register`
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// Reject obviously invalid registrations before they reach the network
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::validation("Username is required"));
        }
        if self.email.trim().is_empty() {
            return Err(Error::validation("Email is required"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

/// Token returned by a successful login
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_accepts_backend_shape() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"user_id": "64f0", "email": "mario@example.com", "username": "mario"}"#,
        )
        .expect("parse");
        assert_eq!(profile.id, "64f0");
        assert_eq!(profile.username, "mario");
    }

    #[test]
    fn test_short_password_rejected() {
        let reg = Registration {
            username: "mario".to_string(),
            email: "mario@example.com".to_string(),
            password: "12345".to_string(),
        };
        let err = reg.validate().expect_err("must fail");
        assert!(err.to_string().contains("at least 6"));
    }
}
