use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{UserModel, UserRole};
use crate::shared::AppError;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 50;
const EMAIL_MAX_CHARS: usize = 100;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

impl CreateUserRequest {
    /// Checks the payload and returns the name and email to store. The name is trimmed,
    /// the email trimmed and lowercased so uniqueness ignores letter case.
    pub fn validate(&self) -> Result<(String, String), AppError> {
        let name = self.name.trim();
        let name_len = name.chars().count();
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
            return Err(AppError::Validation(format!(
                "Name must be between {} and {} characters",
                NAME_MIN_CHARS, NAME_MAX_CHARS
            )));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '_' || c == '-')
        {
            return Err(AppError::Validation(
                "Name may only contain letters, numbers, spaces, underscores and hyphens"
                    .to_string(),
            ));
        }

        let email = self.email.trim();
        if !email.contains('@') || email.chars().count() > EMAIL_MAX_CHARS {
            return Err(AppError::Validation("A valid email is required".to_string()));
        }

        Ok((name.to_string(), email.to_lowercase()))
    }
}

/// Public view of a user
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserModel> for UserResponse {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Response for registration: the new user and a bearer token for it
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub token: String,
}
