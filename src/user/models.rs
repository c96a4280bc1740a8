use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// Database model for users table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserModel {
    pub id: String, // UUID v4 as string
    pub name: String,
    pub email: String, // Unique across the directory
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl UserModel {
    /// Creates a new active user with a generated ID
    pub fn new(name: String, email: String, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            role,
            is_active: true,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}
