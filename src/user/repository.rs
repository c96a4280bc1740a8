use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::str::FromStr;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{UserModel, UserRole};
use crate::shared::AppError;

/// Read side of the user directory used by the stats core, plus registration
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError>;
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserModel>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError>;
    async fn exists(&self, user_id: &str) -> Result<bool, AppError>;

    /// Batch lookup keyed by user id. Ids with no matching user are simply absent
    /// from the returned map.
    async fn find_many(&self, user_ids: &[String]) -> Result<HashMap<String, UserModel>, AppError>;
}

/// In-memory implementation of UserRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, UserModel>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated users
    pub fn with_users(users: Vec<UserModel>) -> Self {
        let user_map = users
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();

        Self {
            users: RwLock::new(user_map),
        }
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, email = %user.email, "Creating user in memory");

        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            warn!(user_id = %user.id, "User already exists in memory");
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        if users
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            warn!(email = %user.email, "Email already registered in memory");
            return Err(AppError::Conflict(
                "User already exists with this email".to_string(),
            ));
        }
        users.insert(user.id.clone(), user.clone());

        debug!(user_id = %user.id, "User created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserModel>, AppError> {
        let users = self.users.read().await;
        let user = users.get(user_id).cloned();

        match &user {
            Some(u) => debug!(user_id = %user_id, name = %u.name, "User found in memory"),
            None => debug!(user_id = %user_id, "User not found in memory"),
        }

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    #[instrument(skip(self))]
    async fn exists(&self, user_id: &str) -> Result<bool, AppError> {
        Ok(self.users.read().await.contains_key(user_id))
    }

    #[instrument(skip(self, user_ids), fields(requested = user_ids.len()))]
    async fn find_many(&self, user_ids: &[String]) -> Result<HashMap<String, UserModel>, AppError> {
        let users = self.users.read().await;
        let found: HashMap<String, UserModel> = user_ids
            .iter()
            .filter_map(|id| users.get(id).map(|user| (id.clone(), user.clone())))
            .collect();

        debug!(found = found.len(), "Batch user lookup completed in memory");
        Ok(found)
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &PgRow) -> Result<UserModel, AppError> {
        let role: String = row.get("role");
        let role = UserRole::from_str(&role)
            .map_err(|_| AppError::DatabaseError(format!("Unknown user role: {}", role)))?;

        Ok(UserModel {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            role,
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, email = %user.email, "Creating user in database");

        sqlx::query(
            "INSERT INTO users (id, name, email, role, is_active, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_ref())
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation())
            {
                warn!(email = %user.email, "Email already registered in database");
                return AppError::Conflict("User already exists with this email".to_string());
            }
            warn!(error = %e, "Failed to create user in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(user_id = %user.id, "User created successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserModel>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, email, role, is_active, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to fetch user from database");
            AppError::DatabaseError(e.to_string())
        })?;

        row.as_ref().map(Self::map_row).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, email, role, is_active, created_at FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch user by email from database");
            AppError::DatabaseError(e.to_string())
        })?;

        row.as_ref().map(Self::map_row).transpose()
    }

    #[instrument(skip(self))]
    async fn exists(&self, user_id: &str) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1) AS present")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = %user_id, "Failed to check user existence");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(row.get("present"))
    }

    #[instrument(skip(self, user_ids), fields(requested = user_ids.len()))]
    async fn find_many(&self, user_ids: &[String]) -> Result<HashMap<String, UserModel>, AppError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query(
            "SELECT id, name, email, role, is_active, created_at FROM users WHERE id = ANY($1)",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to batch fetch users from database");
            AppError::DatabaseError(e.to_string())
        })?;

        rows.iter()
            .map(|row| Self::map_row(row).map(|user| (user.id.clone(), user)))
            .collect()
    }
}
