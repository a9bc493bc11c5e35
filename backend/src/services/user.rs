//! User account service

use bcrypt::{hash, DEFAULT_COST};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::User;

use crate::error::{AppError, AppResult};

/// User service for account CRUD
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

/// User row including the hash, which never leaves this module
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    name: Option<String>,
    email: String,
    role: String,
    active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            name: row.name,
            email: row.email,
            role: row.role,
            active: row.active,
        }
    }
}

/// Input for creating a user
#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

/// Input for updating a user
#[derive(Debug, Deserialize)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

const SELECT_USER: &str = "SELECT id, username, name, email, role, active FROM users";

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all users
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{} ORDER BY username", SELECT_USER))
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Create a user, hashing the supplied password
    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<User> {
        if input.username.trim().is_empty() {
            return Err(AppError::Validation {
                field: "username".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if !validator::validate_email(&input.email) {
            return Err(AppError::Validation {
                field: "email".to_string(),
                message: "must be a valid email address".to_string(),
            });
        }
        if input.password.is_empty() {
            return Err(AppError::Validation {
                field: "password".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        self.ensure_unique("username", &input.username, None).await?;
        self.ensure_unique("email", &input.email, None).await?;

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, name, email, password_hash, role, active)
            VALUES ($1, $2, $3, $4, COALESCE($5, 'user'), COALESCE($6, true))
            RETURNING id, username, name, email, role, active
            "#,
        )
        .bind(&input.username)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(&input.role)
        .bind(input.active)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get a single user
    pub async fn get_user(&self, id: Uuid) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE id = $1", SELECT_USER))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(row.into())
    }

    /// Partially update a user; a supplied password is re-hashed
    pub async fn update_user(&self, id: Uuid, input: UpdateUserInput) -> AppResult<User> {
        let existing = self.get_user(id).await?;

        let username = input.username.unwrap_or(existing.username);
        let email = input.email.unwrap_or(existing.email);
        let name = input.name.or(existing.name);
        let role = input.role.unwrap_or(existing.role);
        let active = input.active.unwrap_or(existing.active);

        if !validator::validate_email(&email) {
            return Err(AppError::Validation {
                field: "email".to_string(),
                message: "must be a valid email address".to_string(),
            });
        }

        self.ensure_unique("username", &username, Some(id)).await?;
        self.ensure_unique("email", &email, Some(id)).await?;

        let password_hash = match input.password {
            Some(password) if !password.is_empty() => Some(
                hash(&password, DEFAULT_COST)
                    .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?,
            ),
            _ => None,
        };

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET username = $1, name = $2, email = $3, role = $4, active = $5,
                password_hash = COALESCE($6, password_hash)
            WHERE id = $7
            RETURNING id, username, name, email, role, active
            "#,
        )
        .bind(&username)
        .bind(&name)
        .bind(&email)
        .bind(&role)
        .bind(active)
        .bind(&password_hash)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a user
    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        Ok(())
    }

    /// Create the bootstrap account if no user exists yet (development only)
    pub async fn ensure_seed_user(&self, username: &str, email: &str, password: &str) -> AppResult<()> {
        let any_user = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users)")
            .fetch_one(&self.db)
            .await?;

        if any_user {
            return Ok(());
        }

        let password_hash = hash(password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, role, active)
            VALUES ($1, $2, $3, 'admin', true)
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .execute(&self.db)
        .await?;

        tracing::warn!(username, "seeded bootstrap admin user");
        Ok(())
    }

    async fn ensure_unique(&self, column: &str, value: &str, exclude: Option<Uuid>) -> AppResult<()> {
        let taken = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM users WHERE {} = $1 AND ($2::uuid IS NULL OR id <> $2))",
            column
        ))
        .bind(value)
        .bind(exclude)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::DuplicateEntry(column.to_string()));
        }

        Ok(())
    }
}
