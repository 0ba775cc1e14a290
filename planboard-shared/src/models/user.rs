/// User model and database operations
///
/// Users are created once at sign-up and never deleted. The email address is
/// the sign-in identifier; it is stored trimmed and lower-cased (see
/// [`normalize_email`]) so lookups are case-insensitive.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user (
///     user_id       INTEGER PRIMARY KEY AUTOINCREMENT,
///     first_name    TEXT NOT NULL,
///     last_name     TEXT NOT NULL,
///     email         TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     created_at    TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use planboard_shared::auth::password::hash_password;
/// use planboard_shared::models::user::{CreateUser, User};
/// use planboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::in_memory()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     first_name: "Ada".to_string(),
///     last_name: "Lovelace".to_string(),
///     email: "ada@example.com".to_string(),
///     password_hash: hash_password("correct horse")?,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "ADA@example.com").await?;
/// assert_eq!(found.map(|u| u.user_id), Some(user.user_id));
/// # Ok(())
/// # }
/// ```

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteExecutor;

use crate::auth::password::{self, PasswordError};

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Numeric user id
    pub user_id: i64,

    pub first_name: String,

    pub last_name: String,

    /// Normalised email address, unique across all users
    pub email: String,

    /// Argon2id PHC hash. Never serialised.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// When the account was created (UTC)
    pub created_at: NaiveDateTime,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,

    /// Email address (normalised on insert)
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
}

/// Trims and lower-cases an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl User {
    /// Replaces the stored hash with a freshly salted hash of `raw_password`
    ///
    /// Only the in-memory value changes; callers persist the row themselves.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::HashError` if hashing fails
    pub fn set_password(&mut self, raw_password: &str) -> Result<(), PasswordError> {
        self.password_hash = password::hash_password(raw_password)?;
        Ok(())
    }

    /// Checks `raw_password` against the stored hash
    ///
    /// Fails closed: an unset or unparsable hash never matches.
    pub fn check_password(&self, raw_password: &str) -> bool {
        if self.password_hash.is_empty() {
            return false;
        }

        password::verify_password(raw_password, &self.password_hash).unwrap_or(false)
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Returns a unique-constraint database error if the email is taken, or
    /// any other store error.
    pub async fn create<'e>(db: impl SqliteExecutor<'e>, data: CreateUser) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO user (first_name, last_name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING user_id, first_name, last_name, email, password_hash, created_at
            "#,
        )
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(normalize_email(&data.email))
        .bind(data.password_hash)
        .bind(Utc::now().naive_utc())
        .fetch_one(db)
        .await
    }

    /// Finds a user by id
    pub async fn find_by_id<'e>(db: impl SqliteExecutor<'e>, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, first_name, last_name, email, password_hash, created_at
            FROM user
            WHERE user_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Finds a user by email address (normalised before lookup)
    pub async fn find_by_email<'e>(
        db: impl SqliteExecutor<'e>,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, first_name, last_name, email, password_hash, created_at
            FROM user
            WHERE email = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(db)
        .await
    }

    /// Counts users with the given (normalised) email
    pub async fn count_by_email<'e>(db: impl SqliteExecutor<'e>, email: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user WHERE email = $1")
            .bind(normalize_email(email))
            .fetch_one(db)
            .await?;

        Ok(count)
    }

    /// Counts all users
    pub async fn count<'e>(db: impl SqliteExecutor<'e>) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user")
            .fetch_one(db)
            .await?;

        Ok(count)
    }
}
