/// Database models for Planboard
///
/// Each model owns its CRUD operations. Every operation accepts any SQLite
/// executor, so the same call works against the pool or an open transaction.
///
/// # Models
///
/// - `user`: User accounts and credentials
/// - `project`: Projects owned by a user
/// - `task`: Tasks under a project
/// - `reference`: Seeded status and priority enumerations
///
/// # Example
///
/// ```no_run
/// use planboard_shared::models::user::{User, CreateUser};
/// use planboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     first_name: "John".to_string(),
///     last_name: "Doe".to_string(),
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod project;
pub mod reference;
pub mod task;
pub mod user;
