/// Project model and database operations
///
/// A project belongs to exactly one user (its owner) and owns zero or more
/// tasks. Deleting a project deletes its tasks through `ON DELETE CASCADE`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE project (
///     project_id       INTEGER PRIMARY KEY AUTOINCREMENT,
///     project_name     TEXT    NOT NULL,
///     description      TEXT    NOT NULL,
///     project_deadline TEXT    NOT NULL,
///     user_id          INTEGER NOT NULL REFERENCES user (user_id),
///     status_id        INTEGER NOT NULL REFERENCES status (status_id),
///     created_at       TEXT    NOT NULL,
///     updated_at       TEXT    NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
/// use planboard_shared::models::project::{CreateProject, Project, UpdateProject};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool, owner_id: i64) -> Result<(), sqlx::Error> {
/// let deadline = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
///
/// let project = Project::create(&pool, CreateProject {
///     project_name: "Launch".to_string(),
///     description: "Ship it".to_string(),
///     project_deadline: deadline,
///     user_id: owner_id,
/// }).await?;
///
/// Project::update(&pool, project.project_id, UpdateProject {
///     project_name: Some("Launch v2".to_string()),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteExecutor;

use super::reference::StatusKind;

const COLUMNS: &str = "project_id, project_name, description, project_deadline, user_id, status_id, created_at, updated_at";

/// Project row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub project_id: i64,

    /// Display name (at most 64 characters)
    pub project_name: String,

    /// Free-text description (at most 255 characters)
    pub description: String,

    pub project_deadline: NaiveDateTime,

    /// Owner
    pub user_id: i64,

    /// FK into `status`
    pub status_id: i64,

    pub created_at: NaiveDateTime,

    pub updated_at: NaiveDateTime,
}

/// Input for creating a new project
///
/// The status is not part of the input: every project starts "Not Started".
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub project_name: String,
    pub description: String,
    pub project_deadline: NaiveDateTime,
    pub user_id: i64,
}

/// Input for updating a project
///
/// `None` leaves the column unchanged. Ownership cannot be changed.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub project_deadline: Option<NaiveDateTime>,
    pub status: Option<StatusKind>,
}

impl Project {
    /// Current status, if the stored id is a known one
    pub fn status(&self) -> Option<StatusKind> {
        StatusKind::from_id(self.status_id)
    }

    /// Inserts a new project with status "Not Started"
    ///
    /// # Errors
    ///
    /// Returns a foreign-key database error if `user_id` does not exist
    pub async fn create<'e>(db: impl SqliteExecutor<'e>, data: CreateProject) -> Result<Self, sqlx::Error> {
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO project (project_name, description, project_deadline, user_id, status_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(data.project_name)
        .bind(data.description)
        .bind(data.project_deadline)
        .bind(data.user_id)
        .bind(StatusKind::NotStarted.id())
        .bind(now)
        .fetch_one(db)
        .await
    }

    /// Finds a project by id
    pub async fn find_by_id<'e>(db: impl SqliteExecutor<'e>, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!("SELECT {COLUMNS} FROM project WHERE project_id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Finds a project by id, only if `user_id` owns it
    pub async fn find_by_id_and_owner<'e>(
        db: impl SqliteExecutor<'e>,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {COLUMNS} FROM project WHERE project_id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// Updates a project
    ///
    /// Only `Some` fields are written; `updated_at` is always refreshed.
    ///
    /// # Returns
    ///
    /// The updated project, or `None` if no project has this id
    pub async fn update<'e>(
        db: impl SqliteExecutor<'e>,
        id: i64,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE project SET updated_at = $2");
        let mut bind_count = 2;

        if data.project_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", project_name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.project_deadline.is_some() {
            bind_count += 1;
            query.push_str(&format!(", project_deadline = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status_id = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE project_id = $1 RETURNING {COLUMNS}"));

        let mut q = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(Utc::now().naive_utc());

        if let Some(name) = data.project_name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(deadline) = data.project_deadline {
            q = q.bind(deadline);
        }
        if let Some(status) = data.status {
            q = q.bind(status.id());
        }

        q.fetch_optional(db).await
    }

    /// Deletes a project and, through the FK cascade, its tasks
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted
    pub async fn delete<'e>(db: impl SqliteExecutor<'e>, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project WHERE project_id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists every project in the system, oldest first
    pub async fn list_all<'e>(db: impl SqliteExecutor<'e>) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!("SELECT {COLUMNS} FROM project ORDER BY project_id"))
            .fetch_all(db)
            .await
    }

    /// Lists the projects owned by `user_id`, nearest deadline first
    pub async fn list_by_owner<'e>(
        db: impl SqliteExecutor<'e>,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {COLUMNS} FROM project WHERE user_id = $1 ORDER BY project_deadline, project_id"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    /// Counts all projects
    pub async fn count<'e>(db: impl SqliteExecutor<'e>) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM project")
            .fetch_one(db)
            .await?;

        Ok(count)
    }
}
