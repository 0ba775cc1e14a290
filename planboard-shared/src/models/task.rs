/// Task model and database operations
///
/// Tasks live under a project and are removed with it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task (
///     task_id     INTEGER PRIMARY KEY AUTOINCREMENT,
///     description TEXT    NOT NULL,
///     project_id  INTEGER NOT NULL REFERENCES project (project_id) ON DELETE CASCADE,
///     status_id   INTEGER NOT NULL REFERENCES status (status_id),
///     priority_id INTEGER NOT NULL REFERENCES priority (priority_id),
///     deadline    TEXT    NOT NULL,
///     created_at  TEXT    NOT NULL,
///     updated_at  TEXT    NOT NULL
/// );
/// ```

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteExecutor;

use super::reference::{PriorityLevel, StatusKind};

const COLUMNS: &str = "task_id, description, project_id, status_id, priority_id, deadline, created_at, updated_at";

/// Task row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub task_id: i64,

    /// Short description (at most 25 characters)
    pub description: String,

    /// Parent project
    pub project_id: i64,

    pub status_id: i64,

    pub priority_id: i64,

    pub deadline: NaiveDateTime,

    pub created_at: NaiveDateTime,

    pub updated_at: NaiveDateTime,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub description: String,
    pub project_id: i64,
    pub priority: PriorityLevel,
    pub deadline: NaiveDateTime,
}

/// Input for updating a task (`None` leaves the column unchanged)
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub description: Option<String>,
    pub status: Option<StatusKind>,
    pub priority: Option<PriorityLevel>,
    pub deadline: Option<NaiveDateTime>,
}

impl Task {
    pub fn status(&self) -> Option<StatusKind> {
        StatusKind::from_id(self.status_id)
    }

    pub fn priority(&self) -> Option<PriorityLevel> {
        PriorityLevel::from_id(self.priority_id)
    }

    /// Inserts a new task with status "Not Started"
    pub async fn create<'e>(db: impl SqliteExecutor<'e>, data: CreateTask) -> Result<Self, sqlx::Error> {
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO task (description, project_id, status_id, priority_id, deadline, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(data.description)
        .bind(data.project_id)
        .bind(StatusKind::NotStarted.id())
        .bind(data.priority.id())
        .bind(data.deadline)
        .bind(now)
        .fetch_one(db)
        .await
    }

    pub async fn find_by_id<'e>(db: impl SqliteExecutor<'e>, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!("SELECT {COLUMNS} FROM task WHERE task_id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Updates a task, returning `None` if no task has this id
    pub async fn update<'e>(
        db: impl SqliteExecutor<'e>,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE task SET updated_at = $2");
        let mut bind_count = 2;

        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status_id = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority_id = ${}", bind_count));
        }
        if data.deadline.is_some() {
            bind_count += 1;
            query.push_str(&format!(", deadline = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE task_id = $1 RETURNING {COLUMNS}"));

        let mut q = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(Utc::now().naive_utc());

        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status.id());
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority.id());
        }
        if let Some(deadline) = data.deadline {
            q = q.bind(deadline);
        }

        q.fetch_optional(db).await
    }

    /// Deletes a task, returning `true` if a row was deleted
    pub async fn delete<'e>(db: impl SqliteExecutor<'e>, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task WHERE task_id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists a project's tasks by priority, then deadline
    pub async fn list_by_project<'e>(
        db: impl SqliteExecutor<'e>,
        project_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {COLUMNS} FROM task WHERE project_id = $1 ORDER BY priority_id, deadline, task_id"
        ))
        .bind(project_id)
        .fetch_all(db)
        .await
    }

    pub async fn count_by_project<'e>(db: impl SqliteExecutor<'e>, project_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM task WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(db)
            .await?;

        Ok(count)
    }
}
