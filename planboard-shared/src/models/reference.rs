/// Reference data: statuses and priorities
///
/// Both tables are seeded by the initial migration and treated as closed
/// enumerations. Rows reference them by id; the Rust enums below are the
/// only values the lifecycle layer accepts.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE status (status_id INTEGER PRIMARY KEY, description TEXT NOT NULL);
/// CREATE TABLE priority (priority_id INTEGER PRIMARY KEY, text TEXT NOT NULL);
/// ```

use serde::{Deserialize, Serialize};
use sqlx::SqliteExecutor;

/// Project/task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Not started yet (initial status of every project and task)
    NotStarted,

    /// Work under way
    InProgress,

    /// Finished
    Done,
}

impl StatusKind {
    /// All statuses in display order
    pub const ALL: [StatusKind; 3] = [StatusKind::NotStarted, StatusKind::InProgress, StatusKind::Done];

    /// Row id in the `status` table
    pub fn id(self) -> i64 {
        match self {
            StatusKind::NotStarted => 1,
            StatusKind::InProgress => 2,
            StatusKind::Done => 3,
        }
    }

    /// Looks a status up by row id
    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Seeded description
    pub fn label(self) -> &'static str {
        match self {
            StatusKind::NotStarted => "Not Started",
            StatusKind::InProgress => "In Progress",
            StatusKind::Done => "Done",
        }
    }
}

/// Task priority, most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl PriorityLevel {
    /// All priorities in display order
    pub const ALL: [PriorityLevel; 4] = [
        PriorityLevel::Critical,
        PriorityLevel::High,
        PriorityLevel::Medium,
        PriorityLevel::Low,
    ];

    /// Row id in the `priority` table
    pub fn id(self) -> i64 {
        match self {
            PriorityLevel::Critical => 1,
            PriorityLevel::High => 2,
            PriorityLevel::Medium => 3,
            PriorityLevel::Low => 4,
        }
    }

    /// Looks a priority up by row id
    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }

    /// Seeded display text
    pub fn label(self) -> &'static str {
        match self {
            PriorityLevel::Critical => "Critical",
            PriorityLevel::High => "High",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::Low => "Low",
        }
    }
}

/// Row of the `status` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Status {
    pub status_id: i64,
    pub description: String,
}

impl Status {
    /// Lists every status ordered by id
    pub async fn list_all<'e>(db: impl SqliteExecutor<'e>) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Status>(
            "SELECT status_id, description FROM status ORDER BY status_id",
        )
        .fetch_all(db)
        .await
    }
}

/// Row of the `priority` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Priority {
    pub priority_id: i64,
    pub text: String,
}

impl Priority {
    /// Lists every priority ordered by id
    pub async fn list_all<'e>(db: impl SqliteExecutor<'e>) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Priority>(
            "SELECT priority_id, text FROM priority ORDER BY priority_id",
        )
        .fetch_all(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ids_round_trip() {
        for status in StatusKind::ALL {
            assert_eq!(StatusKind::from_id(status.id()), Some(status));
        }
        assert_eq!(StatusKind::from_id(0), None);
        assert_eq!(StatusKind::from_id(4), None);
    }

    #[test]
    fn test_priority_ids_round_trip() {
        for priority in PriorityLevel::ALL {
            assert_eq!(PriorityLevel::from_id(priority.id()), Some(priority));
        }
        assert_eq!(PriorityLevel::from_id(5), None);
    }

    #[test]
    fn test_labels_match_seed_data() {
        assert_eq!(StatusKind::NotStarted.label(), "Not Started");
        assert_eq!(StatusKind::Done.label(), "Done");
        assert_eq!(PriorityLevel::Critical.label(), "Critical");
        assert_eq!(PriorityLevel::Low.id(), 4);
    }
}
