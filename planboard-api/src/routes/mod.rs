/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Sign-up, sign-in and log-out
/// - `projects`: Project home, add/edit/remove, detail page
/// - `tasks`: Add/edit/remove tasks

use serde::Deserialize;

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

/// Form body naming a single record
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RecordIdForm {
    pub id: i64,
}
