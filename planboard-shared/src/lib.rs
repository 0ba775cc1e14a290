//! # Planboard Shared Library
//!
//! Domain core of Planboard: user accounts, projects and their tasks, the
//! rules for changing them, and the view models the HTTP layer renders.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing and session resolution
//! - `db`: Connection pool and embedded migrations
//! - `models`: Rows and their CRUD operations
//! - `forms`: Submitted forms and validation
//! - `lifecycle`: Ownership-checked, transactional operations
//! - `presentation`: View models and the priority display class

pub mod auth;
pub mod db;
pub mod forms;
pub mod lifecycle;
pub mod models;
pub mod presentation;

/// Current version of the Planboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
