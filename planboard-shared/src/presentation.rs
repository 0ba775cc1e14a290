/// View models handed to the renderer
///
/// Everything here is plain data: no queries, no side effects. Views never
/// carry a password or a password hash.

use serde::{Deserialize, Serialize};

use crate::forms::{format_deadline, FieldError, ProjectForm, SignInForm, SignUpForm, TaskForm};
use crate::models::{
    project::Project,
    reference::{Priority, PriorityLevel, Status, StatusKind},
    task::Task,
    user::User,
};

/// Display class for a task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityClass {
    Danger,
    Warning,
    Info,
    Success,
    Default,
}

impl PriorityClass {
    /// CSS class used by the markup layer
    pub fn css_class(self) -> &'static str {
        match self {
            PriorityClass::Danger => "text-danger",
            PriorityClass::Warning => "text-warning",
            PriorityClass::Info => "text-info",
            PriorityClass::Success => "text-success",
            PriorityClass::Default => "text-primary",
        }
    }
}

/// Maps a priority id to its display class
///
/// Total: ids outside the seeded range map to [`PriorityClass::Default`].
///
/// ```
/// use planboard_shared::presentation::{priority_display_class, PriorityClass};
///
/// assert_eq!(priority_display_class(1), PriorityClass::Danger);
/// assert_eq!(priority_display_class(99), PriorityClass::Default);
/// ```
pub fn priority_display_class(priority_id: i64) -> PriorityClass {
    match PriorityLevel::from_id(priority_id) {
        Some(PriorityLevel::Critical) => PriorityClass::Danger,
        Some(PriorityLevel::High) => PriorityClass::Warning,
        Some(PriorityLevel::Medium) => PriorityClass::Info,
        Some(PriorityLevel::Low) => PriorityClass::Success,
        None => PriorityClass::Default,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectView {
    pub project_id: i64,
    pub name: String,
    pub description: String,
    pub deadline: String,
    pub status_id: i64,
    pub status: &'static str,
}

impl From<&Project> for ProjectView {
    fn from(project: &Project) -> Self {
        Self {
            project_id: project.project_id,
            name: project.project_name.clone(),
            description: project.description.clone(),
            deadline: format_deadline(&project.project_deadline),
            status_id: project.status_id,
            status: project.status().map_or("Unknown", StatusKind::label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub task_id: i64,
    pub project_id: i64,
    pub description: String,
    pub deadline: String,
    pub status_id: i64,
    pub status: &'static str,
    pub priority_id: i64,
    pub priority: &'static str,
    pub priority_class: PriorityClass,
    pub css_class: &'static str,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        let class = priority_display_class(task.priority_id);

        Self {
            task_id: task.task_id,
            project_id: task.project_id,
            description: task.description.clone(),
            deadline: format_deadline(&task.deadline),
            status_id: task.status_id,
            status: task.status().map_or("Unknown", StatusKind::label),
            priority_id: task.priority_id,
            priority: task.priority().map_or("Unknown", PriorityLevel::label),
            priority_class: class,
            css_class: class.css_class(),
        }
    }
}

/// Project home page
#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub user: UserView,
    pub projects: Vec<ProjectView>,
}

impl HomeView {
    pub fn new(user: &User, projects: &[Project]) -> Self {
        Self {
            user: user.into(),
            projects: projects.iter().map(ProjectView::from).collect(),
        }
    }
}

/// One project with its tasks and the choices for the add-task form
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetailView {
    pub user: UserView,
    pub project: ProjectView,
    pub tasks: Vec<TaskView>,
    pub statuses: Vec<Status>,
    pub priorities: Vec<Priority>,
}

/// Sign-up form re-rendered with errors; the password is never echoed
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignUpFormView {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub errors: Vec<FieldError>,
    pub message: Option<String>,
}

impl SignUpFormView {
    pub fn rejected(form: &SignUpForm, errors: Vec<FieldError>, message: Option<String>) -> Self {
        Self {
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            email: form.email.clone(),
            errors,
            message,
        }
    }
}

/// Sign-in form, empty or re-rendered after a failed attempt
///
/// Only the email is echoed back.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignInFormView {
    pub email: String,
    pub errors: Vec<FieldError>,
    pub message: Option<String>,
}

impl SignInFormView {
    pub fn rejected(form: &SignInForm, errors: Vec<FieldError>, message: Option<String>) -> Self {
        Self {
            email: form.email.trim().to_string(),
            errors,
            message,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpSuccessView {
    pub user: UserView,
    pub message: String,
}

impl SignUpSuccessView {
    pub fn new(user: &User) -> Self {
        Self {
            user: user.into(),
            message: format!("Welcome, {}! You can now sign in.", user.first_name),
        }
    }
}

/// Add/edit project form, either prefilled from a row or echoing a rejected submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectFormView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub deadline: String,
    pub status_id: Option<i64>,
    pub errors: Vec<FieldError>,
}

impl ProjectFormView {
    pub fn prefill(project: &Project) -> Self {
        Self {
            id: project.project_id,
            name: project.project_name.clone(),
            description: project.description.clone(),
            deadline: format_deadline(&project.project_deadline),
            status_id: Some(project.status_id),
            errors: Vec::new(),
        }
    }

    pub fn rejected(form: &ProjectForm, errors: Vec<FieldError>) -> Self {
        Self {
            id: form.id,
            name: form.name.clone(),
            description: form.description.clone(),
            deadline: form.deadline.clone(),
            status_id: form.status_id,
            errors,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskFormView {
    pub id: i64,
    pub project_id: i64,
    pub description: String,
    pub deadline: String,
    pub priority_id: Option<i64>,
    pub status_id: Option<i64>,
    pub errors: Vec<FieldError>,
}

impl TaskFormView {
    pub fn rejected(form: &TaskForm, errors: Vec<FieldError>) -> Self {
        Self {
            id: form.id,
            project_id: form.project_id,
            description: form.description.clone(),
            deadline: form.deadline.clone(),
            priority_id: form.priority_id,
            status_id: form.status_id,
            errors,
        }
    }
}
