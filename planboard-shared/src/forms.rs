/// Submitted forms and their validation rules
///
/// Forms arrive form-encoded from the HTTP layer. Each derives
/// [`validator::Validate`] for the field-level rules; checks that need
/// parsing (deadlines, reference ids) live in the `check` methods, which
/// collect every problem into one list of [`FieldError`]s.
///
/// Text fields are trimmed before any rule runs. Every field may be absent
/// from the body, and a blank numeric field reads as absent, so a partly
/// filled form always reaches `check` and is re-rendered with its messages.

use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationErrors};

use crate::models::reference::{PriorityLevel, StatusKind};

/// Accepted deadline formats (`<input type="datetime-local">` with and without seconds)
const DEADLINE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// A single validation failure, attached to the field that caused it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Form field name
    pub field: String,

    /// Message shown next to the field
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flattens validator output into field errors, sorted by field name
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut details: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

/// Numeric form field where blank (`status_id=`) means "not given"
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Record id field; blank or absent is `0` ("create")
fn blank_as_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(blank_as_none(deserializer)?.unwrap_or(0))
}

fn trim(value: &str) -> String {
    value.trim().to_string()
}

fn validate_into(form: &impl Validate) -> Vec<FieldError> {
    match form.validate() {
        Ok(()) => Vec::new(),
        Err(e) => field_errors(&e),
    }
}

fn into_result<T>(value: T, errors: Vec<FieldError>) -> Result<T, Vec<FieldError>> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}

/// Parses a form deadline
///
/// ```
/// use planboard_shared::forms::parse_deadline;
///
/// assert!(parse_deadline("2025-01-01T00:00").is_some());
/// assert!(parse_deadline("2025-01-01T00:00:30").is_some());
/// assert!(parse_deadline("next tuesday").is_none());
/// ```
pub fn parse_deadline(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DEADLINE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Formats a deadline the way [`parse_deadline`] reads it back
pub fn format_deadline(deadline: &NaiveDateTime) -> String {
    deadline.format(DEADLINE_FORMATS[0]).to_string()
}

fn check_deadline(raw: &str, errors: &mut Vec<FieldError>) -> Option<NaiveDateTime> {
    if raw.trim().is_empty() {
        errors.push(FieldError::new("deadline", "Deadline is required"));
        return None;
    }

    let parsed = parse_deadline(raw);
    if parsed.is_none() {
        errors.push(FieldError::new("deadline", "Deadline must look like 2025-01-31T17:00"));
    }
    parsed
}

fn check_status(status_id: Option<i64>, errors: &mut Vec<FieldError>) -> Option<StatusKind> {
    let id = status_id?;
    let status = StatusKind::from_id(id);
    if status.is_none() {
        errors.push(FieldError::new("status_id", format!("Unknown status {}", id)));
    }
    status
}

/// Sign-up form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SignUpForm {
    #[validate(length(min = 1, max = 64, message = "First name is required (at most 64 characters)"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 64, message = "Last name is required (at most 64 characters)"))]
    pub last_name: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 120, message = "Email must be at most 120 characters")
    )]
    pub email: String,

    /// Never serialised back into a view
    #[serde(skip_serializing)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl SignUpForm {
    /// Runs all field rules and returns the trimmed form
    ///
    /// The password is kept exactly as typed.
    ///
    /// # Errors
    ///
    /// Every failing rule, not just the first
    pub fn check(&self) -> Result<SignUpForm, Vec<FieldError>> {
        let form = SignUpForm {
            first_name: trim(&self.first_name),
            last_name: trim(&self.last_name),
            email: trim(&self.email),
            password: self.password.clone(),
        };

        let errors = validate_into(&form);
        into_result(form, errors)
    }
}

/// Sign-in form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SignInForm {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl SignInForm {
    pub fn check(&self) -> Result<(), Vec<FieldError>> {
        let form = SignInForm {
            email: trim(&self.email),
            password: self.password.clone(),
        };
        into_result((), validate_into(&form))
    }
}

/// Validated project form contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInput {
    pub name: String,
    pub description: String,
    pub deadline: NaiveDateTime,
    pub status: Option<StatusKind>,
}

/// Add/edit project form
///
/// `id == 0` means "create"; any other value names the project to update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProjectForm {
    #[serde(deserialize_with = "blank_as_zero")]
    pub id: i64,

    #[validate(length(min = 1, max = 64, message = "Project name is required (at most 64 characters)"))]
    pub name: String,

    #[validate(length(min = 1, max = 255, message = "Description is required (at most 255 characters)"))]
    pub description: String,

    /// `YYYY-MM-DDTHH:MM`
    pub deadline: String,

    /// Optional on create; new projects always start "Not Started"
    #[serde(deserialize_with = "blank_as_none")]
    pub status_id: Option<i64>,
}

impl ProjectForm {
    /// Validates every field and parses the deadline and status
    pub fn check(&self) -> Result<ProjectInput, Vec<FieldError>> {
        let form = ProjectForm {
            name: trim(&self.name),
            description: trim(&self.description),
            ..self.clone()
        };

        let mut errors = validate_into(&form);
        let deadline = check_deadline(&form.deadline, &mut errors);
        let status = check_status(form.status_id, &mut errors);

        match deadline {
            Some(deadline) if errors.is_empty() => Ok(ProjectInput {
                name: form.name,
                description: form.description,
                deadline,
                status,
            }),
            _ => Err(errors),
        }
    }
}

/// Validated task form contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub project_id: i64,
    pub description: String,
    pub deadline: NaiveDateTime,
    pub priority: PriorityLevel,
    pub status: Option<StatusKind>,
}

/// Add/edit task form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TaskForm {
    #[serde(deserialize_with = "blank_as_zero")]
    pub id: i64,

    /// Parent project (required when creating)
    #[serde(deserialize_with = "blank_as_zero")]
    pub project_id: i64,

    #[validate(length(min = 1, max = 25, message = "Description is required (at most 25 characters)"))]
    pub description: String,

    pub deadline: String,

    #[serde(deserialize_with = "blank_as_none")]
    pub priority_id: Option<i64>,

    #[serde(deserialize_with = "blank_as_none")]
    pub status_id: Option<i64>,
}

impl TaskForm {
    pub fn check(&self) -> Result<TaskInput, Vec<FieldError>> {
        let form = TaskForm {
            description: trim(&self.description),
            ..self.clone()
        };

        let mut errors = validate_into(&form);

        if form.id == 0 && form.project_id <= 0 {
            errors.push(FieldError::new("project_id", "Project is required"));
        }

        let deadline = check_deadline(&form.deadline, &mut errors);
        let status = check_status(form.status_id, &mut errors);

        let priority = match form.priority_id {
            None => {
                errors.push(FieldError::new("priority_id", "Priority is required"));
                None
            }
            Some(id) => {
                let priority = PriorityLevel::from_id(id);
                if priority.is_none() {
                    errors.push(FieldError::new("priority_id", format!("Unknown priority {}", id)));
                }
                priority
            }
        };

        match (deadline, priority) {
            (Some(deadline), Some(priority)) if errors.is_empty() => Ok(TaskInput {
                project_id: form.project_id,
                description: form.description,
                deadline,
                priority,
                status,
            }),
            _ => Err(errors),
        }
    }
}
