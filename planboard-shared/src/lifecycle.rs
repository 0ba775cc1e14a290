/// Project and task lifecycle rules
///
/// Every operation that writes runs in a single transaction and commits
/// once. Returning early with an error drops the transaction, which rolls
/// it back, so a failed submission never leaves a partial write behind.
///
/// Ownership is checked inside the same transaction as the write. A project
/// (or task) that exists but belongs to someone else is reported exactly
/// like one that does not exist.
///
/// # Example
///
/// ```no_run
/// use planboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use planboard_shared::forms::{ProjectForm, SignUpForm};
/// use planboard_shared::lifecycle;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::in_memory()).await?;
///
/// let user = lifecycle::sign_up(&pool, &SignUpForm {
///     first_name: "Ada".to_string(),
///     last_name: "Lovelace".to_string(),
///     email: "ada@example.com".to_string(),
///     password: "analytical".to_string(),
/// }).await?;
///
/// let project = lifecycle::submit_project_form(&pool, &user, &ProjectForm {
///     name: "Launch".to_string(),
///     description: "Ship it".to_string(),
///     deadline: "2025-01-01T00:00".to_string(),
///     ..Default::default()
/// }).await?;
///
/// lifecycle::delete_project(&pool, &user, project.project_id).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::SqliteConnection;
use tracing::{debug, info, warn};

use crate::auth::password::{self, PasswordError};
use crate::db::pool::DbPool;
use crate::forms::{FieldError, ProjectForm, SignInForm, SignUpForm, TaskForm};
use crate::models::{
    project::{CreateProject, Project, UpdateProject},
    reference::{Priority, Status},
    task::{CreateTask, Task, UpdateTask},
    user::{CreateUser, User},
};
use crate::presentation::{HomeView, ProjectDetailView, ProjectView, TaskView};

/// Error type for lifecycle operations
///
/// Everything except `Password` and `Store` is recoverable per request.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// Missing or malformed form input
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Sign-up with an email that is already registered
    #[error("Email {0} is already registered")]
    DuplicateEmail(String),

    /// Unknown id, or an id owned by another user
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Unknown email or wrong password
    #[error("Wrong email address or password!")]
    Authentication,

    /// No valid session
    #[error("Sign in required")]
    AnonymousAccess,

    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Store failure
    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),
}

fn not_found(entity: &'static str, id: i64) -> LifecycleError {
    LifecycleError::NotFound { entity, id }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Creates a user with a freshly hashed password
///
/// Names and email are trimmed and checked with the sign-up rules first.
/// The duplicate check and the insert share one transaction. A unique
/// constraint violation from a concurrent sign-up is also reported as
/// `DuplicateEmail`.
///
/// # Errors
///
/// `Validation` for a blank name, malformed email or short password, and
/// `DuplicateEmail` if the (normalised) email is taken. No row is created
/// in either case.
pub async fn create_user(
    pool: &DbPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    raw_password: &str,
) -> Result<User, LifecycleError> {
    let form = SignUpForm {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        password: raw_password.to_string(),
    }
    .check()
    .map_err(LifecycleError::Validation)?;

    let mut tx = pool.begin().await?;

    if User::count_by_email(&mut *tx, &form.email).await? > 0 {
        return Err(LifecycleError::DuplicateEmail(form.email));
    }

    let user = User::create(
        &mut *tx,
        CreateUser {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email.clone(),
            password_hash: password::hash_password(&form.password)?,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            LifecycleError::DuplicateEmail(form.email.clone())
        } else {
            LifecycleError::Store(e)
        }
    })?;

    tx.commit().await?;

    info!(user_id = user.user_id, "Created user");
    Ok(user)
}

pub async fn find_user_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, LifecycleError> {
    Ok(User::find_by_email(pool, email).await?)
}

/// Validates a sign-up form and creates the account
pub async fn sign_up(pool: &DbPool, form: &SignUpForm) -> Result<User, LifecycleError> {
    create_user(pool, &form.first_name, &form.last_name, &form.email, &form.password).await
}

/// Checks credentials and returns the matching user
///
/// # Errors
///
/// `Authentication` for both an unknown email and a wrong password
pub async fn sign_in(pool: &DbPool, form: &SignInForm) -> Result<User, LifecycleError> {
    form.check().map_err(LifecycleError::Validation)?;

    let Some(user) = User::find_by_email(pool, &form.email).await? else {
        warn!("Sign-in failed: unknown email");
        return Err(LifecycleError::Authentication);
    };

    if !user.check_password(&form.password) {
        warn!(user_id = user.user_id, "Sign-in failed: wrong password");
        return Err(LifecycleError::Authentication);
    }

    info!(user_id = user.user_id, "User signed in");
    Ok(user)
}

/// Turns the resolved session into the acting user
pub fn require_owner(user: Option<User>) -> Result<User, LifecycleError> {
    user.ok_or(LifecycleError::AnonymousAccess)
}

async fn owned_project(
    conn: &mut SqliteConnection,
    owner: &User,
    project_id: i64,
) -> Result<Project, LifecycleError> {
    Project::find_by_id_and_owner(conn, project_id, owner.user_id)
        .await?
        .ok_or_else(|| not_found("Project", project_id))
}

async fn owned_task(
    conn: &mut SqliteConnection,
    owner: &User,
    task_id: i64,
) -> Result<Task, LifecycleError> {
    let task = Task::find_by_id(&mut *conn, task_id)
        .await?
        .ok_or_else(|| not_found("Task", task_id))?;

    // A task on someone else's project does not exist for this owner
    Project::find_by_id_and_owner(&mut *conn, task.project_id, owner.user_id)
        .await?
        .ok_or_else(|| not_found("Task", task_id))?;

    Ok(task)
}

/// Creates (`form.id == 0`) or updates a project owned by `owner`
///
/// Validation runs before any write. New projects start "Not Started"
/// whatever status the form carries.
///
/// # Errors
///
/// `Validation` for bad input, `NotFound` when updating a project that is
/// missing or owned by someone else.
pub async fn submit_project_form(
    pool: &DbPool,
    owner: &User,
    form: &ProjectForm,
) -> Result<Project, LifecycleError> {
    let input = form.check().map_err(LifecycleError::Validation)?;

    let mut tx = pool.begin().await?;

    let project = if form.id == 0 {
        let project = Project::create(
            &mut *tx,
            CreateProject {
                project_name: input.name,
                description: input.description,
                project_deadline: input.deadline,
                user_id: owner.user_id,
            },
        )
        .await?;

        info!(project_id = project.project_id, user_id = owner.user_id, "Created project");
        project
    } else {
        owned_project(&mut tx, owner, form.id).await?;

        let project = Project::update(
            &mut *tx,
            form.id,
            UpdateProject {
                project_name: Some(input.name),
                description: Some(input.description),
                project_deadline: Some(input.deadline),
                status: input.status,
            },
        )
        .await?
        .ok_or_else(|| not_found("Project", form.id))?;

        info!(project_id = project.project_id, user_id = owner.user_id, "Updated project");
        project
    };

    tx.commit().await?;
    Ok(project)
}

/// Loads a project for the edit form
pub async fn load_project(pool: &DbPool, owner: &User, project_id: i64) -> Result<Project, LifecycleError> {
    let mut conn = pool.acquire().await?;
    owned_project(&mut conn, owner, project_id).await
}

/// Deletes a project owned by `owner` together with its tasks
///
/// # Errors
///
/// `NotFound` if `project_id` does not name one of the owner's projects
pub async fn delete_project(pool: &DbPool, owner: &User, project_id: i64) -> Result<(), LifecycleError> {
    let mut tx = pool.begin().await?;

    owned_project(&mut tx, owner, project_id).await?;
    let tasks = Task::count_by_project(&mut *tx, project_id).await?;

    if !Project::delete(&mut *tx, project_id).await? {
        return Err(not_found("Project", project_id));
    }

    tx.commit().await?;

    info!(project_id, user_id = owner.user_id, tasks, "Deleted project");
    Ok(())
}

/// Every project in the system
pub async fn list_projects(pool: &DbPool) -> Result<Vec<Project>, LifecycleError> {
    Ok(Project::list_all(pool).await?)
}

/// Creates (`form.id == 0`) or updates a task on one of `owner`'s projects
///
/// On update the parent project is fixed; `form.project_id` is ignored.
pub async fn submit_task_form(
    pool: &DbPool,
    owner: &User,
    form: &TaskForm,
) -> Result<Task, LifecycleError> {
    let input = form.check().map_err(LifecycleError::Validation)?;

    let mut tx = pool.begin().await?;

    let task = if form.id == 0 {
        owned_project(&mut tx, owner, input.project_id).await?;

        let task = Task::create(
            &mut *tx,
            CreateTask {
                description: input.description,
                project_id: input.project_id,
                priority: input.priority,
                deadline: input.deadline,
            },
        )
        .await?;

        info!(task_id = task.task_id, project_id = task.project_id, "Created task");
        task
    } else {
        owned_task(&mut tx, owner, form.id).await?;

        let task = Task::update(
            &mut *tx,
            form.id,
            UpdateTask {
                description: Some(input.description),
                status: input.status,
                priority: Some(input.priority),
                deadline: Some(input.deadline),
            },
        )
        .await?
        .ok_or_else(|| not_found("Task", form.id))?;

        info!(task_id = task.task_id, project_id = task.project_id, "Updated task");
        task
    };

    tx.commit().await?;
    Ok(task)
}

/// Deletes a task on one of `owner`'s projects, returning the removed row
pub async fn delete_task(pool: &DbPool, owner: &User, task_id: i64) -> Result<Task, LifecycleError> {
    let mut tx = pool.begin().await?;

    let task = owned_task(&mut tx, owner, task_id).await?;
    Task::delete(&mut *tx, task_id).await?;

    tx.commit().await?;

    info!(task_id, project_id = task.project_id, "Deleted task");
    Ok(task)
}

/// Assembles the project home page for `owner`
pub async fn home(pool: &DbPool, owner: &User) -> Result<HomeView, LifecycleError> {
    let projects = Project::list_by_owner(pool, owner.user_id).await?;
    debug!(user_id = owner.user_id, count = projects.len(), "Loaded home page");

    Ok(HomeView::new(owner, &projects))
}

/// Assembles one project's page with its tasks and the reference data
pub async fn project_detail(
    pool: &DbPool,
    owner: &User,
    project_id: i64,
) -> Result<ProjectDetailView, LifecycleError> {
    let mut conn = pool.acquire().await?;

    let project = owned_project(&mut conn, owner, project_id).await?;
    let tasks = Task::list_by_project(&mut *conn, project_id).await?;
    let statuses = Status::list_all(&mut *conn).await?;
    let priorities = Priority::list_all(&mut *conn).await?;

    Ok(ProjectDetailView {
        user: owner.into(),
        project: ProjectView::from(&project),
        tasks: tasks.iter().map(TaskView::from).collect(),
        statuses,
        priorities,
    })
}
