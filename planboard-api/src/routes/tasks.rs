/// Task endpoints (session required)
///
/// - `POST /addTask` - Create (`id=0`) or update a task, then show its project
/// - `POST /removeTask` - Delete task `id`, then show its project

use axum::{extract::State, http::StatusCode, response::Redirect, Extension, Form};
use planboard_shared::{
    forms::TaskForm,
    lifecycle::{self, LifecycleError},
    presentation::TaskFormView,
};

use super::RecordIdForm;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::session::CurrentUser,
};

fn project_page(project_id: i64) -> Redirect {
    Redirect::to(&format!("/projects/{}", project_id))
}

pub async fn add_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<TaskForm>,
) -> ApiResult<Redirect> {
    match lifecycle::submit_task_form(&state.db, &user, &form).await {
        Ok(task) => Ok(project_page(task.project_id)),
        Err(LifecycleError::Validation(errors)) => Err(ApiError::form(
            StatusCode::UNPROCESSABLE_ENTITY,
            &TaskFormView::rejected(&form, errors),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn remove_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<RecordIdForm>,
) -> ApiResult<Redirect> {
    let task = lifecycle::delete_task(&state.db, &user, form.id).await?;
    Ok(project_page(task.project_id))
}
