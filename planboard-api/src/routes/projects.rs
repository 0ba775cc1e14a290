/// Project endpoints (session required)
///
/// # Endpoints
///
/// - `GET  /projectHome` - The owner's projects
/// - `POST /addProject` - Create (`id=0`) or update a project
/// - `POST /editProject` - Prefilled edit form for project `id`
/// - `POST /removeProject` - Delete project `id` and its tasks
/// - `GET  /projects/:project_id` - One project with its tasks

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    Extension, Form, Json,
};
use planboard_shared::{
    forms::ProjectForm,
    lifecycle::{self, LifecycleError},
    presentation::{HomeView, ProjectDetailView, ProjectFormView},
};

use super::RecordIdForm;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult, HOME_PATH},
    middleware::session::CurrentUser,
};

pub async fn project_home(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<HomeView>> {
    Ok(Json(lifecycle::home(&state.db, &user).await?))
}

/// Create or update a project, then go home
///
/// A rejected form is re-rendered as `422` with the submitted values.
pub async fn add_project(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<ProjectForm>,
) -> ApiResult<Redirect> {
    match lifecycle::submit_project_form(&state.db, &user, &form).await {
        Ok(_) => Ok(Redirect::to(HOME_PATH)),
        Err(LifecycleError::Validation(errors)) => Err(ApiError::form(
            StatusCode::UNPROCESSABLE_ENTITY,
            &ProjectFormView::rejected(&form, errors),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_project(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<RecordIdForm>,
) -> ApiResult<Json<ProjectFormView>> {
    let project = lifecycle::load_project(&state.db, &user, form.id).await?;
    Ok(Json(ProjectFormView::prefill(&project)))
}

pub async fn remove_project(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<RecordIdForm>,
) -> ApiResult<Redirect> {
    lifecycle::delete_project(&state.db, &user, form.id).await?;
    Ok(Redirect::to(HOME_PATH))
}

pub async fn project_detail(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(project_id): Path<i64>,
) -> ApiResult<Json<ProjectDetailView>> {
    Ok(Json(lifecycle::project_detail(&state.db, &user, project_id).await?))
}
