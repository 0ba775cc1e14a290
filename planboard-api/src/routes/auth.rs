/// Authentication endpoints
///
/// # Endpoints
///
/// - `GET  /signUp` - Empty sign-up form
/// - `POST /signUp` - Create an account
/// - `GET  /signIn` - Empty sign-in form
/// - `POST /signIn` - Start a session (sets the `session` cookie)
/// - `GET  /logOut` - End the session (clears the cookie)
///
/// All `POST` bodies are `application/x-www-form-urlencoded`.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use planboard_shared::{
    forms::{SignInForm, SignUpForm},
    lifecycle::{self, LifecycleError},
    presentation::{SignInFormView, SignUpFormView, SignUpSuccessView},
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, HOME_PATH, SIGN_IN_PATH},
    middleware::session::{clear_session_cookie, session_cookie},
};

/// Empty sign-up form
pub async fn sign_up_form() -> Json<SignUpFormView> {
    Json(SignUpFormView::default())
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /signUp
/// Content-Type: application/x-www-form-urlencoded
///
/// first_name=Ada&last_name=Lovelace&email=ada%40example.com&password=...
/// ```
///
/// # Responses
///
/// - `201 Created`: `SignUpSuccessView`
/// - `409 Conflict`: `SignUpFormView` with a message; no account created
/// - `422 Unprocessable Entity`: `SignUpFormView` with field errors
pub async fn sign_up(
    State(state): State<AppState>,
    Form(form): Form<SignUpForm>,
) -> ApiResult<(StatusCode, Json<SignUpSuccessView>)> {
    match lifecycle::sign_up(&state.db, &form).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(SignUpSuccessView::new(&user)))),
        Err(LifecycleError::Validation(errors)) => Err(ApiError::form(
            StatusCode::UNPROCESSABLE_ENTITY,
            &SignUpFormView::rejected(&form, errors, None),
        )),
        Err(LifecycleError::DuplicateEmail(email)) => Err(ApiError::form(
            StatusCode::CONFLICT,
            &SignUpFormView::rejected(
                &form,
                Vec::new(),
                Some(format!("Email {} already exists!", email)),
            ),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Empty sign-in form
pub async fn sign_in_form() -> Json<SignInFormView> {
    Json(SignInFormView::default())
}

/// Sign in
///
/// On success sets the `session` cookie and redirects to `/projectHome`.
///
/// # Errors
///
/// Both re-render `SignInFormView` with the submitted email:
///
/// - `401 Unauthorized`: "Wrong email address or password!" (for either)
/// - `422 Unprocessable Entity`: malformed email or empty password
pub async fn sign_in(
    State(state): State<AppState>,
    Form(form): Form<SignInForm>,
) -> ApiResult<Response> {
    let user = match lifecycle::sign_in(&state.db, &form).await {
        Ok(user) => user,
        Err(LifecycleError::Validation(errors)) => {
            return Err(ApiError::form(
                StatusCode::UNPROCESSABLE_ENTITY,
                &SignInFormView::rejected(&form, errors, None),
            ));
        }
        Err(e @ LifecycleError::Authentication) => {
            return Err(ApiError::form(
                StatusCode::UNAUTHORIZED,
                &SignInFormView::rejected(&form, Vec::new(), Some(e.to_string())),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let token = state.sessions.issue(user.user_id)?;
    let cookie = session_cookie(
        &token,
        state.sessions.ttl().num_seconds(),
        state.secure_cookies(),
    )?;

    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(HOME_PATH)).into_response())
}

/// Log out
///
/// Expires the session cookie and redirects to `/signIn`. Works whether or
/// not a session was active.
pub async fn log_out(State(state): State<AppState>) -> Response {
    (
        [(header::SET_COOKIE, clear_session_cookie(state.secure_cookies()))],
        Redirect::to(SIGN_IN_PATH),
    )
        .into_response()
}
