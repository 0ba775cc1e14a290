/// Session middleware and cookie helpers
///
/// `require_session` resolves the request's session token to a user and
/// stores it as a [`CurrentUser`] extension. Anonymous requests never reach
/// the handler: they are redirected to the sign-in page.
///
/// The token is read from the `session` cookie first, then from an
/// `Authorization: Bearer` header.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use planboard_shared::{
    auth::session::{token_from_authorization, token_from_cookie_header, SESSION_COOKIE},
    lifecycle,
    models::user::User,
};

use crate::{app::AppState, error::ApiError};

/// The signed-in user, inserted by [`require_session`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Finds the session token in the request headers
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(token_from_cookie_header);

    from_cookie
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(token_from_authorization)
        })
        .map(str::to_owned)
}

/// Session authentication middleware layer
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(req.headers());

    let user = state.sessions.resolve(&state.db, token.as_deref()).await?;
    let user = lifecycle::require_owner(user)?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// `Set-Cookie` value carrying a session token
pub fn session_cookie(token: &str, max_age_seconds: i64, secure: bool) -> Result<HeaderValue, ApiError> {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_seconds
    );
    if secure {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::InternalError(format!("Invalid session cookie: {}", e)))
}

/// `Set-Cookie` value that expires the session cookie
pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    let cookie = if secure {
        "session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Secure"
    } else {
        "session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
    };

    HeaderValue::from_static(cookie)
}
