/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use planboard_api::{app::AppState, config::Config};
/// use planboard_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.pool_config()).await?;
/// let state = AppState::new(pool, config);
/// let app = planboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use axum::{
    response::Redirect,
    routing::{get, post},
    Router,
};
use planboard_shared::{auth::session::SessionResolver, db::pool::DbPool};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::{config::Config, error::HOME_PATH, middleware::session::require_session};

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DbPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Session token issuer and resolver
    pub sessions: SessionResolver,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: DbPool, config: Config) -> Self {
        let sessions = SessionResolver::new(config.session.secret.clone(), config.session_ttl());

        Self {
            db,
            config: Arc::new(config),
            sessions,
        }
    }

    /// Whether cookies must be marked `Secure`
    pub fn secure_cookies(&self) -> bool {
        self.config.api.production
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health              # Health check (public)
/// ├── GET  /                    # Redirect to /projectHome
/// ├── GET  /signUp, POST        # Sign-up form / create account (public)
/// ├── GET  /signIn, POST        # Sign-in form / start session (public)
/// ├── GET  /logOut              # End session (public)
/// └── (session required, anonymous → 303 /signIn)
///     ├── GET  /projectHome
///     ├── POST /addProject       # create (id = 0) or update
///     ├── POST /editProject      # edit-form prefill
///     ├── POST /removeProject
///     ├── GET  /projects/:project_id
///     ├── POST /addTask          # create (id = 0) or update
///     └── POST /removeTask
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer), outermost
/// 2. Session resolution (authenticated routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/", get(|| async { Redirect::to(HOME_PATH) }))
        .route("/signUp", get(routes::auth::sign_up_form).post(routes::auth::sign_up))
        .route("/signIn", get(routes::auth::sign_in_form).post(routes::auth::sign_in))
        .route("/logOut", get(routes::auth::log_out));

    let owner_routes = Router::new()
        .route("/projectHome", get(routes::projects::project_home))
        .route("/addProject", post(routes::projects::add_project))
        .route("/editProject", post(routes::projects::edit_project))
        .route("/removeProject", post(routes::projects::remove_project))
        .route("/projects/:project_id", get(routes::projects::project_detail))
        .route("/addTask", post(routes::tasks::add_task))
        .route("/removeTask", post(routes::tasks::remove_task))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(owner_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
