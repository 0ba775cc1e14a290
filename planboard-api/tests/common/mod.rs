//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - A migrated in-memory database per test
//! - The router, driven directly through `tower::Service`
//! - Form-encoded request builders and response readers

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use planboard_api::app::{build_router, AppState};
use planboard_api::config::{ApiConfig, Config, DatabaseConfig, SessionConfig};
use planboard_shared::db::migrations::run_migrations;
use planboard_shared::db::pool::{create_pool, DatabaseConfig as PoolConfig, DbPool};
use tower::Service as _;

pub const PASSWORD: &str = "correct-horse-battery";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: DbPool,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context with a fresh database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                production: false,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            session: SessionConfig {
                secret: "integration-test-secret-at-least-32-bytes".to_string(),
                ttl_hours: 1,
            },
        };

        let db = create_pool(PoolConfig::in_memory()).await?;
        run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().call(request).await.unwrap()
    }

    /// `GET` with an optional session cookie
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Form-encoded `POST` with an optional session cookie
    pub async fn post_form(&self, uri: &str, form: &[(&str, &str)], cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(encode_form(form))).unwrap()).await
    }

    /// Signs up through `/signUp`
    pub async fn sign_up(&self, email: &str) -> Response<Body> {
        self.post_form(
            "/signUp",
            &[
                ("first_name", "Ada"),
                ("last_name", "Lovelace"),
                ("email", email),
                ("password", PASSWORD),
            ],
            None,
        )
        .await
    }

    /// Signs in through `/signIn` and returns the `Cookie` header value to send back
    pub async fn sign_in(&self, email: &str) -> String {
        let response = self
            .post_form("/signIn", &[("email", email), ("password", PASSWORD)], None)
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    /// Signs up and signs in
    pub async fn signed_in(&self, email: &str) -> String {
        assert_eq!(self.sign_up(email).await.status(), StatusCode::CREATED);
        self.sign_in(email).await
    }
}

/// Percent-encodes form pairs
pub fn encode_form(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

/// `Location` header of a redirect
pub fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// Reads the body as JSON
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
