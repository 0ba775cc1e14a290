/// Session tokens and the session → user resolver
///
/// A session is a signed HS256 token that names the user it belongs to.
/// Nothing is stored server side: "set" issues a token, "clear" is the
/// HTTP layer expiring the cookie, and `resolve` turns a token back into
/// a `User` row.
///
/// An absent, empty, malformed, expired or forged token is not an error.
/// It is the anonymous state and resolves to `None`.
///
/// # Example
///
/// ```no_run
/// use chrono::Duration;
/// use planboard_shared::auth::session::SessionResolver;
/// use planboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::in_memory()).await?;
/// let sessions = SessionResolver::new("a-secret-of-at-least-thirty-two-bytes", Duration::hours(24));
///
/// let token = sessions.issue(42)?;
/// let user = sessions.resolve(&pool, Some(token.as_str())).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqliteExecutor;
use tracing::debug;

use crate::models::user::User;

/// Issuer written into and required from every session token
pub const ISSUER: &str = "planboard";

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to sign token
    #[error("Failed to create session token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Session token has expired")]
    Expired,

    /// Token failed signature, issuer or format checks
    #[error("Invalid session token: {0}")]
    Invalid(String),
}

/// Session token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - user id
    pub sub: i64,

    /// Issuer - always "planboard"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl SessionClaims {
    /// Creates claims for `user_id` that expire after `ttl`
    pub fn new(user_id: i64, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            nbf: now.timestamp(),
        }
    }
}

/// Signs session claims
///
/// # Errors
///
/// Returns `SessionError::CreateError` if encoding fails
pub fn create_token(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| SessionError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a session token and returns its claims
///
/// Checks signature, issuer, `exp` and `nbf`.
///
/// # Errors
///
/// `SessionError::Expired` for an expired token, `SessionError::Invalid`
/// for everything else.
pub fn validate_token(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::Invalid(e.to_string()),
        }
    })?;

    Ok(token_data.claims)
}

/// Extracts the session token from a `Cookie` request header
///
/// ```
/// use planboard_shared::auth::session::token_from_cookie_header;
///
/// assert_eq!(token_from_cookie_header("theme=dark; session=abc.def"), Some("abc.def"));
/// assert_eq!(token_from_cookie_header("theme=dark"), None);
/// ```
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Extracts the session token from an `Authorization: Bearer` header
pub fn token_from_authorization(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Maps session tokens to users
#[derive(Debug, Clone)]
pub struct SessionResolver {
    secret: String,
    ttl: Duration,
}

impl SessionResolver {
    /// Creates a resolver signing with `secret`, issuing tokens valid for `ttl`
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Session lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a session token for `user_id`
    ///
    /// # Errors
    ///
    /// Returns `SessionError::CreateError` if signing fails
    pub fn issue(&self, user_id: i64) -> Result<String, SessionError> {
        create_token(&SessionClaims::new(user_id, self.ttl), &self.secret)
    }

    /// Looks up the user a session token belongs to
    ///
    /// Read-only. Returns `Ok(None)` for the anonymous state: no token, an
    /// empty token, a token that fails validation, or a token whose user no
    /// longer exists.
    ///
    /// # Errors
    ///
    /// Only store failures are returned as errors.
    pub async fn resolve<'e>(
        &self,
        db: impl SqliteExecutor<'e>,
        token: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let claims = match validate_token(token, &self.secret) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Rejected session token");
                return Ok(None);
            }
        };

        User::find_by_id(db, claims.sub).await
    }
}
