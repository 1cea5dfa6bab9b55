//! Login, logout, and registration orchestration

use carhub_db::{Database, DbError, NewAdministrator};
use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::AuthError;
use crate::hasher;
use crate::token::TokenIssuer;

/// Fixture credentials used to equalize the hashing work done for unknown
/// usernames, so a missing account is not distinguishable by timing.
const DUMMY_SALT: &str = "dummy-salt";
const DUMMY_DIGEST: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Successful login result
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub username: String,
}

/// Orchestrates credential verification, token issuance, and the session
/// lifecycle. Owns no state beyond its collaborators; the store is
/// injected so tests can run against an in-memory database.
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    tokens: TokenIssuer,
    session_ttl: Option<Duration>,
}

impl AuthService {
    /// Create a new auth service.
    ///
    /// `session_ttl_hours` is optional: when set, tokens older than the
    /// TTL stop resolving. `None` means sessions live until an explicit
    /// logout.
    pub fn new(db: Database, tokens: TokenIssuer, session_ttl_hours: Option<i64>) -> Self {
        Self {
            db,
            tokens,
            session_ttl: session_ttl_hours.map(Duration::hours),
        }
    }

    /// Log an administrator in, creating a new session.
    ///
    /// This is the only path that creates a session. Repeated logins for
    /// the same administrator yield independent sessions.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::BadRequest(
                "Username and password are required".to_string(),
            ));
        }

        debug!("Login attempt for user: {}", username);

        let admin = self.db.get_administrator_by_username(username).await?;

        // Always hash, even for unknown usernames
        let password_valid = match &admin {
            Some(a) => hasher::verify(password, &a.salt, &a.password_hash),
            None => {
                hasher::verify(password, DUMMY_SALT, DUMMY_DIGEST);
                false
            }
        };

        let admin = match (admin, password_valid) {
            (Some(a), true) => a,
            _ => return Err(AuthError::InvalidCredentials),
        };

        let token = self.tokens.issue(&admin.username);
        self.db.insert_session(&admin.username, &token).await?;

        info!("User {} logged in successfully", admin.username);

        Ok(LoginOutcome {
            token,
            username: admin.username,
        })
    }

    /// Log a session out by deleting it.
    ///
    /// A token that resolves to nothing, whether bogus or already logged
    /// out, is reported as an invalid session; a logout never succeeds
    /// twice for the same token.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let removed = self.db.delete_session_by_token(token).await?;
        if removed == 0 {
            return Err(AuthError::InvalidSession);
        }

        info!("Session logged out");
        Ok(())
    }

    /// Register a new administrator with a freshly generated salt.
    ///
    /// Returns the created username; the password and digest are never
    /// echoed back.
    pub async fn register(&self, username: &str, password: &str) -> Result<String, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::BadRequest(
                "Username and password are required".to_string(),
            ));
        }

        let salt = generate_salt();
        let password_hash = hasher::digest(password, &salt);

        let admin = self
            .db
            .insert_administrator(NewAdministrator {
                username: username.to_string(),
                salt,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                DbError::Duplicate(_) => AuthError::UsernameTaken,
                other => AuthError::Storage(other),
            })?;

        info!("Registered administrator: {}", admin.username);
        Ok(admin.username)
    }

    /// Resolve a bearer token to the username that holds the session.
    ///
    /// Read-only: the gate built on this never mutates the session store,
    /// so even an expired session is rejected rather than deleted.
    pub async fn resolve(&self, token: &str) -> Result<String, AuthError> {
        let session = self
            .db
            .get_session_by_token(token)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        if let Some(ttl) = self.session_ttl
            && Utc::now() - session.login_time > ttl
        {
            debug!("Session for {} has expired", session.username);
            return Err(AuthError::InvalidSession);
        }

        Ok(session.username)
    }
}

/// Generate a random 128-bit salt, hex-encoded
fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::random();
    hex::encode(bytes)
}
