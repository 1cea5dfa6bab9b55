//! Session token issuance

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Derives opaque session tokens from the username, the issuance time in
/// milliseconds, a per-process issuance counter, and a process-wide
/// secret captured once at startup.
///
/// The counter keeps back-to-back logins for the same user distinct even
/// within one millisecond; the session store's UNIQUE constraint remains
/// the backstop against anything slipping past it. A deployment that
/// leaves the secret at its fallback value produces guessable tokens, so
/// the binary warns loudly about it.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    counter: Arc<AtomicU64>,
}

impl TokenIssuer {
    /// Create a new token issuer with the given process secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            counter: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Issue a hex-encoded session token for a username
    pub fn issue(&self, username: &str) -> String {
        let now_millis = Utc::now().timestamp_millis();
        let nonce = self.counter.fetch_add(1, Ordering::Relaxed);

        debug!("Issuing session token for user: {}", username);

        let mut hasher = Sha256::new();
        hasher.update(username.as_bytes());
        hasher.update(now_millis.to_string().as_bytes());
        hasher.update(nonce.to_string().as_bytes());
        hasher.update(self.secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}
