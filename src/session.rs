//! In-memory session store for the Threads integration.
//!
//! A session is an opaque id carried in a cookie, mapped to the Threads access
//! token obtained during the OAuth callback. Nothing is persisted; sessions are
//! lost on restart. Entries expire after [`SESSION_TTL`] and are swept on write.

use axum::http::{header, HeaderMap};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "trustdoc_session";

/// How long a stored Threads token stays usable.
pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
struct SessionEntry {
    token: String,
    expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SessionEntry>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Store a token under an existing session id, or a fresh one if `session_id`
    /// is `None`, unknown or expired. Returns the id to hand back to the client.
    pub fn store_token(&self, session_id: Option<&str>, token: String) -> String {
        let now = Instant::now();
        let mut sessions = self.inner.write().unwrap_or_else(|e| e.into_inner());

        let before = sessions.len();
        sessions.retain(|_, entry| entry.expires_at > now);
        if sessions.len() < before {
            tracing::debug!("SessionStore: expired {} sessions", before - sessions.len());
        }

        let id = match session_id {
            Some(id) if sessions.contains_key(id) => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        sessions.insert(
            id.clone(),
            SessionEntry {
                token,
                expires_at: now + self.ttl,
            },
        );
        tracing::debug!("SessionStore: stored token for session {}", id);
        id
    }

    pub fn token(&self, session_id: &str) -> Option<String> {
        let sessions = self.inner.read().unwrap_or_else(|e| e.into_inner());
        sessions
            .get(session_id)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.token.clone())
    }

    /// Token for the session named by the request's cookie, if any.
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        session_id_from_headers(headers).and_then(|id| self.token(&id))
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extract the session id from `Cookie` headers.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for a session id.
pub fn session_cookie(session_id: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session_id
    )
}
