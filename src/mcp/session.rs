//! HTTP session bookkeeping.
//!
//! A session is created by a successful `initialize` and lives until the
//! client sends `DELETE /mcp` or the server stops. There is no expiry.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::mcp::handler::ClientInfo;

/// One live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque identifier sent back in `Mcp-Session-Id`.
    pub id: String,
    /// When `initialize` succeeded.
    pub created_at: DateTime<Utc>,
    /// Protocol version agreed at initialisation.
    pub protocol_version: String,
    /// What the client said about itself.
    pub client_info: Option<ClientInfo>,
}

/// Owns the mapping from session id to [`Session`].
///
/// Lives inside the HTTP server state, so its lifetime is the server's.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        // The map holds plain data, so a panic elsewhere cannot leave it
        // half-updated.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a new session and returns it.
    pub fn create(&self, protocol_version: &str, client_info: Option<ClientInfo>) -> Session {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            protocol_version: protocol_version.to_string(),
            client_info,
        };
        self.lock().insert(session.id.clone(), session.clone());
        tracing::info!(session_id = %session.id, "Session created");
        session
    }

    /// Returns a copy of session `id`, if live.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Session> {
        self.lock().get(id).cloned()
    }

    /// Returns `true` if session `id` is live.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    /// Ends session `id`. Returns the removed session, or `None` if it was
    /// not live.
    pub fn remove(&self, id: &str) -> Option<Session> {
        let removed = self.lock().remove(id);
        if removed.is_some() {
            tracing::info!(session_id = %id, "Session terminated");
        }
        removed
    }

    /// Returns the number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no session is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
