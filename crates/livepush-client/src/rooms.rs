//! Registry of live sessions keyed by live id (multi-room runner).

use std::sync::Arc;

use dashmap::DashMap;

use crate::session::{Session, SessionState};

#[derive(Default)]
pub struct RoomRegistry {
    sessions: DashMap<String, Arc<Session>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Track a session; replaces (and returns) any session for the same live id.
    pub fn insert(&self, session: Session) -> Option<Arc<Session>> {
        self.sessions.insert(session.live_id().to_string(), Arc::new(session))
    }

    pub fn remove(&self, live_id: &str) -> Option<Arc<Session>> {
        self.sessions.remove(live_id).map(|(_, s)| s)
    }

    /// Drop sessions that already reached `Disconnected`.
    pub fn prune(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.state() == SessionState::Connected);
        before - self.sessions.len()
    }

    pub fn live_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Close every tracked session and wait for each to disconnect.
    pub async fn close_all(&self) {
        let sessions: Vec<Arc<Session>> = self
            .sessions
            .iter()
            .map(|e| Arc::clone(e.value()))
            .collect();
        self.sessions.clear();

        for s in sessions {
            if let Err(e) = s.close().await {
                tracing::debug!(live_id = %s.live_id(), error = %e, "session close failed");
            }
        }
    }
}
