//! In-memory session store.
//!
//! Keeps session snapshots in a HashMap behind an RwLock. The kiosk
//! deployment runs a single server, so this is the default store; the
//! port leaves room for a database-backed replacement.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::GameSession;
use crate::ports::SessionStore;

/// In-memory store for game sessions.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, GameSession>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Removes every stored session (useful for tests).
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }

    /// Number of stored sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, session: &GameSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<GameSession>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), DomainError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}
