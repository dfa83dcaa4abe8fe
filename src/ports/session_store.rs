//! Session store port.
//!
//! Defines the contract for persisting and retrieving GameSession
//! aggregates. The kiosk keeps sessions in memory; the port leaves room
//! for a durable backend without touching the handlers.
//!
//! # Design
//!
//! - `save` is an upsert: handlers persist snapshots after every mutation
//! - Persistence is best-effort; callers fire-and-forget and log failures

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::GameSession;
use async_trait::async_trait;

/// Store port for GameSession persistence.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Save a session snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// - `PersistenceError` on storage failure
    async fn save(&self, session: &GameSession) -> Result<(), DomainError>;

    /// Find a session by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<GameSession>, DomainError>;

    /// Delete a session (primarily for testing).
    ///
    /// # Errors
    ///
    /// - `PersistenceError` on storage failure
    async fn delete(&self, id: &SessionId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn session_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SessionStore) {}
    }
}
