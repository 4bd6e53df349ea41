use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ConversationTurn, PatientProfile, Session};

mod memory;

pub use memory::InMemorySessionStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionStoreError {
    #[error("session not found: {0}")]
    NotFound(Uuid),
}

/// Conversation state keyed by session id. Implementations evict idle sessions; an expired
/// session behaves exactly like an unknown one.
pub trait SessionStore: Send + Sync {
    /// `greeting` becomes the first turn when present.
    fn create(
        &self,
        patient: PatientProfile,
        greeting: Option<ConversationTurn>,
        now: DateTime<Utc>,
    ) -> Session;

    /// Returns a snapshot and marks the session as recently used.
    fn get(&self, session_id: Uuid, now: DateTime<Utc>) -> Option<Session>;

    /// Appends a user turn and its reply as one step, then keeps only the most recent turns.
    /// Returns the retained turn count.
    fn append_exchange(
        &self,
        session_id: Uuid,
        user_turn: ConversationTurn,
        assistant_turn: ConversationTurn,
        now: DateTime<Utc>,
    ) -> Result<usize, SessionStoreError>;

    /// Drops sessions idle past their TTL. Returns how many were removed.
    fn purge_expired(&self, now: DateTime<Utc>) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
