use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::models::{ConversationTurn, PatientProfile, Session};

use super::{SessionStore, SessionStoreError};

const MAX_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Default)]
struct StoreState {
    sessions: HashMap<Uuid, Session>,
    /// Least recently used first.
    order: VecDeque<Uuid>,
}

impl StoreState {
    fn touch(&mut self, session_id: Uuid) {
        self.order.retain(|id| *id != session_id);
        self.order.push_back(session_id);
    }

    fn remove(&mut self, session_id: Uuid) {
        self.sessions.remove(&session_id);
        self.order.retain(|id| *id != session_id);
    }
}

/// Process-local store bounded by capacity (least recently used evicted first) and idle TTL.
#[derive(Debug)]
pub struct InMemorySessionStore {
    capacity: usize,
    ttl: Duration,
    max_turns: usize,
    state: Mutex<StoreState>,
}

impl InMemorySessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        let ttl_seconds = i64::try_from(config.ttl_seconds.min(MAX_TTL_SECONDS)).unwrap_or(0);
        Self {
            capacity: config.capacity.max(1),
            ttl: Duration::seconds(ttl_seconds),
            max_turns: config.max_turns,
            state: Mutex::new(StoreState::default()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(session.last_active_at) >= self.ttl
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(
        &self,
        patient: PatientProfile,
        greeting: Option<ConversationTurn>,
        now: DateTime<Utc>,
    ) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            patient,
            turns: greeting.into_iter().collect(),
            created_at: now,
            last_active_at: now,
        };

        let mut state = self.lock_state();
        while state.sessions.len() >= self.capacity {
            let Some(oldest) = state.order.pop_front() else {
                break;
            };
            state.sessions.remove(&oldest);
            debug!(session_id = %oldest, "evicted least recently used session");
        }
        state.sessions.insert(session.id, session.clone());
        state.order.push_back(session.id);
        session
    }

    fn get(&self, session_id: Uuid, now: DateTime<Utc>) -> Option<Session> {
        let mut state = self.lock_state();
        let expired = self.is_expired(state.sessions.get(&session_id)?, now);
        if expired {
            state.remove(session_id);
            return None;
        }

        state.touch(session_id);
        let session = state.sessions.get_mut(&session_id)?;
        session.last_active_at = now;
        Some(session.clone())
    }

    fn append_exchange(
        &self,
        session_id: Uuid,
        user_turn: ConversationTurn,
        assistant_turn: ConversationTurn,
        now: DateTime<Utc>,
    ) -> Result<usize, SessionStoreError> {
        let mut state = self.lock_state();
        let expired = match state.sessions.get(&session_id) {
            Some(session) => self.is_expired(session, now),
            None => return Err(SessionStoreError::NotFound(session_id)),
        };
        if expired {
            state.remove(session_id);
            return Err(SessionStoreError::NotFound(session_id));
        }

        state.touch(session_id);
        let session = state
            .sessions
            .get_mut(&session_id)
            .ok_or(SessionStoreError::NotFound(session_id))?;
        session.turns.push(user_turn);
        session.turns.push(assistant_turn);
        if session.turns.len() > self.max_turns {
            let overflow = session.turns.len() - self.max_turns;
            session.turns.drain(..overflow);
        }
        session.last_active_at = now;
        Ok(session.turns.len())
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut state = self.lock_state();
        let expired: Vec<Uuid> = state
            .sessions
            .values()
            .filter(|session| self.is_expired(session, now))
            .map(|session| session.id)
            .collect();
        for session_id in &expired {
            state.remove(*session_id);
        }
        expired.len()
    }

    fn len(&self) -> usize {
        self.lock_state().sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::InMemorySessionStore;
    use crate::config::SessionConfig;
    use crate::models::{AssistantReply, ConversationTurn, PatientProfile, ReplyPayload};
    use crate::sessions::{SessionStore, SessionStoreError};

    fn store(capacity: usize, ttl_seconds: u64, max_turns: usize) -> InMemorySessionStore {
        InMemorySessionStore::new(&SessionConfig {
            capacity,
            ttl_seconds,
            max_turns,
            ..SessionConfig::default()
        })
    }

    fn reply(message: &str) -> AssistantReply {
        AssistantReply {
            message: message.to_string(),
            payload: ReplyPayload::General,
        }
    }

    #[test]
    fn history_never_exceeds_turn_limit() {
        let store = store(10, 3_600, 20);
        let now = Utc::now();
        let session = store.create(PatientProfile::default(), None, now);

        for index in 0..25 {
            let retained = store
                .append_exchange(
                    session.id,
                    ConversationTurn::user(format!("message {index}"), now),
                    ConversationTurn::assistant(&reply("ok"), now),
                    now,
                )
                .expect("session exists");
            assert!(retained <= 20);
        }

        let snapshot = store.get(session.id, now).expect("session exists");
        assert_eq!(snapshot.turns.len(), 20);
        assert_eq!(snapshot.turns[0].message, "message 15");
    }

    #[test]
    fn evicts_least_recently_used_session_at_capacity() {
        let store = store(2, 3_600, 20);
        let now = Utc::now();
        let first = store.create(PatientProfile::default(), None, now);
        let second = store.create(PatientProfile::default(), None, now);

        assert!(store.get(first.id, now).is_some());
        let third = store.create(PatientProfile::default(), None, now);

        assert_eq!(store.len(), 2);
        assert!(store.get(second.id, now).is_none());
        assert!(store.get(first.id, now).is_some());
        assert!(store.get(third.id, now).is_some());
    }

    #[test]
    fn idle_sessions_expire() {
        let store = store(10, 60, 20);
        let now = Utc::now();
        let idle = store.create(PatientProfile::default(), None, now);
        let active = store.create(PatientProfile::default(), None, now);

        let later = now + Duration::seconds(45);
        assert!(store.get(active.id, later).is_some());

        let purged = store.purge_expired(now + Duration::seconds(61));
        assert_eq!(purged, 1);
        assert!(store.get(idle.id, later).is_none());
        assert!(store.get(active.id, now + Duration::seconds(61)).is_some());
    }

    #[test]
    fn appending_to_unknown_session_fails() {
        let store = store(10, 60, 20);
        let now = Utc::now();
        let missing = Uuid::new_v4();
        let err = store
            .append_exchange(
                missing,
                ConversationTurn::user("hello", now),
                ConversationTurn::assistant(&reply("hi"), now),
                now,
            )
            .expect_err("unknown session");
        assert_eq!(err, SessionStoreError::NotFound(missing));
    }
}
