//! Saved patient records: the record shape and the persistence seam.

mod file;

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{PatientProfile, ReplyPayload, Role, Session};

pub use file::FileRecordStore;

pub const RECORD_VERSION: &str = "2.0";
pub const RECORD_SYSTEM: &str = "Symptom Triage Assistant";

pub type RecordStoreFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, RecordStoreError>> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("record io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub version: String,
    pub system: String,
}

impl Default for RecordMetadata {
    fn default() -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            system: RECORD_SYSTEM.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub total_turns: usize,
    pub user_messages: usize,
    pub symptoms_discussed: Vec<String>,
    pub suggested_diagnoses: Vec<String>,
    pub response_types: Vec<String>,
}

impl ConversationSummary {
    pub fn from_session(session: &Session) -> Self {
        let mut summary = Self {
            total_turns: session.turns.len(),
            ..Self::default()
        };

        for turn in &session.turns {
            if turn.role == Role::User {
                summary.user_messages += 1;
            }
            let Some(payload) = turn.payload.as_ref() else {
                continue;
            };
            push_unique(&mut summary.response_types, payload.type_tag());
            if let ReplyPayload::Diagnosis(diagnosis) = payload {
                for symptom in &diagnosis.analysis.symptoms {
                    push_unique(&mut summary.symptoms_discussed, symptom);
                }
                if let Some(suggested) = diagnosis.suggested_diagnosis.as_deref() {
                    push_unique(&mut summary.suggested_diagnoses, suggested);
                }
            }
        }

        summary
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub record_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub patient: PatientProfile,
    pub conversation_summary: ConversationSummary,
    #[serde(default)]
    pub diagnosis: Option<Value>,
    #[serde(default)]
    pub treatment: Option<Value>,
    pub assistant: String,
    pub metadata: RecordMetadata,
}

impl PatientRecord {
    /// The conversation summary is empty when the record is saved without a session.
    pub fn new(
        patient: PatientProfile,
        session: Option<&Session>,
        diagnosis: Option<Value>,
        treatment: Option<Value>,
        assistant: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            timestamp: now,
            patient,
            conversation_summary: session
                .map(ConversationSummary::from_session)
                .unwrap_or_default(),
            diagnosis,
            treatment,
            assistant: assistant.to_string(),
            metadata: RecordMetadata::default(),
        }
    }
}

pub trait RecordStore: Send + Sync {
    fn save<'a>(&'a self, record: &'a PatientRecord) -> RecordStoreFuture<'a, ()>;

    /// `Ok(None)` when no record with that id was saved.
    fn load<'a>(&'a self, record_id: Uuid) -> RecordStoreFuture<'a, Option<PatientRecord>>;
}

fn push_unique(items: &mut Vec<String>, candidate: &str) {
    if !items.iter().any(|existing| existing == candidate) {
        items.push(candidate.to_string());
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    use super::{ConversationSummary, PatientRecord, RECORD_VERSION};
    use crate::models::{AssistantReply, ConversationTurn, PatientProfile, ReplyPayload, Session};

    fn session() -> Session {
        let now = Utc::now();
        let greeting = AssistantReply {
            message: "Hello again".to_string(),
            payload: ReplyPayload::General,
        };
        Session {
            id: Uuid::new_v4(),
            patient: PatientProfile {
                name: Some("Ana".to_string()),
                ..PatientProfile::default()
            },
            turns: vec![
                ConversationTurn::user("hi", now),
                ConversationTurn::assistant(&greeting, now),
                ConversationTurn::user("hello", now),
                ConversationTurn::assistant(&greeting, now),
            ],
            created_at: now,
            last_active_at: now,
        }
    }

    #[test]
    fn summary_counts_turns_and_response_types() {
        let summary = ConversationSummary::from_session(&session());
        assert_eq!(summary.total_turns, 4);
        assert_eq!(summary.user_messages, 2);
        assert_eq!(summary.response_types, vec!["general"]);
        assert!(summary.symptoms_discussed.is_empty());
    }

    #[test]
    fn records_carry_metadata_and_optional_summary() {
        let session = session();

        let record = PatientRecord::new(
            session.patient.clone(),
            Some(&session),
            Some(json!({"primary_diagnosis": "Common Cold"})),
            None,
            "Dr. Smith",
            Utc::now(),
        );
        assert_eq!(record.patient.display_name(), "Ana");
        assert_eq!(record.metadata.version, RECORD_VERSION);
        assert_eq!(record.conversation_summary.total_turns, 4);

        let standalone = PatientRecord::new(
            PatientProfile::default(),
            None,
            None,
            None,
            "Dr. Smith",
            Utc::now(),
        );
        assert_eq!(standalone.conversation_summary, ConversationSummary::default());
    }
}
