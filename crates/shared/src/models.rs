use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::treatment::{DiagnosisInput, MedicationInfo, TreatmentPlan, TreatmentSearchHit};
use crate::triage::{
    FollowUpAdvice, SuggestedTest, SymptomAnalysis, SymptomTracking, TreatmentSuggestion,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    Variable,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
            Self::Variable => "variable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Ordering puts `High` first so an ascending sort lists the most pressing items first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_age",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PatientProfile {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("Patient")
    }

    pub fn history_mentions(&self, needle: &str) -> bool {
        self.medical_history
            .as_deref()
            .is_some_and(|history| history.to_lowercase().contains(needle))
    }
}

/// Accepts a JSON number, a numeric string, or null. Anything else is treated as unknown.
fn deserialize_optional_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|age| *age >= 0.0).map(|age| age as u64))
            .and_then(|age| u32::try_from(age).ok()),
        Some(Value::String(text)) => text.trim().parse::<u32>().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ReplyPayload>,
}

impl ConversationTurn {
    pub fn user(message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::User,
            message: message.into(),
            timestamp,
            payload: None,
        }
    }

    pub fn assistant(reply: &AssistantReply, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::Assistant,
            message: reply.message.clone(),
            timestamp,
            payload: Some(reply.payload.clone()),
        }
    }

    pub fn response_type(&self) -> Option<&'static str> {
        self.payload.as_ref().map(ReplyPayload::type_tag)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub patient: PatientProfile,
    pub turns: Vec<ConversationTurn>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    pub message: String,
    #[serde(flatten)]
    pub payload: ReplyPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ReplyPayload {
    Diagnosis(Box<DiagnosisPayload>),
    TreatmentInfo(TreatmentInfoPayload),
    Emergency(EmergencyPayload),
    ReportInfo(ReportInfoPayload),
    PainAssessment(PainAssessmentPayload),
    Goodbye,
    General,
    Error,
}

impl ReplyPayload {
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Diagnosis(_) => "diagnosis",
            Self::TreatmentInfo(_) => "treatment_info",
            Self::Emergency(_) => "emergency",
            Self::ReportInfo(_) => "report_info",
            Self::PainAssessment(_) => "pain_assessment",
            Self::Goodbye => "goodbye",
            Self::General => "general",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisPayload {
    pub analysis: SymptomAnalysis,
    pub suggested_diagnosis: Option<String>,
    pub suggested_tests: Vec<SuggestedTest>,
    pub treatments: Vec<TreatmentSuggestion>,
    pub self_care: Vec<String>,
    pub follow_up: FollowUpAdvice,
    pub symptom_tracking: SymptomTracking,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreatmentInfoPayload {
    pub medications: Vec<MedicationInfo>,
    /// Mentioned drugs with no catalogue entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unlisted_medications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<TreatmentPlan>,
    pub general_advice: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub contact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyPayload {
    pub emergency_number: String,
    pub immediate_actions: Vec<String>,
    pub contacts: Vec<EmergencyContact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInfoPayload {
    pub includes: Vec<String>,
    pub estimated_time: String,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PainAssessmentPayload {
    pub locations: Vec<String>,
    pub pain_types: Vec<String>,
    pub severity_score: Option<u8>,
    pub follow_up_questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: AssistantReply,
    pub session_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosisRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub patient_data: PatientProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionDetail {
    pub name: String,
    pub score: f64,
    pub severity: Severity,
    pub urgency: Urgency,
    pub description: String,
    pub typical_recovery: String,
    pub common_in: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisResponse {
    pub analysis: SymptomAnalysis,
    pub possible_conditions: Vec<ConditionDetail>,
    pub suggested_tests: Vec<SuggestedTest>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreatmentRequest {
    #[serde(default)]
    pub diagnosis: Option<DiagnosisInput>,
    #[serde(default)]
    pub patient_data: PatientProfile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidateSymptomsRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreatmentSearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentSearchResponse {
    pub query: String,
    pub results: Vec<TreatmentSearchHit>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateReportRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateReportResponse {
    pub report_url: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavePatientRecordRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub patient_data: Option<PatientProfile>,
    #[serde(default)]
    pub diagnosis: Option<Value>,
    #[serde(default)]
    pub treatment: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePatientRecordResponse {
    pub record_id: Option<String>,
    pub message: String,
}
