use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ApiConfig, ReportFormat};
use crate::knowledge::{DISEASES, DiseaseRecord, medication_mentions, normalize_term};
use crate::llm::{
    TextGenerationError, TextGenerationRequest, TextGenerator, diagnosis_summary_request,
    general_chat_request, symptom_narrative_request,
};
use crate::models::{
    AssistantReply, DiagnosisPayload, PatientProfile, ReplyPayload, Session, TreatmentInfoPayload,
};
use crate::treatment::{DiagnosisInput, MedicationLookupError, medication_info, treatment_plan};
use crate::triage::{MatchMode, SymptomExtractor, SymptomMatcher, build_recommendations};

use super::pain::extract_pain_details;
use super::router::{RouteCategory, RouteInput, route};
use super::templates;
use super::{Persona, PersonaKind};

const MAX_MEDICATION_MENTIONS: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandlerError {
    #[error("message is empty")]
    EmptyMessage,
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub match_mode: MatchMode,
    pub match_threshold: f64,
    pub persona: PersonaKind,
    pub generation_timeout: Duration,
    pub report_format: ReportFormat,
}

impl EngineSettings {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            match_mode: config.triage.match_mode,
            match_threshold: config.triage.match_threshold,
            persona: config.persona,
            generation_timeout: Duration::from_millis(config.generation_timeout_ms),
            report_format: config.report_format,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::default(),
            match_threshold: 0.2,
            persona: PersonaKind::default(),
            generation_timeout: Duration::from_secs(20),
            report_format: ReportFormat::Pdf,
        }
    }
}

/// Routes a message to its handler and builds the reply. Handlers never fail outward: text
/// generation problems fall back to canned replies, anything else becomes the error reply.
#[derive(Clone)]
pub struct ConversationEngine {
    extractor: SymptomExtractor,
    matcher: SymptomMatcher,
    generator: Arc<dyn TextGenerator>,
    persona: Persona,
    generation_timeout: Duration,
    report_format: ReportFormat,
}

impl ConversationEngine {
    pub fn new(settings: EngineSettings, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            extractor: SymptomExtractor::new(settings.match_mode),
            matcher: SymptomMatcher::new(settings.match_threshold),
            generator,
            persona: settings.persona.persona(),
            generation_timeout: settings.generation_timeout,
            report_format: settings.report_format,
        }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn extractor(&self) -> &SymptomExtractor {
        &self.extractor
    }

    pub fn matcher(&self) -> &SymptomMatcher {
        &self.matcher
    }

    pub fn welcome_message(&self, patient: &PatientProfile, hour: u32) -> String {
        templates::welcome_message(&self.persona, patient, hour)
    }

    pub async fn respond(
        &self,
        session: &Session,
        message: &str,
        today: NaiveDate,
    ) -> AssistantReply {
        match self.dispatch(session, message, today).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(session_id = %session.id, error = %err, "conversation handler failed");
                AssistantReply {
                    message: templates::error_reply(session.patient.display_name()),
                    payload: ReplyPayload::Error,
                }
            }
        }
    }

    async fn dispatch(
        &self,
        session: &Session,
        message: &str,
        today: NaiveDate,
    ) -> Result<AssistantReply, HandlerError> {
        if message.trim().is_empty() {
            return Err(HandlerError::EmptyMessage);
        }

        let text = normalize_term(message);
        let symptoms = self.extractor.extract_from_message(message);
        let category = route(&RouteInput {
            text: &text,
            symptoms: &symptoms,
            mode: self.extractor.mode(),
        });
        debug!(session_id = %session.id, category = ?category, "routed chat message");

        let name = session.patient.display_name();
        let reply = match category {
            RouteCategory::Emergency => {
                let (message, payload) = templates::emergency_reply(name);
                AssistantReply {
                    message,
                    payload: ReplyPayload::Emergency(payload),
                }
            }
            RouteCategory::Symptoms => self.symptoms_reply(session, message).await,
            RouteCategory::Treatment => self.treatment_reply(session, message, today),
            RouteCategory::Report => {
                let (message, payload) =
                    templates::report_info_reply(name, self.report_format.label());
                AssistantReply {
                    message,
                    payload: ReplyPayload::ReportInfo(payload),
                }
            }
            RouteCategory::Thanks => general(templates::thanks_reply(
                &self.persona,
                name,
                last_diagnosis(session),
            )),
            RouteCategory::Greeting => general(templates::greeting_reply(
                &self.persona,
                name,
                session.turns.len(),
            )),
            RouteCategory::HowAreYou => general(templates::how_are_you_reply(&self.persona, name)),
            RouteCategory::Goodbye => AssistantReply {
                message: templates::goodbye_reply(&self.persona, name),
                payload: ReplyPayload::Goodbye,
            },
            RouteCategory::Pain => {
                let details = extract_pain_details(message, self.extractor.mode());
                let (message, payload) = templates::pain_reply(name, details);
                AssistantReply {
                    message,
                    payload: ReplyPayload::PainAssessment(payload),
                }
            }
            RouteCategory::General => {
                let request =
                    general_chat_request(&self.persona, &session.patient, &session.turns, message)
                        .with_requester_id(session.id.to_string());
                general(
                    self.generate_text(request)
                        .await
                        .unwrap_or_else(|| templates::GENERAL_FALLBACK_MESSAGE.to_string()),
                )
            }
        };

        Ok(reply)
    }

    async fn symptoms_reply(&self, session: &Session, message: &str) -> AssistantReply {
        let patient = &session.patient;
        let symptoms = self.extractor.extract(message, &session.turns);
        let analysis = self.matcher.analyze(&symptoms, patient.age);
        let recommendations = build_recommendations(&analysis, patient);
        let suggested_diagnosis = analysis.top_match().map(|top| top.disease.clone());

        let request = symptom_narrative_request(&self.persona, patient, &analysis, message)
            .with_requester_id(session.id.to_string());
        let narrative = match self.generate_text(request).await {
            Some(text) => text,
            None => templates::symptom_fallback_narrative(
                patient.display_name(),
                &analysis.symptoms,
                suggested_diagnosis.as_deref(),
                &analysis.recommended_actions,
            ),
        };

        AssistantReply {
            message: narrative,
            payload: ReplyPayload::Diagnosis(Box::new(DiagnosisPayload {
                analysis,
                suggested_diagnosis,
                suggested_tests: recommendations.tests,
                treatments: recommendations.treatments,
                self_care: recommendations.self_care,
                follow_up: recommendations.follow_up,
                symptom_tracking: recommendations.symptom_tracking,
            })),
        }
    }

    fn treatment_reply(
        &self,
        session: &Session,
        message: &str,
        today: NaiveDate,
    ) -> AssistantReply {
        let name = session.patient.display_name();
        let mode = self.extractor.mode();

        let mentions = medication_mentions(message, mode);
        if !mentions.is_empty() {
            let mut payload = TreatmentInfoPayload::default();
            for mention in mentions.iter().take(MAX_MEDICATION_MENTIONS) {
                match medication_info(mention) {
                    Ok(info) => payload.medications.push(info),
                    Err(MedicationLookupError::NotFound(unlisted)) => {
                        payload.unlisted_medications.push(unlisted)
                    }
                }
            }
            let found: Vec<String> = payload
                .medications
                .iter()
                .map(|info| info.name.clone())
                .collect();
            return AssistantReply {
                message: templates::medication_reply(name, &found, &payload.unlisted_medications),
                payload: ReplyPayload::TreatmentInfo(payload),
            };
        }

        if let Some(disease) = mentioned_disease(message, mode) {
            let diagnosis = DiagnosisInput {
                primary_diagnosis: Some(disease.name.to_string()),
                symptoms: disease.symptoms.iter().map(ToString::to_string).collect(),
                severity: Some(disease.severity),
            };
            let plan = treatment_plan(&diagnosis, &session.patient, self.persona.name, today);
            return AssistantReply {
                message: templates::treatment_plan_reply(name, &plan.name),
                payload: ReplyPayload::TreatmentInfo(TreatmentInfoPayload {
                    plan: Some(plan),
                    ..TreatmentInfoPayload::default()
                }),
            };
        }

        AssistantReply {
            message: templates::treatment_general_reply(name),
            payload: ReplyPayload::TreatmentInfo(TreatmentInfoPayload {
                general_advice: templates::GENERAL_TREATMENT_ADVICE
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                ..TreatmentInfoPayload::default()
            }),
        }
    }

    /// Short narrative for the structured diagnosis endpoint.
    pub async fn diagnosis_summary(
        &self,
        patient: &PatientProfile,
        symptoms: &[String],
        conditions: &[String],
    ) -> String {
        let request = diagnosis_summary_request(patient, symptoms, conditions);
        self.generate_text(request)
            .await
            .unwrap_or_else(|| templates::DIAGNOSIS_SUMMARY_FALLBACK.to_string())
    }

    /// `None` when the generator fails, times out, or returns nothing usable.
    async fn generate_text(&self, request: TextGenerationRequest) -> Option<String> {
        match tokio::time::timeout(self.generation_timeout, self.generator.generate(request)).await
        {
            Ok(Ok(response)) => {
                let text = response.text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Ok(Err(TextGenerationError::Unavailable)) => None,
            Ok(Err(err)) => {
                warn!(error = %err, "text generation failed; using fallback reply");
                None
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.generation_timeout.as_millis() as u64,
                    "text generation timed out; using fallback reply"
                );
                None
            }
        }
    }
}

fn general(message: String) -> AssistantReply {
    AssistantReply {
        message,
        payload: ReplyPayload::General,
    }
}

fn last_diagnosis(session: &Session) -> Option<&str> {
    session
        .turns
        .iter()
        .rev()
        .find_map(|turn| match turn.payload.as_ref()? {
            ReplyPayload::Diagnosis(diagnosis) => Some(diagnosis.suggested_diagnosis.as_deref()),
            _ => None,
        })
        .flatten()
}

fn mentioned_disease(message: &str, mode: MatchMode) -> Option<&'static DiseaseRecord> {
    let text = normalize_term(message);
    DISEASES.iter().find(|disease| {
        mode.contains(&text, &normalize_term(disease.key))
            || mode.contains(&text, &normalize_term(disease.name))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::{ConversationEngine, EngineSettings};
    use crate::llm::{
        TextGenerationError, TextGenerationFuture, TextGenerationRequest, TextGenerationResponse,
        TextGenerator, UnavailableTextGenerator,
    };
    use crate::models::{AssistantReply, ConversationTurn, PatientProfile, ReplyPayload, Session};

    struct CannedGenerator {
        text: String,
        requests: Mutex<Vec<TextGenerationRequest>>,
    }

    impl CannedGenerator {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for CannedGenerator {
        fn generate<'a>(&'a self, request: TextGenerationRequest) -> TextGenerationFuture<'a> {
            Box::pin(async move {
                self.requests.lock().expect("lock").push(request);
                Ok(TextGenerationResponse {
                    model: "stub".to_string(),
                    provider_request_id: None,
                    text: self.text.clone(),
                    usage: None,
                })
            })
        }
    }

    struct StalledGenerator;

    impl TextGenerator for StalledGenerator {
        fn generate<'a>(&'a self, _request: TextGenerationRequest) -> TextGenerationFuture<'a> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Err(TextGenerationError::Timeout)
            })
        }
    }

    fn session(name: &str) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            patient: PatientProfile {
                name: Some(name.to_string()),
                age: Some(30),
                ..PatientProfile::default()
            },
            turns: Vec::new(),
            created_at: now,
            last_active_at: now,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
    }

    fn offline_engine() -> ConversationEngine {
        ConversationEngine::new(EngineSettings::default(), Arc::new(UnavailableTextGenerator))
    }

    #[tokio::test]
    async fn emergency_beats_symptom_words() {
        let reply = offline_engine()
            .respond(&session("Ana"), "I have chest pain, is this a heart attack?", today())
            .await;
        let ReplyPayload::Emergency(payload) = reply.payload else {
            panic!("expected emergency reply, got {:?}", reply.payload.type_tag());
        };
        assert_eq!(payload.emergency_number, "911");
        assert_eq!(payload.contacts.len(), 3);
    }

    #[tokio::test]
    async fn symptom_messages_get_a_diagnosis_with_fallback_narrative() {
        let reply = offline_engine()
            .respond(
                &session("Ana"),
                "I have a runny nose, sneezing, congestion, a sore throat and a cough",
                today(),
            )
            .await;
        let ReplyPayload::Diagnosis(diagnosis) = reply.payload else {
            panic!("expected diagnosis reply");
        };
        assert_eq!(diagnosis.suggested_diagnosis.as_deref(), Some("Common Cold"));
        assert!(reply.message.starts_with("Thank you for sharing that with me, Ana."));
        assert!(!diagnosis.suggested_tests.is_empty());
    }

    #[tokio::test]
    async fn symptom_narrative_comes_from_the_generator_when_available() {
        let generator = Arc::new(CannedGenerator::new("  Let's look at that fever together.  "));
        let engine = ConversationEngine::new(EngineSettings::default(), generator.clone());
        let session = session("Ana");

        let reply = engine.respond(&session, "I've had a fever since yesterday", today()).await;

        assert_eq!(reply.message, "Let's look at that fever together.");
        let requests = generator.requests.lock().expect("lock");
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].requester_id.as_deref(),
            Some(session.id.to_string().as_str())
        );
        assert_eq!(requests[0].max_tokens, 400);
    }

    #[tokio::test]
    async fn open_ended_messages_fall_back_when_generation_stalls() {
        let settings = EngineSettings {
            generation_timeout: Duration::from_millis(20),
            ..EngineSettings::default()
        };
        let engine = ConversationEngine::new(settings, Arc::new(StalledGenerator));

        let reply = engine
            .respond(&session("Ana"), "Is coffee good for you?", today())
            .await;

        assert!(matches!(reply.payload, ReplyPayload::General));
        assert!(reply.message.starts_with("I understand you're reaching out"));
    }

    #[tokio::test]
    async fn medication_questions_report_catalogue_and_unlisted_drugs() {
        let reply = offline_engine()
            .respond(
                &session("Ana"),
                "Can I take Tylenol with my warfarin medication?",
                today(),
            )
            .await;
        let ReplyPayload::TreatmentInfo(info) = reply.payload else {
            panic!("expected treatment info");
        };
        assert_eq!(info.medications.len(), 1);
        assert_eq!(info.medications[0].name.to_lowercase(), "acetaminophen");
        assert_eq!(info.unlisted_medications, vec!["warfarin"]);
    }

    #[tokio::test]
    async fn disease_treatment_questions_return_a_plan() {
        let reply = offline_engine()
            .respond(&session("Ana"), "What is the treatment for influenza?", today())
            .await;
        let ReplyPayload::TreatmentInfo(info) = reply.payload else {
            panic!("expected treatment info");
        };
        let plan = info.plan.expect("plan present");
        assert_eq!(plan.name, "Influenza (Flu)");
        assert_eq!(plan.patient_name, "Ana");
    }

    #[tokio::test]
    async fn thanks_mentions_the_last_suggested_diagnosis() {
        let engine = offline_engine();
        let mut session = session("Ana");
        let now = Utc::now();

        let diagnosis = engine
            .respond(&session, "runny nose, sneezing and congestion", today())
            .await;
        session.turns.push(ConversationTurn::user("runny nose", now));
        session.turns.push(ConversationTurn::assistant(&diagnosis, now));

        let reply = engine.respond(&session, "thanks so much", today()).await;
        assert!(reply.message.contains("common cold"));
    }

    #[tokio::test]
    async fn empty_messages_produce_the_error_reply() {
        let AssistantReply { message, payload } =
            offline_engine().respond(&session("Ana"), "   ", today()).await;
        assert!(matches!(payload, ReplyPayload::Error));
        assert!(message.starts_with("I apologize, Ana."));
    }

    #[tokio::test]
    async fn pain_messages_carry_extracted_details() {
        let reply = offline_engine()
            .respond(&session("Ana"), "my knee hurts, maybe 6/10", today())
            .await;
        let ReplyPayload::PainAssessment(pain) = reply.payload else {
            panic!("expected pain assessment");
        };
        assert_eq!(pain.severity_score, Some(6));
        assert_eq!(pain.follow_up_questions.len(), 5);
    }

    #[tokio::test]
    async fn diagnosis_summary_falls_back_without_generator() {
        let summary = offline_engine()
            .diagnosis_summary(&PatientProfile::default(), &["fever".to_string()], &[])
            .await;
        assert!(summary.starts_with("Based on the symptoms described"));
    }
}
