use crate::conversation::Persona;
use crate::models::{ConversationTurn, PatientProfile, Role};
use crate::triage::SymptomAnalysis;

use super::generator::TextGenerationRequest;

const SUMMARY_TURNS: usize = 3;
const SUMMARY_TURN_CHARS: usize = 100;

/// Open-ended reply for messages no rule claimed.
pub fn general_chat_request(
    persona: &Persona,
    patient: &PatientProfile,
    history: &[ConversationTurn],
    message: &str,
) -> TextGenerationRequest {
    let system_prompt = format!(
        "You are {name}, a compassionate and knowledgeable AI medical assistant with a {style} bedside manner.

Patient context:
- Name: {patient_name}
- Age: {age}
- Gender: {gender}
- Medical history: {history}

Communication style:
1. Be empathetic and acknowledge how the patient may be feeling
2. Keep a natural conversational flow and avoid sounding scripted
3. Ask clarifying questions when you need more information
4. Explain things in simple, understandable language
5. End with an open question to continue the conversation

Medical guidelines:
- Always prioritize safety and suggest seeing a real doctor for serious concerns
- Never prescribe controlled substances
- Provide evidence-based information that considers age and medical history

Current conversation context: {summary}

Respond in a warm, professional, and helpful manner.",
        name = persona.name,
        style = persona.style,
        patient_name = patient.display_name(),
        age = age_label(patient),
        gender = text_or(patient.gender.as_deref(), "Not specified"),
        history = text_or(patient.medical_history.as_deref(), "None provided"),
        summary = summarize_recent_turns(history),
    );

    TextGenerationRequest::new(message, 0.8, 350)
        .with_system_prompt(system_prompt)
        .with_presence_penalty(0.3)
        .with_frequency_penalty(0.2)
}

/// Empathetic narrative that accompanies a symptom analysis.
pub fn symptom_narrative_request(
    persona: &Persona,
    patient: &PatientProfile,
    analysis: &SymptomAnalysis,
    message: &str,
) -> TextGenerationRequest {
    let system_prompt = format!(
        "You are {name}, a {style} and empathetic AI medical assistant.

Patient context:
- Name: {patient_name}
- Age: {age}
- Gender: {gender}
- Symptoms: {symptoms}
- Severity assessment: {severity}
- Urgency level: {urgency}

Your response should start with empathy, give a clear and understandable assessment, offer specific
actionable recommendations, explain when to seek emergency care, and end on an encouraging note.
Never guarantee a specific diagnosis and always recommend professional follow-up for serious symptoms.
Keep it conversational and under 300 words.",
        name = persona.name,
        style = persona.style,
        patient_name = patient.display_name(),
        age = age_label(patient),
        gender = text_or(patient.gender.as_deref(), "Not specified"),
        symptoms = analysis.symptoms.join(", "),
        severity = analysis.severity.as_str(),
        urgency = analysis.urgency.as_str(),
    );

    TextGenerationRequest::new(message, 0.75, 400)
        .with_system_prompt(system_prompt)
        .with_presence_penalty(0.2)
}

/// Short summary for the structured diagnosis endpoint.
pub fn diagnosis_summary_request(
    patient: &PatientProfile,
    symptoms: &[String],
    conditions: &[String],
) -> TextGenerationRequest {
    let prompt = format!(
        "Based on symptoms: {symptoms}
Possible conditions: {conditions}
Patient: {name}, {age}

Provide a warm, empathetic 3-4 sentence summary of the likely diagnosis and next steps. Use a comforting tone.",
        symptoms = symptoms.join(", "),
        conditions = conditions.join(", "),
        name = patient.display_name(),
        age = age_label(patient),
    );

    TextGenerationRequest::new(prompt, 0.6, 200)
}

pub(crate) fn summarize_recent_turns(history: &[ConversationTurn]) -> String {
    if history.is_empty() {
        return "First interaction with patient.".to_string();
    }

    let start = history.len().saturating_sub(SUMMARY_TURNS);
    let points: Vec<String> = history[start..]
        .iter()
        .map(|turn| {
            let speaker = match turn.role {
                Role::User => "Patient",
                Role::Assistant => "Doctor",
            };
            format!("{speaker}: {}", truncate_chars(&turn.message, SUMMARY_TURN_CHARS))
        })
        .collect();

    format!("Recent discussion: {}", points.join(" | "))
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn age_label(patient: &PatientProfile) -> String {
    patient
        .age
        .map(|age| age.to_string())
        .unwrap_or_else(|| "Not specified".to_string())
}

fn text_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback)
}
