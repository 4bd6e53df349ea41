//! Consultation report: folding a session into report data, rendering it, and saving it.

mod pdf;
mod text;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::ReportFormat;
use crate::models::{PatientProfile, ReplyPayload, Session};

pub use pdf::PdfReportRenderer;
pub use text::TextReportRenderer;

const MAX_REPORT_TREATMENTS: usize = 5;

pub const REPORT_RECOMMENDATIONS: &[&str] = &[
    "Follow up with healthcare provider for proper evaluation",
    "Monitor symptoms as discussed during consultation",
    "Complete any recommended treatments as appropriate",
    "Seek emergency care if symptoms worsen suddenly",
    "Maintain open communication with healthcare providers",
];

pub const REPORT_DISCLAIMER: &str = "This report is generated by an AI medical assistant and is for informational purposes only. It is not a substitute for professional medical advice, diagnosis, or treatment. Always seek the advice of your physician or other qualified health provider with any questions you may have regarding a medical condition. In case of emergency, call your local emergency number or go to the nearest emergency room immediately.";

#[derive(Debug, Error)]
pub enum ReportRenderError {
    #[error("pdf rendering failed: {0}")]
    Pdf(String),
    #[error("report io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("report rendering task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub patient: PatientProfile,
    pub consultation_date: DateTime<Utc>,
    pub symptoms: Vec<String>,
    pub diagnoses: Vec<String>,
    pub treatments: Vec<String>,
    pub recommendations: Vec<String>,
    pub summary: String,
    pub assistant_name: String,
}

pub trait ReportRenderer: Send + Sync {
    fn format(&self) -> ReportFormat;

    fn render(&self, report: &ReportData) -> Result<Vec<u8>, ReportRenderError>;
}

pub fn renderer_for(format: ReportFormat) -> Box<dyn ReportRenderer> {
    match format {
        ReportFormat::Pdf => Box::new(PdfReportRenderer),
        ReportFormat::Text => Box::new(TextReportRenderer),
    }
}

/// Runs the renderer on the blocking pool so layout work never stalls the async workers.
pub async fn render_report(
    renderer: Arc<dyn ReportRenderer>,
    report: ReportData,
) -> Result<Vec<u8>, ReportRenderError> {
    tokio::task::spawn_blocking(move || renderer.render(&report))
        .await
        .map_err(|err| ReportRenderError::Task(err.to_string()))?
}

/// Walks the turn history in order. Symptoms, diagnoses, and treatments keep their first
/// appearance; treatments are capped.
pub fn assemble_report(session: &Session, assistant_name: &str, now: DateTime<Utc>) -> ReportData {
    let mut symptoms: Vec<String> = Vec::new();
    let mut diagnoses: Vec<String> = Vec::new();
    let mut treatments: Vec<String> = Vec::new();

    for payload in session.turns.iter().filter_map(|turn| turn.payload.as_ref()) {
        match payload {
            ReplyPayload::Diagnosis(diagnosis) => {
                for symptom in &diagnosis.analysis.symptoms {
                    push_unique(&mut symptoms, symptom);
                }
                if let Some(suggested) = diagnosis.suggested_diagnosis.as_deref() {
                    push_unique(&mut diagnoses, suggested);
                }
                for treatment in &diagnosis.treatments {
                    push_unique(&mut treatments, &treatment.name);
                }
            }
            ReplyPayload::TreatmentInfo(info) => {
                for medication in &info.medications {
                    push_unique(&mut treatments, &medication.name);
                }
                if let Some(plan) = &info.plan {
                    for treatment in &plan.treatments {
                        push_unique(&mut treatments, treatment);
                    }
                }
            }
            _ => {}
        }
    }
    treatments.truncate(MAX_REPORT_TREATMENTS);

    let summary =
        consultation_summary(&session.patient, &symptoms, &diagnoses, assistant_name, now);

    ReportData {
        patient: session.patient.clone(),
        consultation_date: now,
        symptoms,
        diagnoses,
        treatments,
        recommendations: REPORT_RECOMMENDATIONS
            .iter()
            .map(ToString::to_string)
            .collect(),
        summary,
        assistant_name: assistant_name.to_string(),
    }
}

fn consultation_summary(
    patient: &PatientProfile,
    symptoms: &[String],
    diagnoses: &[String],
    assistant_name: &str,
    now: DateTime<Utc>,
) -> String {
    let symptoms = if symptoms.is_empty() {
        "None specified".to_string()
    } else {
        symptoms.join(", ")
    };
    let diagnoses = if diagnoses.is_empty() {
        "Requires further evaluation".to_string()
    } else {
        diagnoses.join(", ")
    };

    format!(
        "Medical consultation on {date} for {name}. Symptoms discussed: {symptoms}. Possible diagnoses: {diagnoses}. AI-assisted consultation completed with {assistant_name}; the assessment is based on the symptoms described and the patient history provided.",
        date = now.format("%Y-%m-%d %H:%M"),
        name = patient.display_name(),
    )
}

fn push_unique(items: &mut Vec<String>, candidate: &str) {
    if !items.iter().any(|existing| existing == candidate) {
        items.push(candidate.to_string());
    }
}

pub fn report_file_name(session_id: Uuid, now: DateTime<Utc>, format: ReportFormat) -> String {
    format!(
        "medical_report_{session_id}_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Writes the rendered bytes under `dir`, creating it when missing.
pub async fn save_report(
    dir: &Path,
    file_name: &str,
    bytes: &[u8],
) -> Result<PathBuf, ReportRenderError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Accepts only names this module produces, so a request path can never leave the reports
/// directory.
pub fn is_report_file_name(file_name: &str) -> bool {
    file_name.starts_with("medical_report_")
        && (file_name.ends_with(".pdf") || file_name.ends_with(".txt"))
        && file_name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
        && !file_name.contains("..")
}

fn text_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback)
}
