use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, middleware};
use axum::routing::{get, post};
use shared::conversation::ConversationEngine;
use shared::records::RecordStore;
use shared::report::ReportRenderer;
use shared::sessions::SessionStore;

mod chat;
mod diagnosis;
mod errors;
mod health;
mod observability;
mod records;
mod reports;
mod sessions;
mod treatment;

#[derive(Clone)]
pub struct AppState {
    pub engine: ConversationEngine,
    pub sessions: Arc<dyn SessionStore>,
    pub records: Arc<dyn RecordStore>,
    pub report_renderer: Arc<dyn ReportRenderer>,
    pub reports_dir: PathBuf,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/api/start_session", post(sessions::start_session))
        .route("/api/chat", post(chat::chat))
        .route("/api/diagnosis", post(diagnosis::diagnose))
        .route("/api/symptoms/validate", post(diagnosis::validate))
        .route("/api/treatment", post(treatment::treatment_plan))
        .route("/api/medications/{name}", get(treatment::medication))
        .route("/api/treatments/search", get(treatment::search))
        .route("/api/generate_report", post(reports::generate_report))
        .route("/reports/{filename}", get(reports::download_report))
        .route("/api/save_patient_record", post(records::save_patient_record))
        .route("/api/patient_records/{record_id}", get(records::patient_record))
        .layer(middleware::from_fn(
            observability::request_logging_middleware,
        ))
        .with_state(app_state)
}
