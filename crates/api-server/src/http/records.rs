use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use shared::models::{SavePatientRecordRequest, SavePatientRecordResponse};
use shared::records::PatientRecord;
use tracing::{error, info};
use uuid::Uuid;

use super::AppState;
use super::errors::{
    bad_request_response, internal_error_response, invalid_session_response, not_found_response,
    parse_session_id,
};

pub(super) async fn save_patient_record(
    State(state): State<AppState>,
    Json(req): Json<SavePatientRecordRequest>,
) -> Response {
    let now = Utc::now();
    let session = match req.session_id.as_deref() {
        Some(raw) => {
            let session_id = match parse_session_id(Some(raw)) {
                Ok(session_id) => session_id,
                Err(response) => return response,
            };
            match state.sessions.get(session_id, now) {
                Some(session) => Some(session),
                None => return invalid_session_response(),
            }
        }
        None => None,
    };

    let Some(patient) = req
        .patient_data
        .or_else(|| session.as_ref().map(|session| session.patient.clone()))
    else {
        return bad_request_response("missing_patient_data", "Patient data is required");
    };

    let record = PatientRecord::new(
        patient,
        session.as_ref(),
        req.diagnosis,
        req.treatment,
        state.engine.persona().name,
        now,
    );

    let body = match state.records.save(&record).await {
        Ok(()) => {
            info!(record_id = %record.record_id, "patient record saved");
            SavePatientRecordResponse {
                record_id: Some(record.record_id.to_string()),
                message: "Patient record saved successfully".to_string(),
            }
        }
        Err(err) => {
            error!(record_id = %record.record_id, "failed to save patient record: {err}");
            SavePatientRecordResponse {
                record_id: None,
                message: "The patient record could not be saved right now. Please try again shortly."
                    .to_string(),
            }
        }
    };

    (StatusCode::OK, Json(body)).into_response()
}

pub(super) async fn patient_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> Response {
    let Ok(record_id) = Uuid::parse_str(record_id.trim()) else {
        return bad_request_response("invalid_record_id", "record_id must be a UUID");
    };

    match state.records.load(record_id).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => not_found_response("record_not_found", "Patient record not found"),
        Err(err) => {
            error!(%record_id, "failed to load patient record: {err}");
            internal_error_response(
                "record_unavailable",
                "The patient record could not be read right now",
            )
        }
    }
}
