use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{Local, Timelike, Utc};
use serde_json::Value;
use shared::models::{
    AssistantReply, ConversationTurn, PatientProfile, ReplyPayload, StartSessionResponse,
};
use tracing::info;

use super::AppState;
use super::errors::bad_request_response;

pub(super) async fn start_session(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    let has_patient_data = body.as_object().is_some_and(|fields| !fields.is_empty());
    if !has_patient_data {
        return bad_request_response("missing_patient_data", "Patient data is required");
    }
    let patient: PatientProfile = match serde_json::from_value(body) {
        Ok(patient) => patient,
        Err(_) => {
            return bad_request_response("invalid_patient_data", "Patient data is malformed");
        }
    };

    let now = Utc::now();
    let message = state
        .engine
        .welcome_message(&patient, Local::now().hour());
    let greeting = ConversationTurn::assistant(
        &AssistantReply {
            message: message.clone(),
            payload: ReplyPayload::General,
        },
        now,
    );

    let session = state.sessions.create(patient, Some(greeting), now);
    info!(session_id = %session.id, active_sessions = state.sessions.len(), "session started");

    (
        StatusCode::OK,
        Json(StartSessionResponse {
            session_id: session.id,
            message,
        }),
    )
        .into_response()
}
