use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use shared::models::{TreatmentRequest, TreatmentSearchQuery, TreatmentSearchResponse};
use shared::treatment::{MedicationLookupError, medication_info, search_treatments};
use tracing::debug;

use super::AppState;
use super::errors::{bad_request_response, not_found_response};

pub(super) async fn treatment_plan(
    State(state): State<AppState>,
    Json(req): Json<TreatmentRequest>,
) -> Response {
    let Some(diagnosis) = req.diagnosis.as_ref().filter(|diagnosis| {
        diagnosis
            .primary_diagnosis
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
            || !diagnosis.symptoms.is_empty()
    }) else {
        return bad_request_response("missing_diagnosis", "A diagnosis is required");
    };

    let plan = shared::treatment::treatment_plan(
        diagnosis,
        &req.patient_data,
        state.engine.persona().name,
        Utc::now().date_naive(),
    );
    (StatusCode::OK, Json(plan)).into_response()
}

pub(super) async fn medication(Path(name): Path<String>) -> Response {
    match medication_info(&name) {
        Ok(info) => (StatusCode::OK, Json(info)).into_response(),
        Err(MedicationLookupError::NotFound(name)) => {
            debug!(medication = %name, "medication lookup missed");
            not_found_response(
                "medication_not_found",
                &format!("No information available for {name}"),
            )
        }
    }
}

pub(super) async fn search(Query(query): Query<TreatmentSearchQuery>) -> Response {
    let Some(keyword) = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
    else {
        return bad_request_response("missing_query", "Query parameter q is required");
    };

    (
        StatusCode::OK,
        Json(TreatmentSearchResponse {
            query: keyword.to_string(),
            results: search_treatments(keyword),
        }),
    )
        .into_response()
}
