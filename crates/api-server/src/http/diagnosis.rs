use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::knowledge::find_disease;
use shared::models::{ConditionDetail, DiagnosisRequest, DiagnosisResponse, ValidateSymptomsRequest};
use shared::triage::{suggest_tests, validate_symptoms};

use super::AppState;
use super::errors::bad_request_response;

pub(super) async fn diagnose(
    State(state): State<AppState>,
    Json(req): Json<DiagnosisRequest>,
) -> Response {
    if req.symptoms.iter().all(|symptom| symptom.trim().is_empty()) {
        return bad_request_response("missing_symptoms", "At least one symptom is required");
    }

    let patient = &req.patient_data;
    let analysis = state.engine.matcher().analyze(&req.symptoms, patient.age);

    let possible_conditions: Vec<ConditionDetail> = analysis
        .matches
        .iter()
        .filter_map(|matched| {
            let disease = find_disease(&matched.key)?;
            Some(ConditionDetail {
                name: matched.disease.clone(),
                score: matched.score,
                severity: matched.severity,
                urgency: matched.urgency,
                description: disease.description.to_string(),
                typical_recovery: disease.typical_recovery.to_string(),
                common_in: disease.common_in.iter().map(ToString::to_string).collect(),
            })
        })
        .collect();

    let condition_names: Vec<String> = possible_conditions
        .iter()
        .map(|condition| condition.name.clone())
        .collect();
    let summary = state
        .engine
        .diagnosis_summary(patient, &analysis.symptoms, &condition_names)
        .await;
    let suggested_tests = suggest_tests(&analysis.symptoms, patient.age);

    (
        StatusCode::OK,
        Json(DiagnosisResponse {
            analysis,
            possible_conditions,
            suggested_tests,
            summary,
        }),
    )
        .into_response()
}

pub(super) async fn validate(Json(req): Json<ValidateSymptomsRequest>) -> Response {
    (StatusCode::OK, Json(validate_symptoms(&req.symptoms))).into_response()
}
