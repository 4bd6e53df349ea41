use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::models::{ErrorBody, ErrorResponse};
use uuid::Uuid;

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
            },
        }),
    )
        .into_response()
}

pub(super) fn bad_request_response(code: &str, message: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, code, message)
}

pub(super) fn not_found_response(code: &str, message: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, code, message)
}

pub(super) fn internal_error_response(code: &str, message: &str) -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, code, message)
}

pub(super) fn invalid_session_response() -> Response {
    bad_request_response("invalid_session", "Session is unknown or has expired")
}

/// `Err` carries the response to return: 400 when the id is missing or malformed.
pub(super) fn parse_session_id(raw: Option<&str>) -> Result<Uuid, Response> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Err(bad_request_response(
            "missing_session_id",
            "session_id is required",
        ));
    };
    Uuid::parse_str(raw).map_err(|_| invalid_session_response())
}
