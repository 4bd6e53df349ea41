use std::io::ErrorKind;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use shared::config::ReportFormat;
use shared::models::{GenerateReportRequest, GenerateReportResponse};
use shared::report::{
    assemble_report, is_report_file_name, render_report, report_file_name, save_report,
};
use tracing::{error, info};

use super::AppState;
use super::errors::{invalid_session_response, not_found_response, parse_session_id};

pub(super) async fn generate_report(
    State(state): State<AppState>,
    Json(req): Json<GenerateReportRequest>,
) -> Response {
    let session_id = match parse_session_id(req.session_id.as_deref()) {
        Ok(session_id) => session_id,
        Err(response) => return response,
    };

    let now = Utc::now();
    let Some(session) = state.sessions.get(session_id, now) else {
        return invalid_session_response();
    };

    let report = assemble_report(&session, state.engine.persona().name, now);
    let renderer = Arc::clone(&state.report_renderer);
    let file_name = report_file_name(session_id, now, renderer.format());

    let saved = match render_report(renderer, report).await {
        Ok(bytes) => save_report(&state.reports_dir, &file_name, &bytes).await,
        Err(err) => Err(err),
    };

    let body = match saved {
        Ok(path) => {
            info!(%session_id, path = %path.display(), "report generated");
            GenerateReportResponse {
                report_url: Some(format!("/reports/{file_name}")),
                message: "Report generated successfully".to_string(),
            }
        }
        Err(err) => {
            error!(%session_id, "report generation failed: {err}");
            GenerateReportResponse {
                report_url: None,
                message: "The report could not be generated right now. Please try again shortly."
                    .to_string(),
            }
        }
    };

    (StatusCode::OK, Json(body)).into_response()
}

pub(super) async fn download_report(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Response {
    if !is_report_file_name(&filename) {
        return not_found_response("report_not_found", "Report not found");
    }

    let bytes = match tokio::fs::read(state.reports_dir.join(&filename)).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return not_found_response("report_not_found", "Report not found");
        }
        Err(err) => {
            error!(file = %filename, "failed to read report: {err}");
            return not_found_response("report_not_found", "Report not found");
        }
    };

    let content_type = if filename.ends_with(ReportFormat::Pdf.extension()) {
        "application/pdf"
    } else {
        "text/plain; charset=utf-8"
    };

    let mut response = (StatusCode::OK, bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    let disposition = format!("attachment; filename=\"{filename}\"");
    if let Ok(disposition) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }
    response
}
