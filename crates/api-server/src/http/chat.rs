use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use shared::models::{ChatRequest, ChatResponse, ConversationTurn};
use tracing::{debug, warn};

use super::AppState;
use super::errors::{bad_request_response, invalid_session_response, parse_session_id};

pub(super) async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    let Some(message) = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|message| !message.is_empty())
    else {
        return bad_request_response("missing_message", "message is required");
    };
    let session_id = match parse_session_id(req.session_id.as_deref()) {
        Ok(session_id) => session_id,
        Err(response) => return response,
    };

    let now = Utc::now();
    let Some(session) = state.sessions.get(session_id, now) else {
        return invalid_session_response();
    };

    let reply = state.engine.respond(&session, message, now.date_naive()).await;
    let response_type = reply.payload.type_tag();

    match state.sessions.append_exchange(
        session_id,
        ConversationTurn::user(message, now),
        ConversationTurn::assistant(&reply, Utc::now()),
        Utc::now(),
    ) {
        Ok(retained_turns) => {
            debug!(%session_id, response_type, retained_turns, "chat exchange recorded");
        }
        Err(err) => {
            warn!(%session_id, "chat exchange not recorded: {err}");
        }
    }

    (
        StatusCode::OK,
        Json(ChatResponse {
            response: reply,
            session_id,
        }),
    )
        .into_response()
}
