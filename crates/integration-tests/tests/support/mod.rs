#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use api_server::http::{AppState, build_router};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::{Value, json};
use shared::config::{ReportFormat, SessionConfig};
use shared::conversation::{ConversationEngine, EngineSettings};
use shared::llm::UnavailableTextGenerator;
use shared::records::FileRecordStore;
use shared::report::renderer_for;
use shared::sessions::InMemorySessionStore;
use tower::ServiceExt;
use uuid::Uuid;

/// Router wired to in-memory sessions and a scratch directory that is removed on drop.
pub struct TestApp {
    pub router: Router,
    root: PathBuf,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_report_format(ReportFormat::Pdf)
    }

    pub fn with_report_format(report_format: ReportFormat) -> Self {
        let root = std::env::temp_dir().join(format!("triage-integration-{}", Uuid::new_v4()));
        let settings = EngineSettings {
            report_format,
            ..EngineSettings::default()
        };

        let state = AppState {
            engine: ConversationEngine::new(settings, Arc::new(UnavailableTextGenerator)),
            sessions: Arc::new(InMemorySessionStore::new(&SessionConfig::default())),
            records: Arc::new(FileRecordStore::new(root.join("patient_records"))),
            report_renderer: Arc::from(renderer_for(report_format)),
            reports_dir: root.join("reports"),
        };

        Self {
            router: build_router(state),
            root,
        }
    }

    pub fn records_dir(&self) -> PathBuf {
        self.root.join("patient_records")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    pub async fn start_session(&self, patient: Value) -> Uuid {
        let response = send_json(
            &self.router,
            request(Method::POST, "/api/start_session", Some(patient)),
        )
        .await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["session_id"]
            .as_str()
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .expect("start_session should return a session id")
    }

    pub async fn chat(&self, session_id: Uuid, message: &str) -> JsonResponse {
        send_json(
            &self.router,
            request(
                Method::POST,
                "/api/chat",
                Some(json!({ "session_id": session_id, "message": message })),
            ),
        )
        .await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub struct JsonResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

pub async fn send_json(app: &Router, request: Request<Body>) -> JsonResponse {
    let raw = send_raw(app, request).await;
    let body = serde_json::from_slice::<Value>(&raw.body).unwrap_or_else(|_| json!({}));
    JsonResponse {
        status: raw.status,
        body,
    }
}

pub async fn send_raw(app: &Router, request: Request<Body>) -> RawResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should succeed");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should read");
    RawResponse {
        status,
        headers,
        body: body.to_vec(),
    }
}

pub fn request(method: Method, path: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::ACCEPT, "application/json");

    let request_body = body
        .map(|value| {
            serde_json::to_vec(&value).expect("json body should serialize for integration request")
        })
        .unwrap_or_default();
    if !request_body.is_empty() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }

    builder
        .body(Body::from(request_body))
        .expect("integration request should build")
}

pub fn error_code(body: &Value) -> Option<&str> {
    body.get("error")?.get("code")?.as_str()
}

pub fn json_files_in(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .collect()
        })
        .unwrap_or_default()
}

pub fn alice() -> Value {
    json!({
        "name": "Alice",
        "age": 34,
        "gender": "Female",
        "medical_history": "seasonal allergies"
    })
}
