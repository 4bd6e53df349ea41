mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use support::{TestApp, alice, error_code, request, send_json};

#[tokio::test]
async fn healthz_reports_ok() {
    let app = TestApp::new();
    let response = send_json(&app.router, request(Method::GET, "/healthz", None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["ok"], true);
}

#[tokio::test]
async fn start_session_greets_patient_by_name() {
    let app = TestApp::new();
    let response = send_json(
        &app.router,
        request(Method::POST, "/api/start_session", Some(alice())),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["session_id"].as_str().is_some());
    let message = response.body["message"].as_str().expect("welcome message");
    assert!(message.contains("Alice"));
    assert!(message.contains("34 years old"));
}

#[tokio::test]
async fn start_session_requires_patient_data() {
    let app = TestApp::new();
    let response = send_json(
        &app.router,
        request(Method::POST, "/api/start_session", Some(json!({}))),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response.body), Some("missing_patient_data"));
}

#[tokio::test]
async fn chat_diagnoses_cold_symptoms() {
    let app = TestApp::new();
    let session_id = app.start_session(alice()).await;

    let response = app
        .chat(
            session_id,
            "I have a runny nose, sneezing, congestion, a sore throat and a cough",
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["session_id"], session_id.to_string());
    let reply = &response.body["response"];
    assert_eq!(reply["type"], "diagnosis");
    assert_eq!(reply["data"]["suggested_diagnosis"], "Common Cold");
    assert_eq!(reply["data"]["analysis"]["matches"][0]["key"], "common_cold");
    assert_eq!(reply["data"]["analysis"]["urgency"], "low");
    assert_eq!(reply["data"]["analysis"]["severity"], "severe");
    let tracking = &reply["data"]["symptom_tracking"];
    assert_eq!(tracking["what_to_track"].as_array().map(Vec::len), Some(6));
    assert_eq!(tracking["when_to_review"][0], "Daily for acute symptoms");
    assert!(reply["message"].as_str().is_some_and(|text| !text.is_empty()));
}

#[tokio::test]
async fn emergency_keywords_take_priority_over_symptoms() {
    let app = TestApp::new();
    let session_id = app.start_session(alice()).await;

    let response = app
        .chat(session_id, "I have chest pain and a fever, should I call 911?")
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let reply = &response.body["response"];
    assert_eq!(reply["type"], "emergency");
    assert_eq!(reply["data"]["emergency_number"], "911");
}

#[tokio::test]
async fn chat_answers_medication_questions() {
    let app = TestApp::new();
    let session_id = app.start_session(alice()).await;

    let response = app.chat(session_id, "Which medication is best? Can I take Tylenol?").await;

    assert_eq!(response.status, StatusCode::OK);
    let reply = &response.body["response"];
    assert_eq!(reply["type"], "treatment_info");
    assert_eq!(reply["data"]["medications"][0]["name"], "Acetaminophen");
}

#[tokio::test]
async fn goodbye_ends_with_goodbye_reply() {
    let app = TestApp::new();
    let session_id = app.start_session(alice()).await;

    let response = app.chat(session_id, "Goodbye").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["response"]["type"], "goodbye");
}

#[tokio::test]
async fn chat_rejects_missing_message_and_unknown_session() {
    let app = TestApp::new();
    let session_id = app.start_session(alice()).await;

    let missing_message = send_json(
        &app.router,
        request(
            Method::POST,
            "/api/chat",
            Some(json!({ "session_id": session_id, "message": "   " })),
        ),
    )
    .await;
    assert_eq!(missing_message.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&missing_message.body), Some("missing_message"));

    let unknown_session = app.chat(Uuid::new_v4(), "hello").await;
    assert_eq!(unknown_session.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&unknown_session.body), Some("invalid_session"));

    let malformed_session = send_json(
        &app.router,
        request(
            Method::POST,
            "/api/chat",
            Some(json!({ "session_id": "not-a-uuid", "message": "hello" })),
        ),
    )
    .await;
    assert_eq!(malformed_session.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&malformed_session.body), Some("invalid_session"));
}

#[tokio::test]
async fn long_conversations_keep_answering() {
    let app = TestApp::new();
    let session_id = app.start_session(alice()).await;

    for _ in 0..15 {
        let response = app.chat(session_id, "Hello there").await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["response"]["type"], "general");
    }

    let message = app.chat(session_id, "Hi again").await.body["response"]["message"]
        .as_str()
        .map(ToString::to_string)
        .expect("greeting message");
    assert!(message.contains("Welcome back"));
}
