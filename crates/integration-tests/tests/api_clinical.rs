mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;

use support::{TestApp, error_code, request, send_json};

#[tokio::test]
async fn diagnosis_ranks_full_cold_match_first() {
    let app = TestApp::new();
    let response = send_json(
        &app.router,
        request(
            Method::POST,
            "/api/diagnosis",
            Some(json!({
                "symptoms": [
                    "runny nose",
                    "sneezing",
                    "cough",
                    "sore throat",
                    "mild fever",
                    "congestion"
                ],
                "patient_data": {"name": "Alice", "age": "34"}
            })),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let top = &response.body["possible_conditions"][0];
    assert_eq!(top["name"], "Common Cold");
    assert_eq!(top["score"], 1.0);
    assert_eq!(top["severity"], "mild");
    assert_eq!(response.body["analysis"]["severity"], "severe");
    assert!(top["description"].as_str().is_some_and(|text| !text.is_empty()));
    assert!(
        response.body["suggested_tests"]
            .as_array()
            .is_some_and(|tests| !tests.is_empty())
    );
    assert!(
        response.body["summary"]
            .as_str()
            .is_some_and(|summary| !summary.is_empty())
    );
}

#[tokio::test]
async fn diagnosis_requires_symptoms() {
    let app = TestApp::new();
    let response = send_json(
        &app.router,
        request(
            Method::POST,
            "/api/diagnosis",
            Some(json!({ "symptoms": [], "patient_data": {"name": "Alice"} })),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response.body), Some("missing_symptoms"));
}

#[tokio::test]
async fn validate_splits_known_and_unknown_symptoms() {
    let app = TestApp::new();
    let response = send_json(
        &app.router,
        request(
            Method::POST,
            "/api/symptoms/validate",
            Some(json!({ "symptoms": ["Fever", "throat", "glowing skin"] })),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["valid_symptoms"], json!(["fever"]));
    assert_eq!(
        response.body["unrecognized_symptoms"],
        json!(["throat", "glowing skin"])
    );
    assert_eq!(response.body["suggestions"]["throat"][0], "sore throat");
    assert!(response.body["suggestions"].get("glowing skin").is_none());
}

#[tokio::test]
async fn treatment_plan_uses_catalogued_disease() {
    let app = TestApp::new();
    let response = send_json(
        &app.router,
        request(
            Method::POST,
            "/api/treatment",
            Some(json!({
                "diagnosis": {"primary_diagnosis": "Influenza", "symptoms": ["fever", "cough"]},
                "patient_data": {"name": "Alice", "age": 34}
            })),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "Influenza (Flu)");
    assert_eq!(response.body["patient_name"], "Alice");
    assert!(
        response.body["treatments"]
            .as_array()
            .is_some_and(|treatments| !treatments.is_empty())
    );
}

#[tokio::test]
async fn treatment_plan_requires_diagnosis() {
    let app = TestApp::new();
    let response = send_json(
        &app.router,
        request(
            Method::POST,
            "/api/treatment",
            Some(json!({ "patient_data": {"name": "Alice"} })),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response.body), Some("missing_diagnosis"));
}

#[tokio::test]
async fn medication_lookup_resolves_brand_names() {
    let app = TestApp::new();
    let response = send_json(
        &app.router,
        request(Method::GET, "/api/medications/Tylenol", None),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "Acetaminophen");
    assert_eq!(response.body["otc"], true);
    assert!(
        response.body["side_effects"]
            .as_array()
            .is_some_and(|effects| !effects.is_empty())
    );
    assert!(
        response.body["precautions"]
            .as_array()
            .is_some_and(|precautions| !precautions.is_empty())
    );
}

#[tokio::test]
async fn unknown_medication_is_not_found() {
    let app = TestApp::new();
    let response = send_json(
        &app.router,
        request(Method::GET, "/api/medications/unobtainium", None),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&response.body), Some("medication_not_found"));
}

#[tokio::test]
async fn treatment_search_matches_plan_names_and_rejects_blank_queries() {
    let app = TestApp::new();
    let found = send_json(
        &app.router,
        request(Method::GET, "/api/treatments/search?q=influenza", None),
    )
    .await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["query"], "influenza");
    assert_eq!(found.body["results"][0]["name"], "Influenza (Flu)");

    for path in ["/api/treatments/search?q=%20", "/api/treatments/search"] {
        let blank = send_json(&app.router, request(Method::GET, path, None)).await;
        assert_eq!(blank.status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&blank.body), Some("missing_query"));
    }
}
