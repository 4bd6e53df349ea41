use std::collections::VecDeque;
use std::sync::Arc;

use shared::llm::{
    LlmReliabilityConfig, ReliableTextGenerator, TextGenerationError, TextGenerationFuture,
    TextGenerationRequest, TextGenerationResponse, TextGenerator,
};
use tokio::sync::Mutex;

#[derive(Clone)]
struct StubGenerator {
    responses: Arc<Mutex<VecDeque<Result<TextGenerationResponse, TextGenerationError>>>>,
    seen_prompts: Arc<Mutex<Vec<String>>>,
}

impl StubGenerator {
    fn with_responses(
        responses: Vec<Result<TextGenerationResponse, TextGenerationError>>,
    ) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            seen_prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    async fn calls(&self) -> usize {
        self.seen_prompts.lock().await.len()
    }
}

impl TextGenerator for StubGenerator {
    fn generate<'a>(&'a self, request: TextGenerationRequest) -> TextGenerationFuture<'a> {
        Box::pin(async move {
            self.seen_prompts.lock().await.push(request.user_prompt);
            self.responses.lock().await.pop_front().unwrap_or_else(|| {
                Err(TextGenerationError::ProviderFailure(
                    "missing_stub_response".to_string(),
                ))
            })
        })
    }
}

#[tokio::test]
async fn serves_repeated_requests_from_cache() {
    let inner = StubGenerator::with_responses(vec![Ok(text_response("Drink plenty of fluids."))]);
    let generator =
        ReliableTextGenerator::new(inner.clone(), base_config()).expect("generator should build");

    let first = generator
        .generate(request_for("session-a", "cold symptoms"))
        .await
        .expect("first call should reach the provider");
    let second = generator
        .generate(request_for("session-a", "cold symptoms"))
        .await
        .expect("second call should be cached");

    assert_eq!(first.text, second.text);
    assert_eq!(inner.calls().await, 1);
}

#[tokio::test]
async fn does_not_share_cache_between_sessions() {
    let inner = StubGenerator::with_responses(vec![
        Ok(text_response("first")),
        Ok(text_response("second")),
    ]);
    let generator =
        ReliableTextGenerator::new(inner.clone(), base_config()).expect("generator should build");

    generator
        .generate(request_for("session-a", "cold symptoms"))
        .await
        .expect("session a should succeed");
    let other = generator
        .generate(request_for("session-b", "cold symptoms"))
        .await
        .expect("session b should succeed");

    assert_eq!(other.text, "second");
    assert_eq!(inner.calls().await, 2);
}

#[tokio::test]
async fn opens_circuit_after_consecutive_failures() {
    let inner = StubGenerator::with_responses(vec![
        Err(TextGenerationError::Timeout),
        Err(TextGenerationError::ProviderFailure("status=503".to_string())),
        Ok(text_response("unreachable while open")),
    ]);
    let config = LlmReliabilityConfig {
        circuit_breaker_failure_threshold: 2,
        ..base_config()
    };
    let generator =
        ReliableTextGenerator::new(inner.clone(), config).expect("generator should build");

    for prompt in ["one", "two"] {
        generator
            .generate(request_for("session-a", prompt))
            .await
            .expect_err("provider failure should surface");
    }

    let err = generator
        .generate(request_for("session-a", "three"))
        .await
        .expect_err("open circuit should short-circuit");
    assert!(matches!(
        err,
        TextGenerationError::ProviderFailure(message) if message.starts_with("circuit_breaker_open")
    ));
    assert_eq!(inner.calls().await, 2);
}

#[tokio::test]
async fn success_resets_failure_streak() {
    let inner = StubGenerator::with_responses(vec![
        Err(TextGenerationError::Timeout),
        Ok(text_response("ok")),
        Err(TextGenerationError::Timeout),
        Ok(text_response("still closed")),
    ]);
    let config = LlmReliabilityConfig {
        circuit_breaker_failure_threshold: 2,
        ..base_config()
    };
    let generator =
        ReliableTextGenerator::new(inner.clone(), config).expect("generator should build");

    let mut outcomes = Vec::new();
    for prompt in ["one", "two", "three", "four"] {
        outcomes.push(generator.generate(request_for("session-a", prompt)).await.is_ok());
    }

    assert_eq!(outcomes, vec![false, true, false, true]);
    assert_eq!(inner.calls().await, 4);
}

#[test]
fn rejects_invalid_reliability_config() {
    let config = LlmReliabilityConfig {
        circuit_breaker_failure_threshold: 0,
        ..base_config()
    };
    assert!(ReliableTextGenerator::new(StubGenerator::with_responses(Vec::new()), config).is_err());
}

fn base_config() -> LlmReliabilityConfig {
    LlmReliabilityConfig {
        circuit_breaker_failure_threshold: 5,
        circuit_breaker_cooldown_seconds: 60,
        cache_ttl_seconds: 60,
        cache_max_entries: 32,
    }
}

fn request_for(session_id: &str, prompt: &str) -> TextGenerationRequest {
    TextGenerationRequest::new(prompt, 0.7, 300).with_requester_id(session_id)
}

fn text_response(text: &str) -> TextGenerationResponse {
    TextGenerationResponse {
        model: "stub-model".to_string(),
        provider_request_id: None,
        text: text.to_string(),
        usage: None,
    }
}
