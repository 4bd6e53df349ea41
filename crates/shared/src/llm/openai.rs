use std::env;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::time::sleep;
use tracing::warn;

use crate::config::ConfigError;
use crate::config_env::{optional_trimmed_env, parse_u32_env, parse_u64_env};

use super::generator::{
    TextGenerationError, TextGenerationFuture, TextGenerationRequest, TextGenerationResponse,
    TextGenerator, TokenUsage,
};

const DEFAULT_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_MAX_RETRIES: u32 = 1;
const DEFAULT_RETRY_BASE_BACKOFF_MS: u64 = 250;

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub chat_completions_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_base_backoff_ms: u64,
}

impl OpenAiConfig {
    pub fn from_env() -> Result<Self, OpenAiConfigError> {
        let api_key = require_non_empty_env("OPENAI_API_KEY")?;
        let chat_completions_url = optional_trimmed_env("OPENAI_CHAT_COMPLETIONS_URL")
            .unwrap_or_else(|| DEFAULT_CHAT_COMPLETIONS_URL.to_string());
        if !chat_completions_url.starts_with("http://")
            && !chat_completions_url.starts_with("https://")
        {
            return Err(OpenAiConfigError::InvalidConfiguration(
                "OPENAI_CHAT_COMPLETIONS_URL must start with http:// or https://".to_string(),
            ));
        }

        let timeout_ms = parse_u64_env("OPENAI_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;
        if timeout_ms == 0 {
            return Err(OpenAiConfigError::InvalidConfiguration(
                "OPENAI_TIMEOUT_MS must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            chat_completions_url,
            api_key,
            model: optional_trimmed_env("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_ms,
            max_retries: parse_u32_env("OPENAI_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            retry_base_backoff_ms: parse_u64_env(
                "OPENAI_RETRY_BASE_BACKOFF_MS",
                DEFAULT_RETRY_BASE_BACKOFF_MS,
            )?,
        })
    }
}

#[derive(Debug, Error)]
pub enum OpenAiConfigError {
    #[error("missing required env var {0}")]
    MissingVar(String),
    #[error(transparent)]
    Env(#[from] ConfigError),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to build OpenAI http client: {0}")]
    HttpClient(String),
}

#[derive(Clone)]
pub struct OpenAiTextGenerator {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiTextGenerator {
    pub fn new(config: OpenAiConfig) -> Result<Self, OpenAiConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| OpenAiConfigError::HttpClient(err.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_once(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<TextGenerationResponse, SendAttemptError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system_prompt) = request.system_prompt.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user_prompt,
        });

        let request_body = ChatCompletionBody {
            model: &self.config.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            presence_penalty: request.presence_penalty,
            frequency_penalty: request.frequency_penalty,
        };

        let response = self
            .client
            .post(&self.config.chat_completions_url)
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    SendAttemptError::retryable(TextGenerationError::Timeout)
                } else {
                    SendAttemptError::retryable(TextGenerationError::ProviderFailure(
                        "request_unavailable".to_string(),
                    ))
                }
            })?;

        let status = response.status();
        let header_request_id = header_request_id(response.headers());
        let body = response.text().await.map_err(|_| {
            SendAttemptError::non_retryable(TextGenerationError::InvalidProviderPayload(
                "response_body_read_failed".to_string(),
            ))
        })?;

        if !status.is_success() {
            let provider_code = parse_provider_error_code(&body);
            return Err(SendAttemptError {
                error: TextGenerationError::ProviderFailure(format!(
                    "status={} code={provider_code}",
                    status.as_u16()
                )),
                retryable: is_retryable_status(status),
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|_| {
            SendAttemptError::non_retryable(TextGenerationError::InvalidProviderPayload(
                "response_json_parse_failed".to_string(),
            ))
        })?;

        let content = parsed
            .choices
            .first()
            .ok_or_else(|| {
                SendAttemptError::non_retryable(TextGenerationError::InvalidProviderPayload(
                    "missing_choice".to_string(),
                ))
            })?
            .message
            .content
            .clone();

        let text = match content {
            Value::String(raw) if !raw.trim().is_empty() => raw.trim().to_string(),
            Value::String(_) | Value::Null => {
                return Err(SendAttemptError::non_retryable(
                    TextGenerationError::InvalidProviderPayload("empty_content".to_string()),
                ));
            }
            _ => {
                return Err(SendAttemptError::non_retryable(
                    TextGenerationError::InvalidProviderPayload(
                        "unsupported_content_shape".to_string(),
                    ),
                ));
            }
        };

        Ok(TextGenerationResponse {
            model: parsed.model.unwrap_or_else(|| self.config.model.clone()),
            provider_request_id: header_request_id.or(parsed.id),
            text,
            usage: parsed.usage.map(|usage| TokenUsage {
                prompt_tokens: clamp_u64_to_u32(usage.prompt_tokens.unwrap_or(0)),
                completion_tokens: clamp_u64_to_u32(usage.completion_tokens.unwrap_or(0)),
                total_tokens: clamp_u64_to_u32(usage.total_tokens.unwrap_or(0)),
            }),
        })
    }
}

impl TextGenerator for OpenAiTextGenerator {
    fn generate<'a>(&'a self, request: TextGenerationRequest) -> TextGenerationFuture<'a> {
        Box::pin(async move {
            let mut attempt = 0_u32;

            loop {
                match self.send_once(&request).await {
                    Ok(response) => return Ok(response),
                    Err(err) => {
                        if err.retryable && attempt < self.config.max_retries {
                            let backoff_multiplier = 2_u64.saturating_pow(attempt);
                            let backoff_ms = self
                                .config
                                .retry_base_backoff_ms
                                .saturating_mul(backoff_multiplier);
                            warn!(
                                attempt,
                                backoff_ms,
                                error = %err.error,
                                "retrying text generation request"
                            );
                            sleep(Duration::from_millis(backoff_ms)).await;
                            attempt = attempt.saturating_add(1);
                            continue;
                        }

                        return Err(err.error);
                    }
                }
            }
        })
    }
}

#[derive(Debug)]
struct SendAttemptError {
    error: TextGenerationError,
    retryable: bool,
}

impl SendAttemptError {
    fn retryable(error: TextGenerationError) -> Self {
        Self {
            error,
            retryable: true,
        }
    }

    fn non_retryable(error: TextGenerationError) -> Self {
        Self {
            error,
            retryable: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    id: Option<String>,
    model: Option<String>,
    choices: Vec<ChatCompletionChoice>,
    usage: Option<ChatCompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    #[serde(default)]
    content: Value,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionUsage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
    total_tokens: Option<u64>,
}

fn require_non_empty_env(key: &str) -> Result<String, OpenAiConfigError> {
    let value = env::var(key).map_err(|_| OpenAiConfigError::MissingVar(key.to_string()))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(OpenAiConfigError::MissingVar(key.to_string()));
    }
    Ok(trimmed.to_string())
}

fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

fn header_request_id(headers: &reqwest::header::HeaderMap) -> Option<String> {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

fn parse_provider_error_code(body: &str) -> String {
    #[derive(Deserialize)]
    struct ProviderErrorEnvelope {
        error: Option<ProviderErrorDetails>,
    }

    #[derive(Deserialize)]
    struct ProviderErrorDetails {
        code: Option<Value>,
        #[serde(rename = "type")]
        kind: Option<String>,
    }

    let Some(details) = serde_json::from_str::<ProviderErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
    else {
        return "unknown".to_string();
    };

    match details.code {
        Some(Value::String(code)) => code,
        Some(Value::Number(code)) => code.to_string(),
        _ => details.kind.unwrap_or_else(|| "unknown".to_string()),
    }
}

fn clamp_u64_to_u32(value: u64) -> u32 {
    value.min(u64::from(u32::MAX)) as u32
}
