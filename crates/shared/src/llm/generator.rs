use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type TextGenerationFuture<'a> = Pin<
    Box<dyn Future<Output = Result<TextGenerationResponse, TextGenerationError>> + Send + 'a>,
>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextGenerationRequest {
    pub requester_id: Option<String>,
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub presence_penalty: Option<f32>,
    pub frequency_penalty: Option<f32>,
}

impl TextGenerationRequest {
    pub fn new(user_prompt: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            requester_id: None,
            system_prompt: None,
            user_prompt: user_prompt.into(),
            temperature,
            max_tokens,
            presence_penalty: None,
            frequency_penalty: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_presence_penalty(mut self, penalty: f32) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    pub fn with_frequency_penalty(mut self, penalty: f32) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    pub fn with_requester_id(mut self, requester_id: impl AsRef<str>) -> Self {
        let trimmed = requester_id.as_ref().trim();
        if !trimmed.is_empty() {
            self.requester_id = Some(trimmed.to_string());
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextGenerationResponse {
    pub model: String,
    pub provider_request_id: Option<String>,
    pub text: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Error)]
pub enum TextGenerationError {
    #[error("text generation request timed out")]
    Timeout,
    #[error("text generation provider request failed: {0}")]
    ProviderFailure(String),
    #[error("text generation provider returned an invalid payload: {0}")]
    InvalidProviderPayload(String),
    #[error("text generation is not configured")]
    Unavailable,
}

pub trait TextGenerator: Send + Sync {
    fn generate<'a>(&'a self, request: TextGenerationRequest) -> TextGenerationFuture<'a>;
}

/// Used when no provider credentials are configured; every call fails fast so callers fall
/// back to their canned replies.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableTextGenerator;

impl TextGenerator for UnavailableTextGenerator {
    fn generate<'a>(&'a self, _request: TextGenerationRequest) -> TextGenerationFuture<'a> {
        Box::pin(async { Err(TextGenerationError::Unavailable) })
    }
}
