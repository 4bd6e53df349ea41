use std::sync::{Arc, Mutex};
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, warn};

use super::generator::{
    TextGenerationError, TextGenerationFuture, TextGenerationRequest, TextGenerator,
};
use super::openai::{OpenAiConfig, OpenAiConfigError, OpenAiTextGenerator};
use crate::config::ConfigError;
use state::ReliabilityState;
use util::{cache_key, duration_to_retry_after_seconds};

mod config;
mod state;
mod util;

pub use config::LlmReliabilityConfig;

#[derive(Debug, Error)]
pub enum ReliableGeneratorBuildError {
    #[error(transparent)]
    ReliabilityConfig(#[from] ConfigError),
    #[error(transparent)]
    OpenAiConfig(#[from] OpenAiConfigError),
}

pub type ReliableOpenAiTextGenerator = ReliableTextGenerator<OpenAiTextGenerator>;

/// Wraps a generator with a bounded response cache and a consecutive-failure circuit breaker.
pub struct ReliableTextGenerator<G>
where
    G: TextGenerator + 'static,
{
    inner: Arc<G>,
    config: LlmReliabilityConfig,
    state: Arc<Mutex<ReliabilityState>>,
}

impl<G> Clone for ReliableTextGenerator<G>
where
    G: TextGenerator + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<G> ReliableTextGenerator<G>
where
    G: TextGenerator + 'static,
{
    pub fn new(inner: G, config: LlmReliabilityConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(inner),
            config,
            state: Arc::new(Mutex::new(ReliabilityState::default())),
        })
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ReliabilityState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl ReliableOpenAiTextGenerator {
    pub fn from_openai_config(
        openai_config: OpenAiConfig,
        reliability_config: LlmReliabilityConfig,
    ) -> Result<Self, ReliableGeneratorBuildError> {
        let inner = OpenAiTextGenerator::new(openai_config)?;
        Ok(Self::new(inner, reliability_config)?)
    }
}

impl<G> TextGenerator for ReliableTextGenerator<G>
where
    G: TextGenerator + 'static,
{
    fn generate<'a>(&'a self, request: TextGenerationRequest) -> TextGenerationFuture<'a> {
        Box::pin(async move {
            let request_cache_key = cache_key(&request);
            let now = Instant::now();

            {
                let mut state = self.lock_state();
                if let Some(cached_response) = state.cached_response(&request_cache_key, now) {
                    debug!("serving text generation from cache");
                    return Ok(cached_response);
                }
                if let Some(retry_after) = state.circuit_breaker_retry_after(now) {
                    return Err(TextGenerationError::ProviderFailure(format!(
                        "circuit_breaker_open retry_after_seconds={}",
                        duration_to_retry_after_seconds(retry_after)
                    )));
                }
            }

            let result = self.inner.generate(request).await;

            let completed_at = Instant::now();
            let mut state = self.lock_state();
            match &result {
                Ok(response) => {
                    state.record_provider_success();
                    state.store_cached_response(
                        request_cache_key,
                        response.clone(),
                        completed_at,
                        &self.config,
                    );
                }
                Err(err) => {
                    if state.record_provider_failure(completed_at, &self.config) {
                        warn!(
                            error = %err,
                            cooldown_seconds = self.config.circuit_breaker_cooldown_seconds,
                            "text generation circuit breaker opened"
                        );
                    }
                }
            }

            result
        })
    }
}
