use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use crate::llm::TextGenerationResponse;

use super::LlmReliabilityConfig;

#[derive(Debug, Clone, Default)]
struct CircuitBreakerState {
    consecutive_failures: u32,
    open_until: Option<Instant>,
}

#[derive(Debug, Clone)]
struct CachedResponse {
    response: TextGenerationResponse,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub(crate) struct ReliabilityState {
    circuit_breaker: CircuitBreakerState,
    cache: HashMap<String, CachedResponse>,
    cache_order: VecDeque<String>,
}

impl ReliabilityState {
    pub(crate) fn cached_response(
        &mut self,
        key: &str,
        now: Instant,
    ) -> Option<TextGenerationResponse> {
        match self.cache.get(key) {
            Some(entry) if now < entry.expires_at => Some(entry.response.clone()),
            Some(_) => {
                self.cache.remove(key);
                self.drop_cache_order_key(key);
                None
            }
            None => None,
        }
    }

    pub(crate) fn circuit_breaker_retry_after(&mut self, now: Instant) -> Option<Duration> {
        let open_until = self.circuit_breaker.open_until?;
        if now >= open_until {
            self.circuit_breaker.open_until = None;
            self.circuit_breaker.consecutive_failures = 0;
            return None;
        }
        Some(open_until.saturating_duration_since(now))
    }

    pub(crate) fn record_provider_success(&mut self) {
        self.circuit_breaker.consecutive_failures = 0;
        self.circuit_breaker.open_until = None;
    }

    /// Returns true when this failure opened the breaker.
    pub(crate) fn record_provider_failure(
        &mut self,
        now: Instant,
        config: &LlmReliabilityConfig,
    ) -> bool {
        self.circuit_breaker.consecutive_failures =
            self.circuit_breaker.consecutive_failures.saturating_add(1);
        if self.circuit_breaker.open_until.is_none()
            && self.circuit_breaker.consecutive_failures >= config.circuit_breaker_failure_threshold
        {
            self.circuit_breaker.open_until = Some(now + config.circuit_breaker_cooldown());
            return true;
        }
        false
    }

    pub(crate) fn store_cached_response(
        &mut self,
        key: String,
        response: TextGenerationResponse,
        now: Instant,
        config: &LlmReliabilityConfig,
    ) {
        self.prune_expired_cache(now);
        self.drop_cache_order_key(&key);
        self.cache.insert(
            key.clone(),
            CachedResponse {
                response,
                expires_at: now + config.cache_ttl(),
            },
        );
        self.cache_order.push_back(key);

        while self.cache.len() > config.cache_max_entries {
            let Some(oldest_key) = self.cache_order.pop_front() else {
                break;
            };
            self.cache.remove(&oldest_key);
        }
    }

    fn prune_expired_cache(&mut self, now: Instant) {
        self.cache.retain(|_, entry| now < entry.expires_at);
        self.cache_order
            .retain(|cache_key| self.cache.contains_key(cache_key));
    }

    fn drop_cache_order_key(&mut self, key: &str) {
        self.cache_order.retain(|cache_key| cache_key != key);
    }

    #[cfg(test)]
    fn cache_len(&self) -> usize {
        self.cache.len()
    }
}
