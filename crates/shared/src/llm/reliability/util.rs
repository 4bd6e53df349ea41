use std::time::Duration;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::llm::TextGenerationRequest;

pub(crate) fn duration_to_retry_after_seconds(duration: Duration) -> u64 {
    let seconds = duration.as_secs();
    if seconds == 0 {
        return 1;
    }
    if duration.subsec_nanos() > 0 {
        seconds.saturating_add(1)
    } else {
        seconds
    }
}

pub(crate) fn cache_key(request: &TextGenerationRequest) -> String {
    let payload = CacheKeyPayload {
        requester_id: request.requester_id.as_deref(),
        system_prompt: request.system_prompt.as_deref(),
        user_prompt: &request.user_prompt,
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        presence_penalty: request.presence_penalty,
        frequency_penalty: request.frequency_penalty,
    };
    let serialized = serde_json::to_vec(&payload).unwrap_or_default();
    let digest = Sha256::digest(serialized);
    digest
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>()
}

#[derive(Serialize)]
struct CacheKeyPayload<'a> {
    requester_id: Option<&'a str>,
    system_prompt: Option<&'a str>,
    user_prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
    presence_penalty: Option<f32>,
    frequency_penalty: Option<f32>,
}
