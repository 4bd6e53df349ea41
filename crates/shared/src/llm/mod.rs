pub mod generator;
pub mod openai;
pub mod prompts;
pub mod reliability;

pub use generator::{
    TextGenerationError, TextGenerationFuture, TextGenerationRequest, TextGenerationResponse,
    TextGenerator, TokenUsage, UnavailableTextGenerator,
};
pub use openai::{OpenAiConfig, OpenAiConfigError, OpenAiTextGenerator};
pub use prompts::{diagnosis_summary_request, general_chat_request, symptom_narrative_request};
pub use reliability::{
    LlmReliabilityConfig, ReliableGeneratorBuildError, ReliableOpenAiTextGenerator,
    ReliableTextGenerator,
};
