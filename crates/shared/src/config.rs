use std::path::PathBuf;

use thiserror::Error;

use crate::config_env::{
    optional_trimmed_env, parse_bool_env, parse_f64_env, parse_u64_env, parse_usize_env,
};
use crate::conversation::PersonaKind;
use crate::triage::MatchMode;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_SESSION_CAPACITY: usize = 1_000;
const DEFAULT_SESSION_TTL_SECONDS: u64 = 86_400;
const DEFAULT_SESSION_PURGE_INTERVAL_SECONDS: u64 = 300;
const DEFAULT_MAX_CONVERSATION_TURNS: usize = 20;
const DEFAULT_MATCH_INCLUSION_THRESHOLD: f64 = 0.2;
const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 20_000;
const DEFAULT_REPORTS_DIR: &str = "reports";
const DEFAULT_RECORDS_DIR: &str = "patient_records";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Text,
}

impl ReportFormat {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF (Printable & Shareable)",
            Self::Text => "Plain text",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Text => "txt",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub capacity: usize,
    pub ttl_seconds: u64,
    pub purge_interval_seconds: u64,
    pub max_turns: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_SESSION_CAPACITY,
            ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            purge_interval_seconds: DEFAULT_SESSION_PURGE_INTERVAL_SECONDS,
            max_turns: DEFAULT_MAX_CONVERSATION_TURNS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TriageConfig {
    pub match_threshold: f64,
    pub match_mode: MatchMode,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_INCLUSION_THRESHOLD,
            match_mode: MatchMode::WordBoundary,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub session: SessionConfig,
    pub triage: TriageConfig,
    pub persona: PersonaKind,
    pub llm_enabled: bool,
    pub generation_timeout_ms: u64,
    pub reports_dir: PathBuf,
    pub records_dir: PathBuf,
    pub report_format: ReportFormat,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid integer in env var {0}")]
    ParseInt(String),
    #[error("invalid number in env var {0}")]
    ParseFloat(String),
    #[error("invalid boolean in env var {0}")]
    ParseBool(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Loads `.env` from the working directory or its parents, if present.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let session = SessionConfig {
            capacity: parse_usize_env("SESSION_CAPACITY", DEFAULT_SESSION_CAPACITY)?,
            ttl_seconds: parse_u64_env("SESSION_TTL_SECONDS", DEFAULT_SESSION_TTL_SECONDS)?,
            purge_interval_seconds: parse_u64_env(
                "SESSION_PURGE_INTERVAL_SECONDS",
                DEFAULT_SESSION_PURGE_INTERVAL_SECONDS,
            )?,
            max_turns: parse_usize_env("MAX_CONVERSATION_TURNS", DEFAULT_MAX_CONVERSATION_TURNS)?,
        };

        let triage = TriageConfig {
            match_threshold: parse_f64_env(
                "MATCH_INCLUSION_THRESHOLD",
                DEFAULT_MATCH_INCLUSION_THRESHOLD,
            )?,
            match_mode: match optional_trimmed_env("SYMPTOM_MATCH_MODE") {
                Some(raw) => MatchMode::parse(&raw).ok_or_else(|| {
                    ConfigError::InvalidConfiguration(format!(
                        "SYMPTOM_MATCH_MODE must be 'word' or 'substring', got '{raw}'"
                    ))
                })?,
                None => MatchMode::WordBoundary,
            },
        };

        let persona = match optional_trimmed_env("ASSISTANT_PERSONA") {
            Some(raw) => PersonaKind::parse(&raw).ok_or_else(|| {
                ConfigError::InvalidConfiguration(format!(
                    "ASSISTANT_PERSONA must be one of smith, johnson, patel; got '{raw}'"
                ))
            })?,
            None => PersonaKind::default(),
        };

        let report_format = match optional_trimmed_env("REPORT_FORMAT")
            .map(|raw| raw.to_ascii_lowercase())
            .as_deref()
        {
            None | Some("pdf") => ReportFormat::Pdf,
            Some("text") | Some("txt") => ReportFormat::Text,
            Some(other) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "REPORT_FORMAT must be 'pdf' or 'text', got '{other}'"
                )));
            }
        };

        let config = Self {
            bind_addr: optional_trimmed_env("BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            session,
            triage,
            persona,
            llm_enabled: parse_bool_env("LLM_ENABLED", true)?,
            generation_timeout_ms: parse_u64_env(
                "GENERATION_TIMEOUT_MS",
                DEFAULT_GENERATION_TIMEOUT_MS,
            )?,
            reports_dir: optional_trimmed_env("REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORTS_DIR)),
            records_dir: optional_trimmed_env("RECORDS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORDS_DIR)),
            report_format,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.capacity == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "SESSION_CAPACITY must be greater than 0".to_string(),
            ));
        }
        if self.session.ttl_seconds == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "SESSION_TTL_SECONDS must be greater than 0".to_string(),
            ));
        }
        if self.session.purge_interval_seconds == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "SESSION_PURGE_INTERVAL_SECONDS must be greater than 0".to_string(),
            ));
        }
        if self.session.max_turns < 2 {
            return Err(ConfigError::InvalidConfiguration(
                "MAX_CONVERSATION_TURNS must be at least 2".to_string(),
            ));
        }
        if !self.triage.match_threshold.is_finite()
            || !(0.0..1.0).contains(&self.triage.match_threshold)
        {
            return Err(ConfigError::InvalidConfiguration(
                "MATCH_INCLUSION_THRESHOLD must be in [0, 1)".to_string(),
            ));
        }
        if self.generation_timeout_ms == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "GENERATION_TIMEOUT_MS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
