pub mod config;
mod config_env;
pub mod conversation;
pub mod knowledge;
pub mod llm;
pub mod models;
pub mod records;
pub mod report;
pub mod sessions;
pub mod treatment;
pub mod triage;
