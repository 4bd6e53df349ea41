use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use api_server::http::{self, AppState};
use api_server::session_purge::spawn_session_purge;
use shared::config::{ApiConfig, load_dotenv};
use shared::conversation::{ConversationEngine, EngineSettings};
use shared::llm::{
    LlmReliabilityConfig, OpenAiConfig, ReliableOpenAiTextGenerator, TextGenerator,
    UnavailableTextGenerator,
};
use shared::records::FileRecordStore;
use shared::report::renderer_for;
use shared::sessions::{InMemorySessionStore, SessionStore};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let dotenv_path = load_dotenv();
    init_tracing();
    if let Some(path) = dotenv_path {
        info!(path = %path.display(), "loaded environment file");
    }

    let config = match ApiConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("failed to read config: {err}");
            std::process::exit(1);
        }
    };

    let generator = match build_text_generator(config.llm_enabled) {
        Ok(generator) => generator,
        Err(err) => {
            error!("failed to configure text generation: {err}");
            std::process::exit(1);
        }
    };

    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(&config.session));
    let purge_task = spawn_session_purge(
        sessions.clone(),
        Duration::from_secs(config.session.purge_interval_seconds),
    );

    let engine = ConversationEngine::new(EngineSettings::from_config(&config), generator);
    info!(
        persona = engine.persona().name,
        match_mode = ?config.triage.match_mode,
        match_threshold = config.triage.match_threshold,
        "conversation engine ready"
    );

    let app = http::build_router(AppState {
        engine,
        sessions,
        records: Arc::new(FileRecordStore::new(config.records_dir.clone())),
        report_renderer: Arc::from(renderer_for(config.report_format)),
        reports_dir: config.reports_dir.clone(),
    });

    let addr: SocketAddr = match config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(err) => {
            error!("invalid BIND_ADDR {}: {err}", config.bind_addr);
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {addr}: {err}");
            std::process::exit(1);
        }
    };

    info!(
        "api server listening on {}",
        listener.local_addr().unwrap_or(addr)
    );

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("server stopped with error: {err}");
    }

    purge_task.abort();
    info!("api server stopped");
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "api_server=info,shared=info,axum=info".to_string());
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_text_generator(
    llm_enabled: bool,
) -> Result<Arc<dyn TextGenerator>, shared::llm::ReliableGeneratorBuildError> {
    if !llm_enabled {
        info!("text generation disabled; canned replies only");
        return Ok(Arc::new(UnavailableTextGenerator));
    }

    let openai_config = match OpenAiConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            warn!("text generation unavailable ({err}); canned replies only");
            return Ok(Arc::new(UnavailableTextGenerator));
        }
    };
    let reliability_config = LlmReliabilityConfig::from_env()?;

    info!(model = %openai_config.model, "text generation enabled");
    let generator =
        ReliableOpenAiTextGenerator::from_openai_config(openai_config, reliability_config)?;
    Ok(Arc::new(generator))
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
