//! murmur server binary.
//!
//! Loads layered settings, wires the store and the two collaborators into
//! the conversation service, and serves the HTTP + WebSocket surface until
//! shutdown is requested.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use murmur_llm::{AnthropicConfig, AnthropicGenerator};
use murmur_server::service::{ConversationService, ServiceConfig};
use murmur_server::websocket::registry::SessionRegistry;
use murmur_server::{AppState, build_router};
use murmur_settings::{MurmurSettings, get_settings, init_settings, load_settings_from_path};
use murmur_store::store::ConversationStore;
use murmur_transcription::{SidecarConfig, SidecarTranscriber};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Conversational backend: transcription, generation, per-session history.
#[derive(Debug, Parser)]
#[command(name = "murmur", version, about)]
struct Cli {
    /// Bind address (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Database file path (overrides settings).
    #[arg(long)]
    db: Option<PathBuf>,

    /// Settings file path (default: ~/.murmur/settings.json).
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_effective_settings(cli: &Cli) -> MurmurSettings {
    let mut settings = match &cli.settings {
        Some(path) => match load_settings_from_path(path) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "failed to load settings file, using defaults");
                MurmurSettings::default()
            }
        },
        None => {
            init_settings_from_default_location();
            (*get_settings()).clone()
        }
    };
    if let Some(host) = &cli.host {
        settings.server.host.clone_from(host);
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    if let Some(db) = &cli.db {
        settings.storage.db_path = db.display().to_string();
    }
    settings
}

fn init_settings_from_default_location() {
    // get_settings loads lazily; nothing to do beyond touching it once so
    // failures surface in the logs at startup rather than mid-request.
    let _ = get_settings();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let settings = load_effective_settings(&cli);
    init_settings(settings.clone());
    let settings = Arc::new(settings);

    let store = ConversationStore::open(&settings.storage.db_path)
        .with_context(|| format!("failed to open database at {}", settings.storage.db_path))?;

    let api_key = std::env::var(&settings.llm.api_key_env).with_context(|| {
        format!(
            "missing API key: set the {} environment variable",
            settings.llm.api_key_env
        )
    })?;
    let generator = AnthropicGenerator::new(AnthropicConfig {
        base_url: settings.llm.base_url.clone(),
        api_key,
        model: settings.llm.model.clone(),
        max_tokens: settings.llm.max_tokens,
        system_prompt: settings.llm.system_prompt.clone(),
        request_timeout: Duration::from_millis(settings.llm.request_timeout_ms),
    })
    .context("failed to build response generator")?;

    let transcriber = SidecarTranscriber::new(SidecarConfig {
        base_url: settings.transcription.base_url.clone(),
        request_timeout: Duration::from_millis(settings.transcription.timeout_ms),
        max_audio_bytes: settings.transcription.max_audio_bytes,
    })
    .context("failed to build transcriber")?;

    let service = Arc::new(ConversationService::new(
        store,
        Arc::new(generator),
        Arc::new(transcriber),
        ServiceConfig::from_settings(&settings),
    ));

    let metrics = murmur_server::metrics::install_recorder();
    let state = AppState {
        service,
        registry: Arc::new(SessionRegistry::new()),
        settings: Arc::clone(&settings),
        metrics,
    };
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid bind address {}:{}",
                settings.server.host, settings.server.port
            )
        })?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        %addr,
        model = %settings.llm.model,
        db = %settings.storage.db_path,
        "murmur listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install sigterm handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received sigterm, shutting down"),
    }
}
