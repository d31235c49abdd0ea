//! # Transfer Pricing Server
//!
//! HTTP JSON API in front of the knowledge base.
//!
//! | Method | Path | Body |
//! |---|---|---|
//! | GET | `/api/health` | |
//! | POST | `/api/initialize` | `{"force_refresh": bool}` (optional) |
//! | POST | `/api/query` | `{"query": string}` |
//! | GET | `/api/documents` | |

use anyhow::{Context as AnyhowContext, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::Response,
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tp_rag::KnowledgeBase;

mod http_api;
pub mod settings;

pub use settings::{get_env_variable, ConfigError, Settings};

#[derive(Parser)]
#[command(name = "tp-agent")]
#[command(about = "UAE Transfer Pricing knowledge agent", long_about = None)]
#[command(version)]
struct Cli {
    /// Address to listen on (overrides HOST and PORT)
    #[arg(long)]
    bind: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start serving without loading or building the knowledge base
    #[arg(long)]
    skip_initialize: bool,

    /// Read environment variables from this file instead of `.env`
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[derive(Clone)]
struct AppState {
    knowledge_base: Arc<KnowledgeBase>,
}

#[derive(Deserialize, Default)]
struct InitializeRequest {
    #[serde(default)]
    force_refresh: Option<bool>,
}

#[derive(Deserialize, Default)]
struct QueryRequest {
    #[serde(default)]
    query: Option<String>,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let env_file = match &cli.env_file {
        Some(path) => dotenv::from_path(path)
            .map(|()| Some(path.clone()))
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => dotenv::dotenv().ok(),
    };

    let settings = Settings::from_env()?;

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose || settings.debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    if let Some(path) = env_file {
        log::info!("Loaded environment from {}", path.display());
    }
    log::debug!("{settings:?}");

    let (embeddings, chat) = settings
        .build_providers()
        .context("failed to configure providers")?;
    let knowledge_base = Arc::new(KnowledgeBase::new(
        settings.knowledge_base_config(),
        embeddings,
        chat,
    )?);

    if cli.skip_initialize {
        log::info!("Skipping knowledge base initialization (--skip-initialize)");
    } else {
        match knowledge_base.initialize(false).await {
            Ok(report) => log::info!("{}", report.message),
            Err(err) => log::error!(
                "Error during initial knowledge base setup: {}",
                http_api::error_chain(&err)
            ),
        }
    }

    let bind = cli.bind.unwrap_or_else(|| settings.bind_addr());
    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    serve(listener, knowledge_base).await
}

/// Routes of the public API, with permissive CORS
pub fn build_router(knowledge_base: Arc<KnowledgeBase>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(http_health))
        .route("/api/initialize", post(http_initialize))
        .route("/api/query", post(http_query))
        .route("/api/documents", get(http_documents))
        .layer(cors)
        .with_state(AppState { knowledge_base })
}

/// Serve the API on `listener` until the process exits
pub async fn serve(listener: TcpListener, knowledge_base: Arc<KnowledgeBase>) -> Result<()> {
    let local_addr = listener.local_addr()?;
    log::info!("Serving Transfer Pricing API on http://{local_addr}/api");
    axum::serve(listener, build_router(knowledge_base)).await?;
    Ok(())
}

async fn http_health() -> Result<Response, StatusCode> {
    http_api::build_response(
        StatusCode::OK,
        &http_api::HealthResponse {
            status: "healthy",
            service: http_api::SERVICE_NAME,
        },
    )
}

async fn http_initialize(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, StatusCode> {
    let request: InitializeRequest = match http_api::parse_body(&body) {
        Ok(request) => request,
        Err(message) => return http_api::error_response(StatusCode::BAD_REQUEST, message),
    };
    let force_refresh = request.force_refresh.unwrap_or(false);

    // Runs to completion even when the client goes away.
    let knowledge_base = Arc::clone(&state.knowledge_base);
    let build = tokio::spawn(async move {
        let result = knowledge_base.initialize(force_refresh).await;
        match &result {
            Ok(report) => log::info!("{}", report.message),
            Err(err) => log::error!(
                "Error initializing knowledge base: {}",
                http_api::error_chain(err)
            ),
        }
        result
    });

    match build.await {
        Ok(Ok(report)) => http_api::build_response(
            StatusCode::OK,
            &http_api::MessageResponse {
                status: "success",
                message: report.message,
            },
        ),
        Ok(Err(err)) => http_api::error_response(http_api::status_for(&err), err.to_string()),
        Err(err) => {
            log::error!("Knowledge base initialization task failed: {err}");
            http_api::error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Knowledge base initialization failed".to_string(),
            )
        }
    }
}

async fn http_query(State(state): State<AppState>, body: Bytes) -> Result<Response, StatusCode> {
    let request: QueryRequest = match http_api::parse_body(&body) {
        Ok(request) => request,
        Err(message) => return http_api::error_response(StatusCode::BAD_REQUEST, message),
    };
    let query = request.query.unwrap_or_default();
    if query.trim().is_empty() {
        return http_api::error_response(StatusCode::BAD_REQUEST, "Query is required".to_string());
    }

    match state.knowledge_base.ask(&query).await {
        Ok(result) => http_api::build_response(
            StatusCode::OK,
            &http_api::QueryResponse {
                status: "success",
                answer: result.answer,
                sources: result.sources,
            },
        ),
        Err(err) => {
            log::error!("Error processing query: {}", http_api::error_chain(&err));
            http_api::error_response(http_api::status_for(&err), err.to_string())
        }
    }
}

async fn http_documents(State(state): State<AppState>) -> Result<Response, StatusCode> {
    match state.knowledge_base.get_documents().await {
        Ok(documents) => http_api::build_response(
            StatusCode::OK,
            &http_api::DocumentsResponse {
                status: "success",
                documents,
            },
        ),
        Err(err) => {
            log::error!("Error getting documents: {}", http_api::error_chain(&err));
            http_api::error_response(http_api::status_for(&err), err.to_string())
        }
    }
}
