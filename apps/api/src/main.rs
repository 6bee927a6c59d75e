mod config;
mod db;
mod errors;
mod interview;
mod llm_client;
mod models;
mod resume;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::interview::evaluation::EvaluationEngine;
use crate::interview::llm_oracles::{LlmQuestionOracle, LlmScoringOracle, LlmSummarizer};
use crate::interview::oracle::SummarizationOracle;
use crate::interview::orchestrator::{Orchestrator, SessionSettings};
use crate::interview::report::ReportAssembler;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::archive::ArchiveReportStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recruiter API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Initialize LLM client; each HTTP attempt gets the full oracle budget
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.oracle_timeout)
        .context("Failed to initialize LLM client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let summarizer: Option<Arc<dyn SummarizationOracle>> = if config.enable_llm_summary {
        Some(Arc::new(LlmSummarizer::new(llm.clone())))
    } else {
        info!("LLM summaries disabled; reports use the template summary");
        None
    };

    let store = Arc::new(ArchiveReportStore::new(
        db.clone(),
        s3,
        config.s3_bucket.clone(),
    ));

    let orchestrator = Orchestrator::new(
        EvaluationEngine::new(
            Arc::new(LlmScoringOracle::new(llm.clone())),
            config.oracle_timeout,
        ),
        Arc::new(LlmQuestionOracle::new(llm)),
        ReportAssembler::new(summarizer, store, config.oracle_timeout),
        SessionSettings {
            default_threshold: config.fit_threshold,
            oracle_timeout: config.oracle_timeout,
            idle_timeout: config.session_idle_timeout,
        },
    );
    info!(
        "Orchestrator ready (threshold: {}, idle timeout: {:?})",
        config.fit_threshold.value(),
        config.session_idle_timeout
    );

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        orchestrator: Arc::new(orchestrator),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "recruiter-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
