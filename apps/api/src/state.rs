use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::interview::orchestrator::Orchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Owns every live session; the only path into the interview engine.
    pub orchestrator: Arc<Orchestrator>,
}
