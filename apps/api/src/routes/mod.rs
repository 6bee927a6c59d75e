pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::resume::MAX_PDF_BYTES;
use crate::state::AppState;

/// Headroom for multipart framing and the text fields sent with the PDF.
const UPLOAD_BODY_LIMIT: usize = MAX_PDF_BYTES + 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session API
        .route(
            "/api/v1/sessions/:session_id/resume",
            post(handlers::handle_submit_resume),
        )
        .route(
            "/api/v1/sessions/:session_id/resume/pdf",
            post(handlers::handle_submit_resume_pdf)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/v1/sessions/:session_id/answer",
            post(handlers::handle_submit_answer),
        )
        .route(
            "/api/v1/sessions/:session_id/abandon",
            post(handlers::handle_abandon),
        )
        // Report API
        .route(
            "/api/v1/reports",
            get(handlers::handle_list_reports).post(handlers::handle_persist_report),
        )
        .route("/api/v1/reports/stats", get(handlers::handle_report_stats))
        .route(
            "/api/v1/reports/:report_id",
            get(handlers::handle_get_report),
        )
        .with_state(state)
}
