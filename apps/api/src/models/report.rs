use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewReportRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub candidate_name: Option<String>,
    pub company: String,
    pub role: String,
    pub experience_level: String,
    pub fit_score: i16,
    pub decision: String,
    pub status: String,
    pub turn_count: i32,
    pub summary: String,
    pub s3_key: String,
    pub report: Value,
    pub generated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// History listing row; omits the full report document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportSummaryRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub candidate_name: Option<String>,
    pub company: String,
    pub role: String,
    pub experience_level: String,
    pub fit_score: i16,
    pub decision: String,
    pub status: String,
    pub turn_count: i32,
    pub summary: String,
    pub s3_key: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportStats {
    pub total_reports: i64,
    pub avg_score: f64,
    pub best_score: i32,
    pub completed_interviews: i64,
    pub companies: i64,
}
