//! Read side of the report index: recent interviews and aggregate stats.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::report::{InterviewReportRow, ReportStats, ReportSummaryRow};

pub const DEFAULT_HISTORY_LIMIT: i64 = 20;
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Most recent reports first, optionally for a single company.
pub async fn list_reports(
    pool: &PgPool,
    company: Option<&str>,
    limit: i64,
) -> Result<Vec<ReportSummaryRow>> {
    Ok(sqlx::query_as::<_, ReportSummaryRow>(
        r#"
        SELECT id, session_id, candidate_name, company, role, experience_level,
               fit_score, decision, status, turn_count, summary, s3_key, generated_at
        FROM interview_reports
        WHERE ($1::TEXT IS NULL OR company = $1)
        ORDER BY generated_at DESC
        LIMIT $2
        "#,
    )
    .bind(company)
    .bind(limit.clamp(1, MAX_HISTORY_LIMIT))
    .fetch_all(pool)
    .await?)
}

pub async fn get_report(pool: &PgPool, id: Uuid) -> Result<Option<InterviewReportRow>> {
    Ok(
        sqlx::query_as::<_, InterviewReportRow>("SELECT * FROM interview_reports WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn report_stats(pool: &PgPool, company: Option<&str>) -> Result<ReportStats> {
    Ok(sqlx::query_as::<_, ReportStats>(
        r#"
        SELECT COUNT(*) AS total_reports,
               COALESCE(ROUND(AVG(fit_score)::NUMERIC, 1), 0)::FLOAT8 AS avg_score,
               COALESCE(MAX(fit_score), 0)::INT4 AS best_score,
               COUNT(*) FILTER (WHERE status = 'COMPLETED') AS completed_interviews,
               COUNT(DISTINCT company) AS companies
        FROM interview_reports
        WHERE ($1::TEXT IS NULL OR company = $1)
        "#,
    )
    .bind(company)
    .fetch_one(pool)
    .await?)
}
