use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::interview::report::Report;
use crate::storage::{report_key, ReportStore, StorageError};

/// Writes each report as a JSON object to S3, then records an index row in
/// Postgres. Saving the same report twice is a no-op on the index.
#[derive(Clone)]
pub struct ArchiveReportStore {
    db: PgPool,
    s3: aws_sdk_s3::Client,
    bucket: String,
}

impl ArchiveReportStore {
    pub fn new(db: PgPool, s3: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { db, s3, bucket }
    }
}

#[async_trait]
impl ReportStore for ArchiveReportStore {
    async fn save(&self, report: &Report) -> Result<String, StorageError> {
        let s3_key = report_key(report.session_id, report.generated_at);
        let body = serde_json::to_vec_pretty(report)?;

        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(&s3_key)
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| StorageError::ObjectStore(format!("S3 upload failed: {e}")))?;

        info!("Uploaded report to s3://{}/{}", self.bucket, s3_key);

        let report_json = serde_json::to_value(report)?;
        sqlx::query(
            r#"
            INSERT INTO interview_reports
                (id, session_id, candidate_name, company, role, experience_level,
                 fit_score, decision, status, turn_count, summary, s3_key, report, generated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (s3_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(report.session_id)
        .bind(report.evaluation.candidate_name.as_deref())
        .bind(&report.job_context.company)
        .bind(&report.job_context.role)
        .bind(&report.job_context.experience_level)
        .bind(i16::from(report.evaluation.score.value()))
        .bind(report.decision.as_str())
        .bind(report.transcript.status.as_str())
        .bind(report.transcript.turns.len() as i32)
        .bind(&report.summary_text)
        .bind(&s3_key)
        .bind(&report_json)
        .bind(report.generated_at)
        .execute(&self.db)
        .await?;

        info!(
            "Indexed report for session {} ({})",
            report.session_id,
            report.transcript.status.as_str()
        );
        Ok(s3_key)
    }
}
