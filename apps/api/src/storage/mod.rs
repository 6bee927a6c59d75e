//! Report persistence — the external sink a finished `Report` is handed to.
//!
//! Reports are append-only. One object per session report at
//! `reports/{session_id}/{generated_at}.json`, indexed in Postgres for history.

pub mod archive;
pub mod history;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::interview::report::Report;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object store error: {0}")]
    ObjectStore(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("report serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Append-only sink for finished reports. Returns the key the report was
/// stored under.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn save(&self, report: &Report) -> Result<String, StorageError>;
}

/// Object key for a report, unique per session and finalization instant.
/// Nanosecond precision keeps reports of a reused session id apart.
pub fn report_key(session_id: Uuid, generated_at: DateTime<Utc>) -> String {
    format!(
        "reports/{}/{}.json",
        session_id,
        generated_at.format("%Y%m%dT%H%M%S%.9fZ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_report_key_layout() {
        let id = Uuid::parse_str("6f1c1f5e-8a8e-4c55-9d2f-0b7d3d8a6e11").unwrap();
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            report_key(id, at),
            "reports/6f1c1f5e-8a8e-4c55-9d2f-0b7d3d8a6e11/20260309T140507.000000000Z.json"
        );
    }

    #[test]
    fn test_report_keys_differ_within_one_second() {
        let id = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 14, 5, 7).unwrap();
        let later = at + Duration::microseconds(78);
        assert_ne!(report_key(id, at), report_key(id, later));
    }
}
