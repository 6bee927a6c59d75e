//! Oracle seams — the external, possibly slow and nondeterministic AI calls
//! the engine consults for scores, questions and summaries.
//!
//! The engine only sees these traits. Production adapters live in
//! `llm_oracles`; tests plug in scripted doubles.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interview::models::{Evaluation, JobContext, Transcript, Turn};
use crate::llm_client::LlmError;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle call timed out after {0:?}")]
    Timeout(Duration),

    #[error("oracle call failed: {0}")]
    Failure(String),
}

impl From<LlmError> for OracleError {
    fn from(err: LlmError) -> Self {
        OracleError::Failure(err.to_string())
    }
}

/// Unvalidated scoring output. Every field is optional so that the
/// evaluation engine, not deserialization, decides what is acceptable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvaluation {
    #[serde(default)]
    pub score: Option<serde_json::Value>,
    #[serde(default)]
    pub strengths: Option<Vec<String>>,
    #[serde(default)]
    pub gaps: Option<Vec<String>>,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default)]
    pub candidate_name: Option<String>,
}

#[async_trait]
pub trait ScoringOracle: Send + Sync {
    async fn score(
        &self,
        resume_text: &str,
        context: &JobContext,
    ) -> Result<RawEvaluation, OracleError>;
}

/// Interview context handed to the question oracle.
#[derive(Debug, Clone, Copy)]
pub struct QuestionRequest<'a> {
    pub context: &'a JobContext,
    /// Ordered, complete turn history so far.
    pub history: &'a [Turn],
    /// Zero-based index of the question being requested.
    pub index: u32,
    pub total: u32,
}

#[async_trait]
pub trait QuestionOracle: Send + Sync {
    async fn next_question(&self, request: QuestionRequest<'_>) -> Result<String, OracleError>;
}

#[async_trait]
pub trait SummarizationOracle: Send + Sync {
    async fn summarize(
        &self,
        context: &JobContext,
        evaluation: &Evaluation,
        transcript: &Transcript,
    ) -> Result<String, OracleError>;
}

/// Runs an oracle call under a deadline. An elapsed deadline is an ordinary
/// `OracleError::Timeout`, never a panic.
pub async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, OracleError>
where
    F: Future<Output = Result<T, OracleError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(OracleError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let result: Result<(), OracleError> = bounded(Duration::from_secs(5), async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(OracleError::Timeout(d)) if d == Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_bounded_passes_result_through() {
        let result = bounded(Duration::from_secs(5), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn test_raw_evaluation_tolerates_missing_fields() {
        let raw: RawEvaluation = serde_json::from_str(r#"{"score": "82"}"#).unwrap();
        assert!(raw.strengths.is_none());
        assert_eq!(raw.score, Some(serde_json::json!("82")));
    }
}
