//! Evaluation Engine — turns one scoring oracle response into a canonical
//! `Evaluation`.
//!
//! Policy for malformed scores:
//! - integers, whole-valued floats and integer strings are accepted
//! - anything else (missing, fractional, non-numeric) fails the evaluation
//! - out-of-range integers are clamped and the clamp is noted in the rationale

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::interview::errors::InterviewError;
use crate::interview::models::{Evaluation, FitScore, JobContext};
use crate::interview::oracle::{bounded, OracleError, RawEvaluation, ScoringOracle};

pub struct EvaluationEngine {
    scorer: Arc<dyn ScoringOracle>,
    timeout: Duration,
}

impl EvaluationEngine {
    pub fn new(scorer: Arc<dyn ScoringOracle>, timeout: Duration) -> Self {
        Self { scorer, timeout }
    }

    /// Scores a resume against a job context. Calls the oracle exactly once.
    pub async fn evaluate(
        &self,
        resume_text: &str,
        context: &JobContext,
    ) -> Result<Evaluation, InterviewError> {
        let resume_text = resume_text.trim();
        if resume_text.is_empty() {
            return Err(InterviewError::InvalidInput(
                "resume text cannot be empty".to_string(),
            ));
        }

        let raw = bounded(self.timeout, self.scorer.score(resume_text, context))
            .await
            .map_err(InterviewError::EvaluationFailed)?;

        let evaluation = normalize(raw).map_err(InterviewError::EvaluationFailed)?;
        info!(
            "Evaluated resume for {} at {}: score {}/100",
            context.role,
            context.company,
            evaluation.score.value()
        );
        Ok(evaluation)
    }
}

/// Validates a raw oracle response. Never yields a partially populated record.
pub fn normalize(raw: RawEvaluation) -> Result<Evaluation, OracleError> {
    let raw_score = raw
        .score
        .as_ref()
        .ok_or_else(|| OracleError::Failure("scoring response has no score".to_string()))?;
    let parsed = parse_score(raw_score)?;

    let (score, was_clamped) = FitScore::clamped(parsed);
    let mut rationale = raw.rationale.unwrap_or_default().trim().to_string();
    if was_clamped {
        warn!("Oracle score {parsed} outside 0..=100, clamped to {}", score.value());
        if !rationale.is_empty() {
            rationale.push(' ');
        }
        rationale.push_str(&format!(
            "[score clamped from {parsed} to {}]",
            score.value()
        ));
    }

    Ok(Evaluation {
        score,
        strengths: clean_items(raw.strengths),
        gaps: clean_items(raw.gaps),
        rationale,
        candidate_name: raw
            .candidate_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
    })
}

fn parse_score(value: &Value) -> Result<i64, OracleError> {
    let malformed = || OracleError::Failure(format!("score is not an integer: {value}"));
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else {
                // Whole floats only; anything past the i64 range is not a score.
                match n.as_f64() {
                    Some(f)
                        if f.is_finite()
                            && f.fract() == 0.0
                            && f >= i64::MIN as f64
                            && f < i64::MAX as f64 =>
                    {
                        Ok(f as i64)
                    }
                    _ => Err(malformed()),
                }
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| malformed()),
        _ => Err(malformed()),
    }
}

fn clean_items(items: Option<Vec<String>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
