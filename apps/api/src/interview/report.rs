//! Report Assembler — combines an evaluation and a finalized transcript into
//! the one record written to storage.
//!
//! The summary is best-effort: if the summarization oracle is absent, fails,
//! times out or returns blank text, a deterministic template is used instead.
//! Every other field depends only on the inputs, so assembling twice yields
//! identical structured data.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::interview::errors::InterviewError;
use crate::interview::models::{
    Answer, Decision, DecisionOutcome, Evaluation, JobContext, Threshold, Transcript,
    TranscriptStatus,
};
use crate::interview::oracle::{bounded, SummarizationOracle};
use crate::storage::ReportStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    Oracle,
    Template,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub session_id: Uuid,
    pub job_context: JobContext,
    pub evaluation: Evaluation,
    pub decision: DecisionOutcome,
    pub threshold: Threshold,
    pub transcript: Transcript,
    /// The transcript's finalization instant.
    pub generated_at: DateTime<Utc>,
    pub summary_text: String,
    pub summary_source: SummarySource,
}

impl Report {
    /// True when the interview ran to its configured length.
    pub fn is_complete(&self) -> bool {
        self.transcript.status == TranscriptStatus::Completed
    }

    /// Checks a report received from outside the engine against the
    /// invariants every assembled report holds.
    pub fn validate(&self) -> Result<(), InterviewError> {
        let invalid = |msg: String| Err(InterviewError::InvalidInput(msg));
        let context = self
            .job_context
            .clone()
            .validated()
            .map_err(|e| InterviewError::InvalidInput(e.to_string()))?;
        let turns = &self.transcript.turns;
        let question_count = context.question_count as usize;

        if let Some((position, turn)) = turns
            .iter()
            .enumerate()
            .find(|(position, turn)| turn.index as usize != *position)
        {
            return invalid(format!(
                "turn at position {position} has index {}; indices must run 0..n in order",
                turn.index
            ));
        }
        if turns.len() > question_count {
            return invalid(format!(
                "transcript has {} turns but question_count is {question_count}",
                turns.len()
            ));
        }

        let expected = if self.evaluation.score.value() >= self.threshold.value() {
            DecisionOutcome::Proceed
        } else {
            DecisionOutcome::Reject
        };
        if self.decision != expected {
            return invalid(format!(
                "decision {} contradicts score {} and threshold {}",
                self.decision.as_str(),
                self.evaluation.score.value(),
                self.threshold.value()
            ));
        }

        match self.transcript.status {
            TranscriptStatus::NotApplicable => {
                if self.decision != DecisionOutcome::Reject || !turns.is_empty() {
                    return invalid(
                        "NOT_APPLICABLE transcripts belong to rejected candidates and have no turns"
                            .to_string(),
                    );
                }
            }
            TranscriptStatus::Completed | TranscriptStatus::Abandoned
                if self.decision != DecisionOutcome::Proceed =>
            {
                return invalid(format!(
                    "{} transcript requires a PROCEED decision",
                    self.transcript.status.as_str()
                ));
            }
            TranscriptStatus::Completed if turns.len() != question_count => {
                return invalid(format!(
                    "COMPLETED transcript has {} of {question_count} turns",
                    turns.len()
                ));
            }
            TranscriptStatus::Abandoned if turns.len() == question_count => {
                return invalid(
                    "ABANDONED transcript cannot hold every configured turn".to_string(),
                );
            }
            _ => {}
        }

        if self.generated_at != self.transcript.finalized_at {
            return invalid("generated_at must equal the transcript finalization time".to_string());
        }
        Ok(())
    }
}

/// What the caller gets back once a session produces a report. The report is
/// always present; `storage_error` is set when persistence failed and the
/// caller may retry it.
#[derive(Debug, Clone, Serialize)]
pub struct ReportReceipt {
    pub report: Report,
    pub storage_key: Option<String>,
    pub storage_error: Option<String>,
}

pub struct ReportAssembler {
    summarizer: Option<Arc<dyn SummarizationOracle>>,
    store: Arc<dyn ReportStore>,
    timeout: Duration,
}

impl ReportAssembler {
    pub fn new(
        summarizer: Option<Arc<dyn SummarizationOracle>>,
        store: Arc<dyn ReportStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            summarizer,
            store,
            timeout,
        }
    }

    pub async fn assemble(
        &self,
        session_id: Uuid,
        decision: &Decision,
        transcript: Transcript,
        context: &JobContext,
    ) -> Report {
        let evaluation = &decision.evaluation;
        let summary = self.summarize(context, evaluation, &transcript).await;
        let (summary_text, summary_source) = match summary {
            Some(text) => (text, SummarySource::Oracle),
            None => (
                template_summary(context, evaluation, decision, &transcript),
                SummarySource::Template,
            ),
        };

        Report {
            session_id,
            job_context: context.clone(),
            evaluation: evaluation.clone(),
            decision: decision.outcome,
            threshold: decision.threshold,
            generated_at: transcript.finalized_at,
            transcript,
            summary_text,
            summary_source,
        }
    }

    /// Hands a report to storage. Failure leaves the report untouched.
    pub async fn persist(&self, report: &Report) -> Result<String, InterviewError> {
        let key = self.store.save(report).await?;
        info!(
            "Report for session {} stored at {} (complete: {})",
            report.session_id,
            key,
            report.is_complete()
        );
        Ok(key)
    }

    /// Assembles, stores once, and folds any storage failure into the receipt.
    pub async fn finish(
        &self,
        session_id: Uuid,
        decision: &Decision,
        transcript: Transcript,
        context: &JobContext,
    ) -> ReportReceipt {
        let report = self.assemble(session_id, decision, transcript, context).await;
        match self.persist(&report).await {
            Ok(key) => ReportReceipt {
                report,
                storage_key: Some(key),
                storage_error: None,
            },
            Err(e) => {
                warn!("Report for session {session_id} not persisted: {e}");
                ReportReceipt {
                    report,
                    storage_key: None,
                    storage_error: Some(e.to_string()),
                }
            }
        }
    }

    async fn summarize(
        &self,
        context: &JobContext,
        evaluation: &Evaluation,
        transcript: &Transcript,
    ) -> Option<String> {
        let summarizer = self.summarizer.as_ref()?;
        match bounded(self.timeout, summarizer.summarize(context, evaluation, transcript)).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => {
                warn!("Summarization oracle returned empty text; using template");
                None
            }
            Err(e) => {
                warn!("Summarization failed, using template: {e}");
                None
            }
        }
    }
}

/// Deterministic summary built only from structured data.
pub fn template_summary(
    context: &JobContext,
    evaluation: &Evaluation,
    decision: &Decision,
    transcript: &Transcript,
) -> String {
    let candidate = evaluation.candidate_name.as_deref().unwrap_or("The candidate");
    let mut summary = format!(
        "{candidate} scored {}/100 for {} ({}) at {} against a threshold of {}.",
        evaluation.score.value(),
        context.role,
        context.experience_level,
        context.company,
        decision.threshold.value()
    );

    if !evaluation.strengths.is_empty() {
        summary.push_str(&format!(
            " Strengths: {}.",
            evaluation
                .strengths
                .iter()
                .take(5)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    if !evaluation.gaps.is_empty() {
        summary.push_str(&format!(
            " Gaps: {}.",
            evaluation.gaps.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
        ));
    }

    let answered = transcript
        .turns
        .iter()
        .filter(|t| matches!(t.answer, Answer::Text(_)))
        .count();
    let interview = match transcript.status {
        TranscriptStatus::NotApplicable => {
            "No interview was conducted because the score was below the threshold.".to_string()
        }
        TranscriptStatus::Completed => format!(
            "Interview completed: {} questions asked, {} answered.",
            transcript.turns.len(),
            answered
        ),
        TranscriptStatus::Abandoned => format!(
            "Interview abandoned after {} of {} questions ({} answered); this report is incomplete.",
            transcript.turns.len(),
            context.question_count,
            answered
        ),
    };
    summary.push(' ');
    summary.push_str(&interview);
    summary
}
