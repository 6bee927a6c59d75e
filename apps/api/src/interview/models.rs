//! Session data model: job context, evaluation, decision, turns and transcripts.
//!
//! Every record here is immutable once constructed. Turns are only ever
//! appended by the interview controller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interview::errors::InterviewError;

/// Largest interview a single session may request.
pub const MAX_QUESTION_COUNT: u32 = 20;

// ────────────────────────────────────────────────────────────────────────────
// Job context
// ────────────────────────────────────────────────────────────────────────────

/// The role a candidate is screened for. Fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobContext {
    pub company: String,
    pub role: String,
    pub experience_level: String,
    /// Number of interview turns; doubles as the controller's `max_turns`.
    pub question_count: u32,
}

impl JobContext {
    /// Trims free-text fields and checks the question count bounds.
    pub fn validated(self) -> Result<Self, InterviewError> {
        let company = self.company.trim().to_string();
        let role = self.role.trim().to_string();
        let experience_level = self.experience_level.trim().to_string();

        if company.is_empty() {
            return Err(InterviewError::InvalidConfig(
                "job context company cannot be empty".to_string(),
            ));
        }
        if role.is_empty() {
            return Err(InterviewError::InvalidConfig(
                "job context role cannot be empty".to_string(),
            ));
        }
        if !(1..=MAX_QUESTION_COUNT).contains(&self.question_count) {
            return Err(InterviewError::InvalidConfig(format!(
                "question_count must be between 1 and {MAX_QUESTION_COUNT}, got {}",
                self.question_count
            )));
        }

        Ok(Self {
            company,
            role,
            experience_level: if experience_level.is_empty() {
                "unspecified".to_string()
            } else {
                experience_level
            },
            question_count: self.question_count,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scores and thresholds
// ────────────────────────────────────────────────────────────────────────────

/// Candidate-to-role fit, always within 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct FitScore(u8);

impl FitScore {
    pub fn new(value: i64) -> Option<Self> {
        (0..=100).contains(&value).then_some(Self(value as u8))
    }

    /// Clamps into range. The flag reports whether clamping changed the value.
    pub fn clamped(value: i64) -> (Self, bool) {
        let clamped = value.clamp(0, 100);
        (Self(clamped as u8), clamped != value)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for FitScore {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("fit score {value} is outside 0..=100"))
    }
}

impl From<FitScore> for u8 {
    fn from(score: FitScore) -> Self {
        score.0
    }
}

/// Minimum fit score that proceeds to the interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Threshold(u8);

impl Threshold {
    pub fn new(value: i64) -> Result<Self, InterviewError> {
        if (0..=100).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(InterviewError::InvalidConfig(format!(
                "threshold must be between 0 and 100, got {value}"
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Threshold {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).map_err(|e| e.to_string())
    }
}

impl From<Threshold> for u8 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluation and decision
// ────────────────────────────────────────────────────────────────────────────

/// Canonical result of screening one resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: FitScore,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub rationale: String,
    pub candidate_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionOutcome {
    Proceed,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub outcome: DecisionOutcome,
    pub threshold: Threshold,
    pub evaluation: Evaluation,
}

impl DecisionOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionOutcome::Proceed => "PROCEED",
            DecisionOutcome::Reject => "REJECT",
        }
    }
}

impl Decision {
    pub fn proceeds(&self) -> bool {
        self.outcome == DecisionOutcome::Proceed
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Turns and transcripts
// ────────────────────────────────────────────────────────────────────────────

/// A candidate's answer. Blank or missing input becomes `NoAnswer` so a
/// failed transcription never stalls the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Text(String),
    NoAnswer,
}

impl Answer {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(text) if !text.is_empty() => Answer::Text(text.to_string()),
            _ => Answer::NoAnswer,
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Answer::Text(text) => text,
            Answer::NoAnswer => "(no answer)",
        }
    }
}

/// One question/answer exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub index: u32,
    pub question: String,
    /// True when the question oracle failed and the generic question was asked.
    pub fallback_question: bool,
    pub answer: Answer,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TranscriptStatus {
    Completed,
    Abandoned,
    /// The candidate was rejected before any interview began.
    NotApplicable,
}

impl TranscriptStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptStatus::Completed => "COMPLETED",
            TranscriptStatus::Abandoned => "ABANDONED",
            TranscriptStatus::NotApplicable => "NOT_APPLICABLE",
        }
    }
}

/// Finalized, ordered record of an interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub turns: Vec<Turn>,
    pub status: TranscriptStatus,
    pub finalized_at: DateTime<Utc>,
}

impl Transcript {
    pub fn not_applicable(at: DateTime<Utc>) -> Self {
        Self {
            turns: Vec::new(),
            status: TranscriptStatus::NotApplicable,
            finalized_at: at,
        }
    }
}

/// Interview controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewState {
    NotStarted,
    InProgress,
    Completed,
    Abandoned,
}

impl InterviewState {
    pub fn is_terminal(self) -> bool {
        matches!(self, InterviewState::Completed | InterviewState::Abandoned)
    }
}

/// The question currently awaiting an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingQuestion {
    pub index: u32,
    pub total: u32,
    pub text: String,
    pub fallback: bool,
}
