//! Scripted oracle and storage doubles shared by the interview tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::interview::models::{Answer, Evaluation, FitScore, JobContext, Transcript};
use crate::interview::oracle::{
    OracleError, QuestionOracle, QuestionRequest, RawEvaluation, ScoringOracle,
    SummarizationOracle,
};
use crate::interview::report::Report;
use crate::storage::{ReportStore, StorageError};

pub fn job_context(question_count: u32) -> JobContext {
    JobContext {
        company: "Acme Robotics".to_string(),
        role: "Rust Backend Engineer".to_string(),
        experience_level: "Senior".to_string(),
        question_count,
    }
}

pub fn raw_with_score(score: Value) -> RawEvaluation {
    RawEvaluation {
        score: Some(score),
        ..RawEvaluation::default()
    }
}

pub fn evaluation_with_score(score: u8) -> Evaluation {
    Evaluation {
        score: FitScore::new(i64::from(score)).unwrap(),
        strengths: vec!["Rust".to_string(), "Distributed systems".to_string()],
        gaps: vec!["Kubernetes".to_string()],
        rationale: "Solid systems background".to_string(),
        candidate_name: Some("Jordan Reyes".to_string()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

pub struct ScriptedScorer {
    response: Option<RawEvaluation>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedScorer {
    pub fn returning(raw: RawEvaluation) -> Self {
        Self {
            response: Some(raw),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn scoring(score: i64) -> Self {
        let mut raw = raw_with_score(Value::from(score));
        raw.strengths = Some(vec!["Rust".to_string()]);
        raw.gaps = Some(vec!["Go".to_string()]);
        raw.rationale = Some("Scripted evaluation".to_string());
        Self::returning(raw)
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn slow(raw: RawEvaluation, delay: Duration) -> Self {
        Self {
            response: Some(raw),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoringOracle for ScriptedScorer {
    async fn score(
        &self,
        _resume_text: &str,
        _context: &JobContext,
    ) -> Result<RawEvaluation, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response
            .clone()
            .ok_or_else(|| OracleError::Failure("scripted scoring failure".to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Questions
// ────────────────────────────────────────────────────────────────────────────

enum QuestionScript {
    Numbered,
    FailingAt(u32),
    Fixed(String),
    Slow(Duration),
}

pub struct ScriptedQuestions {
    script: QuestionScript,
    seen: Mutex<Vec<Vec<Answer>>>,
}

impl ScriptedQuestions {
    fn with(script: QuestionScript) -> Self {
        Self {
            script,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Asks "Question N" for the N-th (1-based) turn.
    pub fn numbered() -> Self {
        Self::with(QuestionScript::Numbered)
    }

    /// Numbered, except the zero-based `index` fails.
    pub fn failing_at(index: u32) -> Self {
        Self::with(QuestionScript::FailingAt(index))
    }

    pub fn fixed(text: &str) -> Self {
        Self::with(QuestionScript::Fixed(text.to_string()))
    }

    pub fn slow(delay: Duration) -> Self {
        Self::with(QuestionScript::Slow(delay))
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn history_lengths(&self) -> Vec<usize> {
        self.seen.lock().unwrap().iter().map(Vec::len).collect()
    }

    pub fn last_history_answers(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .last()
            .map(|answers| answers.iter().map(|a| a.as_text().to_string()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QuestionOracle for ScriptedQuestions {
    async fn next_question(&self, request: QuestionRequest<'_>) -> Result<String, OracleError> {
        self.seen
            .lock()
            .unwrap()
            .push(request.history.iter().map(|t| t.answer.clone()).collect());

        match &self.script {
            QuestionScript::Numbered => Ok(format!("Question {}", request.index + 1)),
            QuestionScript::FailingAt(index) if *index == request.index => {
                Err(OracleError::Failure("scripted question failure".to_string()))
            }
            QuestionScript::FailingAt(_) => Ok(format!("Question {}", request.index + 1)),
            QuestionScript::Fixed(text) => Ok(text.clone()),
            QuestionScript::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("Too late".to_string())
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Summaries
// ────────────────────────────────────────────────────────────────────────────

pub struct ScriptedSummarizer {
    text: Option<String>,
    delay: Option<Duration>,
}

impl ScriptedSummarizer {
    pub fn fixed(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            delay: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            delay: None,
        }
    }

    pub fn slow(text: &str, delay: Duration) -> Self {
        Self {
            text: Some(text.to_string()),
            delay: Some(delay),
        }
    }
}

#[async_trait]
impl SummarizationOracle for ScriptedSummarizer {
    async fn summarize(
        &self,
        _context: &JobContext,
        _evaluation: &Evaluation,
        _transcript: &Transcript,
    ) -> Result<String, OracleError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.text
            .clone()
            .ok_or_else(|| OracleError::Failure("scripted summary failure".to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Storage
// ────────────────────────────────────────────────────────────────────────────

/// A store that is always unreachable.
pub struct UnreachableStore {
    attempts: AtomicUsize,
}

impl UnreachableStore {
    pub fn new() -> Self {
        Self {
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportStore for UnreachableStore {
    async fn save(&self, _report: &Report) -> Result<String, StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::ObjectStore("connection refused".to_string()))
    }
}

/// Keeps saved reports in memory by storage key, like the object store, so a
/// second save under the same key replaces the first.
#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<BTreeMap<String, Report>>,
}

impl MemoryStore {
    /// Stored reports ordered by key.
    pub fn reports(&self) -> Vec<(String, Report)> {
        self.saved
            .lock()
            .unwrap()
            .iter()
            .map(|(key, report)| (key.clone(), report.clone()))
            .collect()
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn save(&self, report: &Report) -> Result<String, StorageError> {
        let key = crate::storage::report_key(report.session_id, report.generated_at);
        self.saved.lock().unwrap().insert(key.clone(), report.clone());
        Ok(key)
    }
}
