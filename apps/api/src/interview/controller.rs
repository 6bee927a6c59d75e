//! Interview Controller — the per-session interview state machine.
//!
//! ```text
//! NOT_STARTED ──start──▶ IN_PROGRESS ──answer × max_turns──▶ COMPLETED
//!      │                      │
//!      └──────abandon─────────┴──────────────────────────▶ ABANDONED
//! ```
//!
//! Turns are append-only and their indices run 0..max_turns. Terminal states
//! never transition again. A failed or empty question from the oracle is
//! replaced by `FALLBACK_QUESTION` instead of failing the session.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::interview::errors::InterviewError;
use crate::interview::models::{
    Answer, InterviewState, JobContext, PendingQuestion, Transcript, TranscriptStatus, Turn,
};
use crate::interview::oracle::{bounded, QuestionOracle, QuestionRequest};

/// Asked whenever the question oracle fails or returns unusable text.
pub const FALLBACK_QUESTION: &str = "Could you walk me through a recent project you worked on, \
    the role you played, and the hardest technical problem you solved?";

/// Longest question accepted from the oracle, in characters.
const MAX_QUESTION_CHARS: usize = 2_000;

enum Phase {
    NotStarted,
    InProgress {
        context: JobContext,
        max_turns: u32,
        pending: PendingQuestion,
        turns: Vec<Turn>,
    },
    Finished(Transcript),
}

pub struct InterviewController {
    questions: Arc<dyn QuestionOracle>,
    timeout: Duration,
    phase: Phase,
}

impl InterviewController {
    pub fn new(questions: Arc<dyn QuestionOracle>, timeout: Duration) -> Self {
        Self {
            questions,
            timeout,
            phase: Phase::NotStarted,
        }
    }

    pub fn state(&self) -> InterviewState {
        match &self.phase {
            Phase::NotStarted => InterviewState::NotStarted,
            Phase::InProgress { .. } => InterviewState::InProgress,
            Phase::Finished(t) if t.status == TranscriptStatus::Completed => {
                InterviewState::Completed
            }
            Phase::Finished(_) => InterviewState::Abandoned,
        }
    }

    /// Question awaiting an answer, if the interview is running.
    pub fn pending_question(&self) -> Option<&PendingQuestion> {
        match &self.phase {
            Phase::InProgress { pending, .. } => Some(pending),
            _ => None,
        }
    }

    /// Turns recorded so far, in order.
    pub fn turns(&self) -> &[Turn] {
        match &self.phase {
            Phase::NotStarted => &[],
            Phase::InProgress { turns, .. } => turns,
            Phase::Finished(transcript) => &transcript.turns,
        }
    }

    /// Finalized transcript once the controller is terminal.
    pub fn transcript(&self) -> Option<&Transcript> {
        match &self.phase {
            Phase::Finished(transcript) => Some(transcript),
            _ => None,
        }
    }

    /// Hands the finalized transcript off, consuming the controller.
    pub fn into_transcript(self) -> Result<Transcript, InterviewError> {
        match self.phase {
            Phase::Finished(transcript) => Ok(transcript),
            _ => Err(InterviewError::InvalidState(
                "interview has not finished; no transcript to hand off".to_string(),
            )),
        }
    }

    /// NOT_STARTED → IN_PROGRESS, asking the first question.
    pub async fn start(
        &mut self,
        context: JobContext,
        max_turns: u32,
    ) -> Result<PendingQuestion, InterviewError> {
        if !matches!(self.phase, Phase::NotStarted) {
            return Err(InterviewError::InvalidState(format!(
                "cannot start an interview that is {:?}",
                self.state()
            )));
        }
        if max_turns < 1 {
            return Err(InterviewError::InvalidConfig(
                "max_turns must be at least 1".to_string(),
            ));
        }

        let pending = Self::request_question(
            self.questions.as_ref(),
            self.timeout,
            &context,
            &[],
            0,
            max_turns,
        )
        .await;
        info!(
            "Interview started for {} at {}: {} turns",
            context.role, context.company, max_turns
        );
        self.phase = Phase::InProgress {
            context,
            max_turns,
            pending: pending.clone(),
            turns: Vec::new(),
        };
        Ok(pending)
    }

    /// Records the answer to the pending question and advances. Returns the
    /// next question, or `None` once the final turn completes the interview.
    pub async fn submit_answer(
        &mut self,
        answer: Answer,
    ) -> Result<Option<PendingQuestion>, InterviewError> {
        let state = self.state();
        let Phase::InProgress {
            context,
            max_turns,
            pending,
            turns,
        } = &mut self.phase
        else {
            return Err(InterviewError::InvalidState(format!(
                "cannot accept an answer while interview is {state:?}"
            )));
        };

        let turn = Turn {
            index: pending.index,
            question: pending.text.clone(),
            fallback_question: pending.fallback,
            answer,
            timestamp: Utc::now(),
        };
        let recorded = turns.len() as u32 + 1;
        debug!("Recording turn {} of {}", recorded, max_turns);

        if recorded >= *max_turns {
            let mut turns = std::mem::take(turns);
            turns.push(turn);
            info!("Interview completed after {} turns", turns.len());
            self.phase = Phase::Finished(Transcript {
                turns,
                status: TranscriptStatus::Completed,
                finalized_at: Utc::now(),
            });
            return Ok(None);
        }

        // Nothing is committed until the oracle returns, so a dropped future
        // leaves the recorded turns untouched.
        let mut history = Vec::with_capacity(turns.len() + 1);
        history.extend_from_slice(turns);
        history.push(turn);

        let next = Self::request_question(
            self.questions.as_ref(),
            self.timeout,
            context,
            &history,
            recorded,
            *max_turns,
        )
        .await;
        *turns = history;
        *pending = next.clone();
        Ok(Some(next))
    }

    /// Any non-terminal state → ABANDONED, keeping whatever turns exist.
    pub fn abandon(&mut self) -> Result<Transcript, InterviewError> {
        let state = self.state();
        if state.is_terminal() {
            return Err(InterviewError::InvalidState(format!(
                "interview already finished as {state:?}"
            )));
        }
        let turns = match &mut self.phase {
            Phase::InProgress { turns, .. } => std::mem::take(turns),
            _ => Vec::new(),
        };
        info!("Interview abandoned after {} turns", turns.len());
        let transcript = Transcript {
            turns,
            status: TranscriptStatus::Abandoned,
            finalized_at: Utc::now(),
        };
        self.phase = Phase::Finished(transcript.clone());
        Ok(transcript)
    }

    async fn request_question(
        questions: &dyn QuestionOracle,
        timeout: Duration,
        context: &JobContext,
        history: &[Turn],
        index: u32,
        total: u32,
    ) -> PendingQuestion {
        let request = QuestionRequest {
            context,
            history,
            index,
            total,
        };
        let text = match bounded(timeout, questions.next_question(request)).await {
            Ok(raw) => match clean_question(&raw) {
                Some(question) => Some(question),
                None => {
                    warn!("Question oracle returned unusable text for turn {index}");
                    None
                }
            },
            Err(e) => {
                warn!("Question oracle failed for turn {index}: {e}");
                None
            }
        };

        match text {
            Some(text) => PendingQuestion {
                index,
                total,
                text,
                fallback: false,
            },
            None => PendingQuestion {
                index,
                total,
                text: FALLBACK_QUESTION.to_string(),
                fallback: true,
            },
        }
    }
}

/// Trims whitespace and wrapping quotes. Empty, letterless or oversized text
/// is unusable.
fn clean_question(raw: &str) -> Option<String> {
    let text = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if text.is_empty()
        || !text.chars().any(char::is_alphanumeric)
        || text.chars().count() > MAX_QUESTION_CHARS
    {
        return None;
    }
    Some(text.to_string())
}
