//! Orchestrator — routes caller events to the right component for a session
//! and owns the session table.
//!
//! Events for one session are serialized by a per-session async mutex held
//! for the whole transition, oracle calls included. Different sessions never
//! share mutable state. Sessions are evicted as soon as they reach a terminal
//! state; idle sessions are abandoned lazily whenever any event arrives, and
//! their reports are built in the background so the arriving event never
//! waits on another session's oracle or storage calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex as SessionLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::interview::controller::InterviewController;
use crate::interview::decision::decide;
use crate::interview::errors::InterviewError;
use crate::interview::evaluation::EvaluationEngine;
use crate::interview::models::{
    Answer, Decision, JobContext, PendingQuestion, Threshold, Transcript,
};
use crate::interview::oracle::QuestionOracle;
use crate::interview::report::{Report, ReportAssembler, ReportReceipt};

/// An external input for one session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    ResumeSubmitted {
        resume_text: String,
        context: JobContext,
        /// Overrides the service default threshold for this session.
        threshold: Option<Threshold>,
    },
    /// `None` or blank text records the no-answer sentinel.
    AnswerSubmitted { answer: Option<String> },
    SessionAbandoned,
}

/// What the caller should present next.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    InterviewStarted {
        decision: Decision,
        question: PendingQuestion,
    },
    Rejected {
        decision: Decision,
        receipt: ReportReceipt,
    },
    NextQuestion {
        question: PendingQuestion,
    },
    Finished {
        receipt: ReportReceipt,
    },
    Abandoned {
        receipt: Option<ReportReceipt>,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub default_threshold: Threshold,
    pub oracle_timeout: Duration,
    pub idle_timeout: Duration,
}

enum Phase {
    /// Created by a resume submission; evaluation has not completed.
    Screening,
    Interviewing {
        context: JobContext,
        decision: Decision,
        controller: InterviewController,
    },
    Closed,
}

struct Session {
    phase: Phase,
    last_activity: Instant,
}

type SessionSlot = Arc<SessionLock<Session>>;

pub struct Orchestrator {
    engine: EvaluationEngine,
    questions: Arc<dyn QuestionOracle>,
    assembler: Arc<ReportAssembler>,
    settings: SessionSettings,
    sessions: Mutex<HashMap<Uuid, SessionSlot>>,
}

impl Orchestrator {
    pub fn new(
        engine: EvaluationEngine,
        questions: Arc<dyn QuestionOracle>,
        assembler: ReportAssembler,
        settings: SessionSettings,
    ) -> Self {
        Self {
            engine,
            questions,
            assembler: Arc::new(assembler),
            settings,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub async fn submit_resume(
        &self,
        session_id: Uuid,
        resume_text: String,
        context: JobContext,
        threshold: Option<Threshold>,
    ) -> Result<Outcome, InterviewError> {
        self.advance(
            session_id,
            SessionEvent::ResumeSubmitted {
                resume_text,
                context,
                threshold,
            },
        )
        .await
    }

    pub async fn submit_answer(
        &self,
        session_id: Uuid,
        answer: Option<String>,
    ) -> Result<Outcome, InterviewError> {
        self.advance(session_id, SessionEvent::AnswerSubmitted { answer })
            .await
    }

    pub async fn abandon(&self, session_id: Uuid) -> Result<Outcome, InterviewError> {
        self.advance(session_id, SessionEvent::SessionAbandoned).await
    }

    /// Retries persistence of a report whose first save failed. The report
    /// comes back from the caller, so it is checked before it is stored.
    pub async fn persist_report(&self, report: &Report) -> Result<String, InterviewError> {
        report.validate()?;
        self.assembler.persist(report).await
    }

    /// Number of sessions currently held in memory.
    pub fn active_sessions(&self) -> usize {
        self.table().len()
    }

    /// Single entry point: drives exactly one transition for `session_id`.
    pub async fn advance(
        &self,
        session_id: Uuid,
        event: SessionEvent,
    ) -> Result<Outcome, InterviewError> {
        self.abandon_idle();

        loop {
            let slot = match &event {
                SessionEvent::ResumeSubmitted { .. } => self.slot_or_create(session_id),
                _ => match self.slot(session_id) {
                    Some(slot) => slot,
                    None => return Self::no_session(session_id, &event),
                },
            };

            let mut session = slot.lock().await;
            if matches!(session.phase, Phase::Closed) {
                // Evicted while this event waited; a new resume starts afresh.
                drop(session);
                if matches!(event, SessionEvent::ResumeSubmitted { .. }) {
                    continue;
                }
                return Self::no_session(session_id, &event);
            }

            session.last_activity = Instant::now();
            let outcome = self
                .route(session_id, &mut session, event.clone())
                .await;
            if matches!(session.phase, Phase::Closed) {
                self.evict(session_id, &slot);
            }
            return outcome;
        }
    }

    /// Abandons every session idle past the configured window. Sessions busy
    /// with another event are skipped. Only the state change happens here;
    /// each report is assembled and stored by a spawned task.
    pub fn abandon_idle(&self) {
        let candidates: Vec<(Uuid, SessionSlot)> = self
            .table()
            .iter()
            .map(|(id, slot)| (*id, slot.clone()))
            .collect();

        for (session_id, slot) in candidates {
            let Ok(mut session) = slot.try_lock() else {
                continue;
            };
            if matches!(session.phase, Phase::Closed)
                || session.last_activity.elapsed() < self.settings.idle_timeout
            {
                continue;
            }
            warn!(
                "Session {session_id} idle for over {:?}; abandoning",
                self.settings.idle_timeout
            );
            match Self::take_abandoned(session_id, &mut session) {
                Ok(Some((decision, transcript, context))) => {
                    let assembler = self.assembler.clone();
                    tokio::spawn(async move {
                        let receipt = assembler
                            .finish(session_id, &decision, transcript, &context)
                            .await;
                        if let Some(e) = receipt.storage_error {
                            warn!(
                                "Abandoned report for idle session {session_id} needs a retry: {e}"
                            );
                        }
                    });
                }
                Ok(None) => {}
                Err(e) => warn!("Failed to abandon idle session {session_id}: {e}"),
            }
            drop(session);
            self.evict(session_id, &slot);
        }
    }

    async fn route(
        &self,
        session_id: Uuid,
        session: &mut Session,
        event: SessionEvent,
    ) -> Result<Outcome, InterviewError> {
        match event {
            SessionEvent::ResumeSubmitted {
                resume_text,
                context,
                threshold,
            } => {
                if !matches!(session.phase, Phase::Screening) {
                    return Err(InterviewError::InvalidState(format!(
                        "session {session_id} already has an interview in progress"
                    )));
                }
                let result = self
                    .screen(session_id, session, resume_text, context, threshold)
                    .await;
                if result.is_err() {
                    // Caller errors and failed evaluations leave nothing behind;
                    // the caller may resubmit.
                    session.phase = Phase::Closed;
                }
                result
            }
            SessionEvent::AnswerSubmitted { answer } => {
                let Phase::Interviewing { controller, .. } = &mut session.phase else {
                    return Err(InterviewError::InvalidState(format!(
                        "session {session_id} has no interview awaiting an answer"
                    )));
                };
                match controller.submit_answer(Answer::from_raw(answer.as_deref())).await? {
                    Some(question) => {
                        debug!(
                            "Session {session_id} recorded {} turns",
                            controller.turns().len()
                        );
                        Ok(Outcome::NextQuestion { question })
                    }
                    None => {
                        let receipt = self.close_finished(session_id, session).await?;
                        Ok(Outcome::Finished { receipt })
                    }
                }
            }
            SessionEvent::SessionAbandoned => {
                let receipt = match Self::take_abandoned(session_id, session)? {
                    Some((decision, transcript, context)) => Some(
                        self.assembler
                            .finish(session_id, &decision, transcript, &context)
                            .await,
                    ),
                    None => None,
                };
                Ok(Outcome::Abandoned { receipt })
            }
        }
    }

    async fn screen(
        &self,
        session_id: Uuid,
        session: &mut Session,
        resume_text: String,
        context: JobContext,
        threshold: Option<Threshold>,
    ) -> Result<Outcome, InterviewError> {
        let context = context.validated()?;
        let evaluation = self.engine.evaluate(&resume_text, &context).await?;
        let decision = decide(
            evaluation,
            threshold.unwrap_or(self.settings.default_threshold),
        );

        if !decision.proceeds() {
            info!("Session {session_id} rejected at screening");
            let transcript = Transcript::not_applicable(chrono::Utc::now());
            let receipt = self
                .assembler
                .finish(session_id, &decision, transcript, &context)
                .await;
            session.phase = Phase::Closed;
            return Ok(Outcome::Rejected { decision, receipt });
        }

        let mut controller =
            InterviewController::new(self.questions.clone(), self.settings.oracle_timeout);
        let question = controller
            .start(context.clone(), context.question_count)
            .await?;
        info!("Session {session_id} proceeding to interview");
        session.phase = Phase::Interviewing {
            context,
            decision: decision.clone(),
            controller,
        };
        Ok(Outcome::InterviewStarted { decision, question })
    }

    /// Hands a completed transcript to the assembler and closes the session.
    async fn close_finished(
        &self,
        session_id: Uuid,
        session: &mut Session,
    ) -> Result<ReportReceipt, InterviewError> {
        let Phase::Interviewing {
            context,
            decision,
            controller,
        } = std::mem::replace(&mut session.phase, Phase::Closed)
        else {
            return Err(InterviewError::InvalidState(format!(
                "session {session_id} is not interviewing"
            )));
        };
        let transcript = controller.into_transcript()?;
        Ok(self
            .assembler
            .finish(session_id, &decision, transcript, &context)
            .await)
    }

    /// Closes whatever the session holds. Only an interview leaves something
    /// to report: its decision, partial transcript and job context.
    fn take_abandoned(
        session_id: Uuid,
        session: &mut Session,
    ) -> Result<Option<(Decision, Transcript, JobContext)>, InterviewError> {
        match std::mem::replace(&mut session.phase, Phase::Closed) {
            Phase::Interviewing {
                context,
                decision,
                mut controller,
            } => {
                let transcript = controller.abandon()?;
                info!(
                    "Session {session_id} abandoned after {} turns",
                    transcript.turns.len()
                );
                Ok(Some((decision, transcript, context)))
            }
            Phase::Screening | Phase::Closed => {
                info!("Session {session_id} abandoned before any interview");
                Ok(None)
            }
        }
    }

    fn no_session(session_id: Uuid, event: &SessionEvent) -> Result<Outcome, InterviewError> {
        match event {
            SessionEvent::SessionAbandoned => Ok(Outcome::Abandoned { receipt: None }),
            _ => Err(InterviewError::SessionNotFound(session_id)),
        }
    }

    fn table(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, SessionSlot>> {
        // A poisoned table only means another thread panicked mid-insert or
        // mid-remove; the map itself is still consistent.
        self.sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn slot(&self, session_id: Uuid) -> Option<SessionSlot> {
        self.table().get(&session_id).cloned()
    }

    fn slot_or_create(&self, session_id: Uuid) -> SessionSlot {
        self.table()
            .entry(session_id)
            .or_insert_with(|| {
                Arc::new(SessionLock::new(Session {
                    phase: Phase::Screening,
                    last_activity: Instant::now(),
                }))
            })
            .clone()
    }

    fn evict(&self, session_id: Uuid, slot: &SessionSlot) {
        let mut table = self.table();
        if table
            .get(&session_id)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            table.remove(&session_id);
            info!("Session {session_id} evicted");
        }
    }
}
