//! Production oracles backed by the shared LLM client.

use async_trait::async_trait;
use tracing::debug;

use crate::interview::models::{Evaluation, JobContext, Transcript};
use crate::interview::oracle::{
    OracleError, QuestionOracle, QuestionRequest, RawEvaluation, ScoringOracle,
    SummarizationOracle,
};
use crate::interview::prompts;
use crate::llm_client::LlmClient;

/// Scores resumes. The response is parsed leniently into `RawEvaluation`;
/// validation happens in the evaluation engine.
pub struct LlmScoringOracle {
    llm: LlmClient,
}

impl LlmScoringOracle {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ScoringOracle for LlmScoringOracle {
    async fn score(
        &self,
        resume_text: &str,
        context: &JobContext,
    ) -> Result<RawEvaluation, OracleError> {
        debug!("Scoring resume for {} at {}", context.role, context.company);
        let raw = self
            .llm
            .call_json::<RawEvaluation>(
                &prompts::score_prompt(resume_text, context),
                &prompts::score_system(),
            )
            .await?;
        Ok(raw)
    }
}

pub struct LlmQuestionOracle {
    llm: LlmClient,
}

impl LlmQuestionOracle {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl QuestionOracle for LlmQuestionOracle {
    async fn next_question(&self, request: QuestionRequest<'_>) -> Result<String, OracleError> {
        debug!(
            "Requesting question {} of {} ({} prior turns)",
            request.index + 1,
            request.total,
            request.history.len()
        );
        let prompt = prompts::question_prompt(
            request.context,
            request.history,
            request.index,
            request.total,
        );
        Ok(self
            .llm
            .call_text(&prompt, &prompts::question_system())
            .await?)
    }
}

pub struct LlmSummarizer {
    llm: LlmClient,
}

impl LlmSummarizer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SummarizationOracle for LlmSummarizer {
    async fn summarize(
        &self,
        context: &JobContext,
        evaluation: &Evaluation,
        transcript: &Transcript,
    ) -> Result<String, OracleError> {
        debug!(
            "Summarizing {} interview with {} turns",
            transcript.status.as_str(),
            transcript.turns.len()
        );
        let prompt = prompts::summary_prompt(
            context,
            evaluation,
            &transcript.turns,
            transcript.status.as_str(),
        );
        Ok(self
            .llm
            .call_text(&prompt, &prompts::summary_system())
            .await?)
    }
}
