// Screening and interview engine.
// Evaluation, decision, interview FSM and report assembly, driven per session
// by the orchestrator. All LLM calls go through llm_client via llm_oracles.

pub mod controller;
pub mod decision;
pub mod errors;
pub mod evaluation;
pub mod handlers;
pub mod llm_oracles;
pub mod models;
pub mod oracle;
pub mod orchestrator;
pub mod prompts;
pub mod report;

#[cfg(test)]
pub mod testing;
