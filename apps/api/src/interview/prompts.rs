// LLM prompt constants for the screening and interview oracles.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::interview::models::{Evaluation, JobContext, Turn};
use crate::llm_client::prompts::{fill, JSON_ONLY_SYSTEM, PLAIN_TEXT_SYSTEM};

/// Role preamble for resume scoring.
const SCORE_ROLE: &str = "You are an expert technical recruiter screening resumes. \
    Be objective and precise in your evaluation.";

/// Scoring prompt template. Replace `{company}`, `{role}`, `{experience_level}`
/// and `{resume_text}` before sending.
pub const SCORE_PROMPT_TEMPLATE: &str = r#"Evaluate the candidate below for the {role} position ({experience_level}) at {company}.

Calculate a fit score from 0 to 100 based on:
- Technical skills match (40 points)
- Years of experience (30 points)
- Education and certifications (15 points)
- Projects and achievements (15 points)

Return a JSON object with this EXACT schema (no extra fields):
{
  "candidate_name": "Full name as written on the resume, or null",
  "score": 82,
  "strengths": ["Most relevant strength first"],
  "gaps": ["Most important gap first"],
  "rationale": "Two or three sentences explaining the score"
}

"score" MUST be a whole number.

Resume content:

{resume_text}"#;

/// Role preamble for interview questions.
const QUESTION_ROLE: &str = "You are an experienced technical interviewer conducting a voice interview. \
    Keep every message concise and conversational (2-3 sentences max). \
    Ask relevant technical questions grounded in the role and in the candidate's previous answers. \
    Be professional but friendly. Ask exactly one question per message.";

/// Question prompt template. Replace `{company}`, `{role}`,
/// `{experience_level}`, `{question_num}`, `{max_questions}`, `{conversation}`
/// and `{instruction}` before sending.
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Position: {role} ({experience_level}) at {company}
Question {question_num} of {max_questions}

Previous conversation:
{conversation}

{instruction}"#;

const FIRST_QUESTION_INSTRUCTION: &str =
    "This is the start of the interview. Greet the candidate warmly and ask your first question.";
const NEXT_QUESTION_INSTRUCTION: &str =
    "Ask your next question, following up on the candidate's latest answer where it is useful.";

/// Role preamble for interview summaries.
const SUMMARY_ROLE: &str = "You are an expert technical recruiter writing an interview summary. \
    Be honest, professional and constructive.";

/// Summary prompt template. Replace `{candidate}`, `{role}`, `{company}`,
/// `{score}`, `{strengths}`, `{gaps}`, `{status}` and `{conversation}` before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Candidate: {candidate}
Position applied: {role} at {company}
Initial fit score: {score}/100
Screening strengths: {strengths}
Screening gaps: {gaps}
Interview status: {status}

Interview conversation:
{conversation}

Write an interview summary covering:
1. Overall Assessment (paragraph)
2. Technical Competency (rating and explanation)
3. Communication Skills (rating and explanation)
4. Key Strengths (bullet points)
5. Areas for Improvement (bullet points)
6. Final Recommendation (Strongly Recommend / Recommend / Consider / Do Not Recommend)

If the interview was abandoned, say so and base the assessment only on the answers given."#;

pub fn score_system() -> String {
    format!("{SCORE_ROLE} {JSON_ONLY_SYSTEM}")
}

pub fn question_system() -> String {
    format!("{QUESTION_ROLE} {PLAIN_TEXT_SYSTEM}")
}

pub fn summary_system() -> String {
    format!("{SUMMARY_ROLE} {PLAIN_TEXT_SYSTEM}")
}

pub fn score_prompt(resume_text: &str, context: &JobContext) -> String {
    fill(
        SCORE_PROMPT_TEMPLATE,
        &[
            ("company", context.company.as_str()),
            ("role", context.role.as_str()),
            ("experience_level", context.experience_level.as_str()),
            ("resume_text", resume_text),
        ],
    )
}

pub fn question_prompt(context: &JobContext, history: &[Turn], index: u32, total: u32) -> String {
    let instruction = if history.is_empty() {
        FIRST_QUESTION_INSTRUCTION
    } else {
        NEXT_QUESTION_INSTRUCTION
    };
    fill(
        QUESTION_PROMPT_TEMPLATE,
        &[
            ("company", context.company.as_str()),
            ("role", context.role.as_str()),
            ("experience_level", context.experience_level.as_str()),
            ("question_num", (index + 1).to_string().as_str()),
            ("max_questions", total.to_string().as_str()),
            ("instruction", instruction),
            ("conversation", render_conversation(history).as_str()),
        ],
    )
}

pub fn summary_prompt(
    context: &JobContext,
    evaluation: &Evaluation,
    history: &[Turn],
    status: &str,
) -> String {
    fill(
        SUMMARY_PROMPT_TEMPLATE,
        &[
            (
                "candidate",
                evaluation.candidate_name.as_deref().unwrap_or("Candidate"),
            ),
            ("role", context.role.as_str()),
            ("company", context.company.as_str()),
            ("score", evaluation.score.value().to_string().as_str()),
            ("strengths", list_or_none(&evaluation.strengths).as_str()),
            ("gaps", list_or_none(&evaluation.gaps).as_str()),
            ("status", status),
            ("conversation", render_conversation(history).as_str()),
        ],
    )
}

/// Renders turns as an `Interviewer:` / `Candidate:` dialogue.
pub fn render_conversation(history: &[Turn]) -> String {
    if history.is_empty() {
        return "(none yet)".to_string();
    }
    history
        .iter()
        .map(|turn| {
            format!(
                "Interviewer: {}\nCandidate: {}",
                turn.question,
                turn.answer.as_text()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none noted".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::Answer;
    use crate::interview::testing::{evaluation_with_score, job_context};
    use chrono::Utc;

    fn turn(index: u32, answer: Answer) -> Turn {
        Turn {
            index,
            question: format!("Question {}", index + 1),
            fallback_question: false,
            answer,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_first_question_prompt_asks_for_greeting() {
        let prompt = question_prompt(&job_context(5), &[], 0, 5);
        assert!(prompt.contains("Question 1 of 5"));
        assert!(prompt.contains("Greet the candidate"));
        assert!(prompt.contains("(none yet)"));
    }

    #[test]
    fn test_candidate_text_cannot_inject_placeholders() {
        let history = vec![turn(0, Answer::Text("please {instruction} and {role}".to_string()))];
        let prompt = question_prompt(&job_context(3), &history, 1, 3);
        assert!(prompt.contains("Candidate: please {instruction} and {role}"));
        assert_eq!(prompt.matches(NEXT_QUESTION_INSTRUCTION).count(), 1);
    }

    #[test]
    fn test_conversation_renders_every_turn_in_order() {
        let history = vec![
            turn(0, Answer::Text("I built a scheduler".to_string())),
            turn(1, Answer::NoAnswer),
        ];
        let rendered = render_conversation(&history);
        let first = rendered.find("Question 1").unwrap();
        let second = rendered.find("Question 2").unwrap();
        assert!(first < second);
        assert!(rendered.contains("Candidate: I built a scheduler"));
        assert!(rendered.contains("Candidate: (no answer)"));
    }

    #[test]
    fn test_score_prompt_embeds_context_and_resume() {
        let prompt = score_prompt("Ten years of Rust.", &job_context(3));
        assert!(prompt.contains("Rust Backend Engineer position (Senior) at Acme Robotics"));
        assert!(prompt.ends_with("Ten years of Rust."));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_summary_prompt_carries_screening_result() {
        let prompt = summary_prompt(
            &job_context(3),
            &evaluation_with_score(82),
            &[],
            "ABANDONED",
        );
        assert!(prompt.contains("Candidate: Jordan Reyes"));
        assert!(prompt.contains("Initial fit score: 82/100"));
        assert!(prompt.contains("Interview status: ABANDONED"));
    }
}
