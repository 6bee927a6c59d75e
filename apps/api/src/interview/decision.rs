//! Decision Gate — proceed to interview iff `score >= threshold`.

use tracing::info;

use crate::interview::models::{Decision, DecisionOutcome, Evaluation, Threshold};

/// Pure and total: both inputs are range-checked by construction.
pub fn decide(evaluation: Evaluation, threshold: Threshold) -> Decision {
    let outcome = if evaluation.score.value() >= threshold.value() {
        DecisionOutcome::Proceed
    } else {
        DecisionOutcome::Reject
    };
    info!(
        "Decision {:?}: score {} vs threshold {}",
        outcome,
        evaluation.score.value(),
        threshold.value()
    );
    Decision {
        outcome,
        threshold,
        evaluation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::testing::evaluation_with_score;

    #[test]
    fn test_proceed_iff_score_at_least_threshold() {
        for t in 0..=100_i64 {
            let threshold = Threshold::new(t).unwrap();
            for s in 0..=100_u8 {
                let decision = decide(evaluation_with_score(s), threshold);
                assert_eq!(decision.proceeds(), i64::from(s) >= t, "score {s} threshold {t}");
            }
        }
    }

    #[test]
    fn test_decision_keeps_threshold_and_evaluation() {
        let evaluation = evaluation_with_score(60);
        let decision = decide(evaluation.clone(), Threshold::new(75).unwrap());
        assert_eq!(decision.outcome, DecisionOutcome::Reject);
        assert_eq!(decision.threshold.value(), 75);
        assert_eq!(decision.evaluation, evaluation);
    }
}
