//! Voice-intent keyword matcher for the utterance surface.
//!
//! The reset intent requires one word from each of two concept slots
//! (reset-vocabulary and memory-vocabulary); everything else falls through
//! to the fallback brain.

use aimlbot_core::Goal;

const RESET_VOCAB: &[&str] = &["reset", "clear", "erase", "wipe", "forget"];
const MEMORY_VOCAB: &[&str] = &["memory", "memories", "brain"];

/// Maps a raw utterance to the goal the orchestrator should dispatch.
pub fn goal_for_utterance(utterance: &str) -> Goal {
    let tokens: Vec<String> = utterance
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
        .collect();

    let has = |vocab: &[&str]| tokens.iter().any(|t| vocab.contains(&t.as_str()));
    if has(RESET_VOCAB) && has(MEMORY_VOCAB) {
        Goal::ResetMemory
    } else {
        Goal::Fallback {
            utterance: utterance.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_plus_memory_keywords_trigger_reset() {
        assert!(matches!(
            goal_for_utterance("please reset your memory"),
            Goal::ResetMemory
        ));
        assert!(matches!(
            goal_for_utterance("Erase your brain!"),
            Goal::ResetMemory
        ));
    }

    #[test]
    fn single_concept_is_not_a_reset() {
        assert!(matches!(
            goal_for_utterance("reset the timer"),
            Goal::Fallback { .. }
        ));
        assert!(matches!(
            goal_for_utterance("how is your memory"),
            Goal::Fallback { .. }
        ));
    }

    #[test]
    fn ordinary_utterances_fall_back() {
        match goal_for_utterance("what is your name") {
            Goal::Fallback { utterance } => assert_eq!(utterance, "what is your name"),
            other => panic!("expected fallback, got {other:?}"),
        }
    }
}
