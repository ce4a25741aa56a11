//! Tuning constants for the analyzer and selector.
//!
//! These thresholds came from the behavior of the system this engine was
//! built to match. They are deliberately exposed as configuration rather
//! than hard-coded, and no stricter semantics should be read into them.

use serde::Deserialize;

/// Thresholds that drive "has the user said enough" heuristics.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HeuristicThresholds {
    /// Intro utterances at least this long recommend moving to Goal.
    #[serde(default = "default_intro_ready_len")]
    pub intro_ready_len: usize,

    /// Goal utterances longer than this count as a high-specificity signal.
    #[serde(default = "default_goal_specific_len")]
    pub goal_specific_len: usize,

    /// Reality utterances must exceed this length to recommend Options.
    #[serde(default = "default_reality_detail_len")]
    pub reality_detail_len: usize,

    /// Options utterances longer than this recommend moving to Will.
    #[serde(default = "default_options_detail_len")]
    pub options_detail_len: usize,

    /// Questions asked in one phase before a transition is forced.
    #[serde(default = "default_questions_per_phase")]
    pub questions_per_phase: usize,

    /// Stored emotional-journey excerpts are truncated to this many chars.
    #[serde(default = "default_journey_excerpt_len")]
    pub journey_excerpt_len: usize,
}

impl Default for HeuristicThresholds {
    fn default() -> Self {
        Self {
            intro_ready_len: default_intro_ready_len(),
            goal_specific_len: default_goal_specific_len(),
            reality_detail_len: default_reality_detail_len(),
            options_detail_len: default_options_detail_len(),
            questions_per_phase: default_questions_per_phase(),
            journey_excerpt_len: default_journey_excerpt_len(),
        }
    }
}

fn default_intro_ready_len() -> usize {
    40
}

fn default_goal_specific_len() -> usize {
    50
}

fn default_reality_detail_len() -> usize {
    80
}

fn default_options_detail_len() -> usize {
    100
}

fn default_questions_per_phase() -> usize {
    3
}

fn default_journey_excerpt_len() -> usize {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let t = HeuristicThresholds::default();
        assert_eq!(t.intro_ready_len, 40);
        assert_eq!(t.goal_specific_len, 50);
        assert_eq!(t.reality_detail_len, 80);
        assert_eq!(t.options_detail_len, 100);
        assert_eq!(t.questions_per_phase, 3);
        assert_eq!(t.journey_excerpt_len, 50);
    }

    #[test]
    fn deserializes_with_partial_overrides() {
        let t: HeuristicThresholds =
            serde_json::from_str(r#"{"questions_per_phase": 5}"#).unwrap();
        assert_eq!(t.questions_per_phase, 5);
        assert_eq!(t.goal_specific_len, 50);
    }
}
