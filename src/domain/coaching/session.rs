//! Session state - the unit of conversation state.
//!
//! A [`Session`] is a plain value: the engine takes the current session in
//! and returns an updated copy, so callers own all state and nothing is
//! hidden in process globals. Reset is just constructing a fresh value.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::analysis::{ConfidenceLevel, EmotionalTone};
use super::knowledge::ScenarioCategory;
use super::phase::CoachingPhase;

/// Semantic slots extracted from the conversation so far.
///
/// Each slot is overwritten, never merged, by later extractions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFacts {
    /// The user's name, captured during the intro phase.
    pub name: Option<String>,
    /// Work or interest background snippet from the intro phase.
    pub background: Option<String>,
    /// Last goal statement from the Goal phase.
    pub goal_summary: Option<String>,
    /// Last situation description from the Reality phase.
    pub reality_summary: Option<String>,
    /// Last brainstorm from the Options phase.
    pub options_summary: Option<String>,
    /// The committed action clause from the Will phase.
    pub action_commitment: Option<String>,
    /// True once a commitment verb co-occurred with a time or action signal.
    #[serde(default)]
    pub has_action_commitment: bool,
}

impl ExtractedFacts {
    /// Overwrites each slot that the update filled; untouched slots keep
    /// their previous value.
    pub fn merge(&mut self, update: &ExtractedFacts) {
        if update.name.is_some() {
            self.name = update.name.clone();
        }
        if update.background.is_some() {
            self.background = update.background.clone();
        }
        if update.goal_summary.is_some() {
            self.goal_summary = update.goal_summary.clone();
        }
        if update.reality_summary.is_some() {
            self.reality_summary = update.reality_summary.clone();
        }
        if update.options_summary.is_some() {
            self.options_summary = update.options_summary.clone();
        }
        if update.action_commitment.is_some() {
            self.action_commitment = update.action_commitment.clone();
        }
        if update.has_action_commitment {
            self.has_action_commitment = true;
        }
    }

    /// True if no slot has been filled yet.
    pub fn is_empty(&self) -> bool {
        *self == ExtractedFacts::default()
    }
}

/// One reporting record of how a turn felt. Never used for control flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyEntry {
    pub phase: CoachingPhase,
    pub tone: EmotionalTone,
    pub confidence: ConfidenceLevel,
    /// Truncated copy of the utterance this entry describes.
    pub excerpt: String,
    pub recorded_at: Timestamp,
}

/// Per-session conversation state.
///
/// Created empty, mutated once per turn by the dialogue engine, replaced
/// wholesale on reset. Nothing persists across resets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    /// Current phase; only ever advances forward along the fixed sequence.
    pub phase: CoachingPhase,

    /// Monotonically increasing turn counter.
    pub step_count: u32,

    /// Per-phase questions already posed, in the order they were asked.
    /// Uniqueness is enforced by [`Session::record_asked`].
    pub(crate) asked_questions: HashMap<CoachingPhase, Vec<String>>,

    /// Semantic slots filled so far.
    pub facts: ExtractedFacts,

    /// Append-only emotional record, for reporting only.
    pub emotional_journey: Vec<JourneyEntry>,

    /// Scenario flavor detected from the first substantive utterance.
    pub category: Option<ScenarioCategory>,

    /// Set when the terminal completion prompt has been issued, so the
    /// next answer closes the session.
    pub completion_prompt_issued: bool,
}

impl Session {
    /// Creates a fresh session: intro phase, zero steps, everything empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Questions already asked in the given phase, in insertion order.
    pub fn asked_in(&self, phase: CoachingPhase) -> &[String] {
        self.asked_questions
            .get(&phase)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Records a question as asked in the given phase.
    ///
    /// Duplicate recordings are ignored, which keeps the no-repeat
    /// invariant even if a caller records the same text twice.
    pub fn record_asked(&mut self, phase: CoachingPhase, question: impl Into<String>) {
        let question = question.into();
        let asked = self.asked_questions.entry(phase).or_default();
        if !asked.iter().any(|q| q == &question) {
            asked.push(question);
        }
    }

    /// Appends a journey entry.
    pub fn record_journey(&mut self, entry: JourneyEntry) {
        self.emotional_journey.push(entry);
    }

    /// True once the session has produced its summary.
    pub fn is_complete(&self) -> bool {
        self.phase == CoachingPhase::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_empty() {
        let session = Session::new();
        assert_eq!(session.phase, CoachingPhase::Intro);
        assert_eq!(session.step_count, 0);
        assert!(session.facts.is_empty());
        assert!(session.emotional_journey.is_empty());
        assert!(session.asked_in(CoachingPhase::Intro).is_empty());
        assert!(!session.completion_prompt_issued);
    }

    #[test]
    fn record_asked_preserves_insertion_order() {
        let mut session = Session::new();
        session.record_asked(CoachingPhase::Goal, "first?");
        session.record_asked(CoachingPhase::Goal, "second?");
        assert_eq!(session.asked_in(CoachingPhase::Goal), ["first?", "second?"]);
    }

    #[test]
    fn record_asked_rejects_duplicates() {
        let mut session = Session::new();
        session.record_asked(CoachingPhase::Goal, "first?");
        session.record_asked(CoachingPhase::Goal, "first?");
        assert_eq!(session.asked_in(CoachingPhase::Goal).len(), 1);
    }

    #[test]
    fn asked_sets_are_per_phase() {
        let mut session = Session::new();
        session.record_asked(CoachingPhase::Goal, "shared?");
        session.record_asked(CoachingPhase::Reality, "shared?");
        assert_eq!(session.asked_in(CoachingPhase::Goal).len(), 1);
        assert_eq!(session.asked_in(CoachingPhase::Reality).len(), 1);
    }

    #[test]
    fn facts_merge_overwrites_filled_slots_only() {
        let mut facts = ExtractedFacts {
            name: Some("Sam".to_string()),
            goal_summary: Some("old goal".to_string()),
            ..Default::default()
        };
        let update = ExtractedFacts {
            goal_summary: Some("new goal".to_string()),
            ..Default::default()
        };
        facts.merge(&update);
        assert_eq!(facts.name.as_deref(), Some("Sam"));
        assert_eq!(facts.goal_summary.as_deref(), Some("new goal"));
    }

    #[test]
    fn commitment_flag_latches_true() {
        let mut facts = ExtractedFacts {
            has_action_commitment: true,
            ..Default::default()
        };
        facts.merge(&ExtractedFacts::default());
        assert!(facts.has_action_commitment);
    }

    #[test]
    fn session_round_trips_through_json() {
        let mut session = Session::new();
        session.record_asked(CoachingPhase::Intro, "hello?");
        session.step_count = 3;
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back.step_count, 3);
        assert_eq!(back.asked_in(CoachingPhase::Intro), ["hello?"]);
    }
}
