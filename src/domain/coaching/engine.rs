//! Session state machine - the dialogue engine reducer.
//!
//! `advance` takes the current session by reference and returns the
//! response text together with an updated session value. All structural
//! decisions (phase, completion, fact extraction) are deterministic;
//! only phrasing variety flows through the injected random source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::foundation::{StateMachine, Timestamp};

use super::analysis::{EmotionalTone, InputAnalyzer, TurnAnalysis};
use super::heuristics::HeuristicThresholds;
use super::knowledge::{self, question_bank, ScenarioCategory};
use super::phase::CoachingPhase;
use super::selector::QuestionSelector;
use super::session::{JourneyEntry, Session};
use super::summary::SessionSummary;

/// The offline dialogue engine.
///
/// Holds no session state of its own - callers pass the session in and
/// receive the updated value back, which keeps every structural decision
/// unit-testable.
pub struct DialogueEngine {
    analyzer: InputAnalyzer,
    selector: QuestionSelector,
    thresholds: HeuristicThresholds,
    rng: StdRng,
}

impl DialogueEngine {
    /// Creates an engine seeded from the operating system.
    pub fn new(thresholds: HeuristicThresholds) -> Self {
        Self::from_rng(thresholds, StdRng::from_os_rng())
    }

    /// Creates an engine with a fixed seed, for reproducible phrasing.
    pub fn with_seed(thresholds: HeuristicThresholds, seed: u64) -> Self {
        Self::from_rng(thresholds, StdRng::seed_from_u64(seed))
    }

    fn from_rng(thresholds: HeuristicThresholds, rng: StdRng) -> Self {
        Self {
            analyzer: InputAnalyzer::new(thresholds.clone()),
            selector: QuestionSelector::new(thresholds.clone()),
            thresholds,
            rng,
        }
    }

    /// Produces a fresh session and its bootstrap prompt.
    pub fn reset(&mut self) -> (String, Session) {
        self.advance("", &Session::new())
    }

    /// Advances the conversation by one turn.
    ///
    /// An empty utterance is only meaningful on the very first call
    /// (session bootstrap); afterwards it yields a gentle re-prompt and
    /// leaves the session untouched. Malformed input never errors - at
    /// worst the analyzer reports low confidence and a default question
    /// is selected.
    pub fn advance(&mut self, utterance: &str, session: &Session) -> (String, Session) {
        let trimmed = utterance.trim();

        if session.is_complete() {
            return (
                "Our session is complete - you have your action. Start a new session whenever \
                 you want to work on something else."
                    .to_string(),
                session.clone(),
            );
        }

        if trimmed.is_empty() {
            if session.step_count == 0 {
                return self.bootstrap(session);
            }
            return (
                "Take your time - I'm here when you're ready.".to_string(),
                session.clone(),
            );
        }

        let analysis = self.analyzer.analyze(trimmed, session);
        let mut next = session.clone();

        let mut scenario_opening = None;
        if next.category.is_none() {
            let category = ScenarioCategory::categorize(trimmed);
            scenario_opening = category.opening();
            next.category = Some(category);
        }
        next.facts.merge(&analysis.facts);
        next.record_journey(JourneyEntry {
            phase: session.phase,
            tone: analysis.tone,
            confidence: analysis.confidence,
            excerpt: truncate_chars(trimmed, self.thresholds.journey_excerpt_len),
            recorded_at: Timestamp::now(),
        });

        let mut parts: Vec<String> = Vec::new();
        if session.step_count > 0 {
            parts.push(self.acknowledgement(&analysis, &next));
        }
        if let Some(opening) = scenario_opening {
            parts.push(opening.to_string());
        }

        // Answering the completion prompt, or committing to an action in
        // the terminal phase, closes the session with a summary.
        let commitment_made = session.phase == CoachingPhase::Will
            && (analysis.facts.has_action_commitment || session.completion_prompt_issued);
        if commitment_made {
            if next.facts.action_commitment.is_none() {
                next.facts.action_commitment = Some(trimmed.to_string());
            }
            next.facts.has_action_commitment = true;
            next.phase = CoachingPhase::Complete;
            next.step_count += 1;
            parts.push(SessionSummary::from_session(&next).render_markdown());
            return (parts.join("\n\n"), next);
        }

        let selected = self.selector.select_next(
            &analysis,
            session.phase,
            session.asked_in(session.phase),
            trimmed,
            &mut self.rng,
        );
        parts.push(selected.text.clone());
        if let Some((phase, question)) = &selected.question {
            next.record_asked(*phase, question.clone());
        }
        if selected.is_completion_prompt {
            next.completion_prompt_issued = true;
        }

        // Resolve the next phase: a forced transition wins, then the
        // analyzer's recommendation, else stay put.
        let target = selected.forced_next_phase.or_else(|| {
            analysis
                .should_transition
                .then_some(analysis.suggested_next_phase)
                .flatten()
        });
        if let Some(target) = target {
            if target != session.phase {
                if let Ok(phase) = session.phase.transition_to(target) {
                    next.phase = phase;
                    if !selected.is_transition_prompt {
                        parts.push(target.announcement().to_string());
                    }
                }
            }
        }

        next.step_count += 1;
        (parts.join("\n\n"), next)
    }

    /// First-turn greeting: the opening intro question.
    fn bootstrap(&mut self, session: &Session) -> (String, Session) {
        let mut next = session.clone();
        let opener = question_bank(CoachingPhase::Intro)
            .first()
            .copied()
            .unwrap_or_default();
        next.record_asked(CoachingPhase::Intro, opener);
        next.step_count += 1;
        (opener.to_string(), next)
    }

    /// Tone- and confidence-conditioned acknowledgement, occasionally
    /// personalized and occasionally paired with an encouragement.
    fn acknowledgement(&mut self, analysis: &TurnAnalysis, session: &Session) -> String {
        let pool = match analysis.tone {
            EmotionalTone::Positive => knowledge::ACK_POSITIVE,
            EmotionalTone::Challenging => knowledge::ACK_CHALLENGING,
            EmotionalTone::Uncertain => knowledge::ACK_UNCERTAIN,
            EmotionalTone::Neutral => knowledge::ACK_NEUTRAL,
        };
        let mut ack = pool[self.rng.random_range(0..pool.len())].to_string();

        if let Some(name) = &session.facts.name {
            if self.rng.random_range(0..2) == 0 {
                ack = format!("{name}, {}", decapitalize(&ack));
            }
        }

        if self.rng.random_range(0..10) < 3 {
            let encouragement =
                knowledge::ENCOURAGEMENTS[self.rng.random_range(0..knowledge::ENCOURAGEMENTS.len())];
            ack = format!("{encouragement} {ack}");
        }

        ack
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coaching::session::ExtractedFacts;

    fn engine() -> DialogueEngine {
        DialogueEngine::with_seed(HeuristicThresholds::default(), 11)
    }

    fn will_session_with_facts() -> Session {
        Session {
            phase: CoachingPhase::Will,
            step_count: 8,
            facts: ExtractedFacts {
                name: Some("Sam".to_string()),
                goal_summary: Some("a marketing leadership role".to_string()),
                reality_summary: Some("two years without progression".to_string()),
                options_summary: Some("course, mentor, transfer".to_string()),
                ..Default::default()
            },
            ..Session::new()
        }
    }

    mod bootstrap_and_reset {
        use super::*;

        #[test]
        fn empty_first_utterance_bootstraps() {
            let mut engine = engine();
            let (text, session) = engine.advance("", &Session::new());
            assert_eq!(session.step_count, 1);
            assert_eq!(session.phase, CoachingPhase::Intro);
            assert!(!text.is_empty());
            assert_eq!(session.asked_in(CoachingPhase::Intro).len(), 1);
        }

        #[test]
        fn reset_matches_a_brand_new_session_structurally() {
            let mut engine = engine();
            // Drive a session a few turns in.
            let (_, s1) = engine.advance("", &Session::new());
            let (_, s2) = engine.advance("I'm Sam, I work in marketing", &s1);
            assert!(s2.step_count > 1);

            let (_, fresh) = engine.reset();
            assert_eq!(fresh.phase, CoachingPhase::Intro);
            assert_eq!(fresh.step_count, 1);
            assert!(fresh.facts.is_empty());
            assert!(fresh.emotional_journey.is_empty());
        }

        #[test]
        fn empty_mid_session_utterance_is_a_no_op() {
            let mut engine = engine();
            let (_, s1) = engine.advance("", &Session::new());
            let (text, s2) = engine.advance("   ", &s1);
            assert_eq!(s2.step_count, s1.step_count);
            assert!(text.contains("Take your time"));
        }
    }

    mod structural_progress {
        use super::*;

        #[test]
        fn step_count_increases_every_substantive_turn() {
            let mut engine = engine();
            let (_, mut session) = engine.advance("", &Session::new());
            for (i, input) in ["hello", "more detail", "even more"].iter().enumerate() {
                let (_, next) = engine.advance(input, &session);
                assert_eq!(next.step_count, (i + 2) as u32);
                session = next;
            }
        }

        #[test]
        fn intro_scenario_extracts_name_and_moves_to_goal() {
            let mut engine = engine();
            let (_, s1) = engine.advance("", &Session::new());
            let (_, s2) = engine.advance("I'm Sam, I work in marketing", &s1);
            assert_eq!(s2.facts.name.as_deref(), Some("Sam"));
            assert!(s2.facts.background.is_some());
            assert_eq!(s2.phase, CoachingPhase::Goal);
            assert_eq!(s2.category, Some(ScenarioCategory::Career));
        }

        #[test]
        fn phase_never_regresses_over_a_long_session() {
            let mut engine = engine();
            let (_, mut session) = engine.advance("", &Session::new());
            let mut last = session.phase.ordinal();
            for turn in 0..25 {
                let input = format!("turn {turn}: I keep talking about my situation in detail");
                let (_, next) = engine.advance(&input, &session);
                assert!(
                    next.phase.ordinal() >= last,
                    "phase regressed from {last} to {}",
                    next.phase.ordinal()
                );
                last = next.phase.ordinal();
                session = next;
            }
        }

        #[test]
        fn cap_forces_progress_even_without_transition_signals() {
            let mut engine = engine();
            let (_, mut session) = engine.advance("", &Session::new());
            // Short, signal-free answers only. The per-phase cap must still
            // march the session through every phase to the completion prompt.
            for _ in 0..30 {
                let (_, next) = engine.advance("mm", &session);
                session = next;
                if session.completion_prompt_issued || session.is_complete() {
                    break;
                }
            }
            assert!(
                session.completion_prompt_issued || session.is_complete(),
                "session never reached the terminal prompt; stuck in {:?}",
                session.phase
            );
        }

        #[test]
        fn no_question_repeats_within_any_phase() {
            let mut engine = engine();
            let (_, mut session) = engine.advance("", &Session::new());
            for turn in 0..20 {
                let (_, next) = engine.advance(&format!("answer number {turn}"), &session);
                session = next;
            }
            for phase in CoachingPhase::ALL {
                let asked = session.asked_in(phase);
                let unique: std::collections::HashSet<_> = asked.iter().collect();
                assert_eq!(unique.len(), asked.len(), "duplicates in {phase}");
            }
        }
    }

    mod completion {
        use super::*;

        #[test]
        fn commitment_in_will_phase_completes_with_summary() {
            let mut engine = engine();
            let (text, next) =
                engine.advance("I will call three recruiters by Friday", &will_session_with_facts());

            assert_eq!(next.phase, CoachingPhase::Complete);
            assert!(next.facts.has_action_commitment);
            assert_eq!(
                next.facts.action_commitment.as_deref(),
                Some("call three recruiters by Friday")
            );
            for section in ["## Goal", "## Reality", "## Options", "## Will"] {
                assert!(text.contains(section), "summary missing {section}");
            }
        }

        #[test]
        fn completion_prompt_answer_closes_the_session() {
            let mut session = will_session_with_facts();
            session.completion_prompt_issued = true;

            let mut engine = engine();
            let (text, next) = engine.advance("okay: talk to my manager", &session);
            assert_eq!(next.phase, CoachingPhase::Complete);
            assert!(next.facts.has_action_commitment);
            assert!(text.contains("## Will"));
        }

        #[test]
        fn advance_after_complete_leaves_session_unchanged() {
            let mut engine = engine();
            let (_, done) = engine.advance("I will call three recruiters by Friday", &will_session_with_facts());
            let (text, after) = engine.advance("what now?", &done);
            assert_eq!(after.step_count, done.step_count);
            assert_eq!(after.phase, CoachingPhase::Complete);
            assert!(text.contains("new session"));
        }
    }

    mod determinism {
        use super::*;

        #[test]
        fn same_seed_same_transcript() {
            let inputs = [
                "I'm Ana, I work in finance",
                "I want to lead a team by next year",
                "The problem is there are no openings and I feel stuck where I am right now honestly",
                "I could move teams, ask for a project, or study management",
                "I will ask my manager for a project on Monday",
            ];

            let run = |seed: u64| {
                let mut engine = DialogueEngine::with_seed(HeuristicThresholds::default(), seed);
                let (mut transcript, mut session) = engine.advance("", &Session::new());
                for input in inputs {
                    let (text, next) = engine.advance(input, &session);
                    transcript.push_str(&text);
                    session = next;
                }
                (transcript, session.phase)
            };

            let (t1, p1) = run(99);
            let (t2, p2) = run(99);
            assert_eq!(t1, t2);
            assert_eq!(p1, p2);
        }

        #[test]
        fn structure_is_stable_across_seeds() {
            let run = |seed: u64| {
                let mut engine = DialogueEngine::with_seed(HeuristicThresholds::default(), seed);
                let (_, s1) = engine.advance("", &Session::new());
                let (_, s2) = engine.advance("I'm Lee, I love painting", &s1);
                (s2.phase, s2.facts.name.clone())
            };

            let (phase_a, name_a) = run(1);
            let (phase_b, name_b) = run(2);
            assert_eq!(phase_a, phase_b);
            assert_eq!(name_a, name_b);
        }
    }

    mod journey {
        use super::*;

        #[test]
        fn journey_records_truncated_excerpts() {
            let mut engine = engine();
            let (_, s1) = engine.advance("", &Session::new());
            let long_input = "x".repeat(200);
            let (_, s2) = engine.advance(&long_input, &s1);
            assert_eq!(s2.emotional_journey.len(), 1);
            assert_eq!(s2.emotional_journey[0].excerpt.chars().count(), 50);
        }

        #[test]
        fn journey_is_append_only() {
            let mut engine = engine();
            let (_, mut session) = engine.advance("", &Session::new());
            for i in 0..4 {
                let (_, next) = engine.advance(&format!("input {i}"), &session);
                assert_eq!(next.emotional_journey.len(), session.emotional_journey.len() + 1);
                session = next;
            }
        }
    }
}
