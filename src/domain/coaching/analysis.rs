//! Input analyzer - heuristic judgement of one utterance.
//!
//! `analyze` is a pure function of the utterance and the current session:
//! it never mutates anything and never fails, because any text is valid
//! coaching input. When no pattern matches it simply reports low
//! confidence and recommends no transition.

use serde::{Deserialize, Serialize};

use super::heuristics::HeuristicThresholds;
use super::knowledge;
use super::phase::CoachingPhase;
use super::session::{ExtractedFacts, Session};

/// Emotional tone scored from keyword membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalTone {
    Positive,
    Challenging,
    Uncertain,
    #[default]
    Neutral,
}

/// How confident the analyzer is in its reading of the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    #[default]
    Medium,
    Low,
}

/// Structured judgement of one utterance. Transient: consumed by the
/// selector and folded into the session, then discarded.
#[derive(Debug, Clone, Default)]
pub struct TurnAnalysis {
    pub tone: EmotionalTone,
    pub confidence: ConfidenceLevel,
    /// Slots this turn filled; merged into the session's facts.
    pub facts: ExtractedFacts,
    /// True when the phase-specific heuristic recommends moving on.
    pub should_transition: bool,
    /// The phase the heuristic recommends moving to.
    pub suggested_next_phase: Option<CoachingPhase>,
}

/// Heuristic analyzer over free-text coaching input.
#[derive(Debug, Clone, Default)]
pub struct InputAnalyzer {
    thresholds: HeuristicThresholds,
}

impl InputAnalyzer {
    pub fn new(thresholds: HeuristicThresholds) -> Self {
        Self { thresholds }
    }

    /// Inspects one utterance against the current session state.
    pub fn analyze(&self, utterance: &str, session: &Session) -> TurnAnalysis {
        let trimmed = utterance.trim();
        let lower = trimmed.to_lowercase();

        let tone = score_tone(&lower);
        let mut analysis = TurnAnalysis {
            tone,
            confidence: match tone {
                EmotionalTone::Positive => ConfidenceLevel::High,
                EmotionalTone::Challenging | EmotionalTone::Neutral => ConfidenceLevel::Medium,
                EmotionalTone::Uncertain => ConfidenceLevel::Low,
            },
            ..Default::default()
        };

        match session.phase {
            CoachingPhase::Intro => self.analyze_intro(trimmed, &lower, session, &mut analysis),
            CoachingPhase::Goal => self.analyze_goal(trimmed, &lower, &mut analysis),
            CoachingPhase::Reality => self.analyze_reality(trimmed, &lower, &mut analysis),
            CoachingPhase::Options => self.analyze_options(trimmed, &lower, &mut analysis),
            CoachingPhase::Will => self.analyze_will(trimmed, &lower, &mut analysis),
            CoachingPhase::Complete => {}
        }

        // Nothing matched at all: report low confidence rather than guess.
        if analysis.tone == EmotionalTone::Neutral
            && analysis.facts.is_empty()
            && !analysis.should_transition
        {
            analysis.confidence = ConfidenceLevel::Low;
        }

        analysis
    }

    fn analyze_intro(
        &self,
        original: &str,
        lower: &str,
        session: &Session,
        analysis: &mut TurnAnalysis,
    ) {
        analysis.facts.name = extract_name(original, lower);
        analysis.facts.background = extract_background(original, lower);

        let knows_name = analysis.facts.name.is_some() || session.facts.name.is_some();
        let knows_background =
            analysis.facts.background.is_some() || session.facts.background.is_some();
        let says_ready = contains_any(lower, knowledge::READINESS_WORDS);

        if (knows_name && knows_background)
            || lower.len() > self.thresholds.intro_ready_len
            || says_ready
        {
            analysis.should_transition = true;
            analysis.suggested_next_phase = Some(CoachingPhase::Goal);
        }
    }

    fn analyze_goal(&self, original: &str, lower: &str, analysis: &mut TurnAnalysis) {
        analysis.facts.goal_summary = Some(original.to_string());

        let has_indicator = contains_any(lower, knowledge::GOAL_INDICATORS);
        let has_timeline = contains_any(lower, knowledge::TIMELINE_PHRASES);
        let is_specific = lower.len() > self.thresholds.goal_specific_len
            || contains_any(lower, knowledge::PRECISION_WORDS);

        if has_indicator && (has_timeline || is_specific) {
            analysis.should_transition = true;
            analysis.suggested_next_phase = Some(CoachingPhase::Reality);
        }
    }

    fn analyze_reality(&self, original: &str, lower: &str, analysis: &mut TurnAnalysis) {
        analysis.facts.reality_summary = Some(original.to_string());

        let mentions_situation = contains_any(lower, knowledge::CHALLENGE_KEYWORDS)
            || contains_any(lower, knowledge::RESOURCE_KEYWORDS);

        if mentions_situation && lower.len() > self.thresholds.reality_detail_len {
            analysis.should_transition = true;
            analysis.suggested_next_phase = Some(CoachingPhase::Options);
        }
    }

    fn analyze_options(&self, original: &str, lower: &str, analysis: &mut TurnAnalysis) {
        analysis.facts.options_summary = Some(original.to_string());

        let clause_count = count_clauses(lower);
        let has_decision = contains_any(lower, knowledge::DECISION_VERBS);

        if clause_count > 2 || has_decision || lower.len() > self.thresholds.options_detail_len {
            analysis.should_transition = true;
            analysis.suggested_next_phase = Some(CoachingPhase::Will);
        }
    }

    fn analyze_will(&self, original: &str, lower: &str, analysis: &mut TurnAnalysis) {
        let Some(marker_end) = find_commitment_marker(lower) else {
            return;
        };

        let clause = extract_commitment_clause(original, lower, marker_end);
        if !clause.is_empty() {
            analysis.facts.action_commitment = Some(clause);
        }

        let has_time = contains_any(lower, knowledge::TIME_COMMITMENT_PHRASES);
        let has_action = contains_any(lower, knowledge::ACTION_VERBS);

        if has_time || has_action {
            analysis.facts.has_action_commitment = true;
            analysis.should_transition = true;
            analysis.suggested_next_phase = Some(CoachingPhase::Complete);
        }
    }
}

/// First-match-wins tone scoring: positive, then challenging, then
/// uncertain, defaulting to neutral.
fn score_tone(lower: &str) -> EmotionalTone {
    if contains_any(lower, knowledge::POSITIVE_WORDS) {
        EmotionalTone::Positive
    } else if contains_any(lower, knowledge::CHALLENGING_WORDS) {
        EmotionalTone::Challenging
    } else if contains_any(lower, knowledge::UNCERTAIN_WORDS) {
        EmotionalTone::Uncertain
    } else {
        EmotionalTone::Neutral
    }
}

fn contains_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| lower.contains(k))
}

/// Splits on commas and "and"/"or" connectors and counts non-empty clauses.
fn count_clauses(lower: &str) -> usize {
    lower
        .replace(" and ", ",")
        .replace(" or ", ",")
        .split(',')
        .filter(|c| !c.trim().is_empty())
        .count()
}

/// Extracts a candidate name from greeting patterns, or from a bare one-
/// or two-word reply ("Sam", "Sam here").
fn extract_name(original: &str, lower: &str) -> Option<String> {
    let words: Vec<&str> = original.split_whitespace().collect();
    let lower_words: Vec<String> = lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'').to_string())
        .collect();

    let patterns: &[&[&str]] = &[&["my", "name", "is"], &["i'm"], &["i", "am"], &["call", "me"]];

    for pattern in patterns {
        for start in 0..lower_words.len() {
            if lower_words[start..]
                .iter()
                .zip(pattern.iter())
                .filter(|(a, b)| a.as_str() == **b)
                .count()
                == pattern.len()
                && start + pattern.len() < words.len()
            {
                return clean_name(words[start + pattern.len()]);
            }
        }
    }

    // Bare reply fallback: a one- or two-word utterance is taken as a name.
    if words.len() <= 2 {
        if let Some(first) = words.first() {
            return clean_name(first);
        }
    }

    None
}

/// Filler words that greeting patterns sometimes land on; never names.
const NAME_STOPLIST: &[&str] = &[
    "hi", "hello", "hey", "hm", "hmm", "ok", "okay", "yes", "no", "not",
    "just", "so", "very", "here", "really", "going", "trying", "thanks",
    "let's", "ready", "sure", "well", "good", "fine", "mm", "um", "uh",
    "i'm", "i",
];

fn clean_name(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_alphabetic() || *c == '\'' || *c == '-')
        .collect();
    if cleaned.is_empty() || cleaned.len() > 30 {
        return None;
    }
    if NAME_STOPLIST.contains(&cleaned.to_lowercase().as_str()) {
        return None;
    }
    let mut chars = cleaned.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().collect::<String>() + chars.as_str())
}

/// Pulls the sentence containing a work or interest trigger as the
/// background snippet.
fn extract_background(original: &str, lower: &str) -> Option<String> {
    let triggered = contains_any(lower, knowledge::WORK_TRIGGERS)
        || contains_any(lower, knowledge::INTEREST_TRIGGERS);
    if !triggered {
        return None;
    }

    original
        .split(['.', '!', '?'])
        .map(str::trim)
        .find(|sentence| {
            let s = sentence.to_lowercase();
            contains_any(&s, knowledge::WORK_TRIGGERS) || contains_any(&s, knowledge::INTEREST_TRIGGERS)
        })
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Returns the byte offset just past the earliest commitment marker.
fn find_commitment_marker(lower: &str) -> Option<usize> {
    knowledge::COMMITMENT_MARKERS
        .iter()
        .filter_map(|m| lower.find(m).map(|idx| (idx, idx + m.len())))
        .min_by_key(|(start, _)| *start)
        .map(|(_, end)| end)
}

/// Captures the text after the commitment marker up to sentence
/// punctuation, preserving the original casing when byte offsets align.
fn extract_commitment_clause(original: &str, lower: &str, marker_end: usize) -> String {
    let source = if original.len() == lower.len() && original.is_char_boundary(marker_end) {
        original
    } else {
        lower
    };
    let rest = &source[marker_end..];
    let end = rest.find(['.', '!', '?']).unwrap_or(rest.len());
    rest[..end].trim().to_string()
}
