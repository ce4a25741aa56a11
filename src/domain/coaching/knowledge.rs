//! Knowledge store - static catalog backing the dialogue engine.
//!
//! Per-phase question banks, keyword lists, phrasing pools, scenario
//! categories, and the GROW reference text. Everything here is read-only
//! data; the engine queries it but never mutates it.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::phase::CoachingPhase;

// ---------------------------------------------------------------------------
// Question banks
// ---------------------------------------------------------------------------

const INTRO_QUESTIONS: &[&str] = &[
    "Welcome! I'm your GROW coach. What's your name, and what brings you here today?",
    "Tell me a little about yourself - what do you do, and what do you enjoy?",
    "What area of your life or work would you like to focus on in this session?",
    "Is there anything on your mind right now that feels worth exploring together?",
];

const GOAL_QUESTIONS: &[&str] = &[
    "What is the aim of this discussion?",
    "What do you want to achieve long term? (This is your END GOAL)",
    "What does success look like to you?",
    "How much personal control or influence do you have over your goal?",
    "What would be a milestone on the way? (These are your PERFORMANCE GOALS)",
    "By when do you want to achieve it?",
    "Is that positive, challenging and attainable?",
    "How will you measure it?",
    "What level of performance do you think will give you the best chance of success?",
    "Who else needs to agree on this goal for it to be successful?",
];

const REALITY_QUESTIONS: &[&str] = &[
    "What is happening right now? Focus only on facts - what is really happening at the moment?",
    "Who is directly and indirectly involved?",
    "If things are not going well with this issue, who else gets drawn in?",
    "What have you done about this so far? With what results?",
    "How often have you tried?",
    "What is missing in this situation?",
    "What is holding you back from finding a way forward?",
    "What's working well currently?",
    "What resources do you currently have available?",
];

const OPTIONS_QUESTIONS: &[&str] = &[
    "What options do you have for steps to resolve this issue?",
    "What else might you do?",
    "What would someone who handles this kind of issue really well do?",
    "What if you had more time for this issue, what might you try?",
    "What if you had less time? What might that force you to try?",
    "Imagine that you had more energy and confidence, what could you try then?",
    "What if somebody said: 'Money no object'? What might you try then?",
    "What if you could start again?",
    "If the constraints you identified earlier were removed - what could you do then?",
    "What are the costs and benefits of each of these ideas?",
];

const WILL_QUESTIONS: &[&str] = &[
    "What are you going to do?",
    "When are you going to do it?",
    "Will this action meet your goal?",
    "What obstacles might you meet along the way?",
    "Who needs to know?",
    "What support do you need?",
    "How and when are you going to get that support?",
    "On a scale of 1-10, how committed are you to this action?",
];

/// Returns the ordered question bank for a phase.
///
/// `Complete` has no bank; the session is read-only once finished.
pub fn question_bank(phase: CoachingPhase) -> &'static [&'static str] {
    match phase {
        CoachingPhase::Intro => INTRO_QUESTIONS,
        CoachingPhase::Goal => GOAL_QUESTIONS,
        CoachingPhase::Reality => REALITY_QUESTIONS,
        CoachingPhase::Options => OPTIONS_QUESTIONS,
        CoachingPhase::Will => WILL_QUESTIONS,
        CoachingPhase::Complete => &[],
    }
}

/// The prompt issued when the terminal phase is exhausted without a
/// committed action. Answering it is the session's exit ramp.
pub const COMPLETION_PROMPT: &str = "Before we close: what is the one action you are committing to, \
    and by when? Say it as a decision, not a preference.";

// ---------------------------------------------------------------------------
// Tone and transition keyword sets
// ---------------------------------------------------------------------------

pub(crate) const POSITIVE_WORDS: &[&str] = &[
    "excited", "great", "confident", "motivated", "happy", "ready", "love",
    "optimistic", "energized", "yes!", "can't wait", "looking forward",
];

pub(crate) const CHALLENGING_WORDS: &[&str] = &[
    "difficult", "hard", "stuck", "frustrated", "worried", "afraid", "stress",
    "overwhelmed", "problem", "struggle", "anxious", "impossible",
];

pub(crate) const UNCERTAIN_WORDS: &[&str] = &[
    "maybe", "not sure", "perhaps", "i guess", "possibly", "don't know",
    "unsure", "confused", "it depends",
];

pub(crate) const READINESS_WORDS: &[&str] =
    &["ready", "let's start", "let's go", "let's begin", "let's do this"];

pub(crate) const WORK_TRIGGERS: &[&str] =
    &["work", "job", "career", "profession", "company", "business"];

pub(crate) const INTEREST_TRIGGERS: &[&str] =
    &["love", "enjoy", "passion", "passionate", "hobby", "interested in"];

pub(crate) const GOAL_INDICATORS: &[&str] = &[
    "want to", "achieve", "goal", "aim", "hope to", "aspire", "my dream",
    "i'd like to", "i would like to", "intend to",
];

pub(crate) const TIMELINE_PHRASES: &[&str] = &[
    "by ", "within", "in the next", "this week", "this month", "this year",
    "next week", "next month", "next year", "deadline", "monday", "tuesday",
    "wednesday", "thursday", "friday", "saturday", "sunday", "january",
    "february", "march", "april", "june", "july", "august",
    "september", "october", "november", "december",
];

pub(crate) const PRECISION_WORDS: &[&str] =
    &["specifically", "exactly", "precisely", "measurable", "concrete", "in particular"];

pub(crate) const CHALLENGE_KEYWORDS: &[&str] = &[
    "challenge", "problem", "obstacle", "difficult", "struggle", "stuck",
    "barrier", "blocker", "holding me back", "issue",
];

pub(crate) const RESOURCE_KEYWORDS: &[&str] = &[
    "resource", "support", "available", "tried", "help", "budget", "team",
    "network", "mentor", "experience",
];

pub(crate) const DECISION_VERBS: &[&str] =
    &["decide", "decided", "choose", "chose", "pick", "go with", "select", "settle on"];

pub(crate) const COMMITMENT_MARKERS: &[&str] =
    &["i will ", "i'll ", "going to ", "plan to ", "commit to "];

pub(crate) const TIME_COMMITMENT_PHRASES: &[&str] = &[
    "by ", "tomorrow", "tonight", "today", "this week", "next week",
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday",
    "sunday", "every day", "each week", "on the weekend",
];

pub(crate) const ACTION_VERBS: &[&str] = &[
    "call", "email", "write", "start", "schedule", "sign up", "practice",
    "apply", "book", "meet", "finish", "ask", "research", "draft", "enroll",
    "register", "talk to", "reach out",
];

pub(crate) const SUPPORT_NEED_KEYWORDS: &[&str] = &[
    "help", "support", "mentor", "coach", "training", "accountability",
    "advice", "feedback", "together", "partner",
];

// ---------------------------------------------------------------------------
// Phrasing pools
// ---------------------------------------------------------------------------

/// Motivational interjections, mixed into acknowledgements.
pub(crate) const ENCOURAGEMENTS: &[&str] = &[
    "That's a great insight! You're really thinking this through.",
    "I can hear your commitment in what you're saying.",
    "That sounds like a challenging but achievable goal.",
    "You've identified some really valuable options there.",
    "That's a concrete action step - well done!",
    "You're taking ownership of your situation, which is powerful.",
    "That shows great self-awareness about what you can control.",
];

pub(crate) const ACK_POSITIVE: &[&str] = &[
    "I love the energy you're bringing to this.",
    "That enthusiasm will serve you well.",
    "Wonderful - I can feel the momentum in your words.",
];

pub(crate) const ACK_CHALLENGING: &[&str] = &[
    "That sounds genuinely hard, and it's brave of you to name it.",
    "Thank you for being honest about the difficulty here.",
    "I hear how much weight this is carrying for you.",
];

pub(crate) const ACK_UNCERTAIN: &[&str] = &[
    "It's completely fine not to have all the answers yet.",
    "Uncertainty is often where the most useful exploring happens.",
    "Let's sit with that openness for a moment - it's a good starting point.",
];

pub(crate) const ACK_NEUTRAL: &[&str] = &[
    "Thank you for sharing that.",
    "That gives me a clearer picture.",
    "I appreciate the context.",
];

/// A short bridge line used when the selector forces a phase change.
pub(crate) const TRANSITION_ACKS: &[&str] = &[
    "We've covered a lot of ground here - let's move forward.",
    "I think we have what we need from this part of the conversation.",
    "Good work. Let's build on that and take the next step.",
];

// ---------------------------------------------------------------------------
// Scenario categories
// ---------------------------------------------------------------------------

/// Coaching scenario detected from the user's first substantive input.
///
/// Used to flavor acknowledgements and the session summary, never for
/// control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioCategory {
    Career,
    Personal,
    Skills,
    #[default]
    General,
}

impl ScenarioCategory {
    /// A human label for summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Career => "career",
            Self::Personal => "personal development",
            Self::Skills => "skill building",
            Self::General => "general",
        }
    }

    /// A scenario-flavored opening line, used once when the category is
    /// first detected.
    pub(crate) fn opening(&self) -> Option<&'static str> {
        match self {
            Self::Career => Some("Career growth is a great focus for a GROW session."),
            Self::Personal => {
                Some("Personal change is exactly what the GROW process is built for.")
            }
            Self::Skills => Some("Skill building suits this kind of structured session well."),
            Self::General => None,
        }
    }

    /// Categorizes free text by keyword membership; first match wins in
    /// the order career, personal, skills.
    pub fn categorize(input: &str) -> Self {
        let lower = input.to_lowercase();
        let hit = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if hit(&[
            "career", "job", "work", "promotion", "professional", "workplace", "boss", "salary",
        ]) {
            Self::Career
        } else if hit(&[
            "personal", "life", "relationship", "family", "health", "habit", "confidence",
            "stress",
        ]) {
            Self::Personal
        } else if hit(&[
            "learn", "skill", "training", "education", "course", "development", "improve",
            "practice",
        ]) {
            Self::Skills
        } else {
            Self::General
        }
    }
}

// ---------------------------------------------------------------------------
// Action focus table
// ---------------------------------------------------------------------------

/// Fixed keyword → category table used to classify the final commitment.
pub(crate) static ACTION_FOCUS_TABLE: Lazy<Vec<(&'static [&'static str], &'static str)>> =
    Lazy::new(|| {
        vec![
            (
                &["call", "email", "reach out", "talk to", "ask", "meet", "network"][..],
                "connecting with people",
            ),
            (
                &["learn", "study", "course", "practice", "read", "research", "enroll"][..],
                "building skills",
            ),
            (
                &["write", "draft", "plan", "schedule", "organize", "list", "outline"][..],
                "planning and structure",
            ),
            (
                &["exercise", "sleep", "walk", "run", "gym", "meditate", "eat"][..],
                "health and energy",
            ),
            (
                &["apply", "interview", "resume", "cv", "portfolio", "recruiters"][..],
                "career moves",
            ),
        ]
    });

/// Classifies a commitment into an action-focus category.
///
/// Falls back to "taking the first step" when no keyword matches.
pub fn action_focus(commitment: &str) -> &'static str {
    let lower = commitment.to_lowercase();
    for (keywords, category) in ACTION_FOCUS_TABLE.iter() {
        if keywords.iter().any(|k| lower.contains(k)) {
            return category;
        }
    }
    "taking the first step"
}

// ---------------------------------------------------------------------------
// GROW reference text
// ---------------------------------------------------------------------------

/// Markdown reference summary of the GROW model, surfaced by the UI layer
/// on request.
pub fn grow_model_info() -> &'static str {
    "# The GROW Coaching Model\n\
     \n\
     **G - GOAL**: What do you want to achieve?\n\
     - *End goals* are the final objective - your ultimate destination.\n\
     - *Performance goals* identify the level that gives you the best chance of reaching the end goal.\n\
     - You need to feel ownership of the goal: choice and responsibility drive self-motivation.\n\
     \n\
     **R - REALITY**: What is your current situation?\n\
     - Goals can't be established until the current situation is known and understood.\n\
     - Focus on facts: what, when, where, how much, how often.\n\
     - A coach follows the coachee's train of thought rather than asserting their own.\n\
     \n\
     **O - OPTIONS**: What could you do?\n\
     - The purpose is not to find the right answer but to list as many alternatives as possible.\n\
     - Quantity matters more than quality at this point - no judgment yet.\n\
     - Reviewing the options can lead to additional options.\n\
     \n\
     **W - WILL**: What will you do?\n\
     - The purpose is to convert a discussion into a decision.\n\
     - \"What are you going to do?\" - not \"What are you thinking of doing?\"\n\
     - Focus on concrete commitment to action rather than preferences.\n\
     \n\
     This model helps you move from where you are now to where you want to be."
}
