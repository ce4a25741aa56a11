//! Coaching phases within a session.
//!
//! Phases flow strictly forward through the GROW sequence:
//! `Intro` → `Goal` → `Reality` → `Options` → `Will` → `Complete`.
//! A session may linger in a phase, but it never regresses.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The current phase of a coaching session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoachingPhase {
    /// Getting acquainted: name, background, what brings the person here.
    #[default]
    Intro,

    /// GOAL - clarifying what the person wants to achieve.
    Goal,

    /// REALITY - exploring the current situation objectively.
    Reality,

    /// OPTIONS - brainstorming possible courses of action.
    Options,

    /// WILL - converting the discussion into a committed action.
    Will,

    /// Session finished; a summary has been produced. Read-only.
    Complete,
}

impl CoachingPhase {
    /// All phases in session order.
    pub const ALL: [CoachingPhase; 6] = [
        Self::Intro,
        Self::Goal,
        Self::Reality,
        Self::Options,
        Self::Will,
        Self::Complete,
    ];

    /// Returns a short label for the phase, suitable for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Intro => "Introduction",
            Self::Goal => "Goal",
            Self::Reality => "Reality",
            Self::Options => "Options",
            Self::Will => "Will",
            Self::Complete => "Complete",
        }
    }

    /// Returns the phase that follows this one in the fixed sequence.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Intro => Some(Self::Goal),
            Self::Goal => Some(Self::Reality),
            Self::Reality => Some(Self::Options),
            Self::Options => Some(Self::Will),
            Self::Will => Some(Self::Complete),
            Self::Complete => None,
        }
    }

    /// Position in the fixed sequence, used to check forward-only progress.
    pub fn ordinal(&self) -> usize {
        match self {
            Self::Intro => 0,
            Self::Goal => 1,
            Self::Reality => 2,
            Self::Options => 3,
            Self::Will => 4,
            Self::Complete => 5,
        }
    }

    /// Returns true if this phase still asks questions.
    ///
    /// `Will` is the last question-asking phase; `Complete` is read-only.
    pub fn asks_questions(&self) -> bool {
        !matches!(self, Self::Complete)
    }

    /// Returns true if this is the last question-asking phase.
    pub fn is_final_questioning_phase(&self) -> bool {
        matches!(self, Self::Will)
    }

    /// A short line announcing entry into this phase.
    pub fn announcement(&self) -> &'static str {
        match self {
            Self::Intro => "Let's get to know each other a little first.",
            Self::Goal => "Let's move on to your **Goal** - what you want to achieve.",
            Self::Reality => "Now let's look at your **Reality** - the situation you're facing right now.",
            Self::Options => "Time to explore your **Options** - what you could do.",
            Self::Will => "Let's turn to your **Will** - what you are actually going to do.",
            Self::Complete => "That wraps up our session.",
        }
    }
}

impl StateMachine for CoachingPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.next() == Some(*target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        self.next().into_iter().collect()
    }
}

impl std::fmt::Display for CoachingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
