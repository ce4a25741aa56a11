//! Coaching module - The offline GROW dialogue engine.
//!
//! Everything here is synchronous and deterministic apart from phrasing
//! choice, which flows through an injected seedable random source. The
//! engine is a pure reducer over [`Session`] values: callers pass the
//! current session in and get an updated one back.

mod analysis;
mod engine;
mod heuristics;
mod knowledge;
mod phase;
mod selector;
mod session;
mod summary;

pub use analysis::{ConfidenceLevel, EmotionalTone, InputAnalyzer, TurnAnalysis};
pub use engine::DialogueEngine;
pub use heuristics::HeuristicThresholds;
pub use knowledge::{grow_model_info, question_bank, ScenarioCategory};
pub use phase::CoachingPhase;
pub use selector::{QuestionSelector, SelectedPrompt};
pub use session::{ExtractedFacts, JourneyEntry, Session};
pub use summary::SessionSummary;
