//! System prompt construction for remote coaching turns.
//!
//! The remote model gets a phase-specific coaching directive plus a
//! context block of the facts gathered so far and the tail of the
//! conversation, so its responses stay anchored to the session.

use crate::domain::coaching::{CoachingPhase, Session};
use crate::ports::{Message, MessageRole};

const BASE_PROMPT: &str = "You are an expert professional coach using the GROW model \
(Goal, Reality, Options, Will). You are warm, supportive, and ask powerful questions \
that help people discover their own insights. Keep responses concise (2-3 sentences max) \
and always ask a follow-up question to deepen understanding.";

/// How many trailing conversation messages are replayed as context.
const RECENT_HISTORY: usize = 4;

/// Phase-specific coaching directive.
fn phase_directive(phase: CoachingPhase) -> &'static str {
    match phase {
        CoachingPhase::Intro => {
            "CURRENT PHASE: INTRODUCTION - Learn the person's name and background, \
             and make them comfortable before moving to their goal."
        }
        CoachingPhase::Goal => {
            "CURRENT PHASE: GOAL - Help the person clarify what they want to achieve. \
             Focus on specific outcomes, importance, motivation, success criteria."
        }
        CoachingPhase::Reality => {
            "CURRENT PHASE: REALITY - Help explore the current situation objectively. \
             Focus on current state, challenges, resources, what's working."
        }
        CoachingPhase::Options => {
            "CURRENT PHASE: OPTIONS - Help brainstorm possible approaches. \
             Quantity over quality; no judgment yet."
        }
        CoachingPhase::Will => {
            "CURRENT PHASE: WILL - Help create a specific, committed action with a \
             timeline, accountability, and a first step."
        }
        CoachingPhase::Complete => {
            "The session is complete. Congratulate the person and reinforce their \
             committed action."
        }
    }
}

/// Renders the facts and recent history as a context block.
pub fn context_block(session: &Session, transcript: &[Message]) -> String {
    let mut block = String::new();
    let facts = &session.facts;

    if let Some(name) = &facts.name {
        block.push_str(&format!("USER'S NAME: {name}\n"));
    }
    if let Some(goal) = &facts.goal_summary {
        block.push_str(&format!("USER'S GOAL: {goal}\n"));
    }
    if let Some(reality) = &facts.reality_summary {
        block.push_str(&format!("CURRENT REALITY: {reality}\n"));
    }
    if let Some(options) = &facts.options_summary {
        block.push_str(&format!("OPTIONS DISCUSSED: {options}\n"));
    }

    let recent: Vec<&Message> = transcript.iter().rev().take(RECENT_HISTORY).collect();
    if !recent.is_empty() {
        block.push_str("\nRECENT CONVERSATION:\n");
        for msg in recent.into_iter().rev() {
            let speaker = match msg.role {
                MessageRole::User => "USER",
                MessageRole::Assistant => "COACH",
                MessageRole::System => "SYSTEM",
            };
            block.push_str(&format!("{speaker}: {}\n", msg.content));
        }
    }

    block
}

/// Full system prompt for one remote turn.
pub fn build_system_prompt(session: &Session, transcript: &[Message]) -> String {
    let context = context_block(session, transcript);
    if context.is_empty() {
        format!("{BASE_PROMPT}\n{}", phase_directive(session.phase))
    } else {
        format!(
            "{BASE_PROMPT}\n{}\n\nCONTEXT:\n{context}",
            phase_directive(session.phase)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coaching::Session;

    #[test]
    fn prompt_names_the_current_phase() {
        let mut session = Session::new();
        session.phase = CoachingPhase::Reality;
        let prompt = build_system_prompt(&session, &[]);
        assert!(prompt.contains("CURRENT PHASE: REALITY"));
        assert!(prompt.contains("GROW model"));
    }

    #[test]
    fn context_includes_extracted_facts() {
        let mut session = Session::new();
        session.facts.name = Some("Sam".to_string());
        session.facts.goal_summary = Some("lead a team".to_string());
        let block = context_block(&session, &[]);
        assert!(block.contains("USER'S NAME: Sam"));
        assert!(block.contains("USER'S GOAL: lead a team"));
    }

    #[test]
    fn context_replays_only_recent_history_in_order() {
        let session = Session::new();
        let transcript: Vec<Message> = (0..6)
            .map(|i| {
                if i % 2 == 0 {
                    Message::user(format!("user {i}"))
                } else {
                    Message::assistant(format!("coach {i}"))
                }
            })
            .collect();

        let block = context_block(&session, &transcript);
        assert!(!block.contains("user 0"));
        assert!(!block.contains("coach 1"));
        assert!(block.contains("USER: user 2"));
        assert!(block.contains("COACH: coach 5"));
        // Order preserved: "user 2" appears before "coach 5".
        let a = block.find("user 2").unwrap();
        let b = block.find("coach 5").unwrap();
        assert!(a < b);
    }

    #[test]
    fn empty_session_yields_prompt_without_context_header() {
        let prompt = build_system_prompt(&Session::new(), &[]);
        assert!(!prompt.contains("CONTEXT:"));
    }
}
