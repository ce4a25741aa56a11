//! End-of-session summary.
//!
//! Built once, when the session reaches its committed action, from the
//! facts the analyzer extracted along the way.

use serde::{Deserialize, Serialize};

use super::knowledge::{self, ScenarioCategory};
use super::session::Session;

/// Structured summary of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub name: Option<String>,
    pub category: ScenarioCategory,
    pub goal: String,
    pub reality: String,
    pub options: String,
    pub commitment: String,
    /// Support themes found in the final commitment text.
    pub support_needs: Vec<String>,
    /// Category from the fixed keyword → action-focus table.
    pub action_focus: String,
}

const NOT_CAPTURED: &str = "(not captured this session)";

impl SessionSummary {
    /// Composes a summary from whatever the session managed to capture.
    ///
    /// Missing slots render as placeholders rather than being omitted, so
    /// the four GROW sections always appear.
    pub fn from_session(session: &Session) -> Self {
        let facts = &session.facts;
        let commitment = facts
            .action_commitment
            .clone()
            .unwrap_or_else(|| NOT_CAPTURED.to_string());

        let lower = commitment.to_lowercase();
        let support_needs: Vec<String> = knowledge::SUPPORT_NEED_KEYWORDS
            .iter()
            .filter(|k| lower.contains(*k))
            .map(|k| k.to_string())
            .collect();

        Self {
            name: facts.name.clone(),
            category: session.category.unwrap_or_default(),
            goal: facts.goal_summary.clone().unwrap_or_else(|| NOT_CAPTURED.to_string()),
            reality: facts
                .reality_summary
                .clone()
                .unwrap_or_else(|| NOT_CAPTURED.to_string()),
            options: facts
                .options_summary
                .clone()
                .unwrap_or_else(|| NOT_CAPTURED.to_string()),
            action_focus: knowledge::action_focus(&commitment).to_string(),
            commitment,
            support_needs,
        }
    }

    /// Renders the summary as markdown for the UI layer.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();

        match &self.name {
            Some(name) => out.push_str(&format!(
                "# Session Summary for {name}\n\nGreat work today - here's what we built together.\n\n"
            )),
            None => out.push_str("# Session Summary\n\nGreat work today - here's what we built together.\n\n"),
        }

        out.push_str(&format!("**Focus area:** {}\n\n", self.category.label()));
        out.push_str(&format!("## Goal\n{}\n\n", self.goal));
        out.push_str(&format!("## Reality\n{}\n\n", self.reality));
        out.push_str(&format!("## Options\n{}\n\n", self.options));
        out.push_str(&format!("## Will\n{}\n\n", self.commitment));
        out.push_str(&format!("**Action focus:** {}\n", self.action_focus));

        if !self.support_needs.is_empty() {
            out.push_str(&format!(
                "\n**Support to line up:** {}\n",
                self.support_needs.join(", ")
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coaching::phase::CoachingPhase;
    use crate::domain::coaching::session::ExtractedFacts;

    fn completed_session() -> Session {
        Session {
            phase: CoachingPhase::Complete,
            facts: ExtractedFacts {
                name: Some("Sam".to_string()),
                goal_summary: Some("move into marketing leadership".to_string()),
                reality_summary: Some("stuck as a coordinator for two years".to_string()),
                options_summary: Some("a course, a mentor, or an internal transfer".to_string()),
                action_commitment: Some("call three recruiters by Friday".to_string()),
                has_action_commitment: true,
                ..Default::default()
            },
            category: Some(ScenarioCategory::Career),
            ..Session::new()
        }
    }

    #[test]
    fn summary_carries_the_four_grow_sections() {
        let md = SessionSummary::from_session(&completed_session()).render_markdown();
        for section in ["## Goal", "## Reality", "## Options", "## Will"] {
            assert!(md.contains(section), "missing section {section}");
        }
        assert!(md.contains("call three recruiters by Friday"));
        assert!(md.contains("Sam"));
    }

    #[test]
    fn missing_slots_render_placeholders() {
        let session = Session::new();
        let summary = SessionSummary::from_session(&session);
        assert_eq!(summary.goal, NOT_CAPTURED);
        assert_eq!(summary.commitment, NOT_CAPTURED);
        let md = summary.render_markdown();
        assert!(md.contains("## Goal"));
    }

    #[test]
    fn support_needs_scanned_from_commitment() {
        let mut session = completed_session();
        session.facts.action_commitment =
            Some("ask my mentor for help with the plan".to_string());
        let summary = SessionSummary::from_session(&session);
        assert!(summary.support_needs.contains(&"mentor".to_string()));
        assert!(summary.support_needs.contains(&"help".to_string()));
    }

    #[test]
    fn action_focus_from_fixed_table() {
        let summary = SessionSummary::from_session(&completed_session());
        assert_eq!(summary.action_focus, "connecting with people");
    }
}
