//! Coaching orchestrator - remote-first turns with local fallback.
//!
//! Owns the session, the gateway, and the dialogue engine. Within one
//! turn the remote attempt strictly precedes the local fallback, and a
//! remote result that arrives after the session was reset is discarded
//! rather than applied to the new session.

use thiserror::Error;
use tracing::{info, warn};

use crate::adapters::ai::{GatewayError, InferenceGateway};
use crate::domain::coaching::{CoachingPhase, DialogueEngine, Session};
use crate::ports::{CompletionRequest, Message, MessageRole};

use super::prompts::build_system_prompt;

/// Where the response text for a turn came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnSource {
    /// A remote provider answered.
    Remote,
    /// Local engine, by configuration (offline mode or no providers).
    Local,
    /// Local engine, because every remote provider failed.
    LocalFallback,
}

/// One completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub text: String,
    pub phase: CoachingPhase,
    pub source: TurnSource,
}

/// Orchestrator failures.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Remote providers exhausted and local fallback is disabled.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The session was reset while this turn's remote call was pending;
    /// the late response was discarded without touching the new session.
    #[error("turn superseded by a session reset")]
    Superseded,
}

/// Drives one coaching session, turn by turn.
pub struct CoachingOrchestrator {
    engine: DialogueEngine,
    gateway: InferenceGateway,
    session: Session,
    /// Conversation tail, replayed as remote context.
    transcript: Vec<Message>,
    /// Bumped on every reset; guards against late remote responses.
    generation: u64,
    manual_offline: bool,
    fallback_enabled: bool,
}

impl CoachingOrchestrator {
    pub fn new(engine: DialogueEngine, gateway: InferenceGateway, fallback_enabled: bool) -> Self {
        Self {
            engine,
            gateway,
            session: Session::new(),
            transcript: Vec::new(),
            generation: 0,
            manual_offline: false,
            fallback_enabled,
        }
    }

    /// Bootstraps the session and returns the opening prompt.
    pub fn start(&mut self) -> String {
        let (text, session) = self.engine.advance("", &self.session);
        self.session = session;
        self.transcript.push(Message::assistant(text.clone()));
        text
    }

    /// Replaces the session with a freshly-initialized one and returns
    /// the bootstrap prompt. Idempotent; any in-flight remote turn is
    /// invalidated.
    pub fn reset(&mut self) -> String {
        self.generation = self.generation.wrapping_add(1);
        self.transcript.clear();
        self.session = Session::new();
        info!("session reset");
        self.start()
    }

    /// Toggles manual offline mode (skip remote attempts entirely).
    pub fn set_offline(&mut self, offline: bool) {
        self.manual_offline = offline;
    }

    pub fn is_offline(&self) -> bool {
        self.manual_offline
    }

    /// Read access to the current session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Processes one user turn: remote attempt first (when enabled),
    /// local dialogue engine as the fallback path.
    pub async fn turn(&mut self, utterance: &str) -> Result<TurnOutcome, OrchestratorError> {
        if self.manual_offline || self.gateway.provider_count() == 0 {
            let text = self.local_turn(utterance);
            return Ok(TurnOutcome {
                text,
                phase: self.session.phase,
                source: TurnSource::Local,
            });
        }

        let generation = self.generation;
        let request = self.remote_request(utterance);
        let remote = self.gateway.complete(request).await;

        match remote {
            Ok(content) => {
                if self.generation != generation {
                    warn!("discarding remote response for a reset session");
                    return Err(OrchestratorError::Superseded);
                }
                self.transcript.push(Message::user(utterance));
                self.transcript.push(Message::assistant(content.clone()));
                Ok(TurnOutcome {
                    text: content,
                    phase: self.session.phase,
                    source: TurnSource::Remote,
                })
            }
            Err(err) if self.fallback_enabled => {
                if self.generation != generation {
                    warn!("discarding failed remote turn for a reset session");
                    return Err(OrchestratorError::Superseded);
                }
                info!(%err, "remote providers exhausted, falling back to local coaching");
                let local = self.local_turn(utterance);
                Ok(TurnOutcome {
                    text: format!(
                        "**[Offline Mode]** Remote coaching is temporarily unavailable, \
                         continuing with the local GROW guide:\n\n{local}"
                    ),
                    phase: self.session.phase,
                    source: TurnSource::LocalFallback,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn remote_request(&self, utterance: &str) -> CompletionRequest {
        CompletionRequest::new()
            .with_system_prompt(build_system_prompt(&self.session, &self.transcript))
            .with_max_tokens(300)
            .with_temperature(0.7)
            .with_message(MessageRole::User, utterance)
    }

    /// Runs the local dialogue engine and folds the result into the
    /// session and transcript.
    fn local_turn(&mut self, utterance: &str) -> String {
        let (text, session) = self.engine.advance(utterance, &self.session);
        self.session = session;
        if !utterance.trim().is_empty() {
            self.transcript.push(Message::user(utterance));
        }
        self.transcript.push(Message::assistant(text.clone()));
        text
    }
}
