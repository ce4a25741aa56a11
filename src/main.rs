//! Grow Coach terminal session.
//!
//! Runs one coaching session in a read-eval-print loop. Remote providers
//! are used when configured; otherwise the session runs fully offline on
//! the local dialogue engine.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use grow_coach::adapters::ai::{ChatCompletionsProvider, InferenceGateway};
use grow_coach::application::CoachingOrchestrator;
use grow_coach::config::AppConfig;
use grow_coach::domain::coaching::{grow_model_info, DialogueEngine};
use grow_coach::ports::AIProvider;

const HELP: &str = "Commands: /grow (model reference), /offline, /online, /reset, /quit";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = config.validate() {
        eprintln!("Invalid configuration: {err}");
        std::process::exit(1);
    }

    let providers: Vec<Arc<dyn AIProvider>> = config
        .ai
        .providers()
        .into_iter()
        .map(|descriptor| {
            Arc::new(ChatCompletionsProvider::new(descriptor, config.ai.timeout()))
                as Arc<dyn AIProvider>
        })
        .collect();
    info!(providers = providers.len(), "starting coaching session");

    let gateway = InferenceGateway::new(providers, config.ai.gateway_config());
    let engine = match config.engine.rng_seed {
        Some(seed) => DialogueEngine::with_seed(config.engine.thresholds.clone(), seed),
        None => DialogueEngine::new(config.engine.thresholds.clone()),
    };
    let mut orchestrator = CoachingOrchestrator::new(engine, gateway, config.ai.local_fallback);

    println!("GROW Coaching Session");
    println!("{HELP}\n");
    println!("{}\n", orchestrator.start());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };
        let input = line.trim();

        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/help" => println!("{HELP}"),
            "/grow" => println!("\n{}\n", grow_model_info()),
            "/reset" => println!("\n{}\n", orchestrator.reset()),
            "/offline" => {
                orchestrator.set_offline(true);
                println!(
                    "\nOffline mode on - coaching continues with the local GROW \
                     knowledge base.\n"
                );
            }
            "/online" => {
                orchestrator.set_offline(false);
                println!("\nOffline mode off - remote providers will be tried first.\n");
            }
            utterance => match orchestrator.turn(utterance).await {
                Ok(outcome) => println!("\n{}\n", outcome.text),
                Err(err) => eprintln!("\n{err}\n"),
            },
        }

        if orchestrator.session().is_complete() {
            println!("(Session complete - /reset starts a new one.)");
        }
    }

    println!("Goodbye - good luck with your action!");
}
