//! Memora application binary - composition root.
//!
//! Ties together the Memora crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Wire the in-memory repositories and the stub language model
//! 3. Build the session router with assessment, activity, extraction, and
//!    calendar capabilities
//! 4. Run a stdin chat loop that routes each line and prints the response
//!
//! The stub model keeps the binary fully offline; swap in a real
//! `LanguageModel` implementation at this composition root to connect a
//! provider.

mod cli;

use std::io::{BufRead, Write};
use std::sync::Arc;

use clap::Parser;

use memora_activity::{Activity, ActivityEngine};
use memora_assessment::{AssessmentEngine, AssessmentState};
use memora_calendar::calendar_registry;
use memora_core::MemoraConfig;
use memora_llm::StubModel;
use memora_profile::FactExtractor;
use memora_session::{RouterError, SessionRouter};
use memora_store::{MemoryCalendarRepository, MemorySessionStore, MemoryUserRepository};

use cli::CliArgs;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    let config_path = args.resolve_config_path();
    let config = MemoraConfig::load_or_default(&config_path);

    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!(user = %args.user, "Memora starting");

    let model = Arc::new(StubModel::default());
    let users = Arc::new(MemoryUserRepository::new());
    let calendar = Arc::new(MemoryCalendarRepository::new());
    let assessment_store: Arc<MemorySessionStore<AssessmentState>> =
        Arc::new(MemorySessionStore::new());
    let activity_store: Arc<MemorySessionStore<Activity>> = Arc::new(MemorySessionStore::new());

    let router = SessionRouter::new(
        AssessmentEngine::new(assessment_store, model.clone()),
        ActivityEngine::new(activity_store),
        Arc::new(FactExtractor::new(model.clone(), users)),
        model,
        calendar_registry(calendar, config.matching.confirm_threshold),
        &config,
    );

    println!("Memora is ready. Try 'memory check', or just say hello. Ctrl-D to exit.");

    let stdin = std::io::stdin();
    loop {
        print!("{}> ", args.user);
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "Failed to read input");
                break;
            }
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        match router.route(&args.user, message).await {
            Ok(response) => println!("memora> {}", response.message),
            Err(e @ RouterError::MissingUserId) => println!("memora> {}", e),
            Err(e) => {
                tracing::warn!(error = %e, "Turn failed");
                println!("memora> I'm sorry, something went wrong with that one. Could you try again?");
            }
        }
    }

    tracing::info!("Memora shutting down");
}
