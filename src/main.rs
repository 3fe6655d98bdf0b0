//! Deen Gateway CLI
//!
//! Small command-line front for the feature adapters; the UI proper lives
//! elsewhere and talks to the same library surface.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deen_gateway::logging::init_tracing;
use deen_gateway::pool::KeyPool;
use deen_gateway::services::{
    GeminiClient, InspirationService, ScholarService, SearchService, StudyService,
};
use deen_gateway::Settings;
use std::sync::Arc;
use std::time::Duration;

/// Deen Gateway
///
/// Resilient AI invocation for an Islamic lifestyle companion.
#[derive(Parser, Debug)]
#[command(name = "deen-gateway")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level: trace, debug, info, warn, error (overrides LOG_LEVEL env var)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the scholar assistant a question
    Ask { message: String },

    /// Find Quranic verses about a topic
    Verses { query: String },

    /// Find authentic Hadiths about a topic
    Hadith { query: String },

    /// Interpret a dream
    Dream { description: String },

    /// Generate a quiz about a topic
    Quiz {
        topic: String,

        /// easy, medium, or hard
        #[arg(long, default_value = "medium")]
        difficulty: String,

        #[arg(long, default_value_t = 5)]
        count: u32,
    },

    /// Show today's inspiration
    Inspire,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load()?;
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    init_tracing(&settings.log_level, args.json_logs);

    tracing::info!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        "starting"
    );

    let pool = Arc::new(KeyPool::from_env());
    let client = Arc::new(GeminiClient::new(
        settings.gemini_base_url.clone(),
        Duration::from_secs(settings.request_timeout_seconds),
        pool,
    )?);

    match args.command {
        Command::Ask { message } => {
            let scholar = ScholarService::new(client, &settings);
            println!("{}", scholar.chat_reply(&[], &message).await);
        }
        Command::Verses { query } => {
            let search = SearchService::new(client, &settings);
            let verses = search.search_verses(&query).await;
            println!("{}", serde_json::to_string_pretty(&verses)?);
        }
        Command::Hadith { query } => {
            let search = SearchService::new(client, &settings);
            let hadiths = search.search_hadiths(&query).await;
            println!("{}", serde_json::to_string_pretty(&hadiths)?);
        }
        Command::Dream { description } => {
            let study = StudyService::new(client, &settings);
            let result = study
                .interpret_dream(&description)
                .await
                .context("dream interpretation failed")?;
            match result {
                Some(interpretation) => {
                    println!("{}", serde_json::to_string_pretty(&interpretation)?)
                }
                None => println!("No interpretation available."),
            }
        }
        Command::Quiz {
            topic,
            difficulty,
            count,
        } => {
            let study = StudyService::new(client, &settings);
            let questions = study
                .generate_quiz(&topic, &difficulty, count)
                .await
                .context("quiz generation failed")?;
            println!("{}", serde_json::to_string_pretty(&questions)?);
        }
        Command::Inspire => {
            let inspiration = InspirationService::new(client, &settings);
            println!("{}", serde_json::to_string_pretty(&inspiration.daily().await)?);
        }
    }

    Ok(())
}
