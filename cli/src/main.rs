//! Command-line front end for the PromptForce similarity engine.
//!
//! Logs travel to stderr so stdout stays machine-readable: every
//! command prints exactly one JSON document. Internal failures are
//! reported inside that document (`{"success": false}` or an empty
//! array), not through the exit code.

use clap::{Parser, Subcommand};
use promptforce_similarity::{DEFAULT_LIMIT, PromptId, SimilarityConfig, SimilarityEngine};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "promptforce",
    about = "Nearest-neighbor search over a prompt collection"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the prompt collection, embed it, and build the index
    BuildIndex {
        /// Lower build narration from info to debug level
        #[arg(long)]
        quiet: bool,
    },
    /// List prompts similar to an existing prompt
    FindSimilar {
        /// Identifier of the prompt to search around
        prompt_id: String,
        /// Maximum number of results
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    /// List prompts similar to a free-text query
    FindByText {
        /// Query text to embed and search with
        query: String,
        /// Maximum number of results
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let engine = SimilarityEngine::from_config(&SimilarityConfig::from_env());

    match cli.command {
        Command::BuildIndex { quiet } => {
            let success = engine.build_index(quiet).await;
            println!("{}", serde_json::json!({ "success": success }));
        }
        Command::FindSimilar { prompt_id, limit } => {
            let results = engine.find_similar(&PromptId::new(prompt_id), limit).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::FindByText { query, limit } => {
            let results = engine.find_similar_by_text(&query, limit).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}
