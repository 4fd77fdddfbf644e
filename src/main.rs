use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::Mutex as TokioMutex;
use tracing::info;

use repolens::agent::mock::MockLlm;
use repolens::agent::store::{DbContextSearch, DbRelationStore};
use repolens::agent::DeveloperAgent;
use repolens::config::Config;
use repolens::db::Db;
use repolens::parser::RepoParser;

#[derive(Parser)]
#[command(name = "repolens", version, about = "Parse code repositories into structured, queryable representations")]
struct Cli {
    /// Path to the JSON config file (defaults to ./config.json)
    #[arg(long, default_value = "")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a repository and print the structured result as JSON
    Parse {
        path: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Parse a repository and persist it to the database
    Index { path: PathBuf },
    /// Ask a question against the indexed repositories
    Query { text: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    match cli.command {
        Command::Parse { path, pretty } => {
            let parser = RepoParser::new(config.chunk_size);
            let repo = parser
                .parse_repository(&path)
                .with_context(|| format!("Failed to parse repository: {}", path.display()))?;

            let json = if pretty {
                serde_json::to_string_pretty(&repo)?
            } else {
                serde_json::to_string(&repo)?
            };
            println!("{json}");
        }
        Command::Index { path } => {
            let parser = RepoParser::new(config.chunk_size);
            let repo = parser
                .parse_repository(&path)
                .with_context(|| format!("Failed to parse repository: {}", path.display()))?;

            let mut db = Db::open(&config.db_path).context("Failed to open database")?;
            db.insert_repository(&repo)
                .context("Failed to store repository")?;

            let failed = repo.files.iter().filter(|f| f.error.is_some()).count();
            info!(
                "Indexed {} files from {} ({} with errors)",
                repo.files.len(),
                repo.root,
                failed
            );
        }
        Command::Query { text } => {
            let db = Db::open(&config.db_path).context("Failed to open database")?;
            let db = Arc::new(TokioMutex::new(db));

            // MockLlm stands in until a real LLM service is wired in
            let agent = DeveloperAgent::new(
                Arc::new(MockLlm::default()),
                Arc::new(DbContextSearch::new(db.clone())),
                Arc::new(DbRelationStore::new(db)),
                config.search_top_k,
                config.context_limit,
            );

            let response = agent
                .process_query(&text)
                .await
                .context("Failed to process query")?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
