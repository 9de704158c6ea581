// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use libas_agent::app::{create_router, AppState, VERSION};
use libas_agent::services::catalog::{MemoryProductStore, PgProductStore, ProductStore};
use libas_agent::services::completion::{CompletionConfig, OpenAiCompletionClient};
use libas_agent::services::db::{self, DatabaseConfig};
use libas_agent::services::history::{MemorySearchHistory, PgSearchHistory, SearchHistory};
use libas_agent::services::interpreter::QueryInterpreter;
use libas_agent::services::logging::init_tracing;
use libas_agent::services::search::SearchService;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "libas-agent")]
#[command(about = "Natural-language search over a fashion catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP search service
    Serve {
        /// Address to listen on
        #[arg(long, env = "LIBAS_BIND_ADDR", default_value = "0.0.0.0:3000")]
        bind: SocketAddr,

        /// Postgres connection string
        #[arg(long, env = "DATABASE_URL", required_unless_present = "products_file")]
        database_url: Option<String>,

        /// Serve products from a JSON file instead of Postgres
        #[arg(long)]
        products_file: Option<PathBuf>,

        /// Do not apply schema migrations on startup
        #[arg(long)]
        skip_migrations: bool,
    },

    /// Print the entities extracted from a query
    Interpret {
        /// Free-text query
        query: String,

        /// Use only the built-in vocabularies
        #[arg(long)]
        offline: bool,
    },
}

fn build_interpreter(offline: bool) -> Result<QueryInterpreter> {
    if offline {
        return Ok(QueryInterpreter::fallback_only());
    }

    match CompletionConfig::from_env()? {
        Some(config) => {
            let client = OpenAiCompletionClient::new(config)?;
            tracing::info!(model = client.model(), "Language-model extraction enabled");
            Ok(QueryInterpreter::new(Arc::new(client)))
        }
        None => {
            tracing::info!("No completion API key set, using vocabulary extraction only");
            Ok(QueryInterpreter::fallback_only())
        }
    }
}

async fn serve(
    bind: SocketAddr,
    database_url: Option<String>,
    products_file: Option<PathBuf>,
    skip_migrations: bool,
) -> Result<()> {
    let (store, history): (Arc<dyn ProductStore>, Arc<dyn SearchHistory>) =
        if let Some(path) = products_file {
            let store = MemoryProductStore::from_json_file(&path)?;
            tracing::info!(products = store.len(), path = %path.display(), "Loaded products");
            (Arc::new(store), Arc::new(MemorySearchHistory::new()))
        } else {
            let url = database_url.context("DATABASE_URL must be set")?;
            let pool = db::connect(&DatabaseConfig::from_env(url)?).await?;
            tracing::info!("Connected to Postgres");

            if !skip_migrations {
                db::migrate(&pool).await?;
                tracing::info!("Database migrations applied");
            }

            (
                Arc::new(PgProductStore::new(pool.clone())),
                Arc::new(PgSearchHistory::new(pool)),
            )
        };

    let state = AppState {
        search: Arc::new(SearchService::new(build_interpreter(false)?, store)),
        history: Some(history),
    };

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;

    tracing::info!("libas-agent v{VERSION} listening on {bind}");

    axum::serve(listener, create_router(state))
        .await
        .context("HTTP server failed")
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        Commands::Serve {
            bind,
            database_url,
            products_file,
            skip_migrations,
        } => serve(bind, database_url, products_file, skip_migrations).await,
        Commands::Interpret { query, offline } => {
            let entities = build_interpreter(offline)?.interpret(&query).await;
            println!("{}", serde_json::to_string_pretty(&entities)?);
            Ok(())
        }
    }
}
