//! CLI administration tool for hashlink.
//!
//! Inspects and maintains the record store without going through the HTTP
//! API. Uses the same environment configuration as the server.
//!
//! # Usage
//!
//! ```bash
//! # Check store connectivity
//! cargo run --bin admin -- db check
//!
//! # Create the unique URL index
//! cargo run --bin admin -- db ensure-index
//!
//! # Show a record
//! cargo run --bin admin -- show c984d06a
//!
//! # Shorten a URL
//! cargo run --bin admin -- shorten https://example.com --meta '{"campaign":"spring"}'
//!
//! # Raise a hit count (e.g. to carry over hits counted elsewhere)
//! cargo run --bin admin -- set-hits c984d06a --count 120
//! ```
//!
//! # Environment Variables
//!
//! - `STORAGE_BACKEND`: `postgres` (default) or `redis`
//! - `DATABASE_URL` / `REDIS_URL`: connection string for the chosen backend

use hashlink::application::services::ShortenService;
use hashlink::config;
use hashlink::domain::entities::{ShortUrl, is_well_formed_id};
use hashlink::infrastructure::persistence::{self, StoreHandle};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use serde_json::Value;

/// CLI tool for managing hashlink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Store operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Show a short URL record
    Show {
        /// Short identifier (8 characters)
        id: String,
    },

    /// Shorten a URL
    Shorten {
        /// URL to shorten
        url: String,

        /// Metadata as a JSON document
        #[arg(short, long)]
        meta: Option<String>,
    },

    /// Raise the hit count of a record (counts never go down)
    SetHits {
        /// Short identifier (8 characters)
        id: String,

        /// New hit count, not below the current one
        #[arg(short, long)]
        count: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Store operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check store connection
    Check,

    /// Create the unique URL index if it is missing
    EnsureIndex,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let store = persistence::open(&config)
        .await
        .context("Failed to open the record store")?;

    let result = match cli.command {
        Commands::Db { action } => handle_db_action(action, &store).await,
        Commands::Show { id } => show_record(&store, &id).await,
        Commands::Shorten { url, meta } => shorten_url(&store, &url, meta).await,
        Commands::SetHits { id, count, yes } => set_hits(&store, &id, count, yes).await,
    };

    store.close().await;
    result
}

/// Dispatches store commands.
async fn handle_db_action(action: DbAction, store: &StoreHandle) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking store connection...".bright_blue());

            match store.repository.ping().await {
                Ok(()) => {
                    println!("{}", "✅ Store connection OK".green().bold());
                }
                Err(e) => {
                    println!("{}", "❌ Store connection failed".red().bold());
                    println!("  Error: {}", e.to_string().red());
                    bail!("store check failed");
                }
            }
        }
        DbAction::EnsureIndex => {
            println!("{}", "🔧 Ensuring unique URL index...".bright_blue());

            store
                .repository
                .ensure_url_index()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to ensure URL index: {}", e))?;

            println!("{}", "✅ URL index in place".green().bold());
        }
    }

    Ok(())
}

/// Prints a single record.
async fn show_record(store: &StoreHandle, id: &str) -> Result<()> {
    check_id(id)?;

    let record = store
        .repository
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {}", e))?
        .with_context(|| format!("No record with id {id}"))?;

    print_record(&record);

    Ok(())
}

/// Shortens a URL the same way `POST /shorten` does.
async fn shorten_url(store: &StoreHandle, url: &str, meta: Option<String>) -> Result<()> {
    let meta: Option<Value> = meta
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .context("--meta must be valid JSON")?;

    let service = ShortenService::new(store.repository.clone());
    let record = service
        .shorten(url, meta)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    println!("{}", "✅ Shortened".green().bold());
    println!();
    print_record(&record);

    Ok(())
}

/// Raises the hit count of a record after confirmation.
async fn set_hits(store: &StoreHandle, id: &str, count: i64, skip_confirm: bool) -> Result<()> {
    check_id(id)?;

    let record = store
        .repository
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {}", e))?
        .with_context(|| format!("No record with id {id}"))?;

    check_new_hit_count(record.hit_count, count)?;

    println!("  URL:       {}", record.url.cyan());
    println!(
        "  Hit count: {} → {}",
        record.hit_count.to_string().bright_black(),
        count.to_string().bright_white().bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Update the hit count?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let updated = store
        .repository
        .update_hit_count(id, count)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update hit count: {}", e))?;

    if !updated {
        bail!("record {id} disappeared before the update");
    }

    println!("{}", "✅ Hit count updated".green().bold());

    Ok(())
}

/// Hit counts are monotonic; an operator may only move them forward.
fn check_new_hit_count(current: i64, new: i64) -> Result<()> {
    if new < current {
        bail!(
            "hit counts never decrease: {} is below the current count {}",
            new,
            current
        );
    }
    Ok(())
}

fn check_id(id: &str) -> Result<()> {
    if !is_well_formed_id(id) {
        bail!("short identifiers are exactly 8 characters, got {:?}", id);
    }
    Ok(())
}

fn print_record(record: &ShortUrl) {
    println!("  ID:        {}", record.id.bright_yellow().bold());
    println!("  URL:       {}", record.url.cyan());
    println!(
        "  Hit count: {}",
        record.hit_count.to_string().bright_white()
    );
    match &record.meta {
        Some(meta) => println!("  Meta:      {}", meta.to_string().bright_black()),
        None => println!("  Meta:      {}", "none".bright_black()),
    }
}
