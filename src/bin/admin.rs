//! CLI administration tool for linkpulse.
//!
//! Inspects the hot ranking and individual links, purges click history and
//! checks the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show the 20 most clicked codes
//! cargo run --bin admin -- hot --limit 20
//!
//! # Show a link with its counter and stored click events
//! cargo run --bin admin -- link info promo
//!
//! # Delete the stored click events of a code
//! cargo run --bin admin -- clicks purge promo
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the service (see `linkpulse::config`).
//! `REDIS_URL` is only needed for `hot`.

use linkpulse::config::{self, Config};
use linkpulse::domain::repositories::{ClickLog, HotRanking, LinkStore};
use linkpulse::infrastructure::cache::connect_manager;
use linkpulse::infrastructure::persistence::{PgClickLog, PgLinkStore};
use linkpulse::infrastructure::ranking::RedisHotRanking;
use linkpulse::server::connect_database;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkpulse.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show the most clicked codes
    Hot {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Inspect links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Manage stored click events
    Clicks {
        #[command(subcommand)]
        action: ClicksAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link inspection subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Show a link, its durable counter and stored click events
    Info {
        /// Short code
        code: String,
    },
}

/// Click history subcommands.
#[derive(Subcommand)]
enum ClicksAction {
    /// Delete every stored click event of a code
    Purge {
        /// Short code
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Hot { limit } => show_hot(&config, limit).await?,
        Commands::Link { action } => {
            let pool = connect_database(&config).await?;
            match action {
                LinkAction::Info { code } => show_link(&pool, &code).await?,
            }
        }
        Commands::Clicks { action } => {
            let pool = connect_database(&config).await?;
            match action {
                ClicksAction::Purge { code, yes } => purge_clicks(&pool, &code, yes).await?,
            }
        }
        Commands::Db { action } => {
            let pool = connect_database(&config).await?;
            match action {
                DbAction::Check => check_database(&pool).await?,
            }
        }
    }

    Ok(())
}

/// Prints the hot ranking.
///
/// # Output Format
///
/// ```text
/// 🔥 Hot links
///
///   #   Code                  Clicks
///   ──────────────────────────────────
///   1   promo                 1520
///   2   Xk3p9Q                 204
/// ```
async fn show_hot(config: &Config, limit: usize) -> Result<()> {
    let redis_url = config
        .redis_url
        .as_deref()
        .context("REDIS_URL must be set to read the hot ranking")?;

    let conn = connect_manager(redis_url)
        .await
        .context("Failed to connect to Redis")?;
    let ranking = RedisHotRanking::new(conn);

    let entries = ranking
        .top(limit)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read hot ranking: {e}"))?;

    println!("{}", "🔥 Hot links".bright_blue().bold());
    println!();

    if entries.is_empty() {
        println!("{}", "  No clicks recorded yet".yellow());
        return Ok(());
    }

    println!(
        "  {:<3} {:<21} {:>6}",
        "#".bright_white().bold(),
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold()
    );
    println!("  {}", "─".repeat(34).bright_black());

    for (rank, entry) in entries.iter().enumerate() {
        println!(
            "  {:<3} {:<21} {:>6}",
            (rank + 1).to_string().bright_black(),
            entry.code.cyan(),
            entry.score.to_string().bright_green()
        );
    }
    println!();

    Ok(())
}

/// Prints a link with its durable counter and logged click count.
///
/// The two numbers may differ: counter and log are written independently.
async fn show_link(pool: &PgPool, code: &str) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let links = PgLinkStore::new(pool.clone());
    let clicks = PgClickLog::new(pool);

    let link = links
        .get_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {e}"))?
        .with_context(|| format!("Link '{code}' not found"))?;

    let logged = clicks
        .count_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {e}"))?;

    let status = match link.expires_at {
        Some(at) if at < Utc::now() => "EXPIRED".red(),
        _ => "ACTIVE".green(),
    };

    println!("{}", "🔗 Link".bright_blue().bold());
    println!();
    println!("  Code:     {}", link.code.cyan());
    println!("  Target:   {}", link.target_url.bright_white());
    println!("  Alias:    {}", link.is_alias);
    println!("  Owner:    {}", link.owner_id);
    println!(
        "  Created:  {}",
        link.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );
    match link.expires_at {
        Some(at) => println!("  Expires:  {}", at.format("%Y-%m-%d %H:%M")),
        None => println!("  Expires:  {}", "never".bright_black()),
    }
    println!("  Status:   {status}");
    println!(
        "  Counter:  {}",
        link.click_count.to_string().bright_green().bold()
    );
    println!("  Events:   {}", logged.to_string().bright_green());
    println!();

    Ok(())
}

/// Deletes the stored click events of a code after confirmation.
///
/// Works for deleted links too, since click history outlives its link.
async fn purge_clicks(pool: &PgPool, code: &str, skip_confirm: bool) -> Result<()> {
    let clicks = PgClickLog::new(Arc::new(pool.clone()));

    let stored = clicks
        .count_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {e}"))?;

    println!("{}", "🧹 Purge click events".bright_blue().bold());
    println!();
    println!("  Code:   {}", code.cyan());
    println!("  Events: {}", stored.to_string().bright_white());
    println!();

    if stored == 0 {
        println!("{}", "  Nothing to purge".yellow());
        return Ok(());
    }

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete these click events permanently?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = clicks
        .purge_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge clicks: {e}"))?;

    println!(
        "{}",
        format!("✅ Removed {removed} click events").green().bold()
    );
    println!();

    Ok(())
}

/// Checks connectivity and reports the server version.
async fn check_database(pool: &PgPool) -> Result<()> {
    println!("{}", "🔍 Checking database connection...".bright_blue());

    let version: String = sqlx::query_scalar("SELECT version()")
        .fetch_one(pool)
        .await?;

    println!("{}", "✅ Database connection OK".green().bold());
    println!("  PostgreSQL: {}", version.bright_white());

    Ok(())
}
