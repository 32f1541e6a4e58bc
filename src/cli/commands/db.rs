use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::{seeder, DatabaseManager};

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Apply pending schema migrations")]
    Migrate,

    #[command(about = "Insert the fixed ticket statuses (idempotent)")]
    Seed,

    #[command(about = "Check that the database answers")]
    Status,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let database = &config().database;
    let pool = DatabaseManager::connect(database).await?;

    match cmd {
        DbCommands::Migrate => {
            DatabaseManager::migrate(&pool).await?;
            output_success(&output_format, "Migrations applied", None)
        }
        DbCommands::Seed => {
            seeder::seed_ticket_statuses(&pool).await?;
            output_success(&output_format, "Ticket statuses seeded", None)
        }
        DbCommands::Status => {
            let url = database.url.as_deref().unwrap_or_default();
            let redacted = DatabaseManager::redact_url(url)?;
            match DatabaseManager::health_check(&pool).await {
                Ok(()) => output_success(&output_format, "Database reachable", Some(json!({ "database": redacted }))),
                Err(e) => {
                    output_error(&output_format, &format!("{}: {}", redacted, e), Some("DATABASE_UNAVAILABLE"))?;
                    Err(e.into())
                }
            }
        }
    }
}
