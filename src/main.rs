use ticket_api::config::config;
use ticket_api::database::{seeder, DatabaseManager};
use ticket_api::routes::{app, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, APP_URL, etc.
    let _ = dotenvy::dotenv();
    ticket_api::init_tracing();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    info!("Starting Ticket API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database).await?;
    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await?;
    }
    if config.database.seed_on_startup {
        seeder::seed_ticket_statuses(&pool).await?;
    }

    let router = app(AppState::new(pool, config), config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Ticket API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
