// handlers/system.rs - service info and health probes

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::database::DatabaseManager;
use crate::middleware::ApiResponse;
use crate::routes::AppState;

/// GET /
pub async fn root() -> impl IntoResponse {
    ApiResponse::success(json!({
        "name": "Ticket API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "tickets": "/api/tickets[/:id]",
            "users": "/api/users[/:id]",
            "health": "/health",
        }
    }))
}

/// GET /health - database round trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(()) => ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok",
        })),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            ApiResponse::error_with(
                Some(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string(),
                })),
                StatusCode::SERVICE_UNAVAILABLE.as_u16(),
                "database unavailable",
            )
        }
    }
}
