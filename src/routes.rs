use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment};
use crate::handlers::{system, tickets, users};

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Absolute origin prefixed to pagination links
    pub base_url: String,
}

impl AppState {
    pub fn new(pool: PgPool, config: &AppConfig) -> Self {
        Self { pool, base_url: config.api.base_url.clone() }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(api_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(config));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tickets", get(tickets::index).post(tickets::store))
        .route(
            "/api/tickets/:id",
            get(tickets::show)
                .put(tickets::update)
                .patch(tickets::update)
                .delete(tickets::destroy),
        )
        .route("/api/users", get(users::index).post(users::store))
        .route(
            "/api/users/:id",
            get(users::show)
                .put(users::update)
                .patch(users::update)
                .delete(users::destroy),
        )
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.environment == Environment::Development || config.security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
