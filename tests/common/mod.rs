#![allow(dead_code)]

use anyhow::{Context, Result};
use argon2::password_hash::{PasswordHash, PasswordVerifier};
use argon2::Argon2;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower::ServiceExt;

use ticket_api::config::AppConfig;
use ticket_api::database::{seeder, DatabaseManager};
use ticket_api::routes::{app, AppState};

pub const BASE_URL: &str = "http://localhost";

/// Whether `stored` is an argon2 PHC string for `plain`
pub fn password_matches(plain: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}

/// One isolated database schema plus the router wired to it.
///
/// Fails when `DATABASE_URL` is not set; the DB-backed tests are `#[ignore]`d
/// and run with `cargo test -- --ignored` against a real Postgres.
pub struct TestContext {
    pub pool: PgPool,
    pub app: Router,
    admin: PgPool,
    schema: String,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let url = std::env::var("DATABASE_URL").context("DATABASE_URL must point at a Postgres database")?;

        let schema = format!("test_{}", uuid::Uuid::new_v4().simple());
        let admin = PgPoolOptions::new().max_connections(1).connect(&url).await?;
        sqlx::query(&format!("CREATE SCHEMA \"{}\"", schema))
            .execute(&admin)
            .await
            .with_context(|| format!("failed to create test schema {}", schema))?;

        let search_path = format!("SET search_path TO \"{}\"", schema);
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .after_connect(move |conn, _meta| {
                let sql = search_path.clone();
                Box::pin(async move {
                    sqlx::query(&sql).execute(conn).await?;
                    Ok(())
                })
            })
            .connect(&url)
            .await?;

        DatabaseManager::migrate(&pool).await?;
        seeder::seed_ticket_statuses(&pool).await?;

        let mut config = AppConfig::development();
        config.api.base_url = BASE_URL.to_string();
        config.api.enable_request_logging = false;
        let app = app(AppState::new(pool.clone(), &config), &config);

        Ok(Self { pool, app, admin, schema })
    }

    pub async fn cleanup(self) -> Result<()> {
        self.pool.close().await;
        sqlx::query(&format!("DROP SCHEMA \"{}\" CASCADE", self.schema))
            .execute(&self.admin)
            .await?;
        Ok(())
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.app.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
        Ok((status, value))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create a user through the API and return its id
    pub async fn create_user(&self, name: &str) -> Result<i64> {
        let (status, body) = self
            .post(
                "/api/users",
                json!({"name": name, "email": format!("{}@woh.com", name), "password": "123456"}),
            )
            .await?;
        assert_eq!(status, StatusCode::OK, "create user failed: {}", body);
        body["body"]["id"].as_i64().ok_or_else(|| anyhow::anyhow!("missing user id: {}", body))
    }

    /// Create a ticket through the API and return its id
    pub async fn create_ticket(&self, payload: Value) -> Result<i64> {
        let (status, body) = self.post("/api/tickets", payload).await?;
        assert_eq!(status, StatusCode::OK, "create ticket failed: {}", body);
        body["body"]["id"].as_i64().ok_or_else(|| anyhow::anyhow!("missing ticket id: {}", body))
    }
}
