use serde_json::{Map, Value};
use sqlx::PgPool;

use super::Validator;
use crate::database::models::User;
use crate::database::Trashed;
use crate::error::ApiError;

const MAX_LENGTH: usize = 255;

/// POST /api/users
#[derive(Debug, Clone)]
pub struct UserStoreRequest {
    pub name: String,
    pub email: String,
    /// Plaintext; hashed before it is stored
    pub password: String,
}

impl UserStoreRequest {
    pub async fn validate(pool: &PgPool, payload: &Map<String, Value>) -> Result<Self, ApiError> {
        let mut v = Validator::new(payload);

        let name = v.required_string("name", MAX_LENGTH);
        let email = v.required_string("email", MAX_LENGTH);
        v.email("email", &email);
        v.unique(pool, "email", User::TABLE, Some(&email), None).await?;
        let password = v.required_text("password");

        v.finish()?;
        Ok(Self { name, email, password })
    }
}

/// PUT/PATCH /api/users/{id}. Every field is optional; present ones are replaced.
#[derive(Debug, Clone)]
pub struct UserUpdateRequest {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserUpdateRequest {
    /// `payload` must already carry the route id (see [`super::with_route_id`]).
    pub async fn validate(pool: &PgPool, payload: &Map<String, Value>) -> Result<Self, ApiError> {
        let mut v = Validator::new(payload);

        let id = v.required_integer("id");
        v.exists(pool, "id", User::TABLE, Some(id), Trashed::Exclude).await?;

        let name = v.optional_string("name", MAX_LENGTH);
        let email = v.optional_string("email", MAX_LENGTH);
        if let Some(email) = email.as_deref() {
            v.email("email", email);
        }
        v.unique(pool, "email", User::TABLE, email.as_deref(), Some(id)).await?;
        let password = v.optional_text("password");

        v.finish()?;
        Ok(Self { id, name, email, password })
    }
}

/// DELETE /api/users/{id}
#[derive(Debug, Clone)]
pub struct UserDeleteRequest {
    pub id: i64,
}

impl UserDeleteRequest {
    pub async fn validate(pool: &PgPool, payload: &Map<String, Value>) -> Result<Self, ApiError> {
        let mut v = Validator::new(payload);
        let id = v.required_integer("id");
        v.exists(pool, "id", User::TABLE, Some(id), Trashed::Exclude).await?;
        v.finish()?;
        Ok(Self { id })
    }
}
