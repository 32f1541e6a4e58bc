// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{json, Value};

use crate::database::DatabaseError;
use crate::middleware::response::ApiResponse;

/// Field name → messages, in the order the fields were validated.
/// Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(Vec<(String, Vec<String>)>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: String) {
        match self.0.iter_mut().find(|(name, _)| name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.0.push((field.to_string(), vec![message])),
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.iter().find(|(name, _)| name == field).map(|(_, messages)| messages.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every message, field by field
    pub fn messages(&self) -> impl Iterator<Item = &String> {
        self.0.iter().flat_map(|(_, messages)| messages.iter())
    }
}

#[cfg(test)]
impl std::ops::Index<&str> for FieldErrors {
    type Output = [String];

    fn index(&self, field: &str) -> &[String] {
        self.get(field).unwrap_or_else(|| panic!("no errors for field {}", field))
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, messages) in &self.0 {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

/// HTTP API error. Validation failures use the 422 `{message, errors}`
/// format; everything else is rendered as the error envelope.
#[derive(Debug)]
pub enum ApiError {
    // 404 Not Found
    NotFound(String),

    // 422 Unprocessable Entity
    UnprocessableEntity {
        message: String,
        errors: FieldErrors,
    },

    // Late failure inside an operation, reported with its own status
    Runtime { status: u16, message: String },
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::UnprocessableEntity { .. } => 422,
            ApiError::Runtime { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::NotFound(msg) => msg,
            ApiError::UnprocessableEntity { message, .. } => message,
            ApiError::Runtime { message, .. } => message,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ApiError::UnprocessableEntity { message, errors } => json!({
                "message": message,
                "errors": errors,
            }),
            _ => ApiResponse::<()>::error_with(None, self.status_code(), self.message())
                .to_json()
                .unwrap_or(Value::Null),
        }
    }
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Summary message is the first field error, plus a count of the rest.
    pub fn unprocessable_entity(errors: FieldErrors) -> Self {
        let total = errors.messages().count();
        let first = errors
            .messages()
            .next()
            .cloned()
            .unwrap_or_else(|| "The given data was invalid.".to_string());
        let message = match total {
            0 | 1 => first,
            2 => format!("{} (and 1 more error)", first),
            n => format!("{} (and {} more errors)", first, n - 1),
        };
        ApiError::UnprocessableEntity { message, errors }
    }

    pub fn runtime(status: u16, message: impl Into<String>) -> Self {
        ApiError::Runtime { status, message: message.into() }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            other => {
                tracing::error!("Database error: {}", other);
                ApiError::runtime(500, other.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::UnprocessableEntity { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(self.to_json())).into_response()
            }
            ApiError::NotFound(message) => ApiResponse::<()>::error_with(None, 404, message).into_response(),
            ApiError::Runtime { status, message } => {
                ApiResponse::<()>::error_with(None, status, message).into_response()
            }
        }
    }
}
