//! Request validation.
//!
//! A [`Validator`] walks a JSON payload field by field, coercing values and
//! collecting messages. The first failing rule for a field wins; later rules
//! for that field are skipped. [`Validator::finish`] turns any collected
//! messages into a 422 [`ApiError`].

pub mod ticket;
pub mod user;

use serde_json::{Map, Value};
use sqlx::PgPool;
use validator::{ValidateEmail, ValidateLength};

use crate::database::{DatabaseError, Repository, Trashed};
use crate::error::{ApiError, FieldErrors};
use crate::filter::{FilterOp, FilterWhereInfo, SqlParam};

pub use ticket::{TicketDeleteRequest, TicketStoreRequest, TicketUpdateRequest};
pub use user::{UserDeleteRequest, UserStoreRequest, UserUpdateRequest};

/// Body of a JSON request as a field map. Anything that is not an object
/// (including a missing body) validates as an empty payload.
pub fn payload_object(body: Option<Value>) -> Map<String, Value> {
    match body {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Payload with the route `{id}` merged in, so it is validated like any other field.
pub fn with_route_id(mut payload: Map<String, Value>, id: &str) -> Map<String, Value> {
    payload.insert("id".to_string(), Value::String(id.to_string()));
    payload
}

pub struct Validator<'a> {
    payload: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> Validator<'a> {
    pub fn new(payload: &'a Map<String, Value>) -> Self {
        Self { payload, errors: FieldErrors::new() }
    }

    fn attribute(field: &str) -> String {
        field.replace('_', " ")
    }

    pub fn fail(&mut self, field: &str, message: String) {
        self.errors.add(field, message);
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains(field)
    }

    pub fn present(&self, field: &str) -> bool {
        self.payload.contains_key(field)
    }

    /// Present and not null, an empty/blank string or an empty array.
    fn filled(&self, field: &str) -> Option<&'a Value> {
        let payload = self.payload;
        payload.get(field).filter(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(a) => !a.is_empty(),
            _ => true,
        })
    }

    fn require(&mut self, field: &str) -> Option<&'a Value> {
        let value = self.filled(field);
        if value.is_none() {
            self.fail(field, format!("The {} field is required.", Self::attribute(field)));
        }
        value
    }

    /// `required|integer`. Returns 0 after recording an error.
    pub fn required_integer(&mut self, field: &str) -> i64 {
        match self.require(field) {
            Some(value) => self.integer(field, value).unwrap_or_default(),
            None => 0,
        }
    }

    /// `integer` when present; absent or null yields `None`.
    pub fn optional_integer(&mut self, field: &str) -> Option<i64> {
        let payload = self.payload;
        match payload.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => self.integer(field, value),
        }
    }

    fn integer(&mut self, field: &str, value: &Value) -> Option<i64> {
        let parsed = as_integer(value);
        if parsed.is_none() {
            self.fail(field, format!("The {} field must be an integer.", Self::attribute(field)));
        }
        parsed
    }

    /// `required|string|max:N`. Returns an empty string after recording an error.
    pub fn required_string(&mut self, field: &str, max: usize) -> String {
        match self.require(field) {
            Some(value) => self.string(field, value, max).unwrap_or_default(),
            None => String::new(),
        }
    }

    /// `sometimes|required|string|max:N`: only checked when the key is present.
    pub fn optional_string(&mut self, field: &str, max: usize) -> Option<String> {
        if !self.present(field) {
            return None;
        }
        let value = self.require(field)?;
        self.string(field, value, max)
    }

    fn string(&mut self, field: &str, value: &Value, max: usize) -> Option<String> {
        let Value::String(s) = value else {
            self.fail(field, format!("The {} field must be a string.", Self::attribute(field)));
            return None;
        };
        if !within_max(s, max) {
            self.fail(
                field,
                format!("The {} field must not be greater than {} characters.", Self::attribute(field), max),
            );
            return None;
        }
        Some(s.clone())
    }

    /// Required scalar read as text; numbers are accepted and stringified.
    pub fn required_text(&mut self, field: &str) -> String {
        match self.require(field) {
            Some(value) => self.text(field, value).unwrap_or_default(),
            None => String::new(),
        }
    }

    /// Like [`Self::required_text`] but only when the key is present.
    pub fn optional_text(&mut self, field: &str) -> Option<String> {
        if !self.present(field) {
            return None;
        }
        let value = self.require(field)?;
        self.text(field, value)
    }

    fn text(&mut self, field: &str, value: &Value) -> Option<String> {
        let text = as_text(value);
        if text.is_none() {
            self.fail(field, format!("The {} field must be a string.", Self::attribute(field)));
        }
        text
    }

    /// Free-form nullable column: absent → `None`, null → `Some(None)`.
    pub fn nullable_text(&mut self, field: &str, max: usize) -> Option<Option<String>> {
        let payload = self.payload;
        let value = payload.get(field)?;
        if value.is_null() {
            return Some(None);
        }
        let text = self.text(field, value)?;
        if !within_max(&text, max) {
            self.fail(
                field,
                format!("The {} field must not be greater than {} characters.", Self::attribute(field), max),
            );
            return None;
        }
        Some(Some(text))
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if self.has_error(field) {
            return;
        }
        if !value.validate_email() {
            self.fail(field, format!("The {} field must be a valid email address.", Self::attribute(field)));
        }
    }

    /// `exists:table,id`. Skipped when the field already failed or is absent.
    pub async fn exists(
        &mut self,
        pool: &PgPool,
        field: &str,
        table: &'static str,
        id: Option<i64>,
        trashed: Trashed,
    ) -> Result<(), DatabaseError> {
        let Some(id) = id else { return Ok(()) };
        if self.has_error(field) {
            return Ok(());
        }
        let repository = Repository::<IdRow>::new(table, pool.clone());
        let condition = FilterWhereInfo::new("id", FilterOp::Eq, SqlParam::Int(id));
        if !repository.exists(vec![condition], trashed).await? {
            self.fail(field, format!("The selected {} is invalid.", Self::attribute(field)));
        }
        Ok(())
    }

    /// `unique:table,column[,ignore_id]`, checked against every row including soft-deleted ones.
    pub async fn unique(
        &mut self,
        pool: &PgPool,
        field: &str,
        table: &'static str,
        value: Option<&str>,
        ignore_id: Option<i64>,
    ) -> Result<(), DatabaseError> {
        let Some(value) = value else { return Ok(()) };
        if self.has_error(field) {
            return Ok(());
        }
        let repository = Repository::<IdRow>::new(table, pool.clone());
        let condition = FilterWhereInfo::new(field, FilterOp::Eq, SqlParam::text(value));
        let taken = repository
            .select_any_with_deleted(vec![condition])
            .await?
            .into_iter()
            .any(|row| Some(row.id) != ignore_id);
        if taken {
            self.fail(field, format!("The {} has already been taken.", Self::attribute(field)));
        }
        Ok(())
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::unprocessable_entity(self.errors))
        }
    }
}

/// Minimal row used by existence checks
#[derive(Debug, sqlx::FromRow)]
struct IdRow {
    id: i64,
}

/// Integers arrive as JSON numbers or numeric strings.
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Length in characters, not bytes
fn within_max(value: &str, max: usize) -> bool {
    value.validate_length(None, Some(max as u64), None)
}
