use serde_json::{Map, Value};
use sqlx::PgPool;

use super::Validator;
use crate::database::models::{Ticket, TicketStatus, User};
use crate::database::Trashed;
use crate::error::ApiError;

/// Free-form ticket columns present in a payload; `None` clears the column.
pub type TicketDetails = Vec<(&'static str, Option<String>)>;

const MAX_DETAIL_LENGTH: usize = 255;

/// POST /api/tickets
#[derive(Debug, Clone)]
pub struct TicketStoreRequest {
    pub user_id: i64,
    /// Left to the column default (open) when absent
    pub ticket_status_id: Option<i64>,
    pub details: TicketDetails,
}

impl TicketStoreRequest {
    pub async fn validate(pool: &PgPool, payload: &Map<String, Value>) -> Result<Self, ApiError> {
        let mut v = Validator::new(payload);

        let user_id = v.required_integer("user_id");
        v.exists(pool, "user_id", User::TABLE, Some(user_id), Trashed::Include).await?;

        let ticket_status_id = v.optional_integer("ticket_status_id");
        v.exists(pool, "ticket_status_id", TicketStatus::TABLE, ticket_status_id, Trashed::Include).await?;

        let details = ticket_details(&mut v);
        v.finish()?;

        Ok(Self { user_id, ticket_status_id, details })
    }
}

/// PUT/PATCH /api/tickets/{id}. Owner and status are always required.
#[derive(Debug, Clone)]
pub struct TicketUpdateRequest {
    pub id: i64,
    pub user_id: i64,
    pub ticket_status_id: i64,
    pub details: TicketDetails,
}

impl TicketUpdateRequest {
    /// `payload` must already carry the route id (see [`super::with_route_id`]).
    pub async fn validate(pool: &PgPool, payload: &Map<String, Value>) -> Result<Self, ApiError> {
        let mut v = Validator::new(payload);

        let id = v.required_integer("id");
        v.exists(pool, "id", Ticket::TABLE, Some(id), Trashed::Exclude).await?;

        let user_id = v.required_integer("user_id");
        v.exists(pool, "user_id", User::TABLE, Some(user_id), Trashed::Include).await?;

        let ticket_status_id = v.required_integer("ticket_status_id");
        v.exists(pool, "ticket_status_id", TicketStatus::TABLE, Some(ticket_status_id), Trashed::Include).await?;

        let details = ticket_details(&mut v);
        v.finish()?;

        Ok(Self { id, user_id, ticket_status_id, details })
    }
}

/// DELETE /api/tickets/{id}
#[derive(Debug, Clone)]
pub struct TicketDeleteRequest {
    pub id: i64,
}

impl TicketDeleteRequest {
    pub async fn validate(pool: &PgPool, payload: &Map<String, Value>) -> Result<Self, ApiError> {
        let mut v = Validator::new(payload);
        let id = v.required_integer("id");
        v.exists(pool, "id", Ticket::TABLE, Some(id), Trashed::Exclude).await?;
        v.finish()?;
        Ok(Self { id })
    }
}

fn ticket_details(v: &mut Validator<'_>) -> TicketDetails {
    Ticket::LIKE_FILTER_FIELDS
        .into_iter()
        .filter_map(|field| v.nullable_text(field, MAX_DETAIL_LENGTH).map(|value| (field, value)))
        .collect()
}
