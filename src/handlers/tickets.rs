// handlers/tickets.rs - /api/tickets[/:id] handlers

use axum::{
    extract::{OriginalUri, Path, Query, State},
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

use crate::api::{Paginated, TicketResource};
use crate::database::models::Ticket;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::routes::AppState;
use crate::services::TicketService;
use crate::validation::{
    payload_object, with_route_id, TicketDeleteRequest, TicketStoreRequest, TicketUpdateRequest,
};

/// GET /api/tickets - filtered, paginated listing
pub async fn index(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Paginated<TicketResource>> {
    let path = format!("{}{}", state.base_url, uri.path());
    let page = TicketService::new(state.pool).list(&params, &path).await?;
    Ok(ApiResponse::success(page))
}

/// POST /api/tickets
pub async fn store(State(state): State<AppState>, body: Option<Json<Value>>) -> ApiResult<TicketResource> {
    let payload = payload_object(body.map(|Json(v)| v));
    let request = TicketStoreRequest::validate(&state.pool, &payload).await?;

    let ticket = TicketService::new(state.pool).create(request).await?;
    Ok(ApiResponse::success_with(Some(ticket), 200, "Ticket created successfully"))
}

/// GET /api/tickets/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<TicketResource> {
    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|_| ApiError::not_found(format!("No query results for {} {}", Ticket::TABLE, id)))?;

    let ticket = TicketService::new(state.pool).show(id).await?;
    Ok(ApiResponse::success(ticket))
}

/// PUT|PATCH /api/tickets/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> ApiResult<TicketResource> {
    let payload = with_route_id(payload_object(body.map(|Json(v)| v)), &id);
    let request = TicketUpdateRequest::validate(&state.pool, &payload).await?;

    let ticket = TicketService::new(state.pool).update(request).await?;
    Ok(ApiResponse::success_with(Some(ticket), 200, "Ticket updated successfully"))
}

/// DELETE /api/tickets/:id
pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let payload = with_route_id(Default::default(), &id);
    let request = TicketDeleteRequest::validate(&state.pool, &payload).await?;

    TicketService::new(state.pool).delete(request.id).await?;
    Ok(ApiResponse::empty())
}
