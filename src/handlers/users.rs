// handlers/users.rs - /api/users[/:id] handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::api::{ResourceCollection, UserResource};
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::routes::AppState;
use crate::services::UserService;
use crate::validation::{payload_object, with_route_id, UserDeleteRequest, UserStoreRequest, UserUpdateRequest};

/// GET /api/users - every live user, unpaginated
pub async fn index(State(state): State<AppState>) -> ApiResult<ResourceCollection<UserResource>> {
    let users = UserService::new(state.pool).list().await?;
    Ok(ApiResponse::success(users))
}

/// POST /api/users
pub async fn store(State(state): State<AppState>, body: Option<Json<Value>>) -> ApiResult<UserResource> {
    let payload = payload_object(body.map(|Json(v)| v));
    let request = UserStoreRequest::validate(&state.pool, &payload).await?;

    let user = UserService::new(state.pool).create(request).await?;
    Ok(ApiResponse::success_with(Some(user), 200, "User created successfully"))
}

/// GET /api/users/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<UserResource> {
    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|_| ApiError::not_found(format!("No query results for {} {}", User::TABLE, id)))?;

    let user = UserService::new(state.pool).show(id).await?;
    Ok(ApiResponse::success(user))
}

/// PUT|PATCH /api/users/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> ApiResult<UserResource> {
    let payload = with_route_id(payload_object(body.map(|Json(v)| v)), &id);
    let request = UserUpdateRequest::validate(&state.pool, &payload).await?;

    let user = UserService::new(state.pool).update(request).await?;
    Ok(ApiResponse::success_with(Some(user), 200, "User updated successfully"))
}

/// DELETE /api/users/:id
pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let payload = with_route_id(Default::default(), &id);
    let request = UserDeleteRequest::validate(&state.pool, &payload).await?;

    UserService::new(state.pool).delete(request.id).await?;
    Ok(ApiResponse::empty())
}
