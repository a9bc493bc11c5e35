//! HTTP handlers for user account endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared::models::User;

use crate::error::AppResult;
use crate::services::user::{CreateUserInput, UpdateUserInput, UserService};
use crate::AppState;

pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let service = UserService::new(state.db);
    Ok(Json(service.list_users().await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let service = UserService::new(state.db);
    let user = service.create_user(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "user created", "user": user })),
    ))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = UserService::new(state.db);
    let user = service.get_user(user_id).await?;
    Ok(Json(json!({ "user": user })))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<Value>> {
    let service = UserService::new(state.db);
    let user = service.update_user(user_id, input).await?;
    Ok(Json(json!({ "msg": "user updated", "user": user })))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = UserService::new(state.db);
    service.delete_user(user_id).await?;
    Ok(Json(json!({ "msg": "user deleted" })))
}
