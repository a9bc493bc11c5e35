//! Authentication handlers

use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::services::auth::{AuthService, TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH};
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<Value>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let (tokens, user) = auth_service.login(&body.username, &body.password).await?;

    Ok(Json(json!({
        "access_token": tokens.access_token,
        "refresh_token": tokens.refresh_token,
        "token_type": tokens.token_type,
        "expires_in": tokens.expires_in,
        "user": user,
    })))
}

/// Get an access token from a refresh token
pub async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Json<Value>> {
    let token = bearer_token(&headers)?;
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let (access_token, user) = auth_service.refresh(token).await?;

    Ok(Json(json!({
        "access_token": access_token,
        "user": user,
    })))
}

/// Revoke the presented access token
pub async fn revoke_access_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    let token = bearer_token(&headers)?;
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    auth_service.revoke(token, TOKEN_TYPE_ACCESS).await?;

    Ok(Json(json!({ "message": "token revoked" })))
}

/// Revoke the presented refresh token, used mainly for logout
pub async fn revoke_refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    let token = bearer_token(&headers)?;
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    auth_service.revoke(token, TOKEN_TYPE_REFRESH).await?;

    Ok(Json(json!({ "message": "token revoked" })))
}

fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))
}
