use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::SharedRepository;
use shared_models::error::AppError;

use crate::models::{EmailLookupQuery, RegisterUserRequest, UserError};
use crate::services::UserService;

fn to_app_error(err: UserError) -> AppError {
    match err {
        UserError::Store(e) => AppError::from(e),
        UserError::ValidationError(msg) => AppError::ValidationError(msg),
    }
}

#[axum::debug_handler]
pub async fn register_user(
    State(repository): State<SharedRepository>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let user_service = UserService::new(Arc::clone(&repository));

    let user = user_service
        .register_user(request)
        .await
        .map_err(to_app_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "user": user,
            "message": "User registered successfully"
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_user(
    State(repository): State<SharedRepository>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user_service = UserService::new(Arc::clone(&repository));
    let user = user_service.get_user(&user_id).await.map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "user": user,
    })))
}

#[axum::debug_handler]
pub async fn lookup_user(
    State(repository): State<SharedRepository>,
    Query(query): Query<EmailLookupQuery>,
) -> Result<Json<Value>, AppError> {
    let email = query
        .email
        .ok_or_else(|| AppError::BadRequest("Missing email query parameter".to_string()))?;

    let user_service = UserService::new(Arc::clone(&repository));
    let user = user_service.find_by_email(&email).await.map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "user": user,
    })))
}
