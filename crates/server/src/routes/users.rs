//! `UserService` RPC handlers.
//!
//! Every handler answers 200 with a tagged body: exactly one success payload
//! or one structured error. Calls that hash or verify a password run on the
//! blocking pool.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{
    AuthenticateUserRequest, CreateUserRequest, EmailCheck, UpdateUserRequest, User,
    UsernameCheck,
};
use crate::services::DirectoryError;
use crate::services::directory::{AuthenticationError, NotFoundError, ValidationError};
use crate::state::AppState;

// ============================================================================
// Request / Response Records
// ============================================================================

/// Request to fetch a user.
#[derive(Debug, Deserialize)]
pub struct GetUserRequest {
    #[serde(default)]
    pub id: String,
}

/// Request to check an email.
#[derive(Debug, Deserialize)]
pub struct ValidateEmailRequest {
    #[serde(default)]
    pub email: String,
}

/// Request to check a username.
#[derive(Debug, Deserialize)]
pub struct CheckUsernameRequest {
    #[serde(default)]
    pub username: String,
}

/// Response of `CreateUser`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateUserResponse {
    User(User),
    Error(ValidationError),
}

/// Response of `GetUser`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GetUserResponse {
    User(User),
    Error(NotFoundError),
}

/// Response of `UpdateUser`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateUserResponse {
    User(User),
    NotFoundError(NotFoundError),
    ValidationError(ValidationError),
}

/// Response of `AuthenticateUser`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticateUserResponse {
    User(User),
    Error(AuthenticationError),
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /user.v1.UserService/CreateUser
///
/// # Errors
///
/// Returns `AppError` if hashing fails or the worker dies.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>> {
    let directory = state.directory_handle();
    let result = tokio::task::spawn_blocking(move || directory.create_user(&request)).await?;

    let response = match result {
        Ok(user) => CreateUserResponse::User(user),
        Err(DirectoryError::Validation(err)) => CreateUserResponse::Error(err),
        Err(other) => return Err(other.into()),
    };
    Ok(Json(response))
}

/// POST /user.v1.UserService/GetUser
///
/// # Errors
///
/// Returns `AppError` only for faults the directory does not model.
pub async fn get_user(
    State(state): State<AppState>,
    Json(request): Json<GetUserRequest>,
) -> Result<Json<GetUserResponse>> {
    let response = match state.directory().get_user(&request.id) {
        Ok(user) => GetUserResponse::User(user),
        Err(DirectoryError::NotFound(err)) => GetUserResponse::Error(err),
        Err(other) => return Err(other.into()),
    };
    Ok(Json(response))
}

/// POST /user.v1.UserService/UpdateUser
///
/// # Errors
///
/// Returns `AppError` only for faults the directory does not model.
pub async fn update_user(
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UpdateUserResponse>> {
    let response = match state.directory().update_user(&request) {
        Ok(user) => UpdateUserResponse::User(user),
        Err(DirectoryError::NotFound(err)) => UpdateUserResponse::NotFoundError(err),
        Err(DirectoryError::Validation(err)) => UpdateUserResponse::ValidationError(err),
        Err(other) => return Err(other.into()),
    };
    Ok(Json(response))
}

/// POST /user.v1.UserService/ValidateEmail
pub async fn validate_email(
    State(state): State<AppState>,
    Json(request): Json<ValidateEmailRequest>,
) -> Json<EmailCheck> {
    Json(state.directory().validate_email(&request.email))
}

/// POST /user.v1.UserService/CheckUsername
pub async fn check_username(
    State(state): State<AppState>,
    Json(request): Json<CheckUsernameRequest>,
) -> Json<UsernameCheck> {
    Json(state.directory().check_username(&request.username))
}

/// POST /user.v1.UserService/AuthenticateUser
///
/// # Errors
///
/// Returns `AppError` if the worker dies.
pub async fn authenticate_user(
    State(state): State<AppState>,
    Json(request): Json<AuthenticateUserRequest>,
) -> Result<Json<AuthenticateUserResponse>> {
    let directory = state.directory_handle();
    let result = tokio::task::spawn_blocking(move || directory.authenticate(&request)).await?;

    let response = match result {
        Ok(user) => AuthenticateUserResponse::User(user),
        Err(DirectoryError::Authentication(err)) => AuthenticateUserResponse::Error(err),
        Err(other) => return Err(other.into()),
    };
    Ok(Json(response))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_response_tags() {
        let json = serde_json::to_value(UpdateUserResponse::NotFoundError(NotFoundError::user(
            "missing",
        )))
        .unwrap();
        assert_eq!(
            json["not_found_error"]["message"],
            "User not found with id: missing"
        );

        let json = serde_json::to_value(UpdateUserResponse::ValidationError(
            ValidationError::new(Vec::new()),
        ))
        .unwrap();
        assert_eq!(json["validation_error"]["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn test_authenticate_response_error_tag() {
        let json = serde_json::to_value(AuthenticateUserResponse::Error(
            AuthenticationError::invalid_credentials(),
        ))
        .unwrap();
        assert_eq!(json["error"]["code"], "INVALID_CREDENTIALS");
        assert!(json.get("user").is_none());
    }
}
