//12
use std::sync::Arc;

use axum::{response::IntoResponse, routing::{get, post}, Extension, Json, Router};
use validator::Validate;

use crate::{
    dtos::userdtos::{LoginUserDto, RegisterUserDto, Response, SessionData, UserResponseDto},
    error::HttpError,
    models::usermodel::UserRole,
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .auth_service
        .register(
            body.name,
            body.email,
            body.password,
            body.role.unwrap_or(UserRole::Customer),
        )
        .await?;

    Ok(Json(UserResponseDto::success(user)))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .auth_service
        .login(&body.email, &body.password)
        .await?;

    Ok(Json(UserResponseDto::success(user)))
}

pub async fn logout(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.auth_service.logout().await?;

    Ok(Json(Response {
        status: "success",
        message: "Logged out".to_string(),
    }))
}

pub async fn me(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let session = SessionData {
        user: app_state.auth_service.current_user().await,
        is_authenticated: app_state.auth_service.is_authenticated().await,
    };

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": session
    })))
}
