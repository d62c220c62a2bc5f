use std::sync::Arc;

use axum::{extract::Query, response::IntoResponse, Extension, Json};

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::UserQueryDto,
    error::HttpError,
    AppState,
};

// Admin user directory
pub async fn get_users(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(params): Query<UserQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let users = app_state
        .db_client
        .get_users(params.search.as_deref(), params.role)
        .await;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "users": users,
            "total": users.len()
        }
    })))
}

pub async fn get_agents(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let agents = app_state.ticket_service.get_agents().await;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": agents
    })))
}
