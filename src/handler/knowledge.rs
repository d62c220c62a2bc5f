use std::sync::Arc;

use axum::{
    extract::Query,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    dtos::knowledgedtos::{CreateKnowledgeItemDto, KnowledgeQueryDto},
    error::HttpError,
    middleware::AuthenticatedUser,
    service::access::{self, Action, Resource},
    AppState,
};

pub fn knowledge_handler() -> Router {
    Router::new().route("/", get(search_knowledge).post(add_knowledge_item))
}

pub async fn search_knowledge(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(params): Query<KnowledgeQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let items = app_state
        .ticket_service
        .search_knowledge_base(params.search.as_deref().unwrap_or_default(), params.category)
        .await;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": items
    })))
}

pub async fn add_knowledge_item(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(body): Json<CreateKnowledgeItemDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;
    access::require(&auth.user, Resource::KnowledgeBase, Action::Create)?;

    let tags = body.normalized_tags();
    let item = app_state
        .ticket_service
        .add_solution_to_knowledge_base(
            Some(&auth.user),
            body.title,
            body.content,
            body.category,
            tags,
        )
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": item
    })))
}
