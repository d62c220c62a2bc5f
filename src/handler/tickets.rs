// src/handler/tickets.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    dtos::ticketdtos::*,
    error::{ErrorMessage, HttpError},
    middleware::AuthenticatedUser,
    models::ticketmodel::Ticket,
    service::{
        access::{self, Action, Resource},
        error::ServiceError,
    },
    AppState,
};

pub fn tickets_handler() -> Router {
    Router::new()
        .route("/", get(get_tickets).post(create_ticket))
        .route("/:ticket_id", get(get_ticket))
        .route("/:ticket_id/status", put(update_ticket_status))
        .route("/:ticket_id/assign", put(assign_ticket))
        .route("/:ticket_id/comments", get(get_comments).post(add_comment))
        .route("/:ticket_id/resolution", put(update_resolution))
        .route("/:ticket_id/solution", put(link_solution))
}

/// Load a ticket and make sure the caller may look at it.
async fn load_visible_ticket(
    app_state: &AppState,
    auth: &AuthenticatedUser,
    ticket_id: &str,
) -> Result<Ticket, HttpError> {
    let ticket = app_state
        .ticket_service
        .get_ticket_by_id(ticket_id)
        .await
        .ok_or_else(|| HttpError::not_found(ErrorMessage::TicketNotFound.to_string()))?;

    if !access::can_view_ticket(&auth.user, &ticket) {
        return Err(HttpError::forbidden("Not authorized to access this ticket"));
    }

    Ok(ticket)
}

pub async fn get_tickets(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(params): Query<TicketQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let statuses = params.statuses().map_err(HttpError::bad_request)?;
    let priorities = params.priorities().map_err(HttpError::bad_request)?;

    let tickets = app_state
        .ticket_service
        .filter_tickets(
            Some(statuses.as_slice()),
            Some(priorities.as_slice()),
            params.search.as_deref(),
        )
        .await;
    let tickets = access::visible_tickets(&auth.user, tickets);

    tracing::debug!("{} tickets listed for {}", tickets.len(), auth.user.email);

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "tickets": tickets,
            "total": tickets.len()
        }
    })))
}

pub async fn create_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(body): Json<CreateTicketDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;
    access::require(&auth.user, Resource::Ticket, Action::Create)?;

    let ticket = app_state
        .ticket_service
        .create_ticket(
            Some(&auth.user),
            body.title,
            body.description,
            body.category,
            body.priority,
        )
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": ticket
    })))
}

pub async fn get_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = load_visible_ticket(&app_state, &auth, &ticket_id).await?;

    let linked_solution = match ticket
        .resolution
        .as_ref()
        .and_then(|r| r.solution_id.as_deref())
    {
        Some(solution_id) => app_state
            .ticket_service
            .list_knowledge_base()
            .await
            .into_iter()
            .find(|item| item.id == solution_id),
        None => None,
    };

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "ticket": ticket,
            "linkedSolution": linked_solution
        }
    })))
}

pub async fn update_ticket_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
    Json(body): Json<UpdateTicketStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = load_visible_ticket(&app_state, &auth, &ticket_id).await?;

    if !access::can_update_status(&auth.user, &ticket) {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    let ticket = app_state
        .ticket_service
        .update_ticket_status(&ticket_id, body.status)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": ticket
    })))
}

pub async fn assign_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
    Json(body): Json<AssignTicketDto>,
) -> Result<impl IntoResponse, HttpError> {
    access::require(&auth.user, Resource::Ticket, Action::Assign)?;

    let agent_id = body.agent_id.unwrap_or_else(|| auth.user.id.clone());
    if !access::can_assign_to(&auth.user, &agent_id) {
        return Err(HttpError::forbidden("Agents can only assign tickets to themselves"));
    }

    let agent = app_state
        .ticket_service
        .get_agents()
        .await
        .into_iter()
        .find(|a| a.id == agent_id)
        .ok_or_else(|| ServiceError::Validation(format!("No agent with ID {}", agent_id)))?;

    let ticket = app_state
        .ticket_service
        .assign_ticket(&ticket_id, &agent.id, &agent.name)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": ticket
    })))
}

pub async fn get_comments(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = load_visible_ticket(&app_state, &auth, &ticket_id).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": ticket.comments
    })))
}

pub async fn add_comment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
    Json(body): Json<CreateCommentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;
    access::require(&auth.user, Resource::Comment, Action::Create)?;

    load_visible_ticket(&app_state, &auth, &ticket_id).await?;

    let comment = app_state
        .ticket_service
        .add_comment(Some(&auth.user), &ticket_id, body.content)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": comment
    })))
}

pub async fn update_resolution(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
    Json(body): Json<UpdateResolutionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;
    access::require(&auth.user, Resource::Resolution, Action::Update)?;

    let ticket = app_state
        .ticket_service
        .update_resolution(&ticket_id, body.stage, body.notes)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": ticket
    })))
}

pub async fn link_solution(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
    Json(body): Json<LinkSolutionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;
    access::require(&auth.user, Resource::Resolution, Action::Update)?;

    let ticket = app_state
        .ticket_service
        .link_solution_to_ticket(&ticket_id, &body.solution_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": ticket
    })))
}
