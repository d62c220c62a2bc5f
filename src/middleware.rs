//9
use std::sync::Arc;

use axum::{
    extract::Request,
    middleware::Next,
    response::IntoResponse,
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ErrorMessage, HttpError},
    models::usermodel::User,
    service::access::{can, Action, Resource},
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// Rejects the request unless a session is active, then exposes the
/// session user to handlers as an `AuthenticatedUser` extension.
pub async fn auth(
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .auth_service
        .current_user()
        .await
        .ok_or_else(|| {
            HttpError::unauthorized(ErrorMessage::UserNotAuthenticated.to_string())
        })?;

    req.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(req).await)
}

pub async fn capability_check(
    req: Request,
    next: Next,
    resource: Resource,
    action: Action,
) -> Result<impl IntoResponse, HttpError> {
    let auth = req
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| {
            HttpError::unauthorized(ErrorMessage::UserNotAuthenticated.to_string())
        })?;

    if !can(auth.user.role, resource, action) {
        tracing::warn!(
            "{} ({}) denied {:?} on {:?}",
            auth.user.email,
            auth.user.role.to_str(),
            action,
            resource
        );
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    Ok(next.run(req).await)
}
