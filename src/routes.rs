// routes.rs
use std::sync::Arc;

use axum::{extract::Request, middleware::{self, Next}, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        auth::auth_handler,
        dashboard::{get_analytics, get_dashboard},
        knowledge::knowledge_handler,
        tickets::tickets_handler,
        users::{get_agents, get_users},
    },
    middleware::{auth, capability_check},
    service::access::{Action, Resource},
    AppState,
};

// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

/// Route guarded by `capability_check` for a fixed resource/action.
fn guarded(router: Router, resource: Resource, action: Action) -> Router {
    router.layer(middleware::from_fn(move |req: Request, next: Next| {
        capability_check(req, next, resource, action)
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .nest("/tickets", tickets_handler())
        .nest("/knowledge", knowledge_handler())
        .route("/dashboard", get(get_dashboard))
        .merge(guarded(
            Router::new().route("/analytics", get(get_analytics)),
            Resource::Analytics,
            Action::View,
        ))
        .merge(guarded(
            Router::new().route("/agents", get(get_agents)),
            Resource::Agents,
            Action::View,
        ))
        .merge(guarded(
            Router::new().route("/users", get(get_users)),
            Resource::Users,
            Action::View,
        ))
        .layer(middleware::from_fn(auth));

    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
