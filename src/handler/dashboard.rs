use std::sync::Arc;

use axum::{extract::Query, response::IntoResponse, Extension, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    error::HttpError,
    middleware::AuthenticatedUser,
    service::{
        access,
        analytics::{self, TimeRange},
    },
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQueryDto {
    pub range: Option<TimeRange>,
}

pub async fn get_dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, HttpError> {
    let all_tickets = app_state.ticket_service.list_tickets().await;
    let badge = analytics::navigation_badge(&auth.user, &all_tickets);

    let visible = access::visible_tickets(&auth.user, all_tickets);
    let summary = analytics::dashboard(&visible);

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "summary": summary,
            "navigationBadge": badge
        }
    })))
}

pub async fn get_analytics(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(params): Query<AnalyticsQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let tickets = app_state.ticket_service.list_tickets().await;
    let report = analytics::analytics(&tickets, params.range.unwrap_or_default(), Utc::now());

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": report
    })))
}
