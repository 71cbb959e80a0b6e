//! Axum REST handlers over the indexed event store.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db;
use crate::errors::ErrorBody;
use crate::events::{EventKind, EventRecord};
use crate::summary::ProjectSummary;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    pub project_id: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `?kind=funds_refunded` narrows `/events` to one stored event type.
#[derive(Debug, Deserialize)]
pub struct EventFilter {
    pub kind: Option<String>,
}

fn failure(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events`
pub async fn get_all_events(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<EventFilter>,
) -> Response {
    if let Some(kind) = filter.kind.as_deref() {
        if EventKind::from_stored(kind) == EventKind::Unknown && kind != "unknown" {
            return failure(StatusCode::BAD_REQUEST, format!("Unknown event kind: {kind}"));
        }
    }

    match db::get_all_events(&state.pool, filter.kind.as_deref()).await {
        Ok(events) => Json(AllEventsResponse {
            count: events.len(),
            events,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /projects/:id/events`
pub async fn get_project_events(
    State(state): State<Arc<ApiState>>,
    Path(project_id): Path<u64>,
) -> Response {
    let project_id = project_id.to_string();
    match db::get_events_for_project(&state.pool, &project_id).await {
        Ok(events) => Json(EventsResponse {
            project_id,
            count: events.len(),
            events,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /projects/:id/summary`
///
/// Totals folded from the project's events. A project with nothing indexed
/// yet is reported as not found.
pub async fn get_project_summary(
    State(state): State<Arc<ApiState>>,
    Path(project_id): Path<u64>,
) -> Response {
    let project_id = project_id.to_string();
    match db::get_events_for_project(&state.pool, &project_id).await {
        Ok(events) if events.is_empty() => failure(
            StatusCode::NOT_FOUND,
            format!("No events indexed for project {project_id}"),
        ),
        Ok(events) => Json(ProjectSummary::from_events(&project_id, &events)).into_response(),
        Err(e) => e.into_response(),
    }
}
