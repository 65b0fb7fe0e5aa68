//! Axum request handlers for the vitals REST API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, Utc};
use uuid::Uuid;
use vitalstream_core::VitalsRepository;

use crate::dto::*;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Service health check.
///
/// Always succeeds; reports the live WebSocket connection count and
/// process uptime.
#[tracing::instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        connected_clients: state.sessions().connection_count(),
        uptime_secs: state.uptime_secs(),
        timestamp: Utc::now(),
    })
}

/// Server identity and well-known endpoints.
#[tracing::instrument(skip(state))]
pub async fn server_info(State(state): State<AppState>) -> Json<ServerInfoResponse> {
    Json(ServerInfoResponse {
        service: "vitalstream-server",
        version: env!("CARGO_PKG_VERSION"),
        connected_clients: state.sessions().connection_count(),
        endpoints: EndpointList {
            health: "/health",
            status: "/api/v1/vitals/status",
            stream: "/ws/vitals",
        },
    })
}

/// List the subject roster.
#[tracing::instrument(skip(state))]
pub async fn list_subjects(State(state): State<AppState>) -> ApiResult<Json<SubjectListResponse>> {
    let subjects = state.repository().list_subjects().await?;
    let total = subjects.len();
    Ok(Json(SubjectListResponse { subjects, total }))
}

/// Register a subject so the fleet generator starts tracking it.
///
/// Omitting the id generates a fresh v4 UUID. Registering an existing
/// id returns the existing record.
#[tracing::instrument(skip(state, request))]
pub async fn register_subject(
    State(state): State<AppState>,
    Json(request): Json<RegisterSubjectRequest>,
) -> ApiResult<Json<vitalstream_core::SubjectRecord>> {
    let id = match request.id {
        Some(id) if id.trim().is_empty() => {
            return Err(ApiError::BadRequest("subject id must not be blank".into()));
        }
        Some(id) => id,
        None => Uuid::new_v4().to_string(),
    };
    let record = state.repository().register_subject(&id).await?;
    Ok(Json(record))
}

/// Combined system status: scheduler states plus storage counters.
///
/// Always returns 200. Scheduler status queries cannot fail; storage
/// counters degrade to zero when the repository cannot be queried.
#[tracing::instrument(skip(state))]
pub async fn system_status(State(state): State<AppState>) -> Json<SystemStatusResponse> {
    let repository = state.repository();

    let registered_subjects = repository.count_subjects().await.unwrap_or(0);
    let stored_readings = repository.count_readings().await.unwrap_or(0);

    Json(SystemStatusResponse {
        database_enabled: repository.enabled(),
        generator: state.generator().status(),
        retention: state.retention().status(),
        stats: SystemStats { registered_subjects, stored_readings },
        timestamp: Utc::now(),
    })
}

/// Per-subject reading history over a look-back window.
///
/// Returns 404 for a subject that was never registered.
#[tracing::instrument(skip(state))]
pub async fn subject_history(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    if query.hours <= 0 {
        return Err(ApiError::BadRequest("hours must be positive".into()));
    }

    let repository = state.repository();
    let known = repository
        .list_subjects()
        .await?
        .iter()
        .any(|s| s.id == subject_id);
    if !known {
        return Err(ApiError::subject_not_found(subject_id));
    }

    let since = Utc::now() - Duration::hours(query.hours);
    let data = repository.readings_for_subject(&subject_id, since).await?;

    Ok(Json(HistoryResponse {
        record_count: data.len(),
        time_range_hours: query.hours,
        subject_id,
        data,
    }))
}

/// Manually trigger a retention purge.
///
/// Runs the same purge as the scheduled path but surfaces failures to
/// the caller instead of only logging them.
#[tracing::instrument(skip(state))]
pub async fn trigger_cleanup(State(state): State<AppState>) -> ApiResult<Json<CleanupResponse>> {
    let deleted_count = state.retention().purge_now().await?;
    Ok(Json(CleanupResponse {
        success: true,
        deleted_count,
        timestamp: Utc::now(),
    }))
}
