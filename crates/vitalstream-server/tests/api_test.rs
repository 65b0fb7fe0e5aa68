//! Handler-level integration tests for the REST API.
//!
//! These construct the shared state directly and invoke the handlers
//! with their extractors, covering the status, roster, history and
//! cleanup surfaces without binding a socket.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Duration as ChronoDuration, Utc};

use vitalstream_core::SubjectState;
use vitalstream_server::dto::{HistoryQuery, RegisterSubjectRequest};
use vitalstream_server::handlers;
use vitalstream_server::{ApiError, AppState};

fn aged_reading(state: &AppState, subject_id: &str, minutes_old: i64) {
    let reading = SubjectState::from_identity(subject_id).snapshot(subject_id);
    state
        .repository()
        .insert_aged(reading, Utc::now() - ChronoDuration::minutes(minutes_old));
}

#[tokio::test]
async fn health_reports_ok_and_zero_clients() {
    let state = AppState::new();
    let Json(body) = handlers::health(State(state)).await;
    assert_eq!(body.status, "ok");
    assert_eq!(body.connected_clients, 0);
}

#[tokio::test]
async fn server_info_lists_endpoints() {
    let state = AppState::new();
    let Json(body) = handlers::server_info(State(state)).await;
    assert_eq!(body.service, "vitalstream-server");
    assert_eq!(body.endpoints.stream, "/ws/vitals");
}

#[tokio::test]
async fn register_and_list_roster() {
    let state = AppState::new();

    let Json(record) = handlers::register_subject(
        State(state.clone()),
        Json(RegisterSubjectRequest { id: Some("patient-1".into()) }),
    )
    .await
    .unwrap();
    assert_eq!(record.id, "patient-1");

    // Omitted id generates one.
    let Json(generated) = handlers::register_subject(
        State(state.clone()),
        Json(RegisterSubjectRequest { id: None }),
    )
    .await
    .unwrap();
    assert!(!generated.id.is_empty());

    let Json(roster) = handlers::list_subjects(State(state)).await.unwrap();
    assert_eq!(roster.total, 2);
}

#[tokio::test]
async fn blank_subject_id_is_rejected() {
    let state = AppState::new();
    let err = handlers::register_subject(
        State(state),
        Json(RegisterSubjectRequest { id: Some("   ".into()) }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[tokio::test]
async fn status_always_succeeds_and_reflects_schedulers() {
    let state = AppState::new();
    let Json(body) = handlers::system_status(State(state.clone())).await;
    assert!(body.database_enabled);
    assert!(!body.generator.running);
    assert!(!body.retention.running);
    assert_eq!(body.stats.registered_subjects, 0);

    state.start_schedulers();
    let Json(body) = handlers::system_status(State(state.clone())).await;
    assert!(body.generator.running);
    assert!(body.retention.running);
    state.stop_schedulers();
}

#[tokio::test]
async fn history_returns_window_for_known_subject() {
    let state = AppState::new();
    handlers::register_subject(
        State(state.clone()),
        Json(RegisterSubjectRequest { id: Some("patient-1".into()) }),
    )
    .await
    .unwrap();

    aged_reading(&state, "patient-1", 10);
    aged_reading(&state, "patient-1", 30);
    aged_reading(&state, "patient-1", 200);

    let Json(body) = handlers::subject_history(
        State(state),
        Path("patient-1".to_string()),
        Query(HistoryQuery { hours: 1 }),
    )
    .await
    .unwrap();

    assert_eq!(body.subject_id, "patient-1");
    assert_eq!(body.record_count, 2);
    assert_eq!(body.time_range_hours, 1);
}

#[tokio::test]
async fn history_404s_for_unknown_subject() {
    let state = AppState::new();
    let err = handlers::subject_history(
        State(state),
        Path("ghost".to_string()),
        Query(HistoryQuery { hours: 1 }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[tokio::test]
async fn history_rejects_non_positive_hours() {
    let state = AppState::new();
    let err = handlers::subject_history(
        State(state),
        Path("patient-1".to_string()),
        Query(HistoryQuery { hours: 0 }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[tokio::test]
async fn cleanup_deletes_expired_rows_and_reports_count() {
    let state = AppState::new();
    aged_reading(&state, "patient-1", 30);
    aged_reading(&state, "patient-1", 90);
    aged_reading(&state, "patient-2", 200);

    let Json(body) = handlers::trigger_cleanup(State(state.clone())).await.unwrap();
    assert!(body.success);
    assert_eq!(body.deleted_count, 2);

    // A second purge has nothing left to remove.
    let Json(body) = handlers::trigger_cleanup(State(state)).await.unwrap();
    assert_eq!(body.deleted_count, 0);
}

#[tokio::test]
async fn cleanup_surfaces_repository_failure() {
    let state = AppState::new();
    state.repository().set_fail_writes(true);
    let err = handlers::trigger_cleanup(State(state)).await.unwrap_err();
    assert!(matches!(err, ApiError::Internal(_)));
}

#[tokio::test]
async fn generator_cycle_feeds_history_endpoint() {
    let state = AppState::new();
    handlers::register_subject(
        State(state.clone()),
        Json(RegisterSubjectRequest { id: Some("patient-1".into()) }),
    )
    .await
    .unwrap();

    state.generator().run_cycle().await;

    let Json(body) = handlers::subject_history(
        State(state),
        Path("patient-1".to_string()),
        Query(HistoryQuery { hours: 1 }),
    )
    .await
    .unwrap();
    assert_eq!(body.record_count, 1);

    let mut expected = SubjectState::from_identity("patient-1");
    expected.tick();
    let expected = expected.snapshot("patient-1");
    assert_eq!(body.data[0].heart_rate, expected.heart_rate);
    assert_eq!(body.data[0].spo2, expected.spo2);
}
