//! Request and response types for the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vitalstream_core::{GeneratorStatus, RetentionStatus, SubjectRecord, VitalsReading};

/// `GET /health` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub connected_clients: usize,
    pub uptime_secs: u64,
    pub timestamp: DateTime<Utc>,
}

/// `GET /` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub connected_clients: usize,
    pub endpoints: EndpointList,
}

/// Well-known endpoints advertised by the server info response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointList {
    pub health: &'static str,
    pub status: &'static str,
    pub stream: &'static str,
}

/// `GET /api/v1/vitals/status` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatusResponse {
    pub database_enabled: bool,
    pub generator: GeneratorStatus,
    pub retention: RetentionStatus,
    pub stats: SystemStats,
    pub timestamp: DateTime<Utc>,
}

/// Storage counters included in the status response.
///
/// Zero when the counts cannot be fetched; the status endpoint never
/// fails.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub registered_subjects: u64,
    pub stored_readings: u64,
}

/// `GET /api/v1/subjects` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectListResponse {
    pub subjects: Vec<SubjectRecord>,
    pub total: usize,
}

/// `POST /api/v1/subjects` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSubjectRequest {
    /// Identity to register; a v4 UUID is generated when omitted.
    pub id: Option<String>,
}

/// Query parameters for the per-subject history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Look-back window in hours, default 1.
    #[serde(default = "default_hours")]
    pub hours: i64,
}

fn default_hours() -> i64 {
    1
}

/// `GET /api/v1/vitals/:subject_id` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub subject_id: String,
    pub record_count: usize,
    pub time_range_hours: i64,
    pub data: Vec<VitalsReading>,
}

/// `POST /api/v1/vitals/cleanup` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub success: bool,
    pub deleted_count: u64,
    pub timestamp: DateTime<Utc>,
}

/// Query parameters accepted by the WebSocket stream endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamQuery {
    /// Upstream identity used to seed the stream; falls back to the
    /// connection id when absent.
    pub subject_id: Option<String>,
}
