use std::sync::Arc;
use std::time::Duration;

use axum::{extract::Query, http::Uri, response::Json, Extension};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::api::rest::dto::{ApiResponse, HealthDto, UserRecordDto, UserViewDto, ViewQuery};
use crate::api::rest::error::{map_domain_error, ProblemResponse};
use crate::contract::model::{Statistics, UserRecord};
use crate::domain::engine::EngineConfig;
use crate::domain::view::derive;

/// Shared state behind the users API. The record set is fixed at startup and
/// only read afterwards, so requests share it without locking.
#[derive(Debug)]
pub struct UsersApiState {
    records: Vec<UserRecord>,
    view_defaults: EngineConfig,
    latency: Duration,
}

impl UsersApiState {
    pub fn new(records: Vec<UserRecord>, view_defaults: EngineConfig, latency: Duration) -> Self {
        Self {
            records,
            view_defaults,
            latency,
        }
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }
}

/// `GET /api/users`: the full set, after the configured latency.
pub async fn list_users(
    Extension(state): Extension<Arc<UsersApiState>>,
) -> Json<ApiResponse<Vec<UserRecordDto>>> {
    if !state.latency.is_zero() {
        debug!(latency_ms = state.latency.as_millis() as u64, "simulating slow backend");
        tokio::time::sleep(state.latency).await;
    }

    let users: Vec<UserRecordDto> = state
        .records()
        .iter()
        .cloned()
        .map(UserRecordDto::from)
        .collect();
    let count = users.len();
    info!(count, "Listing users");
    Json(ApiResponse::ok(users, count))
}

/// `GET /api/health`
pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        success: true,
        message: "API is running".to_string(),
        timestamp: Utc::now(),
    })
}

/// `GET /api/users/view`: one page of the filtered, sorted set.
pub async fn users_view(
    Extension(state): Extension<Arc<UsersApiState>>,
    Query(query): Query<ViewQuery>,
    uri: Uri,
) -> Result<Json<UserViewDto>, ProblemResponse> {
    info!("Deriving users view with query: {:?}", query);

    let view = query.to_view_state(&state.view_defaults).map_err(|e| {
        warn!("Rejected users view query: {}", e);
        map_domain_error(&e, uri.path())
    })?;

    let derived = derive(state.records(), &view);
    Ok(Json(UserViewDto::new(&derived, Statistics::of(state.records()))))
}
