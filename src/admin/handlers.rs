use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::admin::AdminState;
use crate::breaker::{BreakerError, BreakerStats, HierarchyStats};
use crate::service::PARENT_BREAKER_NAME;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub breakers: usize,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        breakers: state.service.names().len(),
    })
}

pub async fn get_breakers(State(state): State<AdminState>) -> Json<HierarchyStats> {
    Json(state.service.stats())
}

pub async fn get_breaker(
    State(state): State<AdminState>,
    Path(name): Path<String>,
) -> Result<Json<BreakerStats>, (StatusCode, String)> {
    if name == PARENT_BREAKER_NAME {
        return Ok(Json(state.service.parent_stats()));
    }

    match state.service.breaker(&name) {
        Ok(breaker) => Ok(Json(breaker.stats())),
        Err(e @ BreakerError::NotFound { .. }) => Err((StatusCode::NOT_FOUND, e.to_string())),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}
