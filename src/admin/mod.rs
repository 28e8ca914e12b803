//! Admin API.
//!
//! # Endpoints
//! - `GET /admin/status`: version and breaker count
//! - `GET /admin/breakers`: parent and child breaker statistics
//! - `GET /admin/breakers/{name}`: one breaker (404 when unregistered)
//!
//! All endpoints require `Authorization: Bearer <api_key>`.

pub mod handlers;
pub mod auth;

use axum::{
    routing::get,
    Router,
    middleware,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::service::HierarchyBreakerService;
use self::handlers::*;
use self::auth::admin_auth_middleware;

/// State injected into admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub service: HierarchyBreakerService,
    pub api_key: Arc<str>,
}

impl AdminState {
    pub fn new(service: HierarchyBreakerService, api_key: impl Into<Arc<str>>) -> Self {
        Self {
            service,
            api_key: api_key.into(),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/breakers", get(get_breakers))
        .route("/admin/breakers/{name}", get(get_breaker))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the admin API until shutdown is signalled.
pub async fn serve(
    listener: TcpListener,
    state: AdminState,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Admin API listening");

    axum::serve(listener, setup_admin_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("Admin API stopped");
    Ok(())
}
