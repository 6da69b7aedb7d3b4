use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use super::AppState;
use crate::infrastructure::database;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

pub(crate) fn routes(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .merge(routes::router(state.clone()))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthzResponse {
    status: &'static str,
    database: &'static str,
}

async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthzResponse>) {
    if database::ping(&state.pool).await {
        (
            StatusCode::OK,
            Json(HealthzResponse {
                status: "ok",
                database: "up",
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthzResponse {
                status: "degraded",
                database: "down",
            }),
        )
    }
}
