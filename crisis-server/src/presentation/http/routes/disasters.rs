use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::disasters::{get_stats, list_disasters};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/api/disasters", get(list_disasters))
        .route("/api/stats", get(get_stats))
}
