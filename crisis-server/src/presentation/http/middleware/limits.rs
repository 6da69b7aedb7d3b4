use std::time::Duration;

use axum::{
    BoxError, Json, Router, error_handling::HandleErrorLayer, extract::DefaultBodyLimit,
    http::StatusCode,
};
use tower::ServiceBuilder;
use tower::timeout::error::Elapsed;

use crate::infrastructure::settings::Settings;
use crate::presentation::http::app_error::ErrorBody;

pub(crate) fn apply_limits(router: Router, settings: &Settings) -> Router {
    router
        .layer(DefaultBodyLimit::max(settings.http_request_body_limit_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(Duration::from_secs(settings.http_request_timeout_secs)),
        )
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<ErrorBody>) {
    let (status, message) = if err.is::<Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "request timed out")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
    };

    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
            field: None,
        }),
    )
}
