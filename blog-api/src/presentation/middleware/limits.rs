use std::time::Duration;

use axum::{BoxError, Json, Router, error_handling::HandleErrorLayer, http::StatusCode};
use tower::ServiceBuilder;
use tower::timeout::{TimeoutLayer, error::Elapsed};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, warn};

use crate::presentation::app_error::ErrorBody;

/// Caps request bodies at `body_limit_bytes` and answers 408 once `timeout` elapses.
pub(crate) fn apply_limits(router: Router, body_limit_bytes: usize, timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .layer(TimeoutLayer::new(timeout))
            .layer(RequestBodyLimitLayer::new(body_limit_bytes)),
    )
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<ErrorBody>) {
    if err.is::<Elapsed>() {
        warn!("request timed out");
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorBody {
                error: "request timed out".to_string(),
                fields: None,
            }),
        );
    }

    error!(error = %err, "middleware failure");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "internal error".to_string(),
            fields: None,
        }),
    )
}
