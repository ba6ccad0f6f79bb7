use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
};
use tower_http::trace::TraceLayer;
use tracing::{Span, field};

/// One `http_request` span per call; the status is recorded once the response is ready.
pub(crate) fn apply_trace(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    status = field::Empty,
                )
            })
            .on_response(|res: &Response<_>, latency: Duration, span: &Span| {
                let status = res.status();
                span.record("status", field::display(status));
                let latency_ms = latency.as_millis() as u64;
                if status.is_server_error() {
                    tracing::error!(%status, latency_ms, "request failed");
                } else {
                    tracing::info!(%status, latency_ms, "request finished");
                }
            }),
    )
}
