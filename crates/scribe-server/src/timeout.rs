use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use scribe_core::Failure;

use crate::dispatch::HandlerError;

/// Bound the time spent in the inner service
///
/// On expiry the inner future is dropped and an opaque failure is attached
/// for the propagation stage, which answers 500.
pub async fn timeout_middleware(State(limit): State<Duration>, request: Request, next: Next) -> Response {
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(elapsed) => {
            tracing::debug!(timeout = ?limit, "request deadline exceeded");
            HandlerError(Failure::unclassified(elapsed)).into_response()
        }
    }
}
