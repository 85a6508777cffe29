use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use super::{RequestInfo, error_response, is_aborted, log_failure, take_attached_errors};

/// Answer the last failure a handler attached
///
/// Responses without attached failures, and responses another stage already
/// answered, pass through untouched.
pub async fn propagation_middleware(request: Request, next: Next) -> Response {
    let info = RequestInfo::from_request(&request);
    let mut response = next.run(request).await;

    if is_aborted(&response) {
        return response;
    }

    let Some(failure) = take_attached_errors(&mut response).pop() else {
        return response;
    };

    let classification = failure.classify();
    log_failure(&info, &failure, &classification, failure.kind());

    error_response(&classification)
}
