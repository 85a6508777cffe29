use http::StatusCode;
use scribe_core::AppError;

use crate::dispatch::HandlerError;

/// Unmatched paths answer through the dispatch pipeline
pub async fn not_found() -> HandlerError {
    AppError::NOT_FOUND.into()
}

pub async fn method_not_allowed() -> HandlerError {
    AppError::from_status(StatusCode::METHOD_NOT_ALLOWED).into()
}
