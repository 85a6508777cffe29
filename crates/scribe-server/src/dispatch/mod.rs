//! Error dispatch pipeline
//!
//! Handlers never write error bodies themselves. They attach a [`Failure`] to
//! an otherwise empty response and the two stages here turn it into exactly
//! one JSON [`ErrorResponse`](scribe_core::ErrorResponse):
//!
//! - [`recovery_middleware`] catches panics from everything inside it.
//! - [`propagation_middleware`] answers the last failure a handler attached.
//!
//! Recovery must wrap propagation so a panic inside propagation is caught too.

mod propagation;
mod recovery;
mod request_info;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use scribe_article::ArticleError;
use scribe_core::{AppError, BindingError, Classification, DomainError, Failure, Severity};

pub use propagation::propagation_middleware;
pub use recovery::recovery_middleware;
pub use request_info::RequestInfo;

/// Failures attached to a response, in attachment order
#[derive(Debug, Clone, Default)]
struct AttachedErrors(Vec<Failure>);

/// Marker set once an error body has been written
///
/// Any outer stage seeing it leaves the response alone.
#[derive(Debug, Clone, Copy)]
pub struct ChainAborted;

/// Record a failure on `response` for the propagation stage to answer
pub fn attach_error(response: &mut Response, failure: impl Into<Failure>) {
    let failure = failure.into();

    if let Some(errors) = response.extensions_mut().get_mut::<AttachedErrors>() {
        errors.0.push(failure);
    } else {
        response.extensions_mut().insert(AttachedErrors(vec![failure]));
    }
}

/// Most recently attached failure, if any
pub fn last_attached_error(response: &Response) -> Option<&Failure> {
    response.extensions().get::<AttachedErrors>().and_then(|errors| errors.0.last())
}

/// Whether a stage already wrote the error body for this response
pub fn is_aborted(response: &Response) -> bool {
    response.extensions().get::<ChainAborted>().is_some()
}

fn take_attached_errors(response: &mut Response) -> Vec<Failure> {
    response.extensions_mut().remove::<AttachedErrors>().map(|errors| errors.0).unwrap_or_default()
}

/// Write the JSON body for a classification and mark the chain aborted
pub fn error_response(classification: &Classification) -> Response {
    let mut response = (classification.status, Json(classification.to_response())).into_response();
    response.extensions_mut().insert(ChainAborted);
    response
}

/// Emit the single log event for a classified failure
pub(crate) fn log_failure(info: &RequestInfo, failure: &Failure, classification: &Classification, message: &str) {
    let status = classification.status.as_u16();

    match classification.severity {
        Severity::Warn => tracing::warn!(
            method = %info.method,
            uri = %info.uri,
            client_addr = %info.client_addr,
            user_agent = %info.user_agent,
            status,
            error = %failure,
            "{message}"
        ),
        Severity::Error => tracing::error!(
            method = %info.method,
            uri = %info.uri,
            client_addr = %info.client_addr,
            user_agent = %info.user_agent,
            status,
            error = %failure,
            "{message}"
        ),
    }
}

/// Error returned by handlers
///
/// Converts into an empty response carrying the failure; the body is written
/// by [`propagation_middleware`].
#[derive(Debug)]
pub struct HandlerError(pub Failure);

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        attach_error(&mut response, self.0);
        response
    }
}

impl From<Failure> for HandlerError {
    fn from(failure: Failure) -> Self {
        Self(failure)
    }
}

impl From<AppError> for HandlerError {
    fn from(error: AppError) -> Self {
        Self(error.into())
    }
}

impl From<DomainError> for HandlerError {
    fn from(error: DomainError) -> Self {
        Self(error.into())
    }
}

impl From<BindingError> for HandlerError {
    fn from(error: BindingError) -> Self {
        Self(error.into())
    }
}

impl From<ArticleError> for HandlerError {
    fn from(error: ArticleError) -> Self {
        Self(error.into())
    }
}

impl From<JsonRejection> for HandlerError {
    fn from(rejection: JsonRejection) -> Self {
        BindingError::new(rejection.body_text()).into()
    }
}

impl From<QueryRejection> for HandlerError {
    fn from(rejection: QueryRejection) -> Self {
        BindingError::new(rejection.body_text()).into()
    }
}

impl From<PathRejection> for HandlerError {
    fn from(rejection: PathRejection) -> Self {
        BindingError::new(rejection.body_text()).into()
    }
}
