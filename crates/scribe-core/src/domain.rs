use std::borrow::Cow;

use http::StatusCode;
use thiserror::Error;

use crate::error::{HttpError, status_message};

/// Named failure conditions raised by the service and repository layers
///
/// The classifier maps each one to a fixed status and canonical message. The
/// `Display` text is for logs only and never reaches clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("internal server error")]
    InternalServerError,

    #[error("requested item was not found")]
    NotFound,

    #[error("item already exists")]
    Conflict,

    #[error("given param is not valid")]
    BadParamInput,
}

impl HttpError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::BadParamInput => StatusCode::BAD_REQUEST,
        }
    }

    fn client_message(&self) -> Cow<'static, str> {
        Cow::Borrowed(status_message(self.status_code()))
    }
}
