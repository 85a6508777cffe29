use std::any::Any;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::DomainError;
use crate::error::AppError;

/// Any failure the dispatch pipeline can be asked to answer for
#[derive(Debug, Clone, Error)]
pub enum Failure {
    /// Call site pinned an exact status and message
    #[error(transparent)]
    App(#[from] AppError),

    /// Request extraction or validation failed before the handler could run
    #[error("binding error: {0}")]
    Binding(#[from] BindingError),

    /// Named domain condition from the service layer
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Everything else, including panic payloads that are not errors
    #[error(transparent)]
    Unclassified(#[from] Unclassified),
}

impl Failure {
    /// Wrap an arbitrary error without classifying it
    pub fn unclassified<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unclassified(Unclassified::Error(Arc::new(error)))
    }

    /// Convert a caught panic payload
    ///
    /// Payloads raised with [`std::panic::panic_any`] that are already part
    /// of the taxonomy keep their identity; string payloads and anything else
    /// become unclassified.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Self>() {
            Ok(failure) => return *failure,
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<AppError>() {
            Ok(error) => return Self::App(*error),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<DomainError>() {
            Ok(error) => return Self::Domain(*error),
            Err(payload) => payload,
        };

        let message = if let Some(message) = payload.downcast_ref::<&'static str>() {
            (*message).to_owned()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_owned()
        };

        Self::Unclassified(Unclassified::Panic(message))
    }

    /// Short label naming the failure class, used as the log message
    ///
    /// Unclassified failures wrapping a known error are labelled by what
    /// the chain resolves to.
    pub fn kind(&self) -> &'static str {
        let classification = match self {
            Self::Binding(_) => return "binding error",
            Self::Unclassified(Unclassified::Panic(_)) => return "unknown error",
            Self::Unclassified(Unclassified::Error(error)) => match crate::classify::wrapped(error.as_ref()) {
                Some(classification) => classification,
                None => return "unknown error",
            },
            Self::App(_) | Self::Domain(_) => self.classify(),
        };

        if classification.status.is_server_error() {
            "server error"
        } else {
            "client error"
        }
    }
}

/// Diagnostic produced by the request binding layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{diagnostic}")]
pub struct BindingError {
    diagnostic: String,
}

impl BindingError {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: diagnostic.into(),
        }
    }

    /// Raw message from the binder, passed through to the client
    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }
}

/// Failure with no recognised shape
#[derive(Debug, Clone)]
pub enum Unclassified {
    Error(Arc<dyn std::error::Error + Send + Sync + 'static>),
    Panic(String),
}

impl fmt::Display for Unclassified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(error) => fmt::Display::fmt(error, f),
            Self::Panic(message) => write!(f, "panicked: {message}"),
        }
    }
}

impl std::error::Error for Unclassified {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Error(error) => error.source(),
            Self::Panic(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;

    #[test]
    fn string_panics_become_unclassified() {
        let failure = Failure::from_panic(Box::new("boom"));
        assert!(matches!(failure, Failure::Unclassified(Unclassified::Panic(ref m)) if m == "boom"));

        let failure = Failure::from_panic(Box::new(String::from("formatted boom")));
        assert_eq!(failure.to_string(), "panicked: formatted boom");
    }

    #[test]
    fn typed_panics_keep_their_identity() {
        let failure = Failure::from_panic(Box::new(AppError::CONFLICT));
        assert!(matches!(failure, Failure::App(ref e) if e.code() == StatusCode::CONFLICT));

        let failure = Failure::from_panic(Box::new(DomainError::NotFound));
        assert!(matches!(failure, Failure::Domain(DomainError::NotFound)));

        let failure = Failure::from_panic(Box::new(Failure::from(BindingError::new("missing field"))));
        assert!(matches!(failure, Failure::Binding(_)));
    }

    #[test]
    fn opaque_panic_payload() {
        let failure = Failure::from_panic(Box::new(42_u32));
        assert_eq!(failure.to_string(), "panicked: non-string panic payload");
        assert_eq!(failure.kind(), "unknown error");
    }

    #[test]
    fn kind_follows_status() {
        assert_eq!(Failure::from(DomainError::NotFound).kind(), "client error");
        assert_eq!(Failure::from(DomainError::InternalServerError).kind(), "server error");
        assert_eq!(Failure::from(BindingError::new("eof")).kind(), "binding error");
    }

    #[test]
    fn wrapped_failures_are_labelled_by_their_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("lookup failed")]
        struct LookupFailed(#[source] DomainError);

        assert_eq!(Failure::unclassified(LookupFailed(DomainError::NotFound)).kind(), "client error");
        assert_eq!(Failure::unclassified(AppError::INTERNAL_SERVER_ERROR).kind(), "server error");
        assert_eq!(Failure::unclassified(std::io::Error::other("disk full")).kind(), "unknown error");
    }
}
