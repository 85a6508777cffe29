use std::borrow::Cow;

use http::StatusCode;

use crate::domain::DomainError;
use crate::error::{AppError, ErrorResponse, HttpError, status_message};
use crate::failure::{BindingError, Failure, Unclassified};

/// Log severity attached to a classified failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warn,
    Error,
}

impl Severity {
    /// `Error` for any status at or above 500, `Warn` otherwise
    pub fn for_status(status: StatusCode) -> Self {
        if status.as_u16() >= 500 { Self::Error } else { Self::Warn }
    }
}

/// Outcome of classifying one failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: StatusCode,
    pub message: Cow<'static, str>,
    pub details: Option<String>,
    pub severity: Severity,
}

impl Classification {
    /// Force `Error` severity, keeping the public projection untouched
    #[must_use]
    pub fn escalated(self) -> Self {
        Self {
            severity: Severity::Error,
            ..self
        }
    }

    /// Wire body for this classification
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.status.as_u16(),
            message: self.message.to_string(),
            details: self.details.clone(),
        }
    }
}

impl Failure {
    /// Classify this failure; see [`classify`]
    pub fn classify(&self) -> Classification {
        classify(self)
    }
}

/// Map a failure to its status, public message, details and severity
///
/// 1. An [`AppError`], directly or anywhere in a wrapped error chain, is used
///    verbatim.
/// 2. Binding failures answer 400 with the binder's diagnostic as details.
/// 3. Domain sentinels map to their fixed status and canonical message.
/// 4. Anything else answers a generic 500 with no details.
pub fn classify(failure: &Failure) -> Classification {
    match failure {
        Failure::App(error) => pinned(error),
        Failure::Binding(error) => binding(error),
        Failure::Domain(error) => pinned(error),
        Failure::Unclassified(Unclassified::Error(error)) => {
            wrapped(error.as_ref()).unwrap_or_else(unclassified)
        }
        Failure::Unclassified(Unclassified::Panic(_)) => unclassified(),
    }
}

fn pinned(error: &impl HttpError) -> Classification {
    let status = error.status_code();

    Classification {
        status,
        message: error.client_message(),
        details: error.details().filter(|d| !d.is_empty()).map(ToOwned::to_owned),
        severity: Severity::for_status(status),
    }
}

fn binding(error: &BindingError) -> Classification {
    let status = StatusCode::BAD_REQUEST;

    Classification {
        status,
        message: Cow::Borrowed(status_message(status)),
        details: Some(error.diagnostic().to_owned()).filter(|d| !d.is_empty()),
        severity: Severity::Warn,
    }
}

fn unclassified() -> Classification {
    let status = StatusCode::INTERNAL_SERVER_ERROR;

    Classification {
        status,
        message: Cow::Borrowed(status_message(status)),
        details: None,
        severity: Severity::Error,
    }
}

/// Walk an opaque error chain looking for a known shape
pub(crate) fn wrapped(error: &(dyn std::error::Error + 'static)) -> Option<Classification> {
    let mut current = Some(error);

    while let Some(error) = current {
        if let Some(app) = error.downcast_ref::<AppError>() {
            return Some(pinned(app));
        }
        if let Some(domain) = error.downcast_ref::<DomainError>() {
            return Some(pinned(domain));
        }
        if let Some(failure) = error.downcast_ref::<Failure>() {
            return Some(classify(failure));
        }
        current = error.source();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("SELECT * FROM article failed: /var/lib/mysql/ibdata1 corrupted")]
    struct LeakyDatabaseError;

    #[derive(Debug, thiserror::Error)]
    #[error("store failed")]
    struct StoreFailed(#[source] AppError);

    #[test]
    fn app_error_severity_follows_status() {
        for code in 400..600_u16 {
            let status = StatusCode::from_u16(code).unwrap();
            let classification = Failure::from(AppError::with_details(status, "pinned", "")).classify();

            let expected = if code >= 500 { Severity::Error } else { Severity::Warn };
            assert_eq!(classification.severity, expected, "status {code}");
            assert_eq!(classification.status, status);
        }
    }

    #[test]
    fn with_details_round_trips_verbatim() {
        let failure = Failure::from(AppError::with_details(StatusCode::NOT_FOUND, "not found", "id=7"));
        let body = failure.classify().to_response();

        assert_eq!(
            body,
            ErrorResponse {
                code: 404,
                message: "not found".to_owned(),
                details: Some("id=7".to_owned()),
            }
        );
    }

    #[test]
    fn not_found_sentinel() {
        let classification = Failure::from(DomainError::NotFound).classify();

        assert_eq!(classification.status, StatusCode::NOT_FOUND);
        assert_eq!(classification.message, "资源不存在");
        assert_eq!(classification.details, None);
        assert_eq!(classification.severity, Severity::Warn);
    }

    #[test]
    fn domain_sentinels_map_to_fixed_statuses() {
        let cases = [
            (DomainError::NotFound, 404, "资源不存在", Severity::Warn),
            (DomainError::Conflict, 409, "资源冲突", Severity::Warn),
            (DomainError::BadParamInput, 400, "请求参数错误", Severity::Warn),
            (DomainError::InternalServerError, 500, "服务器内部错误", Severity::Error),
        ];

        for (error, code, message, severity) in cases {
            let classification = Failure::from(error).classify();
            assert_eq!(classification.status.as_u16(), code);
            assert_eq!(classification.message, message);
            assert_eq!(classification.severity, severity);
            assert!(classification.details.is_none());
        }
    }

    #[test]
    fn binding_errors_expose_diagnostic() {
        let diagnostic = "Failed to parse the request body as JSON: expected value at line 1 column 1";
        let classification = Failure::from(BindingError::new(diagnostic)).classify();

        assert_eq!(classification.status, StatusCode::BAD_REQUEST);
        assert_eq!(classification.message, "请求参数错误");
        assert_eq!(classification.details.as_deref(), Some(diagnostic));
        assert_eq!(classification.severity, Severity::Warn);
    }

    #[test]
    fn opaque_errors_never_leak() {
        let classification = Failure::unclassified(LeakyDatabaseError).classify();
        let body = classification.to_response();

        assert_eq!(body.code, 500);
        assert_eq!(body.message, "服务器内部错误");
        assert!(body.details.is_none());
        assert_eq!(classification.severity, Severity::Error);

        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("SELECT"));
        assert!(!json.contains("ibdata1"));
    }

    #[test]
    fn panic_payloads_classify_as_generic_500() {
        let body = Failure::from_panic(Box::new("boom")).classify().to_response();
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"code":500,"message":"服务器内部错误"}"#);
    }

    #[test]
    fn wrapped_app_error_is_found_in_chain() {
        let inner = AppError::with_details(StatusCode::CONFLICT, "duplicate title", "title=hello");
        let classification = Failure::unclassified(StoreFailed(inner)).classify();

        assert_eq!(classification.status, StatusCode::CONFLICT);
        assert_eq!(classification.message, "duplicate title");
        assert_eq!(classification.details.as_deref(), Some("title=hello"));
    }

    #[test]
    fn wrapped_domain_error_is_found_directly() {
        let classification = Failure::unclassified(DomainError::Conflict).classify();
        assert_eq!(classification.status, StatusCode::CONFLICT);
    }

    #[test]
    fn app_error_wins_over_its_cause() {
        let error = AppError::with_cause(StatusCode::SERVICE_UNAVAILABLE, "维护中", DomainError::NotFound);
        let classification = Failure::from(error).classify();

        assert_eq!(classification.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(classification.message, "维护中");
        assert!(classification.details.is_none());
    }

    #[test]
    fn escalation_only_changes_severity() {
        let classification = Failure::from(DomainError::NotFound).classify();
        let escalated = classification.clone().escalated();

        assert_eq!(escalated.severity, Severity::Error);
        assert_eq!(escalated.status, classification.status);
        assert_eq!(escalated.to_response(), classification.to_response());
    }
}
