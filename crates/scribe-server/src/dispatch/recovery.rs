use std::panic::AssertUnwindSafe;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use futures::FutureExt;
use scribe_core::Failure;

use super::{RequestInfo, error_response, log_failure};

/// Turn a panic anywhere inside into a 500 JSON response
///
/// Always logged at error severity, whatever status the payload classifies to.
pub async fn recovery_middleware(request: Request, next: Next) -> Response {
    let info = RequestInfo::from_request(&request);

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            let failure = Failure::from_panic(payload);
            let classification = failure.classify().escalated();
            log_failure(&info, &failure, &classification, "panic recovered");

            error_response(&classification)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use http::StatusCode;
    use scribe_core::{AppError, DomainError, ErrorResponse};

    use super::*;
    use crate::dispatch::attach_error;
    use crate::dispatch::tests::{LogCapture, call, dispatched};

    fn panic_logged(logs: &LogCapture) -> bool {
        logs.events() == vec![(tracing::Level::ERROR, "panic recovered".to_owned())]
    }

    #[tokio::test]
    async fn string_panic_is_generic_500() {
        #[allow(clippy::unused_async)]
        async fn boom() -> &'static str {
            panic!("boom")
        }

        let (logs, _guard) = LogCapture::install();

        let (status, body, _) = call(dispatched(Router::new().route("/", get(boom))), "/").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body.unwrap(),
            ErrorResponse {
                code: 500,
                message: "服务器内部错误".to_owned(),
                details: None,
            }
        );
        assert!(panic_logged(&logs));
    }

    #[tokio::test]
    async fn panic_after_attachment_wins() {
        #[allow(clippy::unused_async)]
        async fn attach_then_panic() -> Response {
            let mut response = StatusCode::OK.into_response();
            attach_error(&mut response, DomainError::NotFound);
            panic!("state corrupted after attaching {:?}", response.status())
        }

        let (status, body, _) = call(dispatched(Router::new().route("/", get(attach_then_panic))), "/").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.unwrap().code, 500);
    }

    #[tokio::test]
    async fn typed_panic_payload_keeps_its_status() {
        #[allow(clippy::unused_async)]
        async fn forbidden() -> &'static str {
            std::panic::panic_any(AppError::FORBIDDEN)
        }

        let (logs, _guard) = LogCapture::install();

        let (status, body, _) = call(dispatched(Router::new().route("/", get(forbidden))), "/").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.unwrap().message, "禁止访问");
        assert!(panic_logged(&logs));
    }

    #[tokio::test]
    async fn panic_inside_propagation_is_caught() {
        let router = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(|request: Request, next: Next| async move {
                let response = next.run(request).await;
                if response.status() == StatusCode::OK {
                    panic!("propagation stage failed");
                }
                response
            }))
            .layer(axum::middleware::from_fn(recovery_middleware));

        let (status, body, _) = call(router, "/").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.unwrap().details.is_none());
    }

    #[tokio::test]
    async fn non_string_payload_falls_back() {
        #[allow(clippy::unused_async)]
        async fn odd() -> &'static str {
            std::panic::panic_any(42_u8)
        }

        let (status, body, _) = call(dispatched(Router::new().route("/", get(odd))), "/").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.unwrap().message, "服务器内部错误");
    }
}
