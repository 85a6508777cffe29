use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Trait for errors that carry their own HTTP projection
///
/// Implemented by [`AppError`] and the domain sentinels. The classifier reads
/// these instead of inspecting concrete types, keeping the error taxonomy
/// decoupled from the web framework.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> Cow<'static, str>;

    /// Diagnostic detail the raising site chose to expose
    fn details(&self) -> Option<&str> {
        None
    }
}

/// Canonical public message for a bare status code
pub fn status_message(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "请求参数错误",
        401 => "未授权访问",
        403 => "禁止访问",
        404 => "资源不存在",
        405 => "请求方法不允许",
        409 => "资源冲突",
        422 => "请求数据格式错误",
        429 => "请求过于频繁",
        500 => "服务器内部错误",
        502 => "网关错误",
        503 => "服务暂不可用",
        504 => "网关超时",
        _ => "未知错误",
    }
}

type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Application error with a pinned status code and public message
///
/// Always wins over any other classification. Instances are immutable:
/// either reuse one of the associated sentinels or build a fresh value with
/// [`AppError::with_details`] or [`AppError::with_cause`].
#[derive(Debug, Clone)]
pub struct AppError {
    code: StatusCode,
    message: Cow<'static, str>,
    details: Option<String>,
    cause: Option<Cause>,
}

impl AppError {
    pub const BAD_REQUEST: Self = Self::sentinel(StatusCode::BAD_REQUEST, "请求参数错误");
    pub const UNAUTHORIZED: Self = Self::sentinel(StatusCode::UNAUTHORIZED, "未授权访问");
    pub const FORBIDDEN: Self = Self::sentinel(StatusCode::FORBIDDEN, "禁止访问");
    pub const NOT_FOUND: Self = Self::sentinel(StatusCode::NOT_FOUND, "资源不存在");
    pub const CONFLICT: Self = Self::sentinel(StatusCode::CONFLICT, "资源冲突");
    pub const INTERNAL_SERVER_ERROR: Self = Self::sentinel(StatusCode::INTERNAL_SERVER_ERROR, "服务器内部错误");

    const fn sentinel(code: StatusCode, message: &'static str) -> Self {
        Self {
            code,
            message: Cow::Borrowed(message),
            details: None,
            cause: None,
        }
    }

    /// Error for a bare status code, using the canonical message table
    pub fn from_status(code: StatusCode) -> Self {
        Self::sentinel(code, status_message(code))
    }

    /// Error exposing an explicit diagnostic to the client
    ///
    /// An empty `details` string is treated as absent. An empty `message`
    /// falls back to the canonical message for `code`.
    pub fn with_details(code: StatusCode, message: impl Into<Cow<'static, str>>, details: impl Into<String>) -> Self {
        let details = details.into();

        Self {
            code,
            message: public_message(code, message.into()),
            details: (!details.is_empty()).then_some(details),
            cause: None,
        }
    }

    /// Error wrapping an underlying cause
    ///
    /// The cause is kept for logs only and never copied into `details`.
    pub fn with_cause<E>(code: StatusCode, message: impl Into<Cow<'static, str>>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            code,
            message: public_message(code, message.into()),
            details: None,
            cause: Some(Arc::new(cause)),
        }
    }

    pub const fn code(&self) -> StatusCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Wrapped underlying error, if any
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

fn public_message(code: StatusCode, message: Cow<'static, str>) -> Cow<'static, str> {
    if message.trim().is_empty() {
        Cow::Borrowed(status_message(code))
    } else {
        message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {cause}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

impl HttpError for AppError {
    fn status_code(&self) -> StatusCode {
        self.code
    }

    fn client_message(&self) -> Cow<'static, str> {
        self.message.clone()
    }

    fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

/// JSON body written for every classified failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
