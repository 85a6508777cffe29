//! Error taxonomy and failure classification for Scribe
//!
//! Framework-free: the HTTP layer turns a [`Classification`] into a response,
//! this crate only decides what that response says.

mod classify;
mod domain;
mod error;
mod failure;

pub use classify::{Classification, Severity, classify};
pub use domain::DomainError;
pub use error::{AppError, ErrorResponse, HttpError, status_message};
pub use failure::{BindingError, Failure, Unclassified};
