use scribe_core::{DomainError, Failure};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArticleError>;

/// Errors raised by article repositories and the article service
#[derive(Debug, Error)]
pub enum ArticleError {
    /// Named condition the HTTP layer maps to a fixed status
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A write touched a different number of rows than the one expected
    #[error("unexpected number of affected rows: {0}")]
    AffectedRows(u64),

    #[error("generated id {0} is out of range")]
    IdOutOfRange(u64),
}

impl ArticleError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(DomainError::NotFound))
    }
}

impl From<ArticleError> for Failure {
    fn from(error: ArticleError) -> Self {
        match error {
            ArticleError::Domain(domain) => Self::Domain(domain),
            other => Self::unclassified(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_stay_typed() {
        let failure = Failure::from(ArticleError::from(DomainError::Conflict));
        assert!(matches!(failure, Failure::Domain(DomainError::Conflict)));
    }

    #[test]
    fn storage_errors_are_opaque() {
        let failure = Failure::from(ArticleError::AffectedRows(2));
        let body = failure.classify().to_response();

        assert_eq!(body.code, 500);
        assert!(body.details.is_none());
    }
}
