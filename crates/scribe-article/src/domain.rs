use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Article author
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// Article resource
///
/// Only `title` and `content` are required on the wire; identifiers and
/// timestamps are owned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Article {
    /// Check field-level constraints
    ///
    /// # Errors
    ///
    /// Returns every violated constraint, not just the first
    pub fn validate(&self) -> Result<(), Violations> {
        let mut violations = Vec::new();

        if self.title.trim().is_empty() {
            violations.push("title: must not be blank".to_owned());
        }
        if self.content.trim().is_empty() {
            violations.push("content: must not be blank".to_owned());
        }

        if violations.is_empty() { Ok(()) } else { Err(Violations(violations)) }
    }
}

/// Field constraints an article failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join("; "))]
pub struct Violations(pub Vec<String>);
