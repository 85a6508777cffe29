use std::time::Duration;

use serde::Deserialize;

/// CORS configuration
///
/// Defaults allow any origin with the methods and headers the article API
/// uses.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Allowed origins
    #[serde(default)]
    pub origins: AllowList,
    /// Allowed HTTP methods
    #[serde(default = "default_methods")]
    pub methods: AllowList,
    /// Allowed request headers
    #[serde(default = "default_headers")]
    pub headers: AllowList,
    /// Headers to expose to the browser
    #[serde(default)]
    pub expose_headers: Vec<String>,
    /// Max age for preflight cache in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: AllowList::Any,
            methods: default_methods(),
            headers: default_headers(),
            expose_headers: Vec::new(),
            max_age: None,
        }
    }
}

impl CorsConfig {
    /// Get max age as Duration
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}

/// Either the wildcard `"*"` or an explicit list of values
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawAllowList")]
pub enum AllowList {
    #[default]
    Any,
    Only(Vec<String>),
}

impl AllowList {
    /// Explicit entries, empty for the wildcard
    pub fn entries(&self) -> &[String] {
        match self {
            Self::Any => &[],
            Self::Only(values) => values,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAllowList {
    One(String),
    Many(Vec<String>),
}

impl From<RawAllowList> for AllowList {
    fn from(raw: RawAllowList) -> Self {
        let values = match raw {
            RawAllowList::One(value) => vec![value],
            RawAllowList::Many(values) => values,
        };

        if values.iter().any(|v| v == "*") {
            Self::Any
        } else {
            Self::Only(values)
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_methods() -> AllowList {
    AllowList::Only(
        ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
            .into_iter()
            .map(str::to_owned)
            .collect(),
    )
}

fn default_headers() -> AllowList {
    AllowList::Only(vec!["Content-Type".to_owned(), "Authorization".to_owned()])
}
