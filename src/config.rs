//! Feed configuration
//!
//! Everything the fetcher needs to reach the remote search endpoint lives
//! here: the endpoint itself, the bearer credential, the client identity
//! fields, default filters and HTTP settings. Nothing is compiled in; the
//! configuration is loaded from YAML and the credential can come from the
//! environment so it never has to be committed alongside the file.

use crate::error::{Error, Result};
use crate::types::FilterParams;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable consulted for the bearer credential
pub const TOKEN_ENV_VAR: &str = "LISTING_FEED_TOKEN";

// ============================================================================
// Top-Level Feed Config
// ============================================================================

/// Complete feed configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Search endpoint receiving the POST requests
    pub endpoint: String,

    /// Opaque bearer credential sent in the request body
    #[serde(default)]
    pub token: String,

    /// Client user type sent with every request
    #[serde(default = "default_user_type")]
    pub user_type: String,

    /// Client version sent with every request
    #[serde(default = "default_version_number")]
    pub version_number: String,

    /// Expected page size; informational only, never an end-of-data signal
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Cursor sent in place of the empty start cursor
    #[serde(default)]
    pub start_cursor: Option<String>,

    /// Dot path of the listings array in the response body
    #[serde(default = "default_records_field")]
    pub records_field: String,

    /// Default filters
    #[serde(default)]
    pub filters: FilterParams,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_user_type() -> String {
    "Xpert".to_string()
}

fn default_version_number() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_records_field() -> String {
    "xchange".to_string()
}

impl FeedConfig {
    /// Create a config for an endpoint with all defaults
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: String::new(),
            user_type: default_user_type(),
            version_number: default_version_number(),
            page_size: default_page_size(),
            start_cursor: None,
            records_field: default_records_field(),
            filters: FilterParams::default(),
            http: HttpConfig::default(),
        }
    }

    /// Create a new config builder
    pub fn builder(endpoint: impl Into<String>) -> FeedConfigBuilder {
        FeedConfigBuilder {
            config: Self::new(endpoint),
        }
    }

    /// Parse a config from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Fill an empty token from the environment
    #[must_use]
    pub fn with_env_token(mut self) -> Self {
        if self.token.is_empty() {
            if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
                self.token = token;
            }
        }
        self
    }

    /// Check the config is usable and return the parsed endpoint
    pub fn validate(&self) -> Result<Url> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::missing_field("endpoint"));
        }
        let url = Url::parse(&self.endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "endpoint must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.records_field.trim().is_empty() {
            return Err(Error::missing_field("records_field"));
        }
        Ok(url)
    }

    /// Token with everything but a short prefix hidden
    pub fn masked_token(&self) -> String {
        mask(&self.token)
    }
}

impl fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &self.masked_token())
            .field("user_type", &self.user_type)
            .field("version_number", &self.version_number)
            .field("page_size", &self.page_size)
            .field("start_cursor", &self.start_cursor)
            .field("records_field", &self.records_field)
            .field("filters", &self.filters)
            .field("http", &self.http)
            .finish()
    }
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let prefix: String = secret.chars().take(4).collect();
    format!("{prefix}****")
}

/// Builder for feed config
#[derive(Debug)]
pub struct FeedConfigBuilder {
    config: FeedConfig,
}

impl FeedConfigBuilder {
    /// Set the bearer credential
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = token.into();
        self
    }

    /// Set client identity fields
    #[must_use]
    pub fn client(mut self, user_type: impl Into<String>, version: impl Into<String>) -> Self {
        self.config.user_type = user_type.into();
        self.config.version_number = version.into();
        self
    }

    /// Set the start cursor
    #[must_use]
    pub fn start_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.config.start_cursor = Some(cursor.into());
        self
    }

    /// Set the records field
    #[must_use]
    pub fn records_field(mut self, field: impl Into<String>) -> Self {
        self.config.records_field = field.into();
        self
    }

    /// Set default filters
    #[must_use]
    pub fn filters(mut self, filters: FilterParams) -> Self {
        self.config.filters = filters;
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.http.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Add an extra HTTP header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.http.headers.insert(key.into(), value.into());
        self
    }

    /// Build the config
    pub fn build(self) -> FeedConfig {
        self.config
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

impl HttpConfig {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
