//! Configuration management for the Nylas client
//!
//! Handles application credentials, the access token and the API server.

use crate::error::{ConfigError, NylasError, Result};

/// Configuration for the Nylas client
#[derive(Debug, Clone)]
pub struct Config {
    /// Application (client) ID
    pub app_id: String,

    /// Application secret
    pub app_secret: String,

    /// Account access token, if already known
    pub access_token: Option<String>,

    /// API server base URL, without trailing slash
    pub api_server: String,
}

impl Config {
    /// Create a configuration pointing at the default API server
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            access_token: None,
            api_server: nylas::API_SERVER.to_string(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &str| {
            lookup(var)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    NylasError::Config(ConfigError::MissingEnvVar {
                        var: var.to_string(),
                    })
                })
        };

        let mut config = Self::new(required("NYLAS_APP_ID")?, required("NYLAS_APP_SECRET")?);

        if let Some(token) = lookup("NYLAS_ACCESS_TOKEN").filter(|t| !t.is_empty()) {
            config = config.with_access_token(token);
        }

        if let Some(server) = lookup("NYLAS_API_SERVER").filter(|s| !s.is_empty()) {
            if !server.starts_with("http://") && !server.starts_with("https://") {
                return Err(NylasError::Config(ConfigError::InvalidConfig {
                    message: format!("NYLAS_API_SERVER must be an http(s) URL, got '{}'", server),
                }));
            }
            config = config.with_api_server(server);
        }

        Ok(config)
    }

    /// Set the access token
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Override the API server
    pub fn with_api_server(mut self, api_server: impl Into<String>) -> Self {
        self.api_server = api_server.into().trim_end_matches('/').to_string();
        self
    }
}

/// Nylas API constants
pub mod nylas {
    /// Default API server
    pub const API_SERVER: &str = "https://api.nylas.com";

    /// Path root used in front of a namespace
    pub const API_ROOT: &str = "n";

    /// Header identifying the client wrapper
    pub const WRAPPER_HEADER: &str = "X-Nylas-API-Wrapper";

    /// Value sent in the wrapper header
    pub const WRAPPER_NAME: &str = "rust";

    /// Scope requested during OAuth
    pub const OAUTH_SCOPE: &str = "email";
}
