//! SDK configuration.
//!
//! One `SdkConfig` covers both subsystems. A subsystem whose project id is
//! absent is simply not initialized; its facade refuses every call with
//! `ApiError::Config`.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Production login API.
pub const LOGIN_BASE_URL: &str = "https://login.xsolla.com";

/// Production store API.
pub const STORE_BASE_URL: &str = "https://store.xsolla.com";

/// Redirect target the social login web view watches for.
pub const DEFAULT_CALLBACK_URL: &str = "https://login.xsolla.com/api/blank";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_SOCIAL_AUTH_TIMEOUT: Duration = Duration::from_secs(600);

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Login project id (a UUID issued by the publisher account).
    pub login_project_id: Option<String>,
    /// Store project id.
    pub store_project_id: Option<u32>,
    pub login_base_url: String,
    pub store_base_url: String,
    /// Locale applied to catalog calls made without explicit options.
    pub locale: Option<String>,
    /// Bearer token of the signed-in user.
    pub token: Option<String>,
    pub callback_url: String,
    /// Per-request HTTP timeout
    #[serde(with = "secs")]
    pub timeout: Duration,
    /// Upper bound on the social login web flow. `None` waits forever.
    #[serde(with = "opt_secs")]
    pub social_auth_timeout: Option<Duration>,
}

mod secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

mod opt_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        duration.map(|d| d.as_secs()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            login_project_id: None,
            store_project_id: None,
            login_base_url: LOGIN_BASE_URL.to_string(),
            store_base_url: STORE_BASE_URL.to_string(),
            locale: None,
            token: None,
            callback_url: DEFAULT_CALLBACK_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            social_auth_timeout: Some(DEFAULT_SOCIAL_AUTH_TIMEOUT),
        }
    }
}

impl SdkConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `XSOLLA_LOGIN_PROJECT_ID`: login project id
    /// - `XSOLLA_STORE_PROJECT_ID`: store project id (integer)
    /// - `XSOLLA_LOCALE`: default catalog locale
    /// - `XSOLLA_TOKEN`: bearer token of the signed-in user
    /// - `XSOLLA_CALLBACK_URL`: social login callback URL
    /// - `XSOLLA_LOGIN_URL` / `XSOLLA_STORE_URL`: base URL overrides
    /// - `XSOLLA_TIMEOUT_SECS`: request timeout in seconds
    /// - `XSOLLA_SOCIAL_TIMEOUT_SECS`: social login wait, `0` disables it
    pub fn from_env() -> ApiResult<Self> {
        let mut config = Self::default();

        config.login_project_id = non_empty_var("XSOLLA_LOGIN_PROJECT_ID");
        config.store_project_id = non_empty_var("XSOLLA_STORE_PROJECT_ID")
            .map(|raw| {
                raw.parse().map_err(|_| {
                    ApiError::config(format!("XSOLLA_STORE_PROJECT_ID is not a number: {raw}"))
                })
            })
            .transpose()?;
        config.locale = non_empty_var("XSOLLA_LOCALE");
        config.token = non_empty_var("XSOLLA_TOKEN");

        if let Some(url) = non_empty_var("XSOLLA_CALLBACK_URL") {
            config.callback_url = url;
        }
        if let Some(url) = non_empty_var("XSOLLA_LOGIN_URL") {
            config.login_base_url = url;
        }
        if let Some(url) = non_empty_var("XSOLLA_STORE_URL") {
            config.store_base_url = url;
        }
        if let Some(secs) = secs_var("XSOLLA_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = secs_var("XSOLLA_SOCIAL_TIMEOUT_SECS")? {
            config.social_auth_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> ApiResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ApiError::config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_login_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.login_project_id = Some(project_id.into());
        self
    }

    #[must_use]
    pub fn with_store_project_id(mut self, project_id: u32) -> Self {
        self.store_project_id = Some(project_id);
        self
    }

    /// Point both subsystems at the same host, e.g. a local mock server.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.login_base_url = url.clone();
        self.store_base_url = url;
        self
    }

    #[must_use]
    pub fn with_login_base_url(mut self, url: impl Into<String>) -> Self {
        self.login_base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_store_base_url(mut self, url: impl Into<String>) -> Self {
        self.store_base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_social_auth_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.social_auth_timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        for (name, url) in [
            ("login_base_url", &self.login_base_url),
            ("store_base_url", &self.store_base_url),
            ("callback_url", &self.callback_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ApiError::config(format!(
                    "{name} must start with http:// or https://"
                )));
            }
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if matches!(self.social_auth_timeout, Some(t) if t.is_zero()) {
            return Err(ApiError::config("social_auth_timeout cannot be zero"));
        }

        if matches!(self.login_project_id.as_deref(), Some(id) if id.trim().is_empty()) {
            return Err(ApiError::config("login_project_id cannot be empty"));
        }

        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn secs_var(name: &str) -> ApiResult<Option<u64>> {
    non_empty_var(name)
        .map(|raw| {
            raw.parse()
                .map_err(|_| ApiError::config(format!("{name} is not a number of seconds: {raw}")))
        })
        .transpose()
}
