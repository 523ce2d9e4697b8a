//! Connection configuration
//!
//! Loaded from environment variables:
//! - `CAM_URL` (required) - appliance base URL
//! - `CAM_USERNAME` (required) - API administrator name
//! - `CAM_PASSWORD` (required) - API administrator password
//! - `CAM_USER_AGENT` (optional) - User-Agent override
//! - `CAM_TIMEOUT_SECS` (optional, default 30) - request timeout, at least 1
//! - `CAM_PROXY` (optional) - proxy URL for all appliance traffic

use crate::error::InvalidArgument;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings for an [`HttpCamConnection`](crate::HttpCamConnection)
#[derive(Clone, Deserialize)]
pub struct CamConfig {
    /// Appliance base URL
    pub url: String,
    pub username: String,
    pub password: String,
    /// Replaces the default User-Agent when set
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Per-request timeout; zero is rejected when the connection is built
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Proxy URL applied to every request
    #[serde(default)]
    pub proxy: Option<String>,
}

impl CamConfig {
    /// Configuration with the default timeout and no proxy
    pub fn new(url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            user_agent: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            proxy: None,
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, InvalidArgument> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InvalidArgument>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| InvalidArgument::new(format!("{key} environment variable is required")))
        };

        let timeout_secs = match lookup("CAM_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => return Err(InvalidArgument::new("CAM_TIMEOUT_SECS must be at least 1")),
                Ok(secs) => secs,
                Err(e) => {
                    return Err(InvalidArgument::new(format!(
                        "CAM_TIMEOUT_SECS must be a whole number of seconds: {e}"
                    )));
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            url: required("CAM_URL")?,
            username: required("CAM_USERNAME")?,
            password: required("CAM_PASSWORD")?,
            user_agent: lookup("CAM_USER_AGENT").filter(|v| !v.trim().is_empty()),
            timeout_secs,
            proxy: lookup("CAM_PROXY").filter(|v| !v.trim().is_empty()),
        })
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for CamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CamConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .field("proxy", &self.proxy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::value::{Error as ValueError, MapDeserializer};
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_minimal() {
        let config = CamConfig::from_lookup(lookup(&[
            ("CAM_URL", "https://cam.example.com"),
            ("CAM_USERNAME", "admin"),
            ("CAM_PASSWORD", "cisco123"),
        ]))
        .unwrap();
        assert_eq!(config.url, "https://cam.example.com");
        assert_eq!(config.username, "admin");
        assert_eq!(config.user_agent, None);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.proxy, None);
    }

    #[test]
    fn test_from_lookup_optional_values() {
        let config = CamConfig::from_lookup(lookup(&[
            ("CAM_URL", "https://cam.example.com"),
            ("CAM_USERNAME", "admin"),
            ("CAM_PASSWORD", "cisco123"),
            ("CAM_USER_AGENT", "nac-sync/2.0"),
            ("CAM_TIMEOUT_SECS", " 5 "),
            ("CAM_PROXY", "http://proxy.example.com:3128"),
        ]))
        .unwrap();
        assert_eq!(config.user_agent.as_deref(), Some("nac-sync/2.0"));
        assert_eq!(config.proxy.as_deref(), Some("http://proxy.example.com:3128"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_from_lookup_missing_required() {
        let err = CamConfig::from_lookup(lookup(&[
            ("CAM_URL", "https://cam.example.com"),
            ("CAM_PASSWORD", "cisco123"),
        ]))
        .unwrap_err();
        assert!(err.0.contains("CAM_USERNAME"));

        let err = CamConfig::from_lookup(lookup(&[
            ("CAM_URL", " "),
            ("CAM_USERNAME", "admin"),
            ("CAM_PASSWORD", "cisco123"),
        ]))
        .unwrap_err();
        assert!(err.0.contains("CAM_URL"));
    }

    #[test]
    fn test_from_lookup_bad_timeout() {
        let err = CamConfig::from_lookup(lookup(&[
            ("CAM_URL", "https://cam.example.com"),
            ("CAM_USERNAME", "admin"),
            ("CAM_PASSWORD", "cisco123"),
            ("CAM_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.0.contains("CAM_TIMEOUT_SECS"));
    }

    #[test]
    fn test_from_lookup_rejects_zero_timeout() {
        let err = CamConfig::from_lookup(lookup(&[
            ("CAM_URL", "https://cam.example.com"),
            ("CAM_USERNAME", "admin"),
            ("CAM_PASSWORD", "cisco123"),
            ("CAM_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert_eq!(err.0, "CAM_TIMEOUT_SECS must be at least 1");
    }

    #[test]
    fn test_blank_proxy_is_ignored() {
        let config = CamConfig::from_lookup(lookup(&[
            ("CAM_URL", "https://cam.example.com"),
            ("CAM_USERNAME", "admin"),
            ("CAM_PASSWORD", "cisco123"),
            ("CAM_PROXY", "  "),
        ]))
        .unwrap();
        assert_eq!(config.proxy, None);
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let fields = vec![
            ("url", "https://cam.example.com"),
            ("username", "admin"),
            ("password", "cisco123"),
        ];
        let config = CamConfig::deserialize(MapDeserializer::<_, ValueError>::new(fields.into_iter())).unwrap();
        assert_eq!(config.url, "https://cam.example.com");
        assert_eq!(config.user_agent, None);
        assert_eq!(config.proxy, None);
        assert_eq!(config.timeout_secs, 30);

        let fields = vec![("url", "https://cam.example.com"), ("username", "admin")];
        let result = CamConfig::deserialize(MapDeserializer::<_, ValueError>::new(fields.into_iter()));
        assert!(result.unwrap_err().to_string().contains("password"));
    }

    #[test]
    fn test_debug_masks_password() {
        let config = CamConfig::new("https://cam.example.com", "admin", "cisco123");
        let debug = format!("{config:?}");
        assert!(!debug.contains("cisco123"));
        assert!(debug.contains("admin"));
    }
}
