//! Client configuration.
//!
//! Configuration is layered: a fixed [`EndpointDefaults`] table supplies every
//! connection setting, and each [`EndpointConfig`] overrides only the values it
//! names. The merge is a pure function, so neither layer is ever mutated.
//!
//! ```
//! use corona::config::ClientConfig;
//!
//! let config = ClientConfig::from_toml_str(r#"
//! default_endpoint = "primary"
//!
//! [endpoints.primary]
//! host = "10.0.0.1"
//! core = "techproducts"
//!
//! [endpoints.replica]
//! host = "10.0.0.2"
//! core = "techproducts"
//! "#).unwrap();
//!
//! assert_eq!(config.endpoints.len(), 2);
//! assert_eq!(config.default_endpoint.as_deref(), Some("primary"));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoronaError, Result};

/// Settings used for any value an endpoint configuration leaves out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointDefaults {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub path: String,
    /// Timeout in seconds.
    pub timeout: u64,
    pub leader: bool,
}

impl Default for EndpointDefaults {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8983,
            path: "/solr".to_string(),
            timeout: 5,
            leader: false,
        }
    }
}

/// Per endpoint overrides. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointConfig {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub collection: Option<String>,
    pub core: Option<String>,
    pub timeout: Option<u64>,
    pub leader: Option<bool>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// An endpoint configuration with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpointConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub collection: Option<String>,
    pub core: Option<String>,
    pub timeout: u64,
    pub leader: bool,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl EndpointConfig {
    /// Fill every unset value from `defaults`.
    pub fn merge_over(&self, defaults: &EndpointDefaults) -> ResolvedEndpointConfig {
        ResolvedEndpointConfig {
            scheme: self.scheme.clone().unwrap_or_else(|| defaults.scheme.clone()),
            host: self.host.clone().unwrap_or_else(|| defaults.host.clone()),
            port: self.port.unwrap_or(defaults.port),
            path: self.path.clone().unwrap_or_else(|| defaults.path.clone()),
            collection: self.collection.clone(),
            core: self.core.clone(),
            timeout: self.timeout.unwrap_or(defaults.timeout),
            leader: self.leader.unwrap_or(defaults.leader),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

/// Configuration for a [`Client`](crate::Client).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Key of the endpoint used when a request names none.
    pub default_endpoint: Option<String>,
    /// Endpoint settings by key.
    pub endpoints: BTreeMap<String, EndpointConfig>,
    /// Values used for anything an endpoint leaves out.
    pub defaults: EndpointDefaults,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input)
            .map_err(|e| CoronaError::configuration(format!("invalid JSON config: {e}")))
    }

    /// The default endpoint key, or the only endpoint when exactly one is configured.
    pub fn effective_default(&self) -> Option<&str> {
        if let Some(key) = &self.default_endpoint {
            return Some(key.as_str());
        }
        if self.endpoints.len() == 1 {
            return self.endpoints.keys().next().map(String::as_str);
        }
        None
    }
}

#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn endpoint(mut self, key: impl Into<String>, config: EndpointConfig) -> Self {
        self.config.endpoints.insert(key.into(), config);
        self
    }

    pub fn default_endpoint(mut self, key: impl Into<String>) -> Self {
        self.config.default_endpoint = Some(key.into());
        self
    }

    pub fn defaults(mut self, defaults: EndpointDefaults) -> Self {
        self.config.defaults = defaults;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
