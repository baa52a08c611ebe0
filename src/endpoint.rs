//! Endpoint descriptions and URI resolution.
//!
//! An [`Endpoint`] describes one addressable server, optionally narrowed to a
//! collection or core. It is built once (from configuration or with
//! [`EndpointBuilder`]) and is read-only afterwards, so a registry of
//! endpoints can be shared by concurrent requests without locking.
//!
//! # Example
//!
//! ```
//! use corona::Endpoint;
//!
//! let endpoint = Endpoint::builder("local")
//!     .host("search.example.com")
//!     .port(8983)
//!     .path("/solr/")
//!     .collection("products")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(endpoint.path(), "/solr");
//! assert_eq!(endpoint.server_uri(), "http://search.example.com:8983/solr/");
//! assert_eq!(endpoint.collection_uri(), "http://search.example.com:8983/solr/products/");
//! // Without an explicit core the collection is used.
//! assert_eq!(endpoint.core_uri(), endpoint.collection_uri());
//! ```

pub mod registry;

use std::fmt;
use std::time::Duration;

use crate::config::{EndpointConfig, EndpointDefaults};
use crate::error::{CoronaError, Result};

/// HTTP basic authentication credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One server, collection or core that requests can be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    key: String,
    scheme: String,
    host: String,
    port: u16,
    path: String,
    collection: Option<String>,
    core: Option<String>,
    timeout: u64,
    leader: bool,
    credentials: Option<Credentials>,
}

impl Endpoint {
    /// Start building an endpoint from the default settings.
    pub fn builder(key: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder::new(key)
    }

    /// Build an endpoint from configuration, filling unset values from `defaults`.
    pub fn from_config(
        key: impl Into<String>,
        config: &EndpointConfig,
        defaults: &EndpointDefaults,
    ) -> Result<Self> {
        let merged = config.merge_over(defaults);
        let mut builder = EndpointBuilder::new(key)
            .scheme(merged.scheme)
            .host(merged.host)
            .port(merged.port)
            .path(merged.path)
            .timeout(merged.timeout)
            .leader(merged.leader);
        if let Some(collection) = merged.collection {
            builder = builder.collection(collection);
        }
        if let Some(core) = merged.core {
            builder = builder.core(core);
        }
        match (merged.username, merged.password) {
            (Some(username), Some(password)) => {
                builder = builder.credentials(username, password);
            }
            (None, None) => {}
            _ => {
                return Err(CoronaError::configuration(
                    "username and password must be set together",
                ));
            }
        }
        builder.build()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The base path, never ending in `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    /// The core name, falling back to the collection when no core is set.
    pub fn core(&self) -> Option<&str> {
        self.core.as_deref().or(self.collection.as_deref())
    }

    /// Request timeout in seconds.
    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Whether this endpoint is the leader of its shard.
    pub fn is_leader(&self) -> bool {
        self.leader
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// URI for requests that are not bound to a core or collection.
    pub fn server_uri(&self) -> String {
        format!(
            "{}://{}:{}{}/",
            self.scheme, self.host, self.port, self.path
        )
    }

    /// URI for collection level requests.
    pub fn collection_uri(&self) -> String {
        let mut uri = self.server_uri();
        if let Some(collection) = &self.collection {
            uri.push_str(collection);
            uri.push('/');
        }
        uri
    }

    /// URI for core level requests.
    pub fn core_uri(&self) -> String {
        let mut uri = self.server_uri();
        if let Some(core) = self.core().filter(|c| !c.is_empty()) {
            uri.push_str(core);
            uri.push('/');
        }
        uri
    }

    /// Copy of this endpoint with another key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Copy of this endpoint with the leader flag set.
    pub fn with_leader(mut self, leader: bool) -> Self {
        self.leader = leader;
        self
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Endpoint '{}'", self.key)?;
        writeln!(f, "base uri: {}", self.core_uri())?;
        writeln!(f, "host: {}", self.host)?;
        writeln!(f, "port: {}", self.port)?;
        writeln!(f, "path: {}", self.path)?;
        writeln!(f, "collection: {}", self.collection.as_deref().unwrap_or(""))?;
        writeln!(f, "core: {}", self.core().unwrap_or(""))?;
        writeln!(f, "timeout: {}", self.timeout)?;
        writeln!(f, "leader: {}", self.leader)?;
        match &self.credentials {
            Some(credentials) => write!(f, "authentication: {}", credentials.username),
            None => write!(f, "authentication: none"),
        }
    }
}

/// Strip every trailing `/` from a base path.
fn normalize_path(path: &str) -> String {
    path.trim_end_matches('/').to_string()
}

/// Builder for [`Endpoint`].
#[derive(Debug, Clone)]
pub struct EndpointBuilder {
    endpoint: Endpoint,
}

impl EndpointBuilder {
    pub fn new(key: impl Into<String>) -> Self {
        let defaults = EndpointDefaults::default();
        Self {
            endpoint: Endpoint {
                key: key.into(),
                scheme: defaults.scheme,
                host: defaults.host,
                port: defaults.port,
                path: normalize_path(&defaults.path),
                collection: None,
                core: None,
                timeout: defaults.timeout,
                leader: defaults.leader,
                credentials: None,
            },
        }
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.endpoint.scheme = scheme.into();
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.endpoint.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.endpoint.port = port;
        self
    }

    /// Set the base path. Trailing separators are removed.
    pub fn path(mut self, path: impl AsRef<str>) -> Self {
        self.endpoint.path = normalize_path(path.as_ref());
        self
    }

    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.endpoint.collection = Some(collection.into());
        self
    }

    pub fn core(mut self, core: impl Into<String>) -> Self {
        self.endpoint.core = Some(core.into());
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.endpoint.timeout = seconds;
        self
    }

    pub fn leader(mut self, leader: bool) -> Self {
        self.endpoint.leader = leader;
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.endpoint.credentials = Some(Credentials::new(username, password));
        self
    }

    pub fn build(self) -> Result<Endpoint> {
        let endpoint = self.endpoint;
        if endpoint.key.is_empty() {
            return Err(CoronaError::configuration("endpoint key must not be empty"));
        }
        if endpoint.host.is_empty() {
            return Err(CoronaError::configuration(format!(
                "endpoint '{}' has an empty host",
                endpoint.key
            )));
        }
        if endpoint.port == 0 {
            return Err(CoronaError::configuration(format!(
                "endpoint '{}' has port 0",
                endpoint.key
            )));
        }
        Ok(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let endpoint = Endpoint::builder("local").build().unwrap();
        assert_eq!(endpoint.scheme(), "http");
        assert_eq!(endpoint.host(), "127.0.0.1");
        assert_eq!(endpoint.port(), 8983);
        assert_eq!(endpoint.path(), "/solr");
        assert_eq!(endpoint.timeout(), 5);
        assert!(!endpoint.is_leader());
        assert_eq!(endpoint.server_uri(), "http://127.0.0.1:8983/solr/");
    }

    #[test]
    fn test_path_normalization() {
        let endpoint = Endpoint::builder("a").path("/solr/").build().unwrap();
        assert_eq!(endpoint.path(), "/solr");

        let endpoint = Endpoint::builder("a").path("/search//").build().unwrap();
        assert_eq!(endpoint.path(), "/search");

        let endpoint = Endpoint::builder("a").path("/").build().unwrap();
        assert_eq!(endpoint.path(), "");
        assert_eq!(endpoint.server_uri(), "http://127.0.0.1:8983/");
    }

    #[test]
    fn test_core_falls_back_to_collection() {
        let endpoint = Endpoint::builder("a").collection("books").build().unwrap();
        assert_eq!(endpoint.core(), Some("books"));
        assert_eq!(endpoint.core_uri(), endpoint.collection_uri());
        assert_eq!(endpoint.core_uri(), "http://127.0.0.1:8983/solr/books/");
    }

    #[test]
    fn test_core_and_collection_differ() {
        let endpoint = Endpoint::builder("a")
            .collection("books")
            .core("books_shard1_replica_n1")
            .build()
            .unwrap();
        assert_eq!(endpoint.collection_uri(), "http://127.0.0.1:8983/solr/books/");
        assert_eq!(
            endpoint.core_uri(),
            "http://127.0.0.1:8983/solr/books_shard1_replica_n1/"
        );
    }

    #[test]
    fn test_no_core_no_collection() {
        let endpoint = Endpoint::builder("a").build().unwrap();
        assert_eq!(endpoint.core(), None);
        assert_eq!(endpoint.core_uri(), endpoint.server_uri());
        assert_eq!(endpoint.collection_uri(), endpoint.server_uri());
    }

    #[test]
    fn test_empty_core_yields_server_uri() {
        let endpoint = Endpoint::builder("a").core("").build().unwrap();
        assert_eq!(endpoint.core_uri(), endpoint.server_uri());
    }

    #[test]
    fn test_validation() {
        assert!(Endpoint::builder("").build().is_err());
        assert!(Endpoint::builder("a").host("").build().is_err());
        assert!(Endpoint::builder("a").port(0).build().is_err());
    }

    #[test]
    fn test_from_config_credentials() {
        let defaults = EndpointDefaults::default();
        let config = EndpointConfig {
            username: Some("admin".into()),
            password: Some("s3cret".into()),
            ..Default::default()
        };
        let endpoint = Endpoint::from_config("a", &config, &defaults).unwrap();
        assert_eq!(endpoint.credentials().map(|c| c.username.as_str()), Some("admin"));

        let config = EndpointConfig {
            username: Some("admin".into()),
            ..Default::default()
        };
        let err = Endpoint::from_config("a", &config, &defaults).unwrap_err();
        assert!(matches!(err, CoronaError::Configuration(_)));
    }

    #[test]
    fn test_display_hides_password() {
        let endpoint = Endpoint::builder("secure")
            .scheme("https")
            .credentials("admin", "s3cret")
            .core("techproducts")
            .build()
            .unwrap();

        let shown = endpoint.to_string();
        assert!(shown.contains("base uri: https://127.0.0.1:8983/solr/techproducts/"));
        assert!(shown.contains("authentication: admin"));
        assert!(!shown.contains("s3cret"));

        let debugged = format!("{endpoint:?}");
        assert!(!debugged.contains("s3cret"));
    }
}
