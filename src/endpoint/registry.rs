//! Endpoint registry and request target selection.

use std::collections::HashMap;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::{CoronaError, Result};

/// Endpoints by key, with one designated default.
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    entries: HashMap<String, Endpoint>,
    default_key: Option<String>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every configured endpoint and apply the configured default.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut registry = Self::new();
        for (key, endpoint_config) in &config.endpoints {
            let endpoint = Endpoint::from_config(key, endpoint_config, &config.defaults)?;
            registry.entries.insert(key.clone(), endpoint);
        }
        if let Some(key) = config.effective_default() {
            registry.set_default(key)?;
        }
        Ok(registry)
    }

    /// Add an endpoint, replacing any endpoint with the same key.
    ///
    /// The first endpoint added becomes the default if none is set.
    pub fn add(&mut self, endpoint: Endpoint) -> &mut Self {
        let key = endpoint.key().to_string();
        if self.default_key.is_none() {
            self.default_key = Some(key.clone());
        }
        self.entries.insert(key, endpoint);
        self
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.add(endpoint);
        self
    }

    pub fn set_default(&mut self, key: &str) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Err(CoronaError::configuration(format!(
                "cannot use unknown endpoint '{key}' as default"
            )));
        }
        self.default_key = Some(key.to_string());
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<Endpoint> {
        let removed = self.entries.remove(key);
        if self.default_key.as_deref() == Some(key) {
            self.default_key = None;
        }
        removed
    }

    pub fn get(&self, key: &str) -> Option<&Endpoint> {
        self.entries.get(key)
    }

    /// All endpoint keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn default_key(&self) -> Option<&str> {
        self.default_key.as_deref()
    }

    pub fn default_endpoint(&self) -> Option<&Endpoint> {
        self.default_key
            .as_deref()
            .and_then(|key| self.entries.get(key))
    }

    /// Resolve the endpoint for a request.
    ///
    /// With a key the matching endpoint is returned; without one the default.
    pub fn select(&self, key: Option<&str>) -> Result<&Endpoint> {
        match key {
            Some(key) => self.entries.get(key).ok_or_else(|| {
                CoronaError::configuration(format!("unknown endpoint '{key}'"))
            }),
            None => self
                .default_endpoint()
                .ok_or_else(|| CoronaError::configuration("no default endpoint configured")),
        }
    }

    /// Resolve a leader endpoint, optionally for one collection.
    ///
    /// Among several leaders the one with the lowest key wins. Falls back to
    /// the default endpoint when no leader matches.
    pub fn select_leader(&self, collection: Option<&str>) -> Result<&Endpoint> {
        let leader = self
            .entries
            .values()
            .filter(|endpoint| endpoint.is_leader())
            .filter(|endpoint| collection.is_none_or(|c| endpoint.collection() == Some(c)))
            .min_by(|a, b| a.key().cmp(b.key()));

        match leader {
            Some(endpoint) => Ok(endpoint),
            None => {
                log::debug!("no leader endpoint for collection {collection:?}, using default");
                self.select(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointConfig;

    fn endpoint(key: &str) -> Endpoint {
        Endpoint::builder(key).build().unwrap()
    }

    #[test]
    fn test_first_added_is_default() {
        let registry = EndpointRegistry::new()
            .with_endpoint(endpoint("a"))
            .with_endpoint(endpoint("b"));
        assert_eq!(registry.default_key(), Some("a"));
        assert_eq!(registry.select(None).unwrap().key(), "a");
        assert_eq!(registry.select(Some("b")).unwrap().key(), "b");
    }

    #[test]
    fn test_unknown_key() {
        let registry = EndpointRegistry::new().with_endpoint(endpoint("a"));
        let err = registry.select(Some("c")).unwrap_err();
        assert!(matches!(err, CoronaError::Configuration(_)));
    }

    #[test]
    fn test_no_default() {
        let registry = EndpointRegistry::new();
        assert!(matches!(
            registry.select(None).unwrap_err(),
            CoronaError::Configuration(_)
        ));
    }

    #[test]
    fn test_add_replaces_same_key() {
        let mut registry = EndpointRegistry::new();
        registry.add(endpoint("a"));
        registry.add(Endpoint::builder("a").port(9000).build().unwrap());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").unwrap().port(), 9000);
    }

    #[test]
    fn test_set_default_unknown() {
        let mut registry = EndpointRegistry::new().with_endpoint(endpoint("a"));
        assert!(registry.set_default("zzz").is_err());
        registry.add(endpoint("b"));
        registry.set_default("b").unwrap();
        assert_eq!(registry.select(None).unwrap().key(), "b");
    }

    #[test]
    fn test_remove_default() {
        let mut registry = EndpointRegistry::new().with_endpoint(endpoint("a"));
        assert!(registry.remove("a").is_some());
        assert!(registry.is_empty());
        assert_eq!(registry.default_key(), None);
    }

    #[test]
    fn test_select_leader() {
        let registry = EndpointRegistry::new()
            .with_endpoint(Endpoint::builder("replica").collection("books").build().unwrap())
            .with_endpoint(
                Endpoint::builder("shard2")
                    .collection("books")
                    .leader(true)
                    .build()
                    .unwrap(),
            )
            .with_endpoint(
                Endpoint::builder("shard1")
                    .collection("books")
                    .leader(true)
                    .build()
                    .unwrap(),
            )
            .with_endpoint(
                Endpoint::builder("music")
                    .collection("music")
                    .leader(true)
                    .build()
                    .unwrap(),
            );

        assert_eq!(registry.select_leader(Some("books")).unwrap().key(), "shard1");
        assert_eq!(registry.select_leader(Some("music")).unwrap().key(), "music");
        assert_eq!(registry.select_leader(None).unwrap().key(), "music");
        // No leader for this collection: default endpoint.
        assert_eq!(registry.select_leader(Some("films")).unwrap().key(), "replica");
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig::builder()
            .endpoint(
                "a",
                EndpointConfig {
                    core: Some("techproducts".into()),
                    ..Default::default()
                },
            )
            .endpoint(
                "b",
                EndpointConfig {
                    host: Some("10.0.0.2".into()),
                    path: Some("/solr/".into()),
                    ..Default::default()
                },
            )
            .default_endpoint("a")
            .build();

        let registry = EndpointRegistry::from_config(&config).unwrap();
        assert_eq!(registry.keys(), vec!["a", "b"]);
        assert_eq!(
            registry.select(None).unwrap().core_uri(),
            "http://127.0.0.1:8983/solr/techproducts/"
        );
        assert_eq!(registry.get("b").unwrap().path(), "/solr");
    }

    #[test]
    fn test_from_config_unknown_default() {
        let config = ClientConfig::builder()
            .endpoint("a", EndpointConfig::default())
            .default_endpoint("missing")
            .build();
        assert!(EndpointRegistry::from_config(&config).is_err());
    }
}
