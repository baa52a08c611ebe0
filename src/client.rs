//! Client orchestration.
//!
//! A [`Client`] resolves the endpoint for a query, builds the wire request,
//! sends it through its [`Transport`] and parses the answer. Apart from the
//! registry and transport it holds no state, so clones are cheap and can be
//! used from many tasks at once.

use std::sync::Arc;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::endpoint::registry::EndpointRegistry;
use crate::error::{CoronaError, Result};
use crate::query::{Query, QueryType};
use crate::request::{Method, RequestBuilder, RequestScope};
use crate::response::{QueryResult, ResponseParser};
use crate::transport::{HttpRequest, Transport};

#[derive(Debug, Clone)]
pub struct Client {
    endpoints: Arc<EndpointRegistry>,
    transport: Arc<dyn Transport>,
}

impl Client {
    pub fn new(endpoints: EndpointRegistry, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoints: Arc::new(endpoints),
            transport,
        }
    }

    /// Create a client over HTTP from configuration.
    #[cfg(feature = "http")]
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = crate::transport::http::ReqwestTransport::new()?;
        Self::from_config_with_transport(config, Arc::new(transport))
    }

    pub fn from_config_with_transport(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        Ok(Self::new(EndpointRegistry::from_config(config)?, transport))
    }

    pub fn endpoints(&self) -> &EndpointRegistry {
        &self.endpoints
    }

    pub fn endpoint(&self, key: &str) -> Option<&Endpoint> {
        self.endpoints.get(key)
    }

    /// The endpoint a query is sent to.
    ///
    /// An explicit key always wins. Otherwise a query asking for leader
    /// affinity goes to a leader of the default endpoint's collection, and
    /// everything else goes to the default endpoint.
    pub fn resolve_endpoint(&self, query: &Query, key: Option<&str>) -> Result<&Endpoint> {
        if key.is_some() {
            return self.endpoints.select(key);
        }
        if query.leader_affinity() {
            let collection = self
                .endpoints
                .default_endpoint()
                .and_then(Endpoint::collection);
            return self.endpoints.select_leader(collection);
        }
        self.endpoints.select(None)
    }

    /// Resolve the endpoint and build the request for a query without sending it.
    pub fn create_request(&self, query: &Query, key: Option<&str>) -> Result<HttpRequest> {
        let endpoint = self.resolve_endpoint(query, key)?;
        let request = RequestBuilder::build(query)?;

        let base = match request.scope {
            RequestScope::Server => endpoint.server_uri(),
            RequestScope::Collection => endpoint.collection_uri(),
            RequestScope::Core => endpoint.core_uri(),
        };
        let mut uri = format!("{base}{}", request.handler.trim_start_matches('/'));
        if request.method == Method::Get && !request.params.is_empty() {
            uri.push('?');
            uri.push_str(&request.params.to_query_string());
        }

        let mut headers = Vec::new();
        if let Some(credentials) = endpoint.credentials() {
            let token = BASE64_STANDARD.encode(format!(
                "{}:{}",
                credentials.username, credentials.password
            ));
            headers.push(("Authorization".to_string(), format!("Basic {token}")));
        }
        if let Some(content_type) = request.content_type {
            headers.push(("Content-Type".to_string(), content_type));
        }

        Ok(HttpRequest {
            method: request.method,
            uri,
            headers,
            body: request.body,
            timeout: endpoint.timeout_duration(),
        })
    }

    /// Send a query and parse its result.
    ///
    /// Non-success statuses become [`CoronaError::Server`] and the body is
    /// not parsed as a result.
    pub async fn execute(&self, query: &Query, key: Option<&str>) -> Result<QueryResult> {
        let request = self.create_request(query, key)?;
        log::debug!(
            "sending {} query: {} {}",
            query.query_type(),
            request.method,
            request.uri
        );

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            let body: Option<Value> = serde_json::from_slice(&response.body).ok();
            let message = body
                .as_ref()
                .and_then(|b| b.get("error"))
                .and_then(|e| e.get("msg"))
                .and_then(Value::as_str)
                .map(str::to_string);
            log::warn!(
                "{} query failed with status {}: {}",
                query.query_type(),
                response.status,
                message.as_deref().unwrap_or("no message")
            );
            return Err(CoronaError::server(response.status, message, body));
        }

        ResponseParser::parse(&response.body, query)
    }

    pub async fn select(&self, query: &Query, key: Option<&str>) -> Result<QueryResult> {
        self.execute_as(QueryType::Select, query, key).await
    }

    pub async fn more_like_this(&self, query: &Query, key: Option<&str>) -> Result<QueryResult> {
        self.execute_as(QueryType::MoreLikeThis, query, key).await
    }

    pub async fn spellcheck(&self, query: &Query, key: Option<&str>) -> Result<QueryResult> {
        self.execute_as(QueryType::Spellcheck, query, key).await
    }

    pub async fn suggester(&self, query: &Query, key: Option<&str>) -> Result<QueryResult> {
        self.execute_as(QueryType::Suggester, query, key).await
    }

    pub async fn terms(&self, query: &Query, key: Option<&str>) -> Result<QueryResult> {
        self.execute_as(QueryType::Terms, query, key).await
    }

    /// Ping an endpoint, the default one without a key.
    pub async fn ping(&self, key: Option<&str>) -> Result<QueryResult> {
        self.execute(&Query::ping(), key).await
    }

    async fn execute_as(
        &self,
        expected: QueryType,
        query: &Query,
        key: Option<&str>,
    ) -> Result<QueryResult> {
        if query.query_type() != expected {
            return Err(CoronaError::configuration(format!(
                "expected a {expected} query, got {}",
                query.query_type()
            )));
        }
        self.execute(query, key).await
    }
}
