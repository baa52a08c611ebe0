//! HTTP transport backed by `reqwest`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{CoronaError, Result};
use crate::request::Method;
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Default connect timeout. Request timeouts come from each endpoint.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A [`Transport`] over a shared `reqwest` connection pool.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| CoronaError::transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Use an already configured client, e.g. one with custom TLS roots.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("connect_timeout", &CONNECT_TIMEOUT)
            .finish()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.uri),
            Method::Post => self.client.post(&request.uri),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CoronaError::transport_timeout(format!(
                        "request to {} timed out: {e}",
                        request.uri
                    ))
                } else if e.is_connect() {
                    CoronaError::transport(format!("failed to connect to {}: {e}", request.uri))
                } else {
                    CoronaError::transport(format!("request to {} failed: {e}", request.uri))
                }
            })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                CoronaError::transport_timeout(format!("reading body timed out: {e}"))
            } else {
                CoronaError::transport(format!("failed to read response body: {e}"))
            }
        })?;

        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}
