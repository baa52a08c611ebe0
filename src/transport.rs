//! The HTTP seam between the client and the network.
//!
//! The client never talks to the network itself. It hands a fully resolved
//! [`HttpRequest`] to a [`Transport`] and receives the raw [`HttpResponse`].
//! Tests plug in an in-memory transport; applications use
//! [`ReqwestTransport`](http::ReqwestTransport) (feature `http`).

#[cfg(feature = "http")]
pub mod http;

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::request::Method;

/// A request with an absolute URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URI including the query string for `GET`.
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to a server.
///
/// Implementations report connection failures and timeouts as
/// [`CoronaError::Transport`](crate::CoronaError::Transport). Any response the
/// server produced, whatever its status, is returned as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}
