#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use corona::{
    Client, CoronaError, Endpoint, EndpointRegistry, HttpRequest, HttpResponse, Transport,
};

/// In-memory transport that answers every request with the same response and
/// records what it was asked to send.
#[derive(Debug)]
pub struct MockTransport {
    status: u16,
    body: Vec<u8>,
    /// When set, every send fails with a transport error; `true` marks a timeout.
    failure: Option<bool>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new(status: u16, body: Value) -> Arc<Self> {
        Self::raw(status, body.to_string())
    }

    pub fn raw(status: u16, body: impl Into<Vec<u8>>) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.into(),
            failure: None,
            sent: Mutex::new(Vec::new()),
        })
    }

    /// A transport whose sends always fail.
    pub fn failing(timed_out: bool) -> Arc<Self> {
        Arc::new(Self {
            status: 0,
            body: Vec::new(),
            failure: Some(timed_out),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request sent")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> corona::Result<HttpResponse> {
        let uri = request.uri.clone();
        self.sent.lock().unwrap().push(request);
        match self.failure {
            Some(true) => Err(CoronaError::transport_timeout(format!(
                "request to {uri} timed out"
            ))),
            Some(false) => Err(CoronaError::transport(format!("connection to {uri} refused"))),
            None => Ok(HttpResponse::new(self.status, self.body.clone())),
        }
    }
}

/// Endpoints `a` (default) and `b` on different hosts.
pub fn two_endpoints() -> EndpointRegistry {
    EndpointRegistry::new()
        .with_endpoint(
            Endpoint::builder("a")
                .host("solr-a")
                .collection("techproducts")
                .build()
                .unwrap(),
        )
        .with_endpoint(
            Endpoint::builder("b")
                .host("solr-b")
                .collection("techproducts")
                .build()
                .unwrap(),
        )
}

pub fn client_with(transport: Arc<MockTransport>) -> Client {
    Client::new(two_endpoints(), transport)
}

/// Decode the parameters of a GET request's query string or a POST body.
pub fn sent_params(request: &HttpRequest) -> Vec<(String, String)> {
    let encoded = match &request.body {
        Some(body) => String::from_utf8(body.clone()).unwrap(),
        None => request
            .uri
            .split_once('?')
            .map(|(_, query)| query.to_string())
            .unwrap_or_default(),
    };
    encoded
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (
                urlencoding::decode(name).unwrap().into_owned(),
                urlencoding::decode(value).unwrap().into_owned(),
            )
        })
        .collect()
}

pub fn param<'a>(params: &'a [(String, String)], name: &str) -> Vec<&'a str> {
    params
        .iter()
        .filter(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
        .collect()
}
