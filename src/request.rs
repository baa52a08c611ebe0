//! Wire request construction.
//!
//! [`RequestBuilder::build`] turns a [`Query`] into a [`Request`]: the base
//! builder for the query type writes the handler and base parameters, then
//! every attached component contributes its own parameters in the fixed order
//! its query type declares.

use std::fmt;

use crate::component::registry::ComponentRegistry;
use crate::error::Result;
use crate::query::{Query, QueryParams};

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// Which base URI of an endpoint a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestScope {
    Server,
    Collection,
    #[default]
    Core,
}

/// Ordered request parameters. Names may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, keeping any existing values for the name.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    /// Append a value when one is present.
    pub fn add_opt<V: ToString>(&mut self, name: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.add(name, value.to_string());
        }
        self
    }

    /// Replace every value for the name with a single value.
    ///
    /// The value keeps the position of the first existing entry.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.entries.iter().position(|(n, _)| *n == name) {
            Some(first) => {
                self.entries[first].1 = value;
                let mut index = 0;
                self.entries.retain(|(n, _)| {
                    let keep = index <= first || *n != name;
                    index += 1;
                    keep
                });
            }
            None => self.entries.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn extend(&mut self, other: &Params) {
        self.entries.extend(other.entries.iter().cloned());
    }

    /// Percent-encoded `name=value&...` form.
    pub fn to_query_string(&self) -> String {
        self.entries
            .iter()
            .map(|(n, v)| format!("{}={}", urlencoding::encode(n), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

/// A request ready for a transport, minus the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Handler path relative to the scope's base URI, e.g. `select`.
    pub handler: String,
    pub scope: RequestScope,
    pub params: Params,
    pub body: Option<Vec<u8>>,
    pub content_type: Option<String>,
}

impl Request {
    pub fn new(handler: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            handler: handler.into(),
            scope: RequestScope::Core,
            params: Params::new(),
            body: None,
            content_type: None,
        }
    }
}

/// Builds wire requests from queries.
pub struct RequestBuilder;

impl RequestBuilder {
    pub fn build(query: &Query) -> Result<Request> {
        let query_type = query.query_type();
        let registry = ComponentRegistry::for_type(query_type);

        let mut request = Request::new(
            query
                .handler()
                .unwrap_or_else(|| query_type.default_handler()),
        );
        request.scope = query.scope();
        request.params.add("wt", "json");
        request.params.add("json.nl", "flat");

        Self::build_base(query.params(), &mut request.params);
        request.params.extend(query.extra_params());

        for component in query.ordered_components() {
            // Attach-time validation makes this lookup infallible for attached kinds.
            let handler = registry.handler(component.kind())?;
            (handler.build)(component, &mut request.params);
        }

        if query.method() == Method::Post {
            request.method = Method::Post;
            request.body = Some(request.params.to_query_string().into_bytes());
            request.content_type =
                Some("application/x-www-form-urlencoded; charset=UTF-8".to_string());
            request.params = Params::new();
        }

        Ok(request)
    }

    fn build_base(params: &QueryParams, out: &mut Params) {
        match params {
            QueryParams::Select(select) => select.write_params(out),
            QueryParams::MoreLikeThis(mlt) => mlt.write_params(out),
            QueryParams::Spellcheck(spellcheck) => spellcheck.write_params(out),
            QueryParams::Suggester(suggester) => suggester.write_params(out),
            QueryParams::Terms(terms) => terms.write_params(out),
            QueryParams::Ping => {}
        }
    }
}
