//! # Corona
//!
//! An asynchronous client for Solr-compatible search servers.
//!
//! ## Features
//!
//! - Named endpoints with a default and leader-aware selection
//! - Typed queries: select, more-like-this, spellcheck, suggester, terms, ping
//! - Pluggable components (facets, highlighting, grouping, stats and more)
//!   that build their own parameters and parse their own result sections
//! - Configuration from TOML or JSON
//! - A swappable transport, with a `reqwest` implementation behind the
//!   `http` feature
//!
//! ## Example
//!
//! ```no_run
//! use corona::component::facet::FacetField;
//! use corona::{Client, ClientConfig, Query};
//!
//! # async fn run() -> corona::Result<()> {
//! let config = ClientConfig::from_toml_str(
//!     r#"
//!     [endpoints.local]
//!     collection = "techproducts"
//!     "#,
//! )?;
//! let client = Client::from_config(&config)?;
//!
//! let query = Query::select("name:ipod").with_component(FacetField::new("cat").with_key("cat"))?;
//! let result = client.select(&query, None).await?;
//! for doc in &result {
//!     println!("{:?}", doc.id());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod component;
pub mod config;
pub mod endpoint;
mod error;
pub mod query;
pub mod request;
pub mod response;
pub mod transport;
mod util;

// Re-exports for the public API
pub use client::Client;
pub use component::registry::ComponentRegistry;
pub use component::{Component, ComponentKind, SubResult};
pub use config::{ClientConfig, EndpointConfig, EndpointDefaults};
pub use endpoint::registry::EndpointRegistry;
pub use endpoint::{Credentials, Endpoint};
pub use error::{CoronaError, ErrorStage, Result};
pub use query::{Query, QueryParams, QueryType};
pub use request::{Method, Params, Request, RequestBuilder, RequestScope};
pub use response::{Document, DocumentList, QueryResult, ResponseParser};
#[cfg(feature = "http")]
pub use transport::http::ReqwestTransport;
pub use transport::{HttpRequest, HttpResponse, Transport};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
