//! Error types for the corona client.
//!
//! Every failure surfaced by the client maps to one stage of the request
//! cycle (see [`ErrorStage`]): configuration and component errors are raised
//! before anything reaches the wire, transport and server errors come back
//! from the remote side, and parse errors mean the response body could not be
//! decoded at all.

use serde_json::Value;
use thiserror::Error;

/// The stage of the request cycle an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStage {
    Config,
    Build,
    Transport,
    Server,
    Parse,
}

/// Errors produced by the corona client.
#[derive(Debug, Error)]
pub enum CoronaError {
    /// Missing, unknown or invalid endpoint configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A component is not supported by the query type it was attached to.
    #[error("component error: {0}")]
    Component(String),

    /// A multi-instance component was attached with a key already in use.
    #[error("duplicate component key: {key}")]
    DuplicateKey { key: String },

    /// Connection, timeout or other network failure reported by the transport.
    #[error("transport error: {message}")]
    Transport { message: String, timed_out: bool },

    /// The server answered with a non-success status code.
    #[error("server returned status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Server {
        status: u16,
        message: Option<String>,
        body: Option<Value>,
    },

    /// The response body could not be decoded.
    #[error("response parse error: {0}")]
    ResponseParse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CoronaError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn component(msg: impl Into<String>) -> Self {
        Self::Component(msg.into())
    }

    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
            timed_out: false,
        }
    }

    pub fn transport_timeout(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
            timed_out: true,
        }
    }

    pub fn server(status: u16, message: Option<String>, body: Option<Value>) -> Self {
        Self::Server {
            status,
            message,
            body,
        }
    }

    pub fn response_parse(msg: impl Into<String>) -> Self {
        Self::ResponseParse(msg.into())
    }

    /// The request stage this error belongs to.
    pub fn stage(&self) -> ErrorStage {
        match self {
            CoronaError::Configuration(_) | CoronaError::Toml(_) => ErrorStage::Config,
            CoronaError::Component(_) | CoronaError::DuplicateKey { .. } => ErrorStage::Build,
            CoronaError::Transport { .. } => ErrorStage::Transport,
            CoronaError::Server { .. } => ErrorStage::Server,
            CoronaError::ResponseParse(_) | CoronaError::Json(_) => ErrorStage::Parse,
        }
    }

    /// Whether the transport reported a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            CoronaError::Transport {
                timed_out: true,
                ..
            }
        )
    }

    /// The HTTP status carried by a server error.
    pub fn status(&self) -> Option<u16> {
        match self {
            CoronaError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for corona operations.
pub type Result<T> = std::result::Result<T, CoronaError>;
