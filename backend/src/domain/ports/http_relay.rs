//! Driven port for relaying authenticated GET requests to a third party.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::Error;

use super::define_port_error;

/// Outbound request forwarded by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    /// Absolute URL to call.
    pub url: String,
    /// Value sent in the `apikey` header.
    pub api_key: Option<String>,
    /// Value sent in the `Authorization` header.
    pub authorization: Option<String>,
}

define_port_error! {
    /// Errors surfaced while relaying a request.
    pub enum HttpRelayError {
        /// The request URL could not be parsed.
        InvalidUrl { message: String } => "relay url invalid: {message}",
        /// Network transport failed before a response arrived.
        Transport { message: String } => "relay transport failed: {message}",
        /// The upstream call exceeded its timeout.
        Timeout { message: String } => "relay timeout: {message}",
        /// The upstream answered with a non-success status.
        Status { status: u16, body: String } => "upstream returned status {status}: {body}",
        /// The upstream body was not JSON.
        Decode { message: String } => "relay response decode failed: {message}",
    }
}

/// Port for forwarding a GET request and returning the JSON answer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpRelay: Send + Sync {
    async fn forward(&self, request: &RelayRequest) -> Result<Value, HttpRelayError>;
}

/// Fixture relay answering every request with an empty JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureHttpRelay;

#[async_trait]
impl HttpRelay for FixtureHttpRelay {
    async fn forward(&self, _request: &RelayRequest) -> Result<Value, HttpRelayError> {
        Ok(Value::Object(serde_json::Map::new()))
    }
}

impl From<HttpRelayError> for Error {
    fn from(err: HttpRelayError) -> Self {
        match err {
            HttpRelayError::InvalidUrl { message } => Error::invalid_request(message),
            HttpRelayError::Timeout { message } => Error::service_unavailable(message),
            other @ (HttpRelayError::Transport { .. }
            | HttpRelayError::Status { .. }
            | HttpRelayError::Decode { .. }) => Error::upstream_failure(other.to_string()),
        }
    }
}
