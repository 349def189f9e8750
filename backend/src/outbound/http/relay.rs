//! Reqwest-backed relay adapter.
//!
//! Forwards a caller-supplied URL with the caller's credentials and hands the
//! upstream JSON back untouched.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use super::body_preview;
use crate::domain::ports::{HttpRelay, HttpRelayError, RelayRequest};

/// Relay adapter issuing GET requests through a shared reqwest client.
#[derive(Clone)]
pub struct ReqwestHttpRelay {
    client: Client,
}

impl ReqwestHttpRelay {
    /// Build a relay whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpRelay for ReqwestHttpRelay {
    async fn forward(&self, request: &RelayRequest) -> Result<Value, HttpRelayError> {
        let url = Url::parse(&request.url)
            .map_err(|err| HttpRelayError::invalid_url(format!("{}: {err}", request.url)))?;

        let mut builder = self
            .client
            .get(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(api_key) = request.api_key.as_deref() {
            builder = builder.header("apikey", api_key);
        }
        if let Some(authorization) = request.authorization.as_deref() {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "relay upstream answered");
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        serde_json::from_slice(body.as_ref())
            .map_err(|err| HttpRelayError::decode(format!("invalid upstream JSON: {err}")))
    }
}

fn map_transport_error(error: reqwest::Error) -> HttpRelayError {
    if error.is_timeout() {
        HttpRelayError::timeout(error.to_string())
    } else {
        HttpRelayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> HttpRelayError {
    HttpRelayError::status(status.as_u16(), body_preview(body))
}

#[cfg(test)]
mod tests {
    //! Exercises the relay against a local wiremock server.

    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[fixture]
    fn relay() -> ReqwestHttpRelay {
        ReqwestHttpRelay::new(Duration::from_secs(5)).expect("client builds")
    }

    fn request(url: String) -> RelayRequest {
        RelayRequest {
            url,
            api_key: Some("key-123".to_owned()),
            authorization: Some("Bearer token".to_owned()),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn forwards_credentials_and_returns_the_body(relay: ReqwestHttpRelay) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/items"))
            .and(header("apikey", "key-123"))
            .and(header("authorization", "Bearer token"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .expect(1)
            .mount(&server)
            .await;

        let body = relay
            .forward(&request(format!("{}/rest/v1/items", server.uri())))
            .await
            .expect("relay succeeds");

        assert_eq!(body, json!([{"id": 1}]));
    }

    #[rstest]
    #[tokio::test]
    async fn omits_absent_credentials(relay: ReqwestHttpRelay) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let request = RelayRequest {
            url: server.uri(),
            api_key: None,
            authorization: None,
        };
        relay.forward(&request).await.expect("relay succeeds");

        let received = server.received_requests().await.expect("recording enabled");
        assert_eq!(received.len(), 1);
        assert!(!received[0].headers.contains_key("apikey"));
        assert!(!received[0].headers.contains_key("authorization"));
    }

    #[rstest]
    #[tokio::test]
    async fn non_success_statuses_keep_the_upstream_status(relay: ReqwestHttpRelay) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("{\"message\": \"no\"}"))
            .mount(&server)
            .await;

        let err = relay
            .forward(&request(server.uri()))
            .await
            .expect_err("401 fails");

        assert_eq!(err, HttpRelayError::status(401_u16, "{\"message\": \"no\"}"));
    }

    #[rstest]
    #[tokio::test]
    async fn non_json_bodies_fail_to_decode(relay: ReqwestHttpRelay) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = relay
            .forward(&request(server.uri()))
            .await
            .expect_err("html fails");

        assert!(matches!(err, HttpRelayError::Decode { .. }));
    }

    #[tokio::test]
    async fn slow_upstreams_time_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;
        let relay = ReqwestHttpRelay::new(Duration::from_millis(50)).expect("client builds");

        let err = relay
            .forward(&request(server.uri()))
            .await
            .expect_err("times out");

        assert!(matches!(err, HttpRelayError::Timeout { .. }));
    }

    #[rstest]
    #[case("not a url")]
    #[case("/relative/path")]
    #[tokio::test]
    async fn unparsable_urls_are_rejected(relay: ReqwestHttpRelay, #[case] url: &str) {
        let err = relay
            .forward(&request(url.to_owned()))
            .await
            .expect_err("invalid url");

        assert!(matches!(err, HttpRelayError::InvalidUrl { .. }));
    }
}
