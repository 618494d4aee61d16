//! The single HTTP primitive shared by every relay operation.
//!
//! This is the one error boundary of the client: any failure during send or
//! body retrieval is caught here and collapsed into a
//! [`NormalizedResult`], so nothing above the transport ever observes a
//! raised fault.

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use crate::normalize::{normalize, NormalizedResult};

/// Configuration for the relay client.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Base URL of the relay service (e.g. `http://localhost:8001`),
    /// concatenated directly with endpoint paths.
    pub base_url: String,
    /// How often the poller refreshes the peer directory.
    pub poll_interval: Duration,
    /// TCP connection timeout.
    pub connect_timeout: Duration,
    /// Per-request read timeout.
    pub request_timeout: Duration,
}

impl RelayConfig {
    /// Create a config with sensible defaults.
    ///
    /// - poll_interval: 5 s
    /// - connect_timeout: 3 s
    /// - request_timeout: 10 s
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            poll_interval: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(3),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Issues one HTTP request and returns a normalized result. Never raises.
#[derive(Debug, Clone)]
pub struct RelayTransport {
    base_url: String,
    client: reqwest::Client,
}

impl RelayTransport {
    pub fn new(config: &RelayConfig) -> Self {
        // reqwest::Client::builder() can fail in extreme environments, but
        // unwrap_or_default() falls back to a default client instead of panicking.
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_default();

        Self {
            base_url: config.base_url.clone(),
            client,
        }
    }

    /// Send `method` to `base_url + endpoint`, optionally with a JSON body.
    ///
    /// The payload is silently dropped for GET requests: the relay's
    /// `/get-messages` operation supplies one, but the wire never carries
    /// it, matching the deployed service. The HTTP status code is
    /// deliberately not consulted — a 500 with a JSON body normalizes
    /// exactly like a 200.
    pub async fn send(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<&Value>,
    ) -> NormalizedResult {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = payload {
            if method == Method::GET {
                debug!(%url, "payload dropped on GET request");
            } else {
                request = request.json(body);
            }
        }

        debug!(%url, %method, "relay request");
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "relay request failed");
                return NormalizedResult::errored(e.to_string());
            }
        };

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(%url, error = %e, "relay body read failed");
                return NormalizedResult::errored(e.to_string());
            }
        };

        normalize(&text)
    }
}
