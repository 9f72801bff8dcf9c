//! HTTP transport from the form to the relay endpoint.

use async_trait::async_trait;
use codeform_core::{CodeformError, RelayRequest, RelayTransport, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

/// Posts [`RelayRequest`]s to a relay URL.
///
/// The status code is not inspected and no timeout is imposed; the body is expected to
/// be JSON in every case.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    /// Create a transport for the relay at `url` (e.g. `http://127.0.0.1:3000/api/paraphrase`).
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| CodeformError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RelayTransport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, request), fields(url = %self.url))]
    async fn send(&self, request: RelayRequest) -> Result<Value> {
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CodeformError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CodeformError::Network(e.to_string()))?;
        debug!(%status, body_len = text.len(), "relay replied");

        serde_json::from_str(&text).map_err(|e| {
            CodeformError::Network(format!("relay returned a non-JSON body ({}): {}", status, e))
        })
    }
}
