//! Relay transport trait.
//!
//! Defines the single outbound call the form makes. The HTTP implementation lives in
//! `codeform-ai`; [`MockTransport`] is used by tests and demos.

use crate::{CodeformError, RelayRequest, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Trait that relay clients must implement.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Get the transport name.
    fn name(&self) -> &str;

    /// Send one request to the relay and return its JSON body.
    ///
    /// # Returns
    ///
    /// The parsed body, whatever its shape, or an error when the call could not
    /// complete or the body was not JSON.
    async fn send(&self, request: RelayRequest) -> Result<Value>;
}

/// A scripted transport for testing.
///
/// Replies are consumed in order; once the script runs out every call gets `{}`.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<std::result::Result<Value, String>>>,
    sent: Mutex<Vec<RelayRequest>>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON body.
    pub fn with_response(self, body: Value) -> Self {
        self.lock_replies().push_back(Ok(body));
        self
    }

    /// Queue a network failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.lock_replies().push_back(Err(message.into()));
        self
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<RelayRequest> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().map(|s| s.len()).unwrap_or_default()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<std::result::Result<Value, String>>> {
        self.replies.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RelayTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, request: RelayRequest) -> Result<Value> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);

        match self.lock_replies().pop_front() {
            Some(Ok(body)) => Ok(body),
            Some(Err(message)) => Err(CodeformError::Network(message)),
            None => Ok(Value::Object(Default::default())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mock_transport_replays_script() {
        tokio_test::block_on(async {
            let transport = MockTransport::new()
                .with_response(json!({"choices": []}))
                .with_failure("connection reset");

            let req = RelayRequest::new("p", "sk".into());
            assert_eq!(transport.send(req.clone()).await.unwrap(), json!({"choices": []}));
            assert!(matches!(
                transport.send(req.clone()).await,
                Err(CodeformError::Network(_))
            ));
            assert_eq!(transport.send(req).await.unwrap(), json!({}));
            assert_eq!(transport.call_count(), 3);
        });
    }
}
