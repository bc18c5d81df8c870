use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::ModelClient;

/// A scripted outcome for one invocation.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Respond with these raw bytes.
    Body(Vec<u8>),
    /// Respond with no body at all.
    NoBody,
    /// Fail the call with this message.
    Fail(String),
}

impl MockOutcome {
    /// Convenience: a JSON response body.
    pub fn json(value: serde_json::Value) -> Self {
        Self::Body(value.to_string().into_bytes())
    }
}

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct Request {
    pub model_id: String,
    pub body: serde_json::Value,
}

/// A scripted model client for tests. Returns pre-defined outcomes in
/// order and records every invocation.
pub struct MockClient {
    outcomes: Vec<MockOutcome>,
    calls: AtomicUsize,
    requests: Mutex<Vec<Request>>,
}

impl MockClient {
    pub fn new(outcomes: Vec<MockOutcome>) -> Self {
        Self {
            outcomes,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// How many times `invoke` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every invocation so far, in call order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for MockClient {
    async fn invoke(&self, model_id: &str, body: &serde_json::Value) -> Result<Option<Vec<u8>>> {
        self.requests.lock().unwrap().push(Request {
            model_id: model_id.to_string(),
            body: body.clone(),
        });
        let i = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcomes.get(i) {
            Some(MockOutcome::Body(bytes)) => Ok(Some(bytes.clone())),
            Some(MockOutcome::NoBody) => Ok(None),
            Some(MockOutcome::Fail(message)) => Err(anyhow!("{}", message)),
            None => Err(anyhow!(
                "MockClient: no more outcomes (called {} times)",
                i + 1
            )),
        }
    }
}
