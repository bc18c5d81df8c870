//! The real model client, over the Bedrock runtime `InvokeModel` API.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::primitives::Blob;

use super::ModelClient;
use crate::consts::{MAX_TRANSPORT_ATTEMPTS, READ_TIMEOUT};

const CONTENT_TYPE: &str = "application/json";

pub struct BedrockClient {
    client: Client,
}

impl BedrockClient {
    /// Resolve credentials and region, with the wide read timeout and the
    /// SDK-owned transport retries applied. Retries here are reconnect
    /// attempts for one call, not the model fallback.
    pub async fn new(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .timeout_config(
                TimeoutConfig::builder()
                    .read_timeout(READ_TIMEOUT)
                    .build(),
            )
            .retry_config(RetryConfig::standard().with_max_attempts(MAX_TRANSPORT_ATTEMPTS))
            .load()
            .await;

        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl ModelClient for BedrockClient {
    async fn invoke(&self, model_id: &str, body: &serde_json::Value) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type(CONTENT_TYPE)
            .accept(CONTENT_TYPE)
            .body(Blob::new(serde_json::to_vec(body)?))
            .send()
            .await
            .with_context(|| format!("invoke_model failed for {}", model_id))?;

        let bytes = response.body.into_inner();
        if bytes.is_empty() {
            Ok(None)
        } else {
            Ok(Some(bytes))
        }
    }
}
