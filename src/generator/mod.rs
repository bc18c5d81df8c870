//! Generation: provider request bodies, the opaque remote-call seam, and
//! the linear model-fallback loop.

pub mod bedrock;
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::consts::blog_prompt;
use crate::normalize::normalize;

/// How the request body for a model family is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// Instruction-tuned completion models: tagged prompt plus sampling knobs.
    Instruct,
    /// Plain input/max-tokens models.
    SimpleInput,
}

impl PromptStyle {
    /// Build the provider-shaped request body for a prompt.
    pub fn build_body(&self, prompt: &str) -> serde_json::Value {
        match self {
            PromptStyle::Instruct => json!({
                "prompt": format!("<s>[INST] {} [/INST]", prompt),
                "max_gen_len": 512,
                "temperature": 0.5,
                "top_p": 0.9,
            }),
            PromptStyle::SimpleInput => json!({
                "input": prompt,
                "max_tokens_to_sample": 512,
                "temperature": 0.5,
            }),
        }
    }
}

/// One entry in the fallback plan.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub model_id: String,
    pub style: PromptStyle,
}

/// The ordered list of models to try. Plan order is the sole priority
/// signal; adding a third fallback is a data change, not a code change.
#[derive(Debug, Clone)]
pub struct FallbackPlan {
    attempts: Vec<Attempt>,
}

impl FallbackPlan {
    pub fn new(attempts: Vec<Attempt>) -> Self {
        Self { attempts }
    }

    /// The default two-entry plan: configured primary with the instruct
    /// body, configured fallback with the simple-input body.
    pub fn from_config(config: &Config) -> Self {
        Self::new(vec![
            Attempt {
                model_id: config.primary_model.clone(),
                style: PromptStyle::Instruct,
            },
            Attempt {
                model_id: config.fallback_model.clone(),
                style: PromptStyle::SimpleInput,
            },
        ])
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }
}

/// The opaque remote generation call. Could be Bedrock, or a test script.
///
/// `Ok(None)` means the provider answered without a body — "nothing here,
/// move on", distinct from a failed call.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn invoke(&self, model_id: &str, body: &serde_json::Value) -> Result<Option<Vec<u8>>>;
}

/// Tries the plan in order and returns the first non-empty normalized text.
pub struct Generator {
    client: Arc<dyn ModelClient>,
    plan: FallbackPlan,
}

impl Generator {
    pub fn new(client: Arc<dyn ModelClient>, plan: FallbackPlan) -> Self {
        Self { client, plan }
    }

    /// Generate a blog post for a topic.
    ///
    /// Failed and empty attempts are logged and skipped, never propagated.
    /// Returns `""` when the whole plan is exhausted — the canonical
    /// "no blog produced" sentinel, not an error.
    pub async fn generate(&self, topic: &str) -> String {
        let prompt = blog_prompt(topic);

        for attempt in self.plan.attempts() {
            let body = attempt.style.build_body(&prompt);
            info!(model = %attempt.model_id, "invoking model");

            match self.client.invoke(&attempt.model_id, &body).await {
                Ok(Some(bytes)) => {
                    // Lossy decode: an encoding glitch never sinks the attempt.
                    let decoded = String::from_utf8_lossy(&bytes);
                    let text = normalize(&decoded);
                    if !text.is_empty() {
                        info!(model = %attempt.model_id, "blog generated");
                        return text;
                    }
                    warn!(model = %attempt.model_id, "model returned no usable text");
                }
                Ok(None) => {
                    warn!(model = %attempt.model_id, "response had no body");
                }
                Err(e) => {
                    warn!(model = %attempt.model_id, error = %e, "model invocation failed");
                }
            }
        }

        warn!("all models failed or returned no text");
        String::new()
    }
}
