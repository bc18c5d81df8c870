//! Project-wide constants.

use std::time::Duration;

/// Default primary model when none is configured.
pub const DEFAULT_PRIMARY_MODEL: &str = "meta.llama3-8b-instruct-v1:0";

/// Default fallback model, tried when the primary fails or returns nothing.
pub const DEFAULT_FALLBACK_MODEL: &str = "amazon.titan-text-express-v1";

/// Default AWS region for both Bedrock and S3.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Topic used when the inbound request carries none.
pub const DEFAULT_TOPIC: &str = "AI in Modern DevOps";

/// Prefix for published objects. Full key: `blog-output/<timestamp>.txt`.
pub const KEY_PREFIX: &str = "blog-output";

/// Read timeout for a single generation call. Generous because generation
/// latency is unpredictable.
pub const READ_TIMEOUT: Duration = Duration::from_secs(300);

/// Transport-level attempts owned by the SDK client, not by the fallback plan.
pub const MAX_TRANSPORT_ATTEMPTS: u32 = 3;

/// Build the generation prompt for a topic.
pub fn blog_prompt(topic: &str) -> String {
    format!("Write a clear, 200-word blog post on the topic: {}.", topic)
}
