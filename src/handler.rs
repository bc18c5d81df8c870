//! The request/response envelope: API-gateway-shaped event in, structured
//! JSON response out.
//!
//! Pure glue around [`Generator`] and [`Publisher`]. Hosting (HTTP server,
//! event trigger) stays outside this crate; the envelope is just data.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;

use crate::consts::DEFAULT_TOPIC;
use crate::generator::Generator;
use crate::publisher::Publisher;

/// Inbound request body. Everything is optional; a missing or unparsable
/// body means the default topic.
#[derive(Debug, Deserialize)]
struct EventBody {
    blog_topic: Option<String>,
}

/// Outbound response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseBody {
    pub message: String,
    pub generated: bool,
    pub content: Option<String>,
    /// Set when the blog was uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
    /// Set when the upload failed. A warning, never a request failure:
    /// generation already succeeded by then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_error: Option<String>,
}

/// The proxy-integration envelope around [`ResponseBody`].
#[derive(Debug, Serialize, Deserialize)]
pub struct HttpResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Permissive CORS headers for browser callers.
fn cors_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        (
            "Access-Control-Allow-Methods".to_string(),
            "OPTIONS,POST,GET".to_string(),
        ),
        (
            "Access-Control-Allow-Headers".to_string(),
            "Content-Type,Authorization,X-Amz-Date,X-Api-Key,X-Amz-Security-Token".to_string(),
        ),
    ])
}

/// Pull the topic out of a raw event. The event's `body` may be a JSON
/// string or an embedded object; anything else falls back to the default.
pub fn topic_from_event(event: &str) -> String {
    let event: Value = match serde_json::from_str(event) {
        Ok(value) => value,
        Err(_) => return DEFAULT_TOPIC.to_string(),
    };

    let body: Option<EventBody> = match event.get("body") {
        Some(Value::String(raw)) => serde_json::from_str(raw).ok(),
        Some(value @ Value::Object(_)) => serde_json::from_value(value.clone()).ok(),
        _ => None,
    };

    body.and_then(|b| b.blog_topic)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TOPIC.to_string())
}

/// Decodes the event, runs generation, optionally publishes, and shapes
/// the response.
pub struct Handler {
    generator: Generator,
    publisher: Publisher,
}

impl Handler {
    pub fn new(generator: Generator, publisher: Publisher) -> Self {
        Self {
            generator,
            publisher,
        }
    }

    /// Handle one event end-to-end. Always produces a structured response:
    /// 200 with the content when generation succeeded, 502 when every model
    /// in the plan came up empty.
    pub async fn handle(&self, event: &str) -> HttpResponse {
        let topic = topic_from_event(event);
        info!(topic = %topic, "handling generation request");

        let text = self.generator.generate(&topic).await;
        let generated = !text.is_empty();

        let mut body = ResponseBody {
            message: "Blog Generation completed".to_string(),
            generated,
            content: generated.then(|| text.clone()),
            s3_key: None,
            upload_error: None,
        };

        if generated && self.publisher.enabled() {
            match self.publisher.publish(&text).await {
                Ok(key) => body.s3_key = Some(key),
                Err(e) => body.upload_error = Some(e.to_string()),
            }
        }

        let status_code = if generated { 200 } else { 502 };

        HttpResponse {
            status_code,
            headers: cors_headers(),
            // Strings, bools, and options only; this cannot fail to encode.
            body: serde_json::to_string(&body).expect("response body serializes"),
        }
    }
}
