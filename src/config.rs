//! Runtime configuration.
//!
//! An explicit struct passed into each component at construction — no
//! hidden process-global lookups past this point. Every field has a
//! documented default so the whole surface is optional.

use crate::consts::{
    DEFAULT_FALLBACK_MODEL, DEFAULT_PRIMARY_MODEL, DEFAULT_REGION,
};

/// Environment variable naming the primary model.
pub const ENV_PRIMARY_MODEL: &str = "MODEL_ID";
/// Environment variable naming the fallback model.
pub const ENV_FALLBACK_MODEL: &str = "FALLBACK_MODEL_ID";
/// Environment variable naming the AWS region.
pub const ENV_REGION: &str = "AWS_REGION";
/// Environment variable naming the destination bucket. Absent or empty
/// disables publishing entirely.
pub const ENV_BUCKET: &str = "BLOG_S3_BUCKET";

#[derive(Debug, Clone)]
pub struct Config {
    /// Tried first. Default: [`DEFAULT_PRIMARY_MODEL`].
    pub primary_model: String,
    /// Tried when the primary fails or yields nothing. Default:
    /// [`DEFAULT_FALLBACK_MODEL`].
    pub fallback_model: String,
    /// Region for both the generation and object-store clients.
    pub region: String,
    /// Destination bucket. `None` means publishing is disabled (not an error).
    pub bucket: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary_model: DEFAULT_PRIMARY_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            region: DEFAULT_REGION.to_string(),
            bucket: None,
        }
    }
}

impl Config {
    /// Load from the environment, falling back to defaults per field.
    /// An empty bucket variable counts as unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            primary_model: env_or(ENV_PRIMARY_MODEL, defaults.primary_model),
            fallback_model: env_or(ENV_FALLBACK_MODEL, defaults.fallback_model),
            region: env_or(ENV_REGION, defaults.region),
            bucket: std::env::var(ENV_BUCKET)
                .ok()
                .filter(|b| !b.trim().is_empty()),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => val,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_consts() {
        let config = Config::default();
        assert_eq!(config.primary_model, DEFAULT_PRIMARY_MODEL);
        assert_eq!(config.fallback_model, DEFAULT_FALLBACK_MODEL);
        assert_eq!(config.region, DEFAULT_REGION);
        assert!(config.bucket.is_none());
    }

    #[test]
    fn env_or_prefers_set_value() {
        // Process env mutation is racy across parallel tests, so exercise
        // the helper against a variable this test owns.
        unsafe { std::env::set_var("SCRIBE_TEST_ENV_OR", "custom") };
        assert_eq!(
            env_or("SCRIBE_TEST_ENV_OR", "default".to_string()),
            "custom"
        );
        unsafe { std::env::remove_var("SCRIBE_TEST_ENV_OR") };
    }

    #[test]
    fn env_or_treats_blank_as_unset() {
        unsafe { std::env::set_var("SCRIBE_TEST_ENV_BLANK", "   ") };
        assert_eq!(
            env_or("SCRIBE_TEST_ENV_BLANK", "default".to_string()),
            "default"
        );
        unsafe { std::env::remove_var("SCRIBE_TEST_ENV_BLANK") };
    }

    #[test]
    fn env_or_missing_uses_default() {
        assert_eq!(
            env_or("SCRIBE_TEST_ENV_MISSING", "default".to_string()),
            "default"
        );
    }
}
