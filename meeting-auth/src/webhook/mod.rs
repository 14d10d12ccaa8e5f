//! Webhook signature validation.

mod hmac;

pub use self::hmac::{encrypt_plain_token, ZoomWebhookValidator, DEFAULT_TIMESTAMP_TOLERANCE_SECS};

use std::collections::HashMap;

use crate::error::Error;

/// Validates that a webhook delivery was signed by its provider.
pub trait WebhookValidator: Send + Sync {
    /// `headers` keys are expected lower-cased. Returns `Ok(false)` for a well-formed
    /// but wrong signature, and an error when the signature is missing or malformed.
    fn validate(&self, headers: &HashMap<String, String>, body: &[u8]) -> Result<bool, Error>;

    fn provider_id(&self) -> &str;
}
