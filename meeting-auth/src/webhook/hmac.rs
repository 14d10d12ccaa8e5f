//! HMAC-SHA256 signatures as used by Zoom webhooks.

use std::collections::HashMap;

use chrono::Duration;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use super::WebhookValidator;
use crate::error::{webhook_error, Error, WebhookErrorKind};
use crate::oauth::token::{Clock, SystemClock};

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_HEADER: &str = "x-zm-signature";
const TIMESTAMP_HEADER: &str = "x-zm-request-timestamp";
const SIGNATURE_VERSION: &str = "v0";

/// How far `x-zm-request-timestamp` may drift from now, in either direction, in seconds.
pub const DEFAULT_TIMESTAMP_TOLERANCE_SECS: i64 = 300;

fn mac_for(secret: &str) -> Result<HmacSha256, Error> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| webhook_error(WebhookErrorKind::InvalidPayload, "Invalid HMAC key"))
}

/// Answer to Zoom's `endpoint.url_validation` challenge: hex HMAC-SHA256 of the
/// plain token keyed with the webhook secret token.
pub fn encrypt_plain_token(secret: &SecretString, plain_token: &str) -> Result<String, Error> {
    let mut mac = mac_for(secret.expose_secret())?;
    mac.update(plain_token.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verifies `x-zm-signature: v0=<hex>` over `v0:{x-zm-request-timestamp}:{body}`.
/// The timestamp is in epoch seconds and must lie within the tolerance of now, so a
/// captured delivery cannot be replayed later.
pub struct ZoomWebhookValidator<C: Clock = SystemClock> {
    secret: SecretString,
    clock: C,
    tolerance: Duration,
}

impl ZoomWebhookValidator<SystemClock> {
    pub fn new(secret: SecretString) -> Self {
        Self::with_clock(
            secret,
            SystemClock,
            Duration::seconds(DEFAULT_TIMESTAMP_TOLERANCE_SECS),
        )
    }
}

impl<C: Clock> ZoomWebhookValidator<C> {
    pub fn with_clock(secret: SecretString, clock: C, tolerance: Duration) -> Self {
        Self {
            secret,
            clock,
            tolerance,
        }
    }

    fn check_timestamp(&self, timestamp: &str) -> Result<(), Error> {
        let sent_at = timestamp.trim().parse::<i64>().map_err(|_| {
            webhook_error(
                WebhookErrorKind::InvalidSignature,
                &format!("Malformed {TIMESTAMP_HEADER}: {timestamp}"),
            )
        })?;
        let drift = self.clock.now().timestamp().saturating_sub(sent_at).saturating_abs();
        if drift > self.tolerance.num_seconds() {
            return Err(webhook_error(
                WebhookErrorKind::StaleTimestamp,
                &format!("{TIMESTAMP_HEADER} is {drift}s away from now"),
            ));
        }
        Ok(())
    }
}

impl<C: Clock> WebhookValidator for ZoomWebhookValidator<C> {
    fn validate(&self, headers: &HashMap<String, String>, body: &[u8]) -> Result<bool, Error> {
        let signature = headers.get(SIGNATURE_HEADER).ok_or_else(|| {
            webhook_error(
                WebhookErrorKind::MissingSignature,
                &format!("Missing signature header: {SIGNATURE_HEADER}"),
            )
        })?;
        let timestamp = headers.get(TIMESTAMP_HEADER).ok_or_else(|| {
            webhook_error(
                WebhookErrorKind::MissingSignature,
                &format!("Missing timestamp header: {TIMESTAMP_HEADER}"),
            )
        })?;

        self.check_timestamp(timestamp)?;

        let expected = signature
            .strip_prefix("v0=")
            .and_then(|hex_sig| hex::decode(hex_sig).ok())
            .ok_or_else(|| {
                webhook_error(WebhookErrorKind::InvalidSignature, "Invalid signature format")
            })?;

        let mut mac = mac_for(self.secret.expose_secret())?;
        mac.update(format!("{SIGNATURE_VERSION}:{timestamp}:").as_bytes());
        mac.update(body);

        Ok(mac.verify_slice(&expected).is_ok())
    }

    fn provider_id(&self) -> &str {
        "zoom"
    }
}
