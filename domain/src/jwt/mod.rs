//! Credentials for the Zoom Meeting SDK.
//!
//! Both tokens are HS256 JWTs signed with the SDK app's client secret:
//!
//! - the init credential authorizes the SDK itself and lives for 48 hours
//! - the join signature authorizes joining a single meeting as a participant or host
//!   and lives for 2 hours
//!
//! `iat` is back-dated by [`CLOCK_SKEW_SECS`] so devices whose clocks run slightly
//! behind do not reject a freshly issued token.
//!
//! ```rust,ignore
//! use domain::jwt::{generate_join_signature, SdkKeys, SdkRole};
//!
//! let keys = SdkKeys::from_config(&config)?;
//! let signature = generate_join_signature(&keys, "85746065432", SdkRole::Participant, Utc::now())?;
//! ```

use crate::error::Error;
use chrono::{DateTime, Utc};
use claims::{JoinSignatureClaims, SdkInitClaims};
use jsonwebtoken::{encode, EncodingKey, Header};
use log::*;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use service::config::Config;

pub use entity::jwt::SdkCredential;

pub(crate) mod claims;

pub const SDK_CLIENT_ID_VAR: &str = "ZOOM_SDK_CLIENT_ID";
pub const SDK_CLIENT_SECRET_VAR: &str = "ZOOM_SDK_CLIENT_SECRET";

pub const CLOCK_SKEW_SECS: i64 = 30;
pub const SDK_INIT_TTL_SECS: i64 = 48 * 60 * 60;
pub const JOIN_SIGNATURE_TTL_SECS: i64 = 2 * 60 * 60;

/// The role a join signature grants. There is no default: callers must say which one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SdkRole {
    Participant,
    Host,
}

impl TryFrom<u8> for SdkRole {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SdkRole::Participant),
            1 => Ok(SdkRole::Host),
            other => Err(format!("role must be 0 or 1, got {other}")),
        }
    }
}

impl From<SdkRole> for u8 {
    fn from(role: SdkRole) -> Self {
        match role {
            SdkRole::Participant => 0,
            SdkRole::Host => 1,
        }
    }
}

/// Key and secret of the Zoom Meeting SDK app.
pub struct SdkKeys {
    key: String,
    secret: SecretString,
}

impl SdkKeys {
    pub fn new(key: impl Into<String>, secret: SecretString) -> Self {
        Self {
            key: key.into(),
            secret,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let key = config.zoom_sdk_client_id().ok_or_else(|| {
            warn!("Zoom SDK client id is not configured");
            Error::config(SDK_CLIENT_ID_VAR)
        })?;
        let secret = config.zoom_sdk_client_secret().ok_or_else(|| {
            warn!("Zoom SDK client secret is not configured");
            Error::config(SDK_CLIENT_SECRET_VAR)
        })?;

        Ok(Self::new(key, SecretString::from(secret)))
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.expose_secret().as_bytes())
    }
}

/// Issues the credential used to initialize the SDK on a device.
pub fn generate_sdk_init_credential(
    keys: &SdkKeys,
    now: DateTime<Utc>,
) -> Result<SdkCredential, Error> {
    let iat = now.timestamp() - CLOCK_SKEW_SECS;
    let exp = iat + SDK_INIT_TTL_SECS;

    let claims = SdkInitClaims {
        sdk_key: keys.key.clone(),
        app_key: keys.key.clone(),
        iat,
        exp,
        token_exp: exp,
    };

    let token = encode(&Header::default(), &claims, &keys.encoding_key())?;
    debug!("Issued SDK init credential valid until {exp}");

    Ok(SdkCredential {
        token,
        expires_in: exp - iat,
    })
}

/// Issues a signature that lets the SDK join meeting `meeting_number` as `role`.
pub fn generate_join_signature(
    keys: &SdkKeys,
    meeting_number: &str,
    role: SdkRole,
    now: DateTime<Utc>,
) -> Result<String, Error> {
    let iat = now.timestamp() - CLOCK_SKEW_SECS;
    let exp = iat + JOIN_SIGNATURE_TTL_SECS;

    let claims = JoinSignatureClaims {
        sdk_key: keys.key.clone(),
        app_key: keys.key.clone(),
        mn: meeting_number.to_string(),
        role,
        iat,
        exp,
        token_exp: exp,
    };

    debug!("Issuing join signature for meeting {meeting_number} with role {role:?}");
    Ok(encode(&Header::default(), &claims, &keys.encoding_key())?)
}
