//! Claims of the tokens handed to the Zoom Meeting SDK.
//!
//! Zoom reads these names verbatim, hence the JS style casing.

use serde::{Deserialize, Serialize};

use super::SdkRole;

/// Claims of the credential that initializes the SDK on a device.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SdkInitClaims {
    #[serde(rename = "sdkKey")]
    pub(crate) sdk_key: String,
    #[serde(rename = "appKey")]
    pub(crate) app_key: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
    #[serde(rename = "tokenExp")]
    pub(crate) token_exp: i64,
}

/// Claims of the signature that lets the SDK join one meeting with one role.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct JoinSignatureClaims {
    #[serde(rename = "sdkKey")]
    pub(crate) sdk_key: String,
    #[serde(rename = "appKey")]
    pub(crate) app_key: String,
    pub(crate) mn: String,
    pub(crate) role: SdkRole,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
    #[serde(rename = "tokenExp")]
    pub(crate) token_exp: i64,
}
