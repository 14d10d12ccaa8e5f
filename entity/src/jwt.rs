use serde::Serialize;
use utoipa::ToSchema;

/// A signed credential handed to the mobile Meeting SDK.
/// Note: This struct does not have a corresponding entity in the database.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = jwt::SdkCredential)]
pub struct SdkCredential {
    #[serde(rename = "jwtToken")]
    pub token: String,
    /// Seconds between issue and expiry.
    pub expires_in: i64,
}
