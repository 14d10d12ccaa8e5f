use domain::contract::ContractRequest;
use domain::gateway::sendgrid::is_valid_email;
use domain::Id;
use serde::Deserialize;
use utoipa::ToSchema;

use super::{into_result, Validate};
use crate::error::FieldError;

/// Body of `POST /contracts/send`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendContractParams {
    #[schema(example = "client@example.com")]
    pub(crate) client_email: String,
    /// Must be the authenticated seller's own id.
    #[schema(value_type = String, format = Uuid)]
    pub(crate) seller_user_id: Id,
    /// A meeting hosted by the seller to include in the email and push payload.
    #[schema(value_type = Option<String>, format = Uuid)]
    pub(crate) meeting_id: Option<Id>,
    /// Defaults to the configured contract URL.
    pub(crate) contract_url: Option<String>,
}

impl Validate for SendContractParams {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if !is_valid_email(self.client_email.trim()) {
            errors.push(FieldError::new(
                "clientEmail",
                "clientEmail must be a valid email address",
            ));
        }

        if let Some(url) = self.contract_url.as_deref().map(str::trim) {
            if !url.is_empty() && !(url.starts_with("https://") || url.starts_with("http://")) {
                errors.push(FieldError::new(
                    "contractUrl",
                    "contractUrl must be an http(s) URL",
                ));
            }
        }

        into_result(errors)
    }
}

impl From<SendContractParams> for ContractRequest {
    fn from(params: SendContractParams) -> Self {
        ContractRequest {
            client_email: params.client_email.trim().to_string(),
            meeting_id: params.meeting_id,
            contract_url: params.contract_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bad_email_and_url_are_both_reported() {
        let params: SendContractParams = serde_json::from_value(json!({
            "clientEmail": "not-an-email",
            "sellerUserId": Id::new_v4(),
            "contractUrl": "ftp://contracts"
        }))
        .unwrap();

        let fields: Vec<String> = params
            .validate()
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["clientEmail", "contractUrl"]);
    }

    #[test]
    fn converts_into_trimmed_request() {
        let meeting_id = Id::new_v4();
        let params: SendContractParams = serde_json::from_value(json!({
            "clientEmail": " client@example.com ",
            "sellerUserId": Id::new_v4(),
            "meetingId": meeting_id
        }))
        .unwrap();
        assert!(params.validate().is_ok());

        let request = ContractRequest::from(params);
        assert_eq!(request.client_email, "client@example.com");
        assert_eq!(request.meeting_id, Some(meeting_id));
        assert_eq!(request.contract_url, None);
    }
}
