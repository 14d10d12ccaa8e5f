//! Contract dispatch: tells a client about a contract by email and push notification.
//!
//! Delivery problems never fail the request. Each channel reports whether it went out,
//! and push reports why not, so the seller's app can show a partial success.

use crate::emails::{self, ContractEmail, MeetingInvite};
use crate::error::Error;
use crate::gateway::{fcm, Gateways};
use crate::{meeting, meetings, user, users, Id};
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use service::config::Config;
use std::collections::BTreeMap;

const PUSH_TITLE: &str = "New Contract Received";
const PUSH_CLICK_ACTION: &str = "OPEN_FROM_NOTIFICATION";

#[derive(Debug, Clone)]
pub struct ContractRequest {
    pub client_email: String,
    pub meeting_id: Option<Id>,
    /// Falls back to the configured contract URL.
    pub contract_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub contract_url: String,
    pub email_sent: bool,
    pub push_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_error: Option<String>,
}

/// Sends the contract from `seller` to the client named in `request`. The attached
/// meeting, if any, must be hosted by `seller`.
pub async fn send(
    db: &DatabaseConnection,
    gateways: &Gateways,
    config: &Config,
    seller: &users::Model,
    request: ContractRequest,
) -> Result<Delivery, Error> {
    let contract_url = request
        .contract_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(config.contract_url())
        .to_string();

    let meeting = match request.meeting_id {
        Some(id) => {
            let meeting = meeting::find_by_id(db, id).await?;
            if meeting.host_user_id != seller.id {
                warn!("Seller {} tried to attach meeting {id} they do not host", seller.id);
                return Err(Error::not_found());
            }
            Some(meeting)
        }
        None => None,
    };
    let deeplink = meeting.as_ref().map(|m| {
        meeting::join_deeplink(
            config.deeplink_scheme(),
            &m.zoom_meeting_id,
            m.password.as_deref(),
        )
    });

    let client = user::find_by_email(db, &request.client_email).await?;
    let client_name = client
        .as_ref()
        .map(|c| c.display_name().to_string())
        .unwrap_or_else(|| name_from_email(&request.client_email));
    let seller_name = seller.display_name();

    info!(
        "Seller {} is sending a contract to {} (registered: {})",
        seller.id,
        request.client_email,
        client.is_some()
    );

    let email = ContractEmail {
        client_name: &client_name,
        seller_name,
        contract_url: &contract_url,
        meeting: meeting
            .as_ref()
            .zip(deeplink.as_deref())
            .map(|(m, deeplink)| MeetingInvite {
                title: &m.title,
                zoom_meeting_id: &m.zoom_meeting_id,
                password: m.password.as_deref(),
                join_url: m.join_url.as_deref(),
                deeplink,
            }),
    };
    let email_sent = match &gateways.email {
        Some(mailer) => match emails::send_contract_email(mailer, &request.client_email, &email)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                warn!("Contract email to {} failed: {err}", request.client_email);
                false
            }
        },
        None => {
            warn!("SendGrid is not configured, skipping contract email");
            false
        }
    };

    let push = push_contract(
        gateways.push.as_ref(),
        client.as_ref(),
        seller_name,
        &contract_url,
        meeting.as_ref(),
        deeplink.as_deref(),
    )
    .await;
    if let Err(reason) = &push {
        warn!("Contract push to {} not sent: {reason}", request.client_email);
    }

    Ok(Delivery {
        contract_url,
        email_sent,
        push_sent: push.is_ok(),
        push_error: push.err(),
    })
}

async fn push_contract(
    push: Option<&fcm::Client>,
    client: Option<&users::Model>,
    seller_name: &str,
    contract_url: &str,
    meeting: Option<&meetings::Model>,
    deeplink: Option<&str>,
) -> Result<(), String> {
    let client = client.ok_or("User not found or not registered in app")?;
    let token = client
        .fcm_token
        .as_deref()
        .filter(|token| !token.is_empty())
        .ok_or("User has not enabled push notifications")?;
    let push = push.ok_or("Push notifications are not configured")?;

    let mut data = BTreeMap::from([
        ("type".to_string(), "contract".to_string()),
        ("contractUrl".to_string(), contract_url.to_string()),
        ("sellerName".to_string(), seller_name.to_string()),
        (
            "meetingId".to_string(),
            meeting.map(|m| m.id.to_string()).unwrap_or_default(),
        ),
        (
            "meetingDeeplink".to_string(),
            deeplink.unwrap_or_default().to_string(),
        ),
    ]);

    let body = format!("{seller_name} has sent you a contract to review");
    let message = match deeplink {
        Some(deeplink) => {
            data.insert("deeplink".to_string(), deeplink.to_string());
            fcm::Message::new(token, PUSH_TITLE, body, data).with_click_action(PUSH_CLICK_ACTION)
        }
        None => fcm::Message::new(token, PUSH_TITLE, body, data),
    };

    push.send(&message)
        .await
        .map(|_| ())
        .map_err(|err| err.to_string())
}

/// "casey.client@example.com" -> "casey.client"
fn name_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).trim().to_string()
}


#[cfg(test)]
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::test_support::{config, full_config};
    use crate::{
        fcm_platform::FcmPlatform, meeting_status::MeetingStatus, meeting_type::MeetingType,
        roles::Role,
    };
    use mockito::Matcher;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn user(email: &str, role: Role, fcm_token: Option<&str>) -> users::Model {
        let now = chrono::Utc::now();
        users::Model {
            id: Id::new_v4(),
            email: email.to_string(),
            name: Some(if role == Role::Seller { "Sam Seller" } else { "Casey" }.to_string()),
            role,
            fcm_token: fcm_token.map(str::to_string),
            fcm_platform: fcm_token.map(|_| FcmPlatform::Ios),
            fcm_updated_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn meeting(host: Id) -> meetings::Model {
        let now = chrono::Utc::now();
        meetings::Model {
            id: Id::new_v4(),
            zoom_meeting_id: "123".to_string(),
            host_user_id: host,
            title: "Q3 renewal".to_string(),
            password: Some("abc".to_string()),
            join_url: Some("https://zoom.us/j/123".to_string()),
            start_time: None,
            duration: 30,
            meeting_type: MeetingType::Instant,
            status: MeetingStatus::Created,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn request(meeting_id: Option<Id>) -> ContractRequest {
        ContractRequest {
            client_email: "casey@example.com".to_string(),
            meeting_id,
            contract_url: None,
        }
    }

    #[tokio::test]
    async fn unconfigured_channels_yield_partial_success() {
        let seller = user("seller@dealflow.dev", Role::Seller, None);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<users::Model>::new()])
            .into_connection();
        let config = config("http://127.0.0.1:9");
        let gateways = Gateways::new(&config).unwrap();

        let delivery = send(&db, &gateways, &config, &seller, request(None)).await.unwrap();

        assert_eq!(
            delivery,
            Delivery {
                contract_url: "https://docs.google.com/".to_string(),
                email_sent: false,
                push_sent: false,
                push_error: Some("User not found or not registered in app".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn registered_client_gets_email_and_push_with_meeting_links() {
        let mut server = mockito::Server::new_async().await;
        let mail = server
            .mock("POST", "/mail/send")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "subject": "Contract from Sam Seller - Q3 renewal"
            })))
            .with_status(202)
            .create_async()
            .await;
        let _google = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"ya29.test","expires_in":3599}"#)
            .create_async()
            .await;
        let push = server
            .mock("POST", "/v1/projects/dealflow-test/messages:send")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "message": {
                    "token": "device-token",
                    "notification": { "body": "Sam Seller has sent you a contract to review" },
                    "data": {
                        "type": "contract",
                        "deeplink": "dealflow://join?meetingId=123&password=abc",
                        "meetingDeeplink": "dealflow://join?meetingId=123&password=abc"
                    },
                    "android": { "notification": { "click_action": "OPEN_FROM_NOTIFICATION" } }
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"projects/dealflow-test/messages/1"}"#)
            .create_async()
            .await;

        let seller = user("seller@dealflow.dev", Role::Seller, None);
        let client = user("casey@example.com", Role::Client, Some("device-token"));
        let attached = meeting(seller.id);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![attached.clone()]])
            .append_query_results(vec![vec![client]])
            .into_connection();
        let config = full_config(&server.url());
        let gateways = Gateways::new(&config).unwrap();

        let delivery = send(&db, &gateways, &config, &seller, request(Some(attached.id)))
            .await
            .unwrap();

        assert!(delivery.email_sent);
        assert!(delivery.push_sent);
        assert_eq!(delivery.push_error, None);
        mail.assert_async().await;
        push.assert_async().await;
    }

    #[tokio::test]
    async fn meeting_of_another_host_is_not_found() {
        let seller = user("seller@dealflow.dev", Role::Seller, None);
        let foreign = meeting(Id::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![foreign.clone()]])
            .into_connection();
        let config = config("http://127.0.0.1:9");
        let gateways = Gateways::new(&config).unwrap();

        let result = send(&db, &gateways, &config, &seller, request(Some(foreign.id))).await;

        assert!(result.is_err());
    }
}
