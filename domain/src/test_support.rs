//! Configs and mocks shared by the unit tests of this crate.

use clap::Parser;
use mockito::{Mock, ServerGuard};
use service::config::Config;

const SERVICE_ACCOUNT_PEM: &str = include_str!("../../meeting-auth/testdata/service_account.pem");

fn parse(extra: &[String]) -> Config {
    let mut argv = vec!["dealflow".to_string()];
    argv.extend_from_slice(extra);
    Config::parse_from(argv)
}

fn args(pairs: &[(&str, &str)]) -> Vec<String> {
    pairs
        .iter()
        .flat_map(|(flag, value)| [format!("--{flag}"), value.to_string()])
        .collect()
}

/// Provider URLs pointed at `base`, no credentials.
pub(crate) fn config(base: &str) -> Config {
    parse(&args(&[
        ("zoom-oauth-token-url", &*format!("{base}/oauth/token")),
        ("zoom-api-base-url", &*format!("{base}/v2")),
        ("sendgrid-base-url", base),
        ("fcm-base-url", &*format!("{base}/v1")),
    ]))
}

pub(crate) fn zoom_args(base: &str) -> Vec<(&'static str, String)> {
    vec![
        ("zoom-oauth-token-url", format!("{base}/oauth/token")),
        ("zoom-api-base-url", format!("{base}/v2")),
        ("zoom-account-id", "acct-42".to_string()),
        ("zoom-s2s-client-id", "client".to_string()),
        ("zoom-s2s-client-secret", "secret".to_string()),
        ("zoom-sdk-client-id", "sdk-key".to_string()),
        ("zoom-sdk-client-secret", "sdk-secret".to_string()),
        ("zoom-host-email", "host+sales@dealflow.dev".to_string()),
    ]
}

fn owned(pairs: &[(&'static str, String)]) -> Vec<String> {
    let borrowed: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
    args(&borrowed)
}

/// Zoom fully configured against a mock server at `base`.
pub(crate) fn zoom_config(base: &str) -> Config {
    parse(&owned(&zoom_args(base)))
}

pub(crate) fn sendgrid_config(base: &str) -> Config {
    parse(&args(&[
        ("sendgrid-base-url", base),
        ("sendgrid-api-key", "SG.test"),
        ("sendgrid-from-email", "deals@dealflow.dev"),
    ]))
}

pub(crate) fn service_account_json(token_uri: &str) -> String {
    serde_json::json!({
        "type": "service_account",
        "project_id": "dealflow-test",
        "private_key": SERVICE_ACCOUNT_PEM,
        "client_email": "fcm@dealflow-test.iam.gserviceaccount.com",
        "token_uri": token_uri,
    })
    .to_string()
}

pub(crate) fn fcm_config(base: &str) -> Config {
    parse(&args(&[
        ("fcm-base-url", &*format!("{base}/v1")),
        (
            "firebase-service-account-key",
            &*service_account_json(&*format!("{base}/token")),
        ),
    ]))
}

/// Zoom, SendGrid and Firebase all configured against `base`.
pub(crate) fn full_config(base: &str) -> Config {
    let mut pairs = zoom_args(base);
    pairs.extend([
        ("sendgrid-base-url", base.to_string()),
        ("sendgrid-api-key", "SG.test".to_string()),
        ("sendgrid-from-email", "deals@dealflow.dev".to_string()),
        ("fcm-base-url", format!("{base}/v1")),
        (
            "firebase-service-account-key",
            service_account_json(&*format!("{base}/token")),
        ),
    ]);
    parse(&owned(&pairs))
}

/// Zoom's OAuth endpoint answering `hits` times with `zoom-token`.
pub(crate) async fn mock_zoom_token(server: &mut ServerGuard, hits: usize) -> Mock {
    server
        .mock("POST", "/oauth/token")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"zoom-token","token_type":"bearer","expires_in":3599}"#)
        .expect(hits)
        .create_async()
        .await
}
