//! Contract notification email.

use crate::error::Error;
use crate::gateway::sendgrid::{self, Email};
use log::*;

const APP_NAME: &str = "DealFlow";

/// The meeting a contract email invites the client to.
#[derive(Debug, Clone)]
pub struct MeetingInvite<'a> {
    pub title: &'a str,
    pub zoom_meeting_id: &'a str,
    pub password: Option<&'a str>,
    pub join_url: Option<&'a str>,
    pub deeplink: &'a str,
}

#[derive(Debug, Clone)]
pub struct ContractEmail<'a> {
    pub client_name: &'a str,
    pub seller_name: &'a str,
    pub contract_url: &'a str,
    pub meeting: Option<MeetingInvite<'a>>,
}

impl ContractEmail<'_> {
    pub fn subject(&self) -> String {
        match &self.meeting {
            Some(meeting) => format!("Contract from {} - {}", self.seller_name, meeting.title),
            None => format!("Contract from {}", self.seller_name),
        }
    }

    pub fn text(&self) -> String {
        let mut text = format!(
            "Hi {},\n\n{} has sent you a contract to review",
            self.client_name, self.seller_name
        );
        if let Some(meeting) = &self.meeting {
            text.push_str(&format!(" for \"{}\"", meeting.title));
        }
        text.push_str(&format!(
            ".\n\nPlease click the link below to view and sign the contract:\n{}",
            self.contract_url
        ));

        if let Some(meeting) = &self.meeting {
            text.push_str("\n\n---\nJOIN THE MEETING\n");
            text.push_str(&format!("\nOpen in {APP_NAME} App: {}", meeting.deeplink));
            if let Some(join_url) = meeting.join_url {
                text.push_str(&format!("\nJoin via Zoom: {join_url}"));
            }
            text.push_str(&format!("\n\nMeeting ID: {}", meeting.zoom_meeting_id));
            if let Some(password) = meeting.password.filter(|p| !p.is_empty()) {
                text.push_str(&format!("\nPassword: {password}"));
            }
        }

        text.push_str(&format!("\n\n---\nSent via {APP_NAME}"));
        text
    }

    pub fn html(&self) -> String {
        let seller = escape_html(self.seller_name);
        let contract_url = escape_html(self.contract_url);

        let for_meeting = self
            .meeting
            .as_ref()
            .map(|m| format!(" for <strong>\"{}\"</strong>", escape_html(m.title)))
            .unwrap_or_default();

        let meeting_section = self
            .meeting
            .as_ref()
            .map(meeting_html)
            .unwrap_or_default();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Contract from {seller}</title>
</head>
<body style="margin: 0; padding: 40px 20px; background-color: #f4f7fa; font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif;">
  <div style="max-width: 600px; margin: 0 auto; background-color: #ffffff; border-radius: 16px; overflow: hidden;">
    <div style="background-color: #4A90A4; padding: 40px 40px 30px; text-align: center;">
      <h1 style="margin: 0; color: #ffffff; font-size: 28px;">{APP_NAME}</h1>
      <p style="margin: 8px 0 0; color: #e6f0f3; font-size: 14px;">Close deals faster, together</p>
    </div>
    <div style="padding: 40px; color: #4a5568; font-size: 16px; line-height: 1.6;">
      <h2 style="margin: 0 0 24px; color: #1a1a2e; font-size: 22px;">You've Received a Contract</h2>
      <p>Hi <strong>{client}</strong>,</p>
      <p><strong>{seller}</strong> has sent you a contract to review{for_meeting}.</p>
      <p style="text-align: center; margin: 32px 0;">
        <a href="{contract_url}" target="_blank" style="display: inline-block; background-color: #4A90A4; color: #ffffff; text-decoration: none; padding: 16px 40px; border-radius: 10px; font-weight: 600;">Review &amp; Sign Contract</a>
      </p>
{meeting_section}
      <p style="margin: 24px 0 0; color: #94a3b8; font-size: 13px;">
        If the button doesn't work, copy and paste this link:<br />
        <a href="{contract_url}" style="color: #4A90A4; word-break: break-all;">{contract_url}</a>
      </p>
    </div>
    <div style="background-color: #f8fafc; padding: 24px 40px; text-align: center; color: #64748b; font-size: 13px;">
      Sent via <strong>{APP_NAME}</strong>
    </div>
  </div>
  <p style="max-width: 600px; margin: 24px auto 0; text-align: center; color: #94a3b8; font-size: 12px;">
    This email was sent to you because {seller} shared a contract with you through {APP_NAME}.
  </p>
</body>
</html>"#,
            client = escape_html(self.client_name),
        )
    }

    pub fn to_email(&self, to: &str) -> Email {
        Email {
            to: to.to_string(),
            to_name: Some(self.client_name.to_string()),
            subject: self.subject(),
            text: self.text(),
            html: Some(self.html()),
        }
    }
}

fn meeting_html(meeting: &MeetingInvite<'_>) -> String {
    let mut buttons = format!(
        r#"<a href="{}" style="display: inline-block; background-color: #1a1a2e; color: #ffffff; text-decoration: none; padding: 14px 20px; border-radius: 10px; font-size: 14px; font-weight: 600;">Open in App</a>"#,
        escape_html(meeting.deeplink)
    );
    if let Some(join_url) = meeting.join_url {
        buttons.push_str(&format!(
            r#" <a href="{}" target="_blank" style="display: inline-block; background-color: #2D8CFF; color: #ffffff; text-decoration: none; padding: 14px 20px; border-radius: 10px; font-size: 14px; font-weight: 600;">Join via Zoom</a>"#,
            escape_html(join_url)
        ));
    }

    let password = meeting
        .password
        .filter(|p| !p.is_empty())
        .map(|p| format!("<br />Password: <strong>{}</strong>", escape_html(p)))
        .unwrap_or_default();

    format!(
        r#"      <div style="background-color: #f8fafc; border-radius: 12px; padding: 24px; margin-bottom: 24px;">
        <h3 style="margin: 0 0 16px; color: #1a1a2e; font-size: 18px;">Join the Meeting</h3>
        <p style="margin: 0 0 20px; color: #64748b; font-size: 14px;">Ready to discuss? Join the video call using one of the options below.</p>
        <p>{buttons}</p>
        <p style="font-family: 'SF Mono', Monaco, monospace; font-size: 15px;">Meeting ID: <strong>{}</strong>{password}</p>
      </div>"#,
        escape_html(meeting.zoom_meeting_id)
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Sends the contract email to `to`.
pub async fn send_contract_email(
    client: &sendgrid::Client,
    to: &str,
    email: &ContractEmail<'_>,
) -> Result<(), Error> {
    info!("Initiating contract email to {to}");

    let response = client.send_email(email.to_email(to)).await?;
    debug!("Contract email accepted: {:?}", response.message_id);

    Ok(())
}
