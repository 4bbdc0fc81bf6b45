//! Transactional-email HTTP APIs as the notification channel.

use std::fmt;
use std::str::FromStr;

use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::adapters::notification::{NotificationChannel, OutboundMessage};
use crate::adapters::AdapterError;
use crate::clients::{block_on, ensure_success, http_client};
use crate::config::MailSettings;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MailProvider {
    #[default]
    Resend,
    SendGrid,
}

impl MailProvider {
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Resend => "https://api.resend.com/emails",
            Self::SendGrid => "https://api.sendgrid.com/v3/mail/send",
        }
    }

    pub fn payload(self, message: &OutboundMessage<'_>) -> Value {
        match self {
            Self::Resend => resend_payload(message),
            Self::SendGrid => sendgrid_payload(message),
        }
    }
}

impl FromStr for MailProvider {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "resend" => Ok(Self::Resend),
            "sendgrid" => Ok(Self::SendGrid),
            other => Err(format!(
                "unknown mail provider '{other}', expected 'resend' or 'sendgrid'"
            )),
        }
    }
}

impl fmt::Display for MailProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Resend => "resend",
            Self::SendGrid => "sendgrid",
        })
    }
}

#[derive(Debug, Clone)]
pub struct MailApiChannel {
    client: Client,
    provider: MailProvider,
    endpoint: String,
    api_key: String,
}

impl MailApiChannel {
    pub fn new(settings: &MailSettings) -> Result<Self, AdapterError> {
        Ok(Self {
            client: http_client(settings.timeout)?,
            provider: settings.provider,
            endpoint: settings.provider.endpoint().to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    async fn post(&self, payload: &Value) -> Result<(), AdapterError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

impl NotificationChannel for MailApiChannel {
    fn send(&self, message: &OutboundMessage<'_>) -> Result<(), AdapterError> {
        let payload = self.provider.payload(message);
        block_on(self.post(&payload))?;
        debug!(
            component = "mail_api",
            event = "mail_accepted",
            provider = %self.provider,
            recipients = message.envelope.to.len(),
        );
        Ok(())
    }
}

fn resend_payload(message: &OutboundMessage<'_>) -> Value {
    json!({
        "from": message.envelope.from,
        "to": message.envelope.to,
        "subject": message.notification.subject,
        "html": message.notification.html,
        "text": message.notification.text
    })
}

fn sendgrid_payload(message: &OutboundMessage<'_>) -> Value {
    let recipients: Vec<Value> = message
        .envelope
        .to
        .iter()
        .map(|address| mailbox_json(address))
        .collect();
    json!({
        "personalizations": [{ "to": recipients }],
        "from": mailbox_json(&message.envelope.from),
        "subject": message.notification.subject,
        "content": [
            { "type": "text/plain", "value": message.notification.text },
            { "type": "text/html", "value": message.notification.html }
        ]
    })
}

/// Splits `Display Name <address>` into its parts; a bare address has no name.
pub fn parse_mailbox(value: &str) -> (Option<&str>, &str) {
    let value = value.trim();
    match (value.find('<'), value.strip_suffix('>')) {
        (Some(open), Some(without_close)) => {
            let name = value[..open].trim().trim_matches('"').trim();
            let address = without_close[open + 1..].trim();
            ((!name.is_empty()).then_some(name), address)
        }
        _ => (None, value),
    }
}

fn mailbox_json(value: &str) -> Value {
    match parse_mailbox(value) {
        (Some(name), email) => json!({ "email": email, "name": name }),
        (None, email) => json!({ "email": email }),
    }
}
