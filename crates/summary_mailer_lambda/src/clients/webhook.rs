//! Secondary service notified once a record's email has gone out.

use reqwest::Client;
use serde::Serialize;

use crate::adapters::secondary::SecondaryNotifier;
use crate::adapters::AdapterError;
use crate::clients::{block_on, ensure_success, http_client};
use crate::config::SecondarySettings;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProcessedRecordPayload<'a> {
    pub record_id: &'a str,
}

#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
    token: Option<String>,
}

impl WebhookNotifier {
    pub fn new(settings: &SecondarySettings) -> Result<Self, AdapterError> {
        Ok(Self {
            client: http_client(settings.timeout)?,
            url: settings.url.clone(),
            token: settings.token.clone(),
        })
    }

    async fn post(&self, record_id: &str) -> Result<(), AdapterError> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&ProcessedRecordPayload { record_id });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        ensure_success(request.send().await?).await?;
        Ok(())
    }
}

impl SecondaryNotifier for WebhookNotifier {
    fn notify(&self, record_id: &str) -> Result<(), AdapterError> {
        block_on(self.post(record_id))
    }
}
