use serde::{Deserialize, Serialize};

use crate::adapters::AdapterError;
use crate::runtime::render::RenderedNotification;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MailEnvelope {
    pub from: String,
    pub to: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage<'a> {
    pub envelope: &'a MailEnvelope,
    pub notification: &'a RenderedNotification,
}

pub trait NotificationChannel {
    fn send(&self, message: &OutboundMessage<'_>) -> Result<(), AdapterError>;
}
