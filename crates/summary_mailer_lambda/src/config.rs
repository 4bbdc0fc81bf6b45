//! Environment-driven settings for both Lambda binaries.
//!
//! Settings are read once per cold start. `from_lookup` takes any key
//! resolver so tests can feed a map instead of the process environment.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::adapters::notification::MailEnvelope;
use crate::clients::mail_api::MailProvider;
use crate::handlers::process::ProcessorConfig;
use crate::runtime::contract::FailureReporting;
use crate::runtime::render::DEFAULT_SUBJECT_PREFIX;

const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAIL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;
const DEFAULT_OPENAI_MODEL: &str = "gpt-4-turbo";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub api_key: String,
    pub database_id: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub provider: MailProvider,
    pub api_key: String,
    pub envelope: MailEnvelope,
    pub subject_prefix: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondarySettings {
    pub url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorSettings {
    pub store: StoreSettings,
    pub mail: MailSettings,
    pub secondary: Option<SecondarySettings>,
    pub reporting: FailureReporting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSettings {
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeSettings {
    pub store: StoreSettings,
    pub model: ModelSettings,
}

impl ProcessorSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store = StoreSettings::from_lookup(&lookup)?;

        let provider = match optional(&lookup, "MAIL_PROVIDER") {
            Some(value) => value.parse().map_err(|message| ConfigError::Invalid {
                key: "MAIL_PROVIDER",
                message,
            })?,
            None => MailProvider::default(),
        };
        let recipients = required(&lookup, "MAIL_TO")?
            .split(',')
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        if recipients.is_empty() {
            return Err(ConfigError::Invalid {
                key: "MAIL_TO",
                message: "at least one recipient is required".to_string(),
            });
        }
        let mail = MailSettings {
            provider,
            api_key: required(&lookup, "MAIL_API_KEY")?,
            envelope: MailEnvelope {
                from: required(&lookup, "MAIL_FROM")?,
                to: recipients,
            },
            subject_prefix: optional(&lookup, "MAIL_SUBJECT_PREFIX")
                .unwrap_or_else(|| DEFAULT_SUBJECT_PREFIX.to_string()),
            timeout: timeout(&lookup, "MAIL_TIMEOUT_SECS", DEFAULT_MAIL_TIMEOUT_SECS)?,
        };

        let secondary = match optional(&lookup, "SECONDARY_NOTIFY_URL") {
            Some(url) => Some(SecondarySettings {
                url,
                token: optional(&lookup, "SECONDARY_NOTIFY_TOKEN"),
                timeout: timeout(&lookup, "NOTIFY_TIMEOUT_SECS", DEFAULT_NOTIFY_TIMEOUT_SECS)?,
            }),
            None => None,
        };

        let reporting = if parse_or(&lookup, "REPORT_PARTIAL_FAILURES", false)? {
            FailureReporting::InResponse
        } else {
            FailureReporting::LogsOnly
        };

        Ok(Self {
            store,
            mail,
            secondary,
            reporting,
        })
    }

    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            envelope: self.mail.envelope.clone(),
            subject_prefix: self.mail.subject_prefix.clone(),
        }
    }
}

impl SummarizeSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            store: StoreSettings::from_lookup(&lookup)?,
            model: ModelSettings {
                api_key: required(&lookup, "OPENAI_API_KEY")?,
                model: optional(&lookup, "OPENAI_MODEL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                timeout: timeout(&lookup, "OPENAI_TIMEOUT_SECS", DEFAULT_MODEL_TIMEOUT_SECS)?,
            },
        })
    }
}

impl StoreSettings {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: required(lookup, "NOTION_API_KEY")?,
            database_id: required(lookup, "NOTION_DATABASE_ID")?,
            timeout: timeout(lookup, "STORE_TIMEOUT_SECS", DEFAULT_STORE_TIMEOUT_SECS)?,
        })
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(lookup, key) {
        Some(value) => value.parse().map_err(|error: T::Err| ConfigError::Invalid {
            key,
            message: error.to_string(),
        }),
        None => Ok(default),
    }
}

fn timeout(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default_secs: u64,
) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_or(lookup, key, default_secs)?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            key,
            message: "timeout must be a positive number of seconds".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
