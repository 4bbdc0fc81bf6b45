use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use summary_mailer_lambda::adapters::secondary::{NoopNotifier, SecondaryNotifier};
use summary_mailer_lambda::adapters::AdapterError;
use summary_mailer_lambda::clients::mail_api::MailApiChannel;
use summary_mailer_lambda::clients::notion::NotionRecordStore;
use summary_mailer_lambda::clients::webhook::WebhookNotifier;
use summary_mailer_lambda::config::ProcessorSettings;
use summary_mailer_lambda::handlers::invocation::{handle_process_invocation, ApiGatewayResponse};
use summary_mailer_lambda::handlers::process::ProcessorConfig;
use summary_mailer_lambda::runtime::contract::FailureReporting;
use summary_mailer_lambda::telemetry::init_tracing;
use tracing::info;

enum Notifier {
    Webhook(WebhookNotifier),
    Noop(NoopNotifier),
}

impl SecondaryNotifier for Notifier {
    fn notify(&self, record_id: &str) -> Result<(), AdapterError> {
        match self {
            Self::Webhook(notifier) => notifier.notify(record_id),
            Self::Noop(notifier) => notifier.notify(record_id),
        }
    }
}

struct RuntimeDependencies {
    config: ProcessorConfig,
    reporting: FailureReporting,
    store: NotionRecordStore,
    channel: MailApiChannel,
    notifier: Notifier,
}

impl RuntimeDependencies {
    fn from_settings(settings: &ProcessorSettings) -> Result<Self, Error> {
        let notifier = match &settings.secondary {
            Some(secondary) => Notifier::Webhook(WebhookNotifier::new(secondary)?),
            None => Notifier::Noop(NoopNotifier),
        };
        Ok(Self {
            config: settings.processor_config(),
            reporting: settings.reporting,
            store: NotionRecordStore::new(&settings.store)?,
            channel: MailApiChannel::new(&settings.mail)?,
            notifier,
        })
    }
}

async fn handle_request(
    deps: &RuntimeDependencies,
    _event: LambdaEvent<Value>,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_process_invocation(
        &deps.config,
        deps.reporting,
        &deps.store,
        &deps.channel,
        &deps.notifier,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let settings = ProcessorSettings::from_env()?;
    info!(
        component = "process_lambda",
        event = "cold_start",
        provider = %settings.mail.provider,
        secondary_configured = settings.secondary.is_some(),
    );
    let deps = Arc::new(RuntimeDependencies::from_settings(&settings)?);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let deps = Arc::clone(&deps);
        async move { handle_request(&deps, event).await }
    }))
    .await
}
