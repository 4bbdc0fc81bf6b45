use std::sync::Arc;

use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use summary_mailer_lambda::clients::notion::NotionRecordStore;
use summary_mailer_lambda::clients::openai::OpenAiSummaryModel;
use summary_mailer_lambda::config::SummarizeSettings;
use summary_mailer_lambda::handlers::invocation::ApiGatewayResponse;
use summary_mailer_lambda::handlers::summarize::{handle_summarize_event, SummarizeConfig};
use summary_mailer_lambda::telemetry::init_tracing;

struct RuntimeDependencies {
    store: NotionRecordStore,
    model: OpenAiSummaryModel,
}

async fn handle_request(
    deps: &RuntimeDependencies,
    event: LambdaEvent<Value>,
) -> Result<ApiGatewayResponse, Error> {
    let config = SummarizeConfig {
        date: Utc::now().format("%Y-%m-%d").to_string(),
    };
    Ok(handle_summarize_event(
        event.payload,
        &config,
        &deps.model,
        &deps.store,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let settings = SummarizeSettings::from_env()?;
    let deps = Arc::new(RuntimeDependencies {
        store: NotionRecordStore::new(&settings.store)?,
        model: OpenAiSummaryModel::new(&settings.model)?,
    });

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let deps = Arc::clone(&deps);
        async move { handle_request(&deps, event).await }
    }))
    .await
}
