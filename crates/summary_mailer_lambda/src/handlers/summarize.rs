use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::adapters::record_store::RecordStore;
use crate::adapters::summary_model::SummaryModel;
use crate::handlers::invocation::{
    error_response, normalize_apigw_event, success_response, ApiGatewayResponse,
};
use crate::runtime::contract::ErrorBody;
use crate::runtime::intake::{build_new_record, build_prompt, parse_model_reply, IntakeRequest};

const COMPONENT: &str = "summary_intake";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeConfig {
    /// Date stamped on created records, `YYYY-MM-DD`.
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryCreatedResponse {
    pub message: String,
    #[serde(rename = "notion_url")]
    pub record_url: String,
}

pub fn handle_summarize_event(
    event: Value,
    config: &SummarizeConfig,
    model: &impl SummaryModel,
    store: &impl RecordStore,
) -> ApiGatewayResponse {
    let payload = match normalize_apigw_event(event) {
        Ok(value) => value,
        Err(message) => return error_response(400, &ErrorBody::new("Invalid request", message)),
    };

    let request = match serde_json::from_value::<IntakeRequest>(payload) {
        Ok(value) => value,
        Err(parse_error) => {
            return error_response(
                400,
                &ErrorBody::new("Invalid request", format!("Malformed request: {parse_error}")),
            );
        }
    };

    let transcript = match request.validate() {
        Ok(value) => value,
        Err(validation_error) => {
            return error_response(
                400,
                &ErrorBody::new(
                    validation_error.to_string(),
                    "transcript must be a non-empty string",
                ),
            );
        }
    };

    let reply = match model.complete(&build_prompt(transcript)) {
        Ok(value) => value,
        Err(model_error) => {
            error!(component = COMPONENT, event = "model_failed", error = %model_error);
            return error_response(
                500,
                &ErrorBody::new("Failed to summarize transcript", model_error.to_string()),
            );
        }
    };
    debug!(component = COMPONENT, event = "model_replied", reply_len = reply.len());

    let draft = parse_model_reply(&reply);
    let new_record = build_new_record(&request, draft, &config.date);

    match store.create_record(&new_record) {
        Ok(created) => {
            info!(
                component = COMPONENT,
                event = "record_created",
                record_id = %created.id,
                title = %new_record.title,
            );
            success_response(
                200,
                SummaryCreatedResponse {
                    message: "Summary created successfully!".to_string(),
                    record_url: created
                        .url
                        .unwrap_or_else(|| "No URL available".to_string()),
                },
            )
        }
        Err(store_error) => {
            error!(component = COMPONENT, event = "create_failed", error = %store_error);
            error_response(
                500,
                &ErrorBody::new("Failed to save summary", store_error.to_string()),
            )
        }
    }
}
