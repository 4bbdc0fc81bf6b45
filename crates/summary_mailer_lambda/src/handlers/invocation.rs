use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::error;

use crate::adapters::notification::NotificationChannel;
use crate::adapters::record_store::RecordStore;
use crate::adapters::secondary::SecondaryNotifier;
use crate::handlers::process::{process_pending, ProcessorConfig};
use crate::runtime::contract::{fetch_error_body, success_body, ErrorBody, FailureReporting};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

impl ApiGatewayResponse {
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Entry point for a scheduled or HTTP-triggered processing run. The trigger
/// payload carries no parameters, so it is not inspected.
pub fn handle_process_invocation(
    config: &ProcessorConfig,
    reporting: FailureReporting,
    store: &impl RecordStore,
    channel: &impl NotificationChannel,
    notifier: &impl SecondaryNotifier,
) -> ApiGatewayResponse {
    match process_pending(config, store, channel, notifier) {
        Ok(summary) => success_response(200, success_body(&summary, reporting)),
        Err(fetch_error) => error_response(500, &fetch_error_body(&fetch_error)),
    }
}

/// Unwraps an API Gateway proxy event into its JSON body. Events without a
/// `body` field are treated as the body themselves.
pub fn normalize_apigw_event(event: Value) -> Result<Value, String> {
    let Some(object) = event.as_object() else {
        return Err("Request payload must be a JSON object".to_string());
    };

    let Some(body) = object.get("body") else {
        return Ok(event);
    };

    match body {
        Value::Null => Ok(json!({})),
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) => {
            serde_json::from_str(text).map_err(|error| format!("Malformed JSON body: {error}"))
        }
        _ => Err("Request body must be a JSON object".to_string()),
    }
}

pub fn success_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    match serde_json::to_string(&payload) {
        Ok(body) => ApiGatewayResponse {
            status_code,
            headers: json_headers(),
            body,
        },
        Err(serialize_error) => {
            error!(
                component = "invocation",
                event = "response_serialization_failed",
                error = %serialize_error,
            );
            error_response(
                500,
                &ErrorBody::new("serialization_error", serialize_error.to_string()),
            )
        }
    }
}

pub fn error_response(status_code: u16, payload: &ErrorBody) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json_headers(),
        body: json!({
            "error": payload.error,
            "details": payload.details,
        })
        .to_string(),
    }
}

fn json_headers() -> Value {
    json!({"Content-Type": "application/json"})
}
