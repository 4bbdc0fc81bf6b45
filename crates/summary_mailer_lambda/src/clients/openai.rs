//! OpenAI chat completions as the summary model.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::adapters::summary_model::SummaryModel;
use crate::adapters::AdapterError;
use crate::clients::{block_on, ensure_success, http_client};
use crate::config::ModelSettings;

pub const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const TEMPERATURE: f32 = 0.2;

#[derive(Debug, Serialize, PartialEq)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiSummaryModel {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiSummaryModel {
    pub fn new(settings: &ModelSettings) -> Result<Self, AdapterError> {
        Ok(Self {
            client: http_client(settings.timeout)?,
            endpoint: OPENAI_CHAT_COMPLETIONS_URL.to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    async fn chat(&self, prompt: &str) -> Result<String, AdapterError> {
        let request = chat_request(&self.model, prompt);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let parsed: ChatResponse = ensure_success(response).await?.json().await?;
        first_choice_content(parsed)
    }
}

impl SummaryModel for OpenAiSummaryModel {
    fn complete(&self, prompt: &str) -> Result<String, AdapterError> {
        block_on(self.chat(prompt))
    }
}

pub fn chat_request<'a>(model: &'a str, prompt: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
        temperature: TEMPERATURE,
    }
}

fn first_choice_content(response: ChatResponse) -> Result<String, AdapterError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AdapterError::InvalidResponse("completion has no message content".to_string()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::clients::test_server::{CannedResponse, TestServer};

    #[test]
    fn request_uses_single_user_message() {
        let request = chat_request("gpt-4-turbo", "Summarize this");
        let value = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(value["model"], "gpt-4-turbo");
        assert_eq!(
            value["messages"],
            json!([{"role": "user", "content": "Summarize this"}])
        );
        assert!((value["temperature"].as_f64().unwrap_or_default() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn extracts_first_choice() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "{\"summary\": \"ok\"}"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        }))
        .expect("response should parse");
        assert_eq!(
            first_choice_content(response).expect("content should exist"),
            "{\"summary\": \"ok\"}"
        );
    }

    #[test]
    fn empty_choices_are_invalid() {
        let response: ChatResponse =
            serde_json::from_value(json!({"choices": []})).expect("response should parse");
        assert!(matches!(
            first_choice_content(response),
            Err(AdapterError::InvalidResponse(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn completes_against_configured_endpoint() {
        let server = TestServer::start(vec![CannedResponse::json(
            200,
            json!({"choices": [{"message": {"role": "assistant", "content": "done"}}]}),
        )]);
        let model = OpenAiSummaryModel::new(&ModelSettings {
            api_key: "sk-test".to_string(),
            model: "gpt-4-turbo".to_string(),
            timeout: Duration::from_secs(5),
        })
        .expect("client should build")
        .with_endpoint(&format!("{}/v1/chat/completions", server.url));

        let reply = model.complete("Summarize this").expect("completion should succeed");

        assert_eq!(reply, "done");
        let requests = server.requests();
        assert_eq!(requests[0].path, "/v1/chat/completions");
        assert_eq!(requests[0].header("authorization"), Some("Bearer sk-test"));
        assert_eq!(requests[0].json()["messages"][0]["content"], "Summarize this");
    }
}
