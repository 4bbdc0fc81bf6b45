//! Turning a raw meeting transcript into a new record.
//!
//! The model is asked for a JSON object with `summary`, `action_items` and
//! `key_questions`. Its reply is tolerated in a fenced markdown block, and a
//! reply that is not JSON at all still produces a record.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::record::NewRecord;

pub const DEFAULT_MEETING_NAME: &str = "Untitled Meeting";
pub const UNPARSED_ACTION_ITEMS: &str = "Could not parse action items.";
pub const UNPARSED_KEY_QUESTIONS: &str = "Could not parse key questions.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntakeRequest {
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default, rename = "meetingName")]
    pub meeting_name: Option<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("No transcript provided")]
    MissingTranscript,
}

impl IntakeRequest {
    /// Returns the transcript when one was sent; absent, null and blank all
    /// count as missing.
    pub fn validate(&self) -> Result<&str, IntakeError> {
        self.transcript
            .as_deref()
            .filter(|transcript| !transcript.trim().is_empty())
            .ok_or(IntakeError::MissingTranscript)
    }

    pub fn meeting_name(&self) -> &str {
        self.meeting_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_MEETING_NAME)
    }
}

pub fn build_prompt(transcript: &str) -> String {
    format!(
        "Please analyze the following meeting transcript and extract the following information:\n\
         \n\
         - A concise summary of the main points and decisions made.\n\
         - A list of clear action items, specifying the owner if mentioned.\n\
         - A list of key questions that were raised but not resolved.\n\
         \n\
         Format the output as a JSON object with exactly these three keys: \"summary\", \"action_items\", \"key_questions\".\n\
         \n\
         For action_items, please provide an array of objects, each with \"action\" and \"owner\" fields.\n\
         For key_questions, please provide an array of strings.\n\
         \n\
         Please provide only the JSON object without any additional text or markdown formatting.\n\
         \n\
         Transcript:\n\
         {transcript}\n"
    )
}

fn fenced_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("fenced block pattern is valid")
    })
}

/// Returns the first fenced code block's contents, or the input unchanged
/// when there is none.
pub fn extract_json_from_markdown(text: &str) -> &str {
    fenced_block_pattern()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|block| block.as_str().trim())
        .unwrap_or(text)
}

/// Model output after field formatting, ready to become a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryDraft {
    pub summary: String,
    pub action_items: String,
    pub key_questions: String,
}

pub fn parse_model_reply(reply: &str) -> SummaryDraft {
    let cleaned = extract_json_from_markdown(reply);
    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(fields)) => SummaryDraft {
            summary: format_field(fields.get("summary").unwrap_or(&Value::Null)),
            action_items: format_field(fields.get("action_items").unwrap_or(&Value::Null)),
            key_questions: format_field(fields.get("key_questions").unwrap_or(&Value::Null)),
        },
        _ => SummaryDraft {
            summary: reply.to_string(),
            action_items: UNPARSED_ACTION_ITEMS.to_string(),
            key_questions: UNPARSED_KEY_QUESTIONS.to_string(),
        },
    }
}

/// Flattens a model-provided value into record text.
///
/// Action-item objects become `• action (Owner: owner)` lines, other lists
/// become one bullet per entry, objects are pretty-printed.
pub fn format_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) if items.first().is_some_and(is_action_item) => items
            .iter()
            .map(format_action_item)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Array(items) => items
            .iter()
            .map(|item| format!("• {}", scalar_text(item)))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(_) => serde_json::to_string_pretty(value).unwrap_or_default(),
        other => other.to_string(),
    }
}

fn is_action_item(value: &Value) -> bool {
    value.as_object().is_some_and(|item| item.contains_key("action"))
}

fn format_action_item(item: &Value) -> String {
    let action = item.get("action").map(scalar_text).unwrap_or_default();
    let owner = item.get("owner").map(scalar_text).unwrap_or_default();
    if owner.trim().is_empty() {
        format!("• {action}")
    } else {
        format!("• {action} (Owner: {owner})")
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn build_new_record(request: &IntakeRequest, draft: SummaryDraft, date: &str) -> NewRecord {
    NewRecord {
        title: request.meeting_name().to_string(),
        summary: draft.summary,
        action_items: draft.action_items,
        key_questions: draft.key_questions,
        date: date.to_string(),
    }
}
