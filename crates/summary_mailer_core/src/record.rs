use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_SUMMARY: &str = "No summary provided.";
pub const DEFAULT_ACTION_ITEMS: &str = "No action items.";
pub const DEFAULT_KEY_QUESTIONS: &str = "No key questions.";

/// A meeting summary as held by the record store.
///
/// Everything except `processed` is owned by whoever created the record;
/// the processor only ever flips `processed` to true.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeetingRecord {
    pub id: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub action_items: Option<String>,
    pub key_questions: Option<String>,
    pub processed: bool,
    pub url: Option<String>,
}

/// Text fields of a record with defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    pub title: String,
    pub summary: String,
    pub action_items: String,
    pub key_questions: String,
}

impl MeetingRecord {
    pub fn fields(&self) -> RecordFields {
        RecordFields {
            title: text_or_default(self.title.as_deref(), DEFAULT_TITLE),
            summary: text_or_default(self.summary.as_deref(), DEFAULT_SUMMARY),
            action_items: field_or_default(self.action_items.as_deref(), DEFAULT_ACTION_ITEMS),
            key_questions: field_or_default(self.key_questions.as_deref(), DEFAULT_KEY_QUESTIONS),
        }
    }
}

// Title and summary are shown verbatim, so blank text counts as missing.
fn text_or_default(value: Option<&str>, default: &str) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => default.to_string(),
    }
}

// List fields only fall back when absent or zero-length. Whitespace-only
// content is kept so list rendering can drop its blank lines.
fn field_or_default(value: Option<&str>, default: &str) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => default.to_string(),
    }
}

/// Payload for creating a fresh, unprocessed record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewRecord {
    pub title: String,
    pub summary: String,
    pub action_items: String,
    pub key_questions: String,
    /// Calendar date in `YYYY-MM-DD` form.
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedRecord {
    pub id: String,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MeetingRecord {
        MeetingRecord {
            id: "page-1".to_string(),
            title: Some("Weekly sync".to_string()),
            summary: Some("Shipped the release.".to_string()),
            action_items: Some("• Write notes".to_string()),
            key_questions: Some("• Who owns QA?".to_string()),
            processed: false,
            url: Some("https://notion.so/page-1".to_string()),
        }
    }

    #[test]
    fn fields_keep_present_values() {
        let fields = record().fields();
        assert_eq!(fields.title, "Weekly sync");
        assert_eq!(fields.summary, "Shipped the release.");
    }

    #[test]
    fn missing_and_empty_fields_fall_back_to_defaults() {
        let mut record = record();
        record.title = None;
        record.summary = Some(String::new());
        record.action_items = None;
        record.key_questions = Some(String::new());

        let fields = record.fields();
        assert_eq!(fields.title, DEFAULT_TITLE);
        assert_eq!(fields.summary, DEFAULT_SUMMARY);
        assert_eq!(fields.action_items, DEFAULT_ACTION_ITEMS);
        assert_eq!(fields.key_questions, DEFAULT_KEY_QUESTIONS);
    }

    #[test]
    fn blank_title_and_summary_fall_back_to_defaults() {
        let mut record = record();
        record.title = Some("   ".to_string());
        record.summary = Some(" \n\t".to_string());

        let fields = record.fields();
        assert_eq!(fields.title, DEFAULT_TITLE);
        assert_eq!(fields.summary, DEFAULT_SUMMARY);
    }

    #[test]
    fn whitespace_only_list_field_is_not_replaced() {
        let mut record = record();
        record.action_items = Some(" \n ".to_string());
        assert_eq!(record.fields().action_items, " \n ");
    }
}
