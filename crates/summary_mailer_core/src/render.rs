use serde::{Deserialize, Serialize};

use crate::record::{MeetingRecord, RecordFields};

pub const DEFAULT_SUBJECT_PREFIX: &str = "Meeting Summary";

const BULLET_MARKERS: [char; 3] = ['•', '-', '*'];

/// A provider-agnostic message derived from one record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderedNotification {
    pub subject: String,
    pub html: String,
    pub text: String,
}

pub fn render_notification(record: &MeetingRecord, subject_prefix: &str) -> RenderedNotification {
    let fields = record.fields();
    let action_items = list_lines(&fields.action_items);
    let key_questions = list_lines(&fields.key_questions);

    RenderedNotification {
        subject: format!("{subject_prefix}: {}", fields.title),
        html: render_html(&fields, &action_items, &key_questions, record.url.as_deref()),
        text: render_text(&fields, &action_items, &key_questions, record.url.as_deref()),
    }
}

/// Splits free text into list entries: one per non-blank line, trimmed, with
/// a leading bullet marker removed.
pub fn list_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// A marker only counts as a bullet when whitespace (or nothing) follows it,
// so "-1" and "*Why*" keep their text.
fn strip_bullet(line: &str) -> &str {
    BULLET_MARKERS
        .iter()
        .find_map(|marker| {
            line.strip_prefix(*marker)
                .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        })
        .map(str::trim_start)
        .unwrap_or(line)
}

fn render_html(
    fields: &RecordFields,
    action_items: &[String],
    key_questions: &[String],
    url: Option<&str>,
) -> String {
    let summary = fields
        .summary
        .lines()
        .map(escape_html)
        .collect::<Vec<_>>()
        .join("<br>");

    let mut html = String::new();
    html.push_str("<html><body>");
    html.push_str(&format!("<h1>{}</h1>", escape_html(&fields.title)));
    html.push_str("<h2>Summary</h2>");
    html.push_str(&format!("<p>{summary}</p>"));
    html.push_str("<h2>Action Items</h2>");
    html.push_str(&html_list(action_items));
    html.push_str("<h2>Key Questions</h2>");
    html.push_str(&html_list(key_questions));
    if let Some(url) = url.filter(|value| !value.trim().is_empty()) {
        html.push_str(&format!(
            "<p><a href=\"{}\">View the full record</a></p>",
            escape_html(url)
        ));
    }
    html.push_str("</body></html>");
    html
}

fn html_list(items: &[String]) -> String {
    let entries = items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect::<String>();
    format!("<ul>{entries}</ul>")
}

fn render_text(
    fields: &RecordFields,
    action_items: &[String],
    key_questions: &[String],
    url: Option<&str>,
) -> String {
    let mut sections = vec![
        fields.title.clone(),
        format!("Summary\n{}", fields.summary.trim_end()),
        format!("Action Items\n{}", text_list(action_items)),
        format!("Key Questions\n{}", text_list(key_questions)),
    ];
    if let Some(url) = url.filter(|value| !value.trim().is_empty()) {
        sections.push(format!("View the full record: {url}"));
    }
    sections.join("\n\n")
}

fn text_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
