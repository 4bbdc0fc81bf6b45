//! Notion database as the record store.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::adapters::record_store::RecordStore;
use crate::adapters::AdapterError;
use crate::clients::{block_on, ensure_success, http_client};
use crate::config::StoreSettings;
use crate::runtime::record::{CreatedRecord, MeetingRecord, NewRecord};

pub const NOTION_API_BASE: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";

pub const PROP_TITLE: &str = "Meeting Name";
pub const PROP_SUMMARY: &str = "Summary";
pub const PROP_ACTION_ITEMS: &str = "Action Items";
pub const PROP_KEY_QUESTIONS: &str = "Key Questions";
pub const PROP_PROCESSED: &str = "Processed";
pub const PROP_DATE: &str = "Date";

/// Notion rejects rich-text segments longer than this many characters.
const RICH_TEXT_LIMIT: usize = 2_000;

#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NotionRecordStore {
    client: Client,
    base_url: String,
    api_key: String,
    database_id: String,
}

impl NotionRecordStore {
    pub fn new(settings: &StoreSettings) -> Result<Self, AdapterError> {
        Ok(Self {
            client: http_client(settings.timeout)?,
            base_url: NOTION_API_BASE.to_string(),
            api_key: settings.api_key.clone(),
            database_id: settings.database_id.clone(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}/{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
    }

    async fn query_page(&self, cursor: Option<&str>) -> Result<QueryPage, AdapterError> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("databases/{}/query", self.database_id),
            )
            .json(&pending_query_body(cursor))
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn fetch_all_pending(&self) -> Result<Vec<MeetingRecord>, AdapterError> {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self.query_page(cursor.as_deref()).await?;
            for result in &page.results {
                records.push(parse_page(result)?);
            }
            debug!(
                component = "notion_store",
                event = "query_page_loaded",
                page_size = page.results.len(),
                has_more = page.has_more,
            );
            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }
        Ok(records)
    }

    async fn patch_processed(&self, record_id: &str) -> Result<(), AdapterError> {
        let response = self
            .request(reqwest::Method::PATCH, &format!("pages/{record_id}"))
            .json(&mark_processed_body())
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn create_page(&self, record: &NewRecord) -> Result<CreatedRecord, AdapterError> {
        let response = self
            .request(reqwest::Method::POST, "pages")
            .json(&create_page_body(&self.database_id, record))
            .send()
            .await?;
        let page: Value = ensure_success(response).await?.json().await?;
        let id = page
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| AdapterError::InvalidResponse("created page has no id".to_string()))?;
        Ok(CreatedRecord {
            id: id.to_string(),
            url: page.get("url").and_then(Value::as_str).map(str::to_string),
        })
    }
}

impl RecordStore for NotionRecordStore {
    fn fetch_pending(&self) -> Result<Vec<MeetingRecord>, AdapterError> {
        block_on(self.fetch_all_pending())
    }

    fn mark_processed(&self, record_id: &str) -> Result<(), AdapterError> {
        block_on(self.patch_processed(record_id))
    }

    fn create_record(&self, record: &NewRecord) -> Result<CreatedRecord, AdapterError> {
        block_on(self.create_page(record))
    }
}

pub fn pending_query_body(cursor: Option<&str>) -> Value {
    let mut body = json!({
        "filter": {
            "property": PROP_PROCESSED,
            "checkbox": { "equals": false }
        }
    });
    if let Some(cursor) = cursor {
        body["start_cursor"] = json!(cursor);
    }
    body
}

pub fn mark_processed_body() -> Value {
    json!({
        "properties": {
            PROP_PROCESSED: { "checkbox": true }
        }
    })
}

pub fn create_page_body(database_id: &str, record: &NewRecord) -> Value {
    json!({
        "parent": { "database_id": database_id },
        "properties": {
            PROP_TITLE: { "title": rich_text(&record.title) },
            PROP_SUMMARY: { "rich_text": rich_text(&record.summary) },
            PROP_ACTION_ITEMS: { "rich_text": rich_text(&record.action_items) },
            PROP_KEY_QUESTIONS: { "rich_text": rich_text(&record.key_questions) },
            PROP_PROCESSED: { "checkbox": false },
            PROP_DATE: { "date": { "start": record.date } }
        }
    })
}

/// Splits text into rich-text segments within Notion's length limit.
pub fn rich_text(text: &str) -> Vec<Value> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(RICH_TEXT_LIMIT)
        .map(|chunk| {
            json!({
                "type": "text",
                "text": { "content": chunk.iter().collect::<String>() }
            })
        })
        .collect()
}

pub fn parse_page(page: &Value) -> Result<MeetingRecord, AdapterError> {
    let id = page
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| AdapterError::InvalidResponse("page result has no id".to_string()))?;
    let properties = &page["properties"];

    Ok(MeetingRecord {
        id: id.to_string(),
        title: plain_text(&properties[PROP_TITLE]["title"]),
        summary: plain_text(&properties[PROP_SUMMARY]["rich_text"]),
        action_items: plain_text(&properties[PROP_ACTION_ITEMS]["rich_text"]),
        key_questions: plain_text(&properties[PROP_KEY_QUESTIONS]["rich_text"]),
        processed: properties[PROP_PROCESSED]["checkbox"]
            .as_bool()
            .unwrap_or(false),
        url: page.get("url").and_then(Value::as_str).map(str::to_string),
    })
}

fn plain_text(segments: &Value) -> Option<String> {
    let segments = segments.as_array()?;
    Some(
        segments
            .iter()
            .filter_map(|segment| {
                segment
                    .get("plain_text")
                    .or_else(|| segment.get("text").and_then(|text| text.get("content")))
                    .and_then(Value::as_str)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::clients::test_server::{CannedResponse, TestServer};

    fn store_at(server: &TestServer, timeout: Duration) -> NotionRecordStore {
        NotionRecordStore::new(&StoreSettings {
            api_key: "secret_token".to_string(),
            database_id: "db-1".to_string(),
            timeout,
        })
        .expect("client should build")
        .with_base_url(&server.url)
    }

    fn sample_page() -> Value {
        json!({
            "object": "page",
            "id": "3f1c-page",
            "url": "https://www.notion.so/Weekly-3f1c",
            "properties": {
                "Meeting Name": {"type": "title", "title": [
                    {"plain_text": "Weekly "}, {"plain_text": "sync"}
                ]},
                "Summary": {"type": "rich_text", "rich_text": [
                    {"plain_text": "Line one\nLine two"}
                ]},
                "Action Items": {"type": "rich_text", "rich_text": []},
                "Processed": {"type": "checkbox", "checkbox": false}
            }
        })
    }

    #[test]
    fn parses_page_properties() {
        let record = parse_page(&sample_page()).expect("page should parse");
        assert_eq!(
            record,
            MeetingRecord {
                id: "3f1c-page".to_string(),
                title: Some("Weekly sync".to_string()),
                summary: Some("Line one\nLine two".to_string()),
                action_items: Some(String::new()),
                key_questions: None,
                processed: false,
                url: Some("https://www.notion.so/Weekly-3f1c".to_string()),
            }
        );
    }

    #[test]
    fn page_without_id_is_invalid() {
        let error = parse_page(&json!({"properties": {}})).expect_err("id is required");
        assert!(matches!(error, AdapterError::InvalidResponse(_)));
    }

    #[test]
    fn query_body_filters_unprocessed_and_carries_cursor() {
        assert_eq!(
            pending_query_body(Some("cursor-2")),
            json!({
                "filter": {"property": "Processed", "checkbox": {"equals": false}},
                "start_cursor": "cursor-2"
            })
        );
        assert!(pending_query_body(None).get("start_cursor").is_none());
    }

    #[test]
    fn mark_body_sets_checkbox() {
        assert_eq!(
            mark_processed_body(),
            json!({"properties": {"Processed": {"checkbox": true}}})
        );
    }

    #[test]
    fn rich_text_is_chunked_at_limit() {
        let long = "x".repeat(RICH_TEXT_LIMIT + 5);
        let segments = rich_text(&long);
        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[1]["text"]["content"].as_str().map(str::len),
            Some(5)
        );
        assert!(rich_text("").is_empty());
    }

    #[test]
    fn create_body_writes_all_properties() {
        let body = create_page_body(
            "db-1",
            &NewRecord {
                title: "Retro".to_string(),
                summary: "Went well".to_string(),
                action_items: "• Fix CI".to_string(),
                key_questions: "• Next date?".to_string(),
                date: "2026-10-16".to_string(),
            },
        );
        assert_eq!(body["parent"]["database_id"], "db-1");
        assert_eq!(
            body["properties"]["Meeting Name"]["title"][0]["text"]["content"],
            "Retro"
        );
        assert_eq!(body["properties"]["Processed"]["checkbox"], false);
        assert_eq!(body["properties"]["Date"]["date"]["start"], "2026-10-16");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn fetch_pending_follows_cursor_across_pages() {
        let server = TestServer::start(vec![
            CannedResponse::json(
                200,
                json!({"results": [sample_page()], "has_more": true, "next_cursor": "cursor-2"}),
            ),
            CannedResponse::json(
                200,
                json!({
                    "results": [{"id": "page-b", "properties": {}}],
                    "has_more": false,
                    "next_cursor": null
                }),
            ),
        ]);
        let store = store_at(&server, Duration::from_secs(5));

        let records = store.fetch_pending().expect("fetch should succeed");

        assert_eq!(
            records.iter().map(|record| record.id.as_str()).collect::<Vec<_>>(),
            vec!["3f1c-page", "page-b"]
        );
        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/databases/db-1/query");
        assert_eq!(requests[0].header("notion-version"), Some(NOTION_VERSION));
        assert_eq!(requests[0].header("authorization"), Some("Bearer secret_token"));
        assert!(requests[0].json().get("start_cursor").is_none());
        assert_eq!(requests[1].json()["start_cursor"], "cursor-2");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn mark_processed_patches_page_and_surfaces_status() {
        let server = TestServer::start(vec![
            CannedResponse::json(200, json!({"id": "page-a"})),
            CannedResponse::text(404, "object_not_found"),
        ]);
        let store = store_at(&server, Duration::from_secs(5));

        store.mark_processed("page-a").expect("patch should succeed");
        let error = store
            .mark_processed("page-gone")
            .expect_err("missing page should fail");

        let requests = server.requests();
        assert_eq!(requests[0].method, "PATCH");
        assert_eq!(requests[0].path, "/pages/page-a");
        assert_eq!(requests[0].json(), mark_processed_body());
        assert!(matches!(
            error,
            AdapterError::UnexpectedStatus { status: 404, ref body } if body == "object_not_found"
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn slow_store_is_a_timeout() {
        let server = TestServer::start(vec![CannedResponse::json(
            200,
            json!({"results": [], "has_more": false}),
        )
        .after(Duration::from_secs(2))]);
        let store = store_at(&server, Duration::from_millis(200));

        let error = store.fetch_pending().expect_err("fetch should time out");

        assert!(matches!(error, AdapterError::Timeout(_)));
    }
}
