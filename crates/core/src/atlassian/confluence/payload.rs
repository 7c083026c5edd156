//! Request shapes for the Confluence REST API
//!
//! Paths are relative to the configured base URL (which already carries `/wiki` on Cloud).

use serde_json::{json, Value};

use super::model::CreatePage;

pub const PAGE_EXPAND: &str =
    "body.storage,version,ancestors,history,metadata.labels,space,children.page";
pub const COMMENT_EXPAND: &str = "body.storage,version,history,ancestors";
pub const SPACE_EXPAND: &str = "description.plain";
pub const ATTACHMENT_EXPAND: &str = "version,metadata";

pub const DEFAULT_SEARCH_LIMIT: usize = 50;
pub const DEFAULT_SPACE_LIMIT: usize = 100;
pub const DEFAULT_COMMENT_LIMIT: usize = 100;
pub const DEFAULT_ATTACHMENT_LIMIT: usize = 100;

pub const CONTENT_PATH: &str = "/rest/api/content";
pub const SEARCH_PATH: &str = "/rest/api/content/search";
pub const SPACE_PATH: &str = "/rest/api/space";

pub fn content_path(id: &str) -> String {
    format!("{CONTENT_PATH}/{}", urlencoding::encode(id))
}

pub fn comments_path(page_id: &str) -> String {
    format!("{}/child/comment", content_path(page_id))
}

pub fn attachments_path(page_id: &str) -> String {
    format!("{}/child/attachment", content_path(page_id))
}

fn storage_body(content: &str) -> Value {
    json!({
        "storage": {
            "value": content,
            "representation": "storage"
        }
    })
}

/// Body for `POST /rest/api/content`.
///
/// A missing editor mode means `v2`. `auto` sends no editor property at all and leaves the
/// choice to the service.
pub fn create_page_payload(request: &CreatePage) -> Value {
    let mut payload = json!({
        "type": "page",
        "title": request.title,
        "space": { "key": request.space_key },
        "body": storage_body(&request.content),
    });

    if let Some(parent_id) = &request.parent_id {
        payload["ancestors"] = json!([{ "id": parent_id }]);
    }

    if let Some(editor) = request.editor_mode.unwrap_or_default().hint() {
        payload["metadata"] = json!({
            "properties": {
                "editor": { "key": "editor", "value": editor }
            }
        });
    }

    payload
}

/// Body for `PUT /rest/api/content/{id}`, writing `version`.
pub fn update_page_payload(
    page_id: &str,
    space_key: &str,
    title: &str,
    content: &str,
    version: u32,
) -> Value {
    json!({
        "id": page_id,
        "type": "page",
        "title": title,
        "space": { "key": space_key },
        "body": storage_body(content),
        "version": { "number": version },
    })
}

/// Body for `POST /rest/api/content/{id}/child/comment`.
pub fn comment_payload(page_id: &str, content: &str, parent_id: Option<&str>) -> Value {
    let mut payload = json!({
        "type": "comment",
        "container": { "id": page_id, "type": "page" },
        "body": storage_body(content),
    });

    if let Some(parent_id) = parent_id {
        payload["ancestors"] = json!([{ "id": parent_id }]);
    }

    payload
}

/// Query for `GET /rest/api/space`.
pub fn space_query(limit: usize) -> Vec<(String, String)> {
    vec![
        ("limit".to_string(), limit.to_string()),
        ("expand".to_string(), SPACE_EXPAND.to_string()),
    ]
}

/// Query for `GET /rest/api/content/search`.
pub fn search_query(cql: &str, limit: usize) -> Vec<(String, String)> {
    vec![
        ("cql".to_string(), cql.to_string()),
        ("limit".to_string(), limit.to_string()),
        ("expand".to_string(), PAGE_EXPAND.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlassian::confluence::model::EditorMode;
    use pretty_assertions::assert_eq;

    fn create_request(editor_mode: Option<EditorMode>) -> CreatePage {
        CreatePage {
            space_key: "OPS".to_string(),
            title: "Runbook".to_string(),
            content: "<p>Hi</p>".to_string(),
            parent_id: None,
            editor_mode,
        }
    }

    #[test]
    fn test_create_payload_defaults_to_v2_editor() {
        let payload = create_page_payload(&create_request(None));
        assert_eq!(
            payload,
            json!({
                "type": "page",
                "title": "Runbook",
                "space": { "key": "OPS" },
                "body": { "storage": { "value": "<p>Hi</p>", "representation": "storage" } },
                "metadata": {
                    "properties": { "editor": { "key": "editor", "value": "v2" } }
                }
            })
        );
    }

    #[test]
    fn test_create_payload_v1_editor_and_parent() {
        let mut request = create_request(Some(EditorMode::V1));
        request.parent_id = Some("77".to_string());

        let payload = create_page_payload(&request);
        assert_eq!(payload["metadata"]["properties"]["editor"]["value"], "v1");
        assert_eq!(payload["ancestors"], json!([{ "id": "77" }]));
    }

    #[test]
    fn test_create_payload_auto_omits_editor() {
        let payload = create_page_payload(&create_request(Some(EditorMode::Auto)));
        assert!(payload.get("metadata").is_none());
        assert!(payload.get("ancestors").is_none());
    }

    #[test]
    fn test_update_payload_carries_version() {
        let payload = update_page_payload("123", "OPS", "T", "<p>x</p>", 6);
        assert_eq!(payload["version"], json!({ "number": 6 }));
        assert_eq!(payload["id"], "123");
        assert_eq!(payload["space"], json!({ "key": "OPS" }));
        assert_eq!(payload["type"], "page");
        assert_eq!(payload["body"]["storage"]["value"], "<p>x</p>");
    }

    #[test]
    fn test_comment_payload() {
        let payload = comment_payload("123", "<p>ok</p>", Some("900"));
        assert_eq!(
            payload,
            json!({
                "type": "comment",
                "container": { "id": "123", "type": "page" },
                "body": { "storage": { "value": "<p>ok</p>", "representation": "storage" } },
                "ancestors": [{ "id": "900" }]
            })
        );
        assert!(comment_payload("123", "x", None).get("ancestors").is_none());
    }

    #[test]
    fn test_paths_encode_ids() {
        assert_eq!(content_path("123"), "/rest/api/content/123");
        assert_eq!(comments_path("a b"), "/rest/api/content/a%20b/child/comment");
        assert_eq!(attachments_path("9"), "/rest/api/content/9/child/attachment");
    }
}
