//! Comment operations for Confluence API.

use tracing::{info, warn};

use wikigate_core::atlassian::confluence::payload::{
    comment_payload, comments_path, content_path, COMMENT_EXPAND, DEFAULT_COMMENT_LIMIT,
};
use wikigate_core::atlassian::confluence::types::WriteAck;
use wikigate_core::atlassian::confluence::{
    normalize_comment, normalize_comments, Comment, ConfluenceError, ContentListResponse,
    ContentResponse,
};

use super::{log_skipped, require, ConfluenceClient};
use crate::atlassian::confluence::http::{HttpClient, HttpRequest, RequestBody};

impl<C: HttpClient> ConfluenceClient<C> {
    /// Get the comments of a page, each stamped with `page_id`.
    pub async fn get_comments(
        &self,
        page_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Comment>, ConfluenceError> {
        let limit = limit.unwrap_or(DEFAULT_COMMENT_LIMIT);
        info!("Getting comments for page {} (limit {})", page_id, limit);

        let response: ContentListResponse = self
            .fetch(
                HttpRequest::get(comments_path(page_id))
                    .query("expand", COMMENT_EXPAND)
                    .query("limit", limit),
            )
            .await?;

        let batch = normalize_comments(response.results, page_id);
        log_skipped("comment", &batch.skipped);

        Ok(batch.items)
    }

    /// Add a comment to a page, optionally as a reply, then re-fetch it.
    pub async fn add_comment(
        &self,
        page_id: &str,
        content: &str,
        parent_id: Option<&str>,
    ) -> Result<Comment, ConfluenceError> {
        info!("Adding comment to page {}", page_id);

        let ack: WriteAck = self
            .fetch(HttpRequest::post(
                comments_path(page_id),
                RequestBody::Json(comment_payload(page_id, content, parent_id)),
            ))
            .await?;

        let comment_id = ack.id.ok_or_else(|| {
            warn!("Comment response carried no id");
            ConfluenceError::Unknown
        })?;

        let raw: ContentResponse = self
            .fetch(HttpRequest::get(content_path(&comment_id)).query("expand", COMMENT_EXPAND))
            .await?;

        let mut comment = require(normalize_comment(&raw, page_id), "comment")?;
        if comment.parent_id.is_none() {
            comment.parent_id = parent_id.map(str::to_string);
        }

        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::atlassian::confluence::client::fake::{comment_json, FakeHttp};
    use crate::atlassian::confluence::http::HttpMethod;

    #[tokio::test]
    async fn test_get_comments_stamps_page_id() {
        let client = FakeHttp::new()
            .respond(
                200,
                json!({
                    "results": [
                        comment_json("900", json!([])),
                        comment_json("901", json!([{ "id": "900", "type": "comment" }])),
                        { "id": "902" }
                    ],
                    "size": 3
                }),
            )
            .into_client();

        let comments = client.get_comments("123", None).await.unwrap();

        assert_eq!(comments.len(), 2);
        assert!(comments.iter().all(|c| c.page_id == "123"));
        assert_eq!(comments[0].content, "Looks good");
        assert_eq!(comments[0].parent_id, None);
        assert_eq!(comments[1].parent_id, Some("900".to_string()));

        let requests = client.http().requests();
        assert_eq!(requests[0].path, "/rest/api/content/123/child/comment");
        assert!(requests[0]
            .query
            .contains(&("limit".to_string(), "100".to_string())));
    }

    #[tokio::test]
    async fn test_get_comments_missing_page() {
        let client = FakeHttp::new()
            .respond(404, json!({ "message": "No content found with id 77" }))
            .into_client();

        assert_eq!(
            client.get_comments("77", None).await.unwrap_err(),
            ConfluenceError::NotFound {
                resource_id: "77".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_add_comment_writes_then_reads() {
        let client = FakeHttp::new()
            .respond(200, json!({ "id": "950", "type": "comment" }))
            .respond(200, comment_json("950", json!([])))
            .into_client();

        let comment = client
            .add_comment("123", "<p>Looks good</p>", Some("900"))
            .await
            .unwrap();

        assert_eq!(comment.id, "950");
        assert_eq!(comment.page_id, "123");
        // The service did not echo the ancestor, so the requested parent is kept.
        assert_eq!(comment.parent_id, Some("900".to_string()));

        let requests = client.http().requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].path, "/rest/api/content/123/child/comment");
        let RequestBody::Json(body) = &requests[0].body else {
            panic!("expected a JSON body");
        };
        assert_eq!(body["container"], json!({ "id": "123", "type": "page" }));
        assert_eq!(body["ancestors"], json!([{ "id": "900" }]));
        assert_eq!(requests[1].path, "/rest/api/content/950");
    }

    #[tokio::test]
    async fn test_add_comment_prefers_echoed_ancestor() {
        let client = FakeHttp::new()
            .respond(200, json!({ "id": "950" }))
            .respond(
                200,
                comment_json("950", json!([{ "id": "1" }, { "id": "2" }])),
            )
            .into_client();

        let comment = client.add_comment("123", "x", None).await.unwrap();
        assert_eq!(comment.parent_id, Some("2".to_string()));
    }
}
