//! Attachment operations for Confluence API.

use tracing::{info, warn};

use wikigate_core::atlassian::confluence::payload::{
    attachments_path, ATTACHMENT_EXPAND, DEFAULT_ATTACHMENT_LIMIT,
};
use wikigate_core::atlassian::confluence::{
    normalize_attachment, normalize_attachments, parse_content, Attachment, ConfluenceError,
    ContentListResponse,
};

use super::{log_skipped, require, ConfluenceClient};
use crate::atlassian::confluence::http::{
    mime_from_extension, HttpClient, HttpRequest, MultipartFile, RequestBody,
};

impl<C: HttpClient> ConfluenceClient<C> {
    /// List attachment metadata of a page.
    pub async fn get_attachments(&self, page_id: &str) -> Result<Vec<Attachment>, ConfluenceError> {
        info!("Listing attachments of page {}", page_id);

        let response: ContentListResponse = self
            .fetch(
                HttpRequest::get(attachments_path(page_id))
                    .query("expand", ATTACHMENT_EXPAND)
                    .query("limit", DEFAULT_ATTACHMENT_LIMIT),
            )
            .await?;

        let batch = normalize_attachments(response.results);
        log_skipped("attachment", &batch.skipped);

        Ok(batch.items)
    }

    /// Upload a file to a page.
    pub async fn add_attachment(
        &self,
        page_id: &str,
        content: Vec<u8>,
        file_name: &str,
        comment: Option<&str>,
    ) -> Result<Attachment, ConfluenceError> {
        info!(
            "Uploading attachment '{}' ({} bytes) to page {}",
            file_name,
            content.len(),
            page_id
        );

        let file = MultipartFile {
            file_name: file_name.to_string(),
            content,
            mime: mime_from_extension(file_name),
            comment: comment.map(str::to_string),
        };

        let response: ContentListResponse = self
            .fetch(HttpRequest::post(
                attachments_path(page_id),
                RequestBody::Multipart(file),
            ))
            .await?;

        let first = response.results.into_iter().next().ok_or_else(|| {
            warn!("Upload response for page {} listed no attachment", page_id);
            ConfluenceError::Unknown
        })?;

        require(
            parse_content(first).and_then(|raw| normalize_attachment(&raw)),
            "attachment",
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::atlassian::confluence::client::fake::FakeHttp;
    use crate::atlassian::confluence::http::HttpMethod;

    fn attachment_json(id: &str, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "type": "attachment",
            "title": title,
            "version": { "number": 1 },
            "metadata": { "mediaType": "image/png", "comment": "architecture" },
            "extensions": { "mediaType": "image/png", "fileSize": 4 },
            "_links": { "download": format!("/download/attachments/123/{title}") }
        })
    }

    #[tokio::test]
    async fn test_get_attachments() {
        let client = FakeHttp::new()
            .respond(
                200,
                json!({
                    "results": [attachment_json("att1", "a.png"), { "id": "att2" }],
                    "size": 2
                }),
            )
            .into_client();

        let attachments = client.get_attachments("123").await.unwrap();

        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].title, "a.png");
        assert_eq!(attachments[0].file_size, Some(4));
        assert_eq!(
            client.http().requests()[0].path,
            "/rest/api/content/123/child/attachment"
        );
    }

    #[tokio::test]
    async fn test_add_attachment_sends_multipart() {
        let client = FakeHttp::new()
            .respond(
                200,
                json!({ "results": [attachment_json("att9", "diagram.png")], "size": 1 }),
            )
            .into_client();

        let attachment = client
            .add_attachment("123", vec![1, 2, 3, 4], "diagram.png", Some("architecture"))
            .await
            .unwrap();

        assert_eq!(attachment.id, "att9");
        assert_eq!(attachment.comment, Some("architecture".to_string()));

        let requests = client.http().requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(
            requests[0].body,
            RequestBody::Multipart(MultipartFile {
                file_name: "diagram.png".to_string(),
                content: vec![1, 2, 3, 4],
                mime: "image/png",
                comment: Some("architecture".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_add_attachment_empty_response() {
        let client = FakeHttp::new()
            .respond(200, json!({ "results": [], "size": 0 }))
            .into_client();

        assert_eq!(
            client
                .add_attachment("123", vec![], "empty.txt", None)
                .await
                .unwrap_err(),
            ConfluenceError::Unknown
        );
    }
}
