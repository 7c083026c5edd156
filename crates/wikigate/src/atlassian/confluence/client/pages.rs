//! Page operations for Confluence API.

use tracing::{debug, info, warn};

use wikigate_core::atlassian::confluence::payload::{
    content_path, create_page_payload, search_query, update_page_payload, CONTENT_PATH,
    DEFAULT_SEARCH_LIMIT, PAGE_EXPAND, SEARCH_PATH,
};
use wikigate_core::atlassian::confluence::types::WriteAck;
use wikigate_core::atlassian::confluence::{
    normalize_page, transform_search_results, ConfluenceError, ContentListResponse,
    ContentResponse, CreatePage, Page, SearchResult, UpdatePage,
};
use wikigate_core::markup::ContentFormat;

use super::{log_skipped, require, ConfluenceClient};
use crate::atlassian::confluence::http::{HttpClient, HttpRequest, RequestBody};

impl<C: HttpClient> ConfluenceClient<C> {
    /// Get page by ID, with its content as plain text.
    pub async fn get_page(&self, page_id: &str) -> Result<Page, ConfluenceError> {
        self.get_page_as(page_id, ContentFormat::Text).await
    }

    /// Get page by ID, rendering its content in `format`.
    pub async fn get_page_as(
        &self,
        page_id: &str,
        format: ContentFormat,
    ) -> Result<Page, ConfluenceError> {
        info!("Getting page {}", page_id);

        let raw = self.get_raw_page(page_id).await?;
        require(normalize_page(&raw, format), "page")
    }

    async fn get_raw_page(&self, page_id: &str) -> Result<ContentResponse, ConfluenceError> {
        self.fetch(HttpRequest::get(content_path(page_id)).query("expand", PAGE_EXPAND))
            .await
    }

    /// Search pages with CQL.
    ///
    /// Results that cannot be normalized are skipped and counted, never failing the search.
    pub async fn search_pages(
        &self,
        cql: &str,
        limit: Option<usize>,
    ) -> Result<SearchResult, ConfluenceError> {
        self.search_pages_as(cql, limit, ContentFormat::Text).await
    }

    pub async fn search_pages_as(
        &self,
        cql: &str,
        limit: Option<usize>,
        format: ContentFormat,
    ) -> Result<SearchResult, ConfluenceError> {
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        info!("Searching pages (limit {}): {}", limit, cql);

        let response: ContentListResponse = self
            .fetch(HttpRequest::get(SEARCH_PATH).queries(search_query(cql, limit)))
            .await?;

        let (result, skipped) = transform_search_results(response, format);
        log_skipped("search result", &skipped);

        Ok(result)
    }

    /// Create a page, then re-fetch it by the id the service assigned.
    ///
    /// If the follow-up read fails the page may exist even though an error is returned.
    pub async fn create_page(&self, request: &CreatePage) -> Result<Page, ConfluenceError> {
        info!(
            "Creating page '{}' in space {}",
            request.title, request.space_key
        );

        let ack: WriteAck = self
            .fetch(HttpRequest::post(
                CONTENT_PATH,
                RequestBody::Json(create_page_payload(request)),
            ))
            .await?;

        let page_id = ack.id.ok_or_else(|| {
            warn!("Create response carried no page id");
            ConfluenceError::Unknown
        })?;

        info!("Created page {}", page_id);
        self.get_page(&page_id).await
    }

    /// Update a page's title and body.
    ///
    /// The current version is read first and `current + 1` is written; `request.version` is
    /// only compared for logging.
    pub async fn update_page(&self, request: &UpdatePage) -> Result<Page, ConfluenceError> {
        let current = require(
            normalize_page(
                &self.get_raw_page(&request.page_id).await?,
                ContentFormat::Text,
            ),
            "page",
        )?;

        if current.version != request.version {
            debug!(
                "Page {} is at version {}, caller expected {}",
                current.id, current.version, request.version
            );
        }

        let next = current.version + 1;
        info!(
            "Updating page {} from version {} to {}",
            request.page_id, current.version, next
        );

        let _: WriteAck = self
            .fetch(HttpRequest::put(
                content_path(&request.page_id),
                update_page_payload(
                    &request.page_id,
                    &current.space_key,
                    &request.title,
                    &request.content,
                    next,
                ),
            ))
            .await?;

        self.get_page(&request.page_id).await
    }
}
