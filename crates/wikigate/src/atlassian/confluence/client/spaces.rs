//! Space operations for Confluence API.

use tracing::info;

use wikigate_core::atlassian::confluence::payload::{space_query, DEFAULT_SPACE_LIMIT, SPACE_PATH};
use wikigate_core::atlassian::confluence::{
    normalize_spaces, ConfluenceError, ContentListResponse, Space,
};

use super::{log_skipped, ConfluenceClient};
use crate::atlassian::confluence::http::{HttpClient, HttpRequest};

impl<C: HttpClient> ConfluenceClient<C> {
    /// List spaces visible to the configured user.
    pub async fn get_spaces(&self, limit: Option<usize>) -> Result<Vec<Space>, ConfluenceError> {
        let limit = limit.unwrap_or(DEFAULT_SPACE_LIMIT);
        info!("Listing spaces (limit {})", limit);

        let response: ContentListResponse = self
            .fetch(HttpRequest::get(SPACE_PATH).queries(space_query(limit)))
            .await?;

        let batch = normalize_spaces(response.results);
        log_skipped("space", &batch.skipped);

        Ok(batch.items)
    }
}
