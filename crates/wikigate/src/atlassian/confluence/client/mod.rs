//! Confluence REST API client.
//!
//! Typed read/write operations over an injected [`HttpClient`]. Every failure reaches the
//! caller as a classified [`ConfluenceError`]; nothing is retried or cached.

mod attachments;
mod comments;
mod pages;
mod spaces;

#[cfg(test)]
pub(crate) mod fake;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use wikigate_core::atlassian::confluence::{
    classify_failure, ConfluenceError, NormalizeError, SkippedItem,
};

use super::http::{HttpClient, HttpRequest, HttpResponse, ReqwestTransport};
use crate::atlassian::{create_confluence_client, ConfluenceConfig};

/// Confluence REST API client.
#[derive(Debug, Clone)]
pub struct ConfluenceClient<C> {
    http: C,
}

impl ConfluenceClient<ReqwestTransport> {
    /// Create the production client from configuration.
    pub fn from_config(config: &ConfluenceConfig) -> color_eyre::eyre::Result<Self> {
        let client = create_confluence_client(config)?;
        Ok(Self::new(ReqwestTransport::new(client, &config.base_url)))
    }
}

impl<C: HttpClient> ConfluenceClient<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    /// Send a request, classifying transport failures and non-success responses.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ConfluenceError> {
        let method = request.method.as_str();
        let path = request.path.clone();

        debug!("{} {}", method, path);

        let response = self.http.send(request).await.map_err(|e| {
            warn!("{} {} failed: {}", method, path, e);
            ConfluenceError::Network { cause: e.0 }
        })?;

        if !response.is_success() {
            let error = classify_failure(
                response.status,
                &response.status_text,
                &response.body,
                &path,
            );
            warn!("{} {} returned {}: {}", method, path, response.status, error);
            return Err(error);
        }

        Ok(response)
    }

    /// Send a request and decode its JSON body.
    async fn fetch<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, ConfluenceError> {
        let path = request.path.clone();
        let response = self.execute(request).await?;

        serde_json::from_str(&response.body).map_err(|e| {
            warn!("Failed to decode response from {}: {}", path, e);
            ConfluenceError::Unknown
        })
    }
}

/// A single entity that fails normalization cannot be returned, so it is reported as
/// `Unknown`.
fn require<T>(result: Result<T, NormalizeError>, what: &str) -> Result<T, ConfluenceError> {
    result.map_err(|e| {
        warn!("Malformed {} in response: {}", what, e);
        ConfluenceError::Unknown
    })
}

fn log_skipped(what: &str, skipped: &[SkippedItem]) {
    for item in skipped {
        warn!(
            "Skipping malformed {} {}: {}",
            what,
            item.id.as_deref().unwrap_or("<no id>"),
            item.reason
        );
    }
}
