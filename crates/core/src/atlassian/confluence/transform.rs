//! Pure transformation functions: raw API responses to canonical entities
//!
//! These functions have no side effects and can be tested without mocking HTTP.

use super::model::{
    Attachment, Comment, Identity, Label, Page, PageLinks, SearchResult, Space, SpaceStatus,
    SpaceType,
};
use super::types::{
    ContentListResponse, ContentResponse, LinksResponse, SpaceResponse, UserResponse,
};
use crate::markup::{extract_plain_text, ContentFormat};

/// Why a raw object could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid value `{value}` for field `{field}`")]
    InvalidValue { field: &'static str, value: String },

    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// A result that list normalization dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub id: Option<String>,
    pub reason: NormalizeError,
}

/// Items normalized from a list response, plus the ones that were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<T> {
    pub items: Vec<T>,
    pub skipped: Vec<SkippedItem>,
}

// ============================================================================
// Pure Helper Functions
// ============================================================================

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Last path segment of a reference such as `/rest/api/space/DEV`.
pub fn last_path_segment(reference: &str) -> Option<&str> {
    reference
        .split(['?', '#'])
        .next()
        .unwrap_or(reference)
        .split('/')
        .filter(|s| !s.is_empty())
        .last()
}

/// Build an identity from a user block.
///
/// Returns `None` when the block identifies nobody.
pub fn normalize_identity(user: &UserResponse) -> Option<Identity> {
    let id = non_empty(user.account_id.clone())
        .or_else(|| non_empty(user.user_key.clone()))
        .or_else(|| non_empty(user.username.clone()));

    let display_name = non_empty(user.display_name.clone())
        .or_else(|| non_empty(user.public_name.clone()))
        .or_else(|| non_empty(user.username.clone()));

    match (id, display_name) {
        (None, None) => None,
        (id, display_name) => {
            let id = id.or_else(|| display_name.clone()).unwrap_or_default();
            let display_name = display_name.unwrap_or_else(|| id.clone());
            Some(Identity {
                id,
                display_name,
                email: non_empty(user.email.clone()),
            })
        }
    }
}

fn absolute(base: Option<&str>, link: String) -> String {
    match base {
        Some(base) if link.starts_with('/') => {
            format!("{}{}", base.trim_end_matches('/'), link)
        }
        _ => link,
    }
}

fn normalize_links(links: Option<&LinksResponse>) -> PageLinks {
    let Some(links) = links else {
        return PageLinks::default();
    };
    let base = links.base.as_deref();

    PageLinks {
        webui: links
            .webui
            .clone()
            .map(|l| absolute(base, l))
            .unwrap_or_default(),
        edit: links.edit.clone().map(|l| absolute(base, l)),
        tinyui: links.tinyui.clone().map(|l| absolute(base, l)),
    }
}

/// Space key: the last segment of the expandable space reference, else the embedded space.
pub fn resolve_space_key(raw: &ContentResponse) -> Option<String> {
    raw.expandable
        .as_ref()
        .and_then(|e| e.space.as_deref())
        .and_then(last_path_segment)
        .map(str::to_string)
        .or_else(|| raw.space.as_ref().and_then(|s| non_empty(s.key.clone())))
}

/// Nearest ancestor: the last element of the ancestor chain.
pub fn resolve_parent_id(raw: &ContentResponse) -> Option<String> {
    raw.ancestors
        .as_ref()
        .and_then(|chain| chain.last())
        .and_then(|ancestor| ancestor.id.clone())
}

/// Labels deduplicated by id, first occurrence wins.
fn normalize_labels(raw: &ContentResponse) -> Option<Vec<Label>> {
    let labels = raw.metadata.as_ref()?.labels.as_ref()?;

    let mut seen = std::collections::HashSet::new();
    let normalized = labels
        .results
        .iter()
        .filter_map(|label| {
            let id = label.id.clone()?;
            let name = label.name.clone().unwrap_or_default();
            Some(Label { id, name })
        })
        .filter(|label| seen.insert(label.id.clone()))
        .collect();

    Some(normalized)
}

fn normalize_children(raw: &ContentResponse) -> Option<Vec<String>> {
    let children = raw.children.as_ref()?.page.as_ref()?;
    Some(
        children
            .results
            .iter()
            .filter_map(|child| child.id.clone())
            .collect(),
    )
}

fn storage_value(raw: &ContentResponse) -> Option<&str> {
    raw.body
        .as_ref()
        .and_then(|b| b.storage.as_ref())
        .and_then(|s| s.value.as_deref())
}

// ============================================================================
// Pure Transformation Functions
// ============================================================================

/// Parse one raw JSON object into the content shape.
pub fn parse_content(value: serde_json::Value) -> Result<ContentResponse, NormalizeError> {
    serde_json::from_value(value).map_err(|e| NormalizeError::Malformed(e.to_string()))
}

/// Normalize a page, rendering its storage body with `format`.
///
/// Requires an id, a title, a version number, a resolvable space key, a creation time
/// and a creator. The creation time falls back to the version timestamp and the creator
/// to the version author.
pub fn normalize_page(
    raw: &ContentResponse,
    format: ContentFormat,
) -> Result<Page, NormalizeError> {
    let id = non_empty(raw.id.clone()).ok_or(NormalizeError::MissingField("id"))?;
    let title = raw.title.clone().ok_or(NormalizeError::MissingField("title"))?;

    let version = raw
        .version
        .as_ref()
        .and_then(|v| v.number)
        .ok_or(NormalizeError::MissingField("version.number"))?;
    if version == 0 {
        return Err(NormalizeError::InvalidValue {
            field: "version.number",
            value: version.to_string(),
        });
    }

    let space_key = resolve_space_key(raw).ok_or(NormalizeError::MissingField("space"))?;

    let history = raw.history.as_ref();
    let version_block = raw.version.as_ref();

    let created = history
        .and_then(|h| non_empty(h.created_date.clone()))
        .or_else(|| version_block.and_then(|v| non_empty(v.when.clone())))
        .ok_or(NormalizeError::MissingField("history.createdDate"))?;

    let updated = version_block
        .and_then(|v| non_empty(v.when.clone()))
        .unwrap_or_else(|| created.clone());

    let created_by = history
        .and_then(|h| h.created_by.as_ref())
        .and_then(normalize_identity)
        .or_else(|| {
            version_block
                .and_then(|v| v.by.as_ref())
                .and_then(normalize_identity)
        })
        .ok_or(NormalizeError::MissingField("history.createdBy"))?;

    let updated_by = version_block
        .and_then(|v| v.by.as_ref())
        .and_then(normalize_identity)
        .or_else(|| {
            history
                .and_then(|h| h.last_updated.as_ref())
                .and_then(|l| l.by.as_ref())
                .and_then(normalize_identity)
        })
        .unwrap_or_else(|| created_by.clone());

    Ok(Page {
        id,
        title,
        space_key,
        version,
        content: format.render(storage_value(raw)),
        created,
        updated,
        created_by,
        updated_by,
        links: normalize_links(raw.links.as_ref()),
        parent_id: resolve_parent_id(raw),
        children_ids: normalize_children(raw),
        labels: normalize_labels(raw),
    })
}

/// Normalize a comment attached to `page_id`.
///
/// The page id is not reliably present in comment payloads, so the caller supplies it.
pub fn normalize_comment(raw: &ContentResponse, page_id: &str) -> Result<Comment, NormalizeError> {
    let id = non_empty(raw.id.clone()).ok_or(NormalizeError::MissingField("id"))?;

    let history = raw.history.as_ref();
    let version_block = raw.version.as_ref();

    let created_by = history
        .and_then(|h| h.created_by.as_ref())
        .and_then(normalize_identity)
        .or_else(|| {
            version_block
                .and_then(|v| v.by.as_ref())
                .and_then(normalize_identity)
        })
        .ok_or(NormalizeError::MissingField("history.createdBy"))?;

    let created = history
        .and_then(|h| non_empty(h.created_date.clone()))
        .or_else(|| version_block.and_then(|v| non_empty(v.when.clone())))
        .ok_or(NormalizeError::MissingField("history.createdDate"))?;

    Ok(Comment {
        id,
        page_id: page_id.to_string(),
        content: extract_plain_text(storage_value(raw)),
        created_by,
        created,
        parent_id: resolve_parent_id(raw),
    })
}

/// Normalize a space, lower-casing its type and status.
///
/// A missing status is read as `current`.
pub fn normalize_space(raw: &SpaceResponse) -> Result<Space, NormalizeError> {
    let id = non_empty(raw.id.clone()).ok_or(NormalizeError::MissingField("id"))?;
    let key = non_empty(raw.key.clone()).ok_or(NormalizeError::MissingField("key"))?;
    let name = raw.name.clone().unwrap_or_else(|| key.clone());

    let raw_type = raw
        .space_type
        .as_deref()
        .ok_or(NormalizeError::MissingField("type"))?;
    let space_type = SpaceType::parse(raw_type).ok_or_else(|| NormalizeError::InvalidValue {
        field: "type",
        value: raw_type.to_string(),
    })?;

    let status = match raw.status.as_deref() {
        None => SpaceStatus::Current,
        Some(raw_status) => {
            SpaceStatus::parse(raw_status).ok_or_else(|| NormalizeError::InvalidValue {
                field: "status",
                value: raw_status.to_string(),
            })?
        }
    };

    let description = raw
        .description
        .as_ref()
        .and_then(|d| d.plain.as_ref().or(d.view.as_ref()))
        .and_then(|r| r.value.as_deref())
        .map(|v| extract_plain_text(Some(v)))
        .filter(|v| !v.is_empty());

    Ok(Space {
        id,
        key,
        name,
        description,
        space_type,
        status,
    })
}

/// Normalize attachment metadata.
pub fn normalize_attachment(raw: &ContentResponse) -> Result<Attachment, NormalizeError> {
    let id = non_empty(raw.id.clone()).ok_or(NormalizeError::MissingField("id"))?;
    let title = non_empty(raw.title.clone()).ok_or(NormalizeError::MissingField("title"))?;

    let metadata = raw.metadata.as_ref();
    let extensions = raw.extensions.as_ref();

    let comment = metadata
        .and_then(|m| non_empty(m.comment.clone()))
        .or_else(|| extensions.and_then(|e| non_empty(e.comment.clone())));

    let media_type = extensions
        .and_then(|e| non_empty(e.media_type.clone()))
        .or_else(|| metadata.and_then(|m| non_empty(m.media_type.clone())));

    let download_link = raw.links.as_ref().and_then(|links| {
        links
            .download
            .clone()
            .map(|l| absolute(links.base.as_deref(), l))
    });

    Ok(Attachment {
        id,
        title,
        comment,
        media_type,
        file_size: extensions.and_then(|e| e.file_size),
        download_link,
        version: raw.version.as_ref().and_then(|v| v.number),
    })
}

fn normalize_each<R, T>(
    results: Vec<serde_json::Value>,
    parse: impl Fn(serde_json::Value) -> Result<R, NormalizeError>,
    normalize: impl Fn(&R) -> Result<T, NormalizeError>,
) -> Batch<T> {
    let mut items = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();

    for value in results {
        let id = value.get("id").and_then(|id| match id {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        match parse(value).and_then(|raw| normalize(&raw)) {
            Ok(item) => items.push(item),
            Err(reason) => skipped.push(SkippedItem { id, reason }),
        }
    }

    Batch { items, skipped }
}

/// Normalize every page of a list response independently.
pub fn normalize_pages(results: Vec<serde_json::Value>, format: ContentFormat) -> Batch<Page> {
    normalize_each(results, parse_content, |raw| normalize_page(raw, format))
}

/// Normalize every comment of a list response, stamping `page_id` on each.
pub fn normalize_comments(results: Vec<serde_json::Value>, page_id: &str) -> Batch<Comment> {
    normalize_each(results, parse_content, |raw| normalize_comment(raw, page_id))
}

/// Normalize every space of a list response independently.
pub fn normalize_spaces(results: Vec<serde_json::Value>) -> Batch<Space> {
    normalize_each(
        results,
        |value| {
            serde_json::from_value::<SpaceResponse>(value)
                .map_err(|e| NormalizeError::Malformed(e.to_string()))
        },
        normalize_space,
    )
}

/// Normalize every attachment of a list response independently.
pub fn normalize_attachments(results: Vec<serde_json::Value>) -> Batch<Attachment> {
    normalize_each(results, parse_content, normalize_attachment)
}

/// Convert a search response into the search result.
///
/// Results that cannot be normalized are dropped and returned alongside so the caller can
/// report them. `total` is the service's reported size, not the number of pages kept.
pub fn transform_search_results(
    response: ContentListResponse,
    format: ContentFormat,
) -> (SearchResult, Vec<SkippedItem>) {
    let total = response.total_size.unwrap_or(response.size);
    let batch = normalize_pages(response.results, format);

    let result = SearchResult {
        returned: batch.items.len(),
        skipped: batch.skipped.len(),
        pages: batch.items,
        total,
    };

    (result, batch.skipped)
}

// ============================================================================
// Tests
// ============================================================================
