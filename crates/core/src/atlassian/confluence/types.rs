//! Domain models (input from API)
//!
//! Raw shapes returned by the Confluence REST API. Almost every field is optional: which
//! blocks are present depends on the `expand` parameter of the request, and list endpoints
//! return thinner objects than single-resource endpoints. Validation happens during
//! normalization, not here.

use serde::{Deserialize, Deserializer, Serialize};

/// Confluence identifiers arrive as strings for content and as numbers for spaces and
/// labels. Both are kept as strings.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Content (page, comment or attachment) response from API
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ContentResponse {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub body: Option<ContentBody>,
    #[serde(default)]
    pub version: Option<VersionResponse>,
    #[serde(default)]
    pub ancestors: Option<Vec<ContentRef>>,
    #[serde(default)]
    pub history: Option<HistoryResponse>,
    #[serde(default)]
    pub metadata: Option<MetadataResponse>,
    #[serde(default)]
    pub space: Option<SpaceRef>,
    #[serde(default)]
    pub children: Option<ChildrenResponse>,
    #[serde(default)]
    pub extensions: Option<Extensions>,
    #[serde(default)]
    pub container: Option<ContentRef>,
    #[serde(rename = "_links", default)]
    pub links: Option<LinksResponse>,
    #[serde(rename = "_expandable", default)]
    pub expandable: Option<Expandable>,
}

/// Body block, keyed by representation
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ContentBody {
    #[serde(default)]
    pub storage: Option<Representation>,
}

/// A body in one representation (`storage`, `plain`, `view`)
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Representation {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub representation: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct VersionResponse {
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub when: Option<String>,
    #[serde(default)]
    pub by: Option<UserResponse>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HistoryResponse {
    #[serde(rename = "createdDate", default)]
    pub created_date: Option<String>,
    #[serde(rename = "createdBy", default)]
    pub created_by: Option<UserResponse>,
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: Option<VersionResponse>,
}

/// User as embedded in history and version blocks.
///
/// Cloud sends `accountId`, Server/Data Center sends `userKey` and `username`.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct UserResponse {
    #[serde(rename = "accountId", default)]
    pub account_id: Option<String>,
    #[serde(rename = "userKey", default)]
    pub user_key: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "publicName", default)]
    pub public_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct MetadataResponse {
    #[serde(default)]
    pub labels: Option<LabelsResponse>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(rename = "mediaType", default)]
    pub media_type: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LabelsResponse {
    #[serde(default)]
    pub results: Vec<LabelResponse>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LabelResponse {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
}

/// Space reference embedded in content
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SpaceRef {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Reference to another content object (ancestor, child, container)
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ContentRef {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ChildrenResponse {
    #[serde(default)]
    pub page: Option<ContentRefList>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ContentRefList {
    #[serde(default)]
    pub results: Vec<ContentRef>,
}

/// Attachment-only extensions block
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Extensions {
    #[serde(rename = "mediaType", default)]
    pub media_type: Option<String>,
    #[serde(rename = "fileSize", default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Links from content response
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LinksResponse {
    #[serde(default)]
    pub webui: Option<String>,
    #[serde(default)]
    pub edit: Option<String>,
    #[serde(default)]
    pub tinyui: Option<String>,
    #[serde(default)]
    pub download: Option<String>,
    #[serde(default)]
    pub base: Option<String>,
}

/// References to blocks that were not expanded
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Expandable {
    #[serde(default)]
    pub space: Option<String>,
    #[serde(default)]
    pub container: Option<String>,
}

/// Paginated list of content objects.
///
/// Results are kept as raw JSON so each one can be normalized (or rejected) on its own.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ContentListResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    #[serde(default)]
    pub size: usize,
    #[serde(rename = "totalSize", default)]
    pub total_size: Option<usize>,
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(rename = "_links", default)]
    pub links: Option<LinksResponse>,
}

/// Space response from API
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SpaceResponse {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<SpaceDescription>,
    #[serde(rename = "type", default)]
    pub space_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SpaceDescription {
    #[serde(default)]
    pub plain: Option<Representation>,
    #[serde(default)]
    pub view: Option<Representation>,
}

/// Minimal acknowledgement returned by write endpoints
#[derive(Debug, Deserialize, Clone, Default)]
pub struct WriteAck {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
}
