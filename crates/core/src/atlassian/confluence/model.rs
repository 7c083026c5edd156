//! Output models (domain model)
//!
//! The canonical entities handed to callers. They are plain values built fresh on every
//! normalization call and serialized as camelCase JSON.

use serde::{Deserialize, Serialize};

/// Author of a page, version or comment
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageLinks {
    pub webui: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tinyui: Option<String>,
}

/// Labels are identified by id; two labels may share a name.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Label {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    pub space_key: String,
    pub version: u32,
    pub content: String,
    pub created: String,
    pub updated: String,
    pub created_by: Identity,
    pub updated_by: Identity,
    pub links: PageLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<Label>>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub page_id: String,
    pub content: String,
    pub created_by: Identity,
    pub created: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpaceType {
    Global,
    Personal,
    Team,
}

impl SpaceType {
    /// Parse the service's enumeration, in any case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "global" => Some(SpaceType::Global),
            "personal" => Some(SpaceType::Personal),
            "team" => Some(SpaceType::Team),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceType::Global => "global",
            SpaceType::Personal => "personal",
            SpaceType::Team => "team",
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpaceStatus {
    Current,
    Archived,
}

impl SpaceStatus {
    /// Parse the service's enumeration, in any case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "current" => Some(SpaceStatus::Current),
            "archived" => Some(SpaceStatus::Archived),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceStatus::Current => "current",
            SpaceStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Space {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub space_type: SpaceType,
    pub status: SpaceStatus,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

/// Output structure for search command
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub pages: Vec<Page>,
    /// Size reported by the service.
    pub total: usize,
    /// Number of pages actually normalized.
    pub returned: usize,
    /// Results dropped because they could not be normalized.
    pub skipped: usize,
}

/// Which editor a newly created page opens in.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    V1,
    #[default]
    V2,
    Auto,
}

impl EditorMode {
    /// Value of the `editor` content property, if one is sent.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            EditorMode::V1 => Some("v1"),
            EditorMode::V2 => Some("v2"),
            EditorMode::Auto => None,
        }
    }
}

impl std::str::FromStr for EditorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" => Ok(EditorMode::V1),
            "v2" => Ok(EditorMode::V2),
            "auto" => Ok(EditorMode::Auto),
            other => Err(format!("Unknown editor mode: {other} (expected v1, v2 or auto)")),
        }
    }
}

/// Input for page creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePage {
    pub space_key: String,
    pub title: String,
    /// Body in storage format.
    pub content: String,
    pub parent_id: Option<String>,
    pub editor_mode: Option<EditorMode>,
}

/// Input for page update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePage {
    pub page_id: String,
    pub title: String,
    /// Body in storage format.
    pub content: String,
    /// Version the caller believes is current.
    pub version: u32,
}
