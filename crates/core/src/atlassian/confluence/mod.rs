//! Confluence: raw API shapes, canonical entities and the pure transforms between them
//!
//! - [`types`]: what the REST API returns
//! - [`model`]: what callers get back
//! - [`transform`]: normalization from the former to the latter
//! - [`payload`]: request bodies, paths and query parameters
//! - [`error`]: the failure taxonomy and its classification

pub mod error;
pub mod model;
pub mod payload;
pub mod transform;
pub mod types;

pub use error::{classify_failure, ConfluenceError};
pub use model::{
    Attachment, Comment, CreatePage, EditorMode, Identity, Label, Page, PageLinks, SearchResult,
    Space, SpaceStatus, SpaceType, UpdatePage,
};
pub use transform::{
    normalize_attachment, normalize_attachments, normalize_comment, normalize_comments,
    normalize_page, normalize_pages, normalize_space, normalize_spaces, parse_content,
    transform_search_results, Batch, NormalizeError, SkippedItem,
};
pub use types::{ContentListResponse, ContentResponse, SpaceResponse};
