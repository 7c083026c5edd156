//! Core library for wikigate
//!
//! This crate implements the **Functional Core** of wikigate, following the
//! Functional Core - Imperative Shell pattern:
//!
//! - **`wikigate_core`** (this crate): pure transformations with zero I/O
//! - **`wikigate`**: HTTP calls, CLI and MCP server (the Imperative Shell)
//!
//! Everything here takes data in and hands data back. Nothing reads the environment,
//! touches the network or keeps state between calls, so every function is tested with
//! plain fixture values.
//!
//! # Module Organization
//!
//! - [`markup`]: storage-format markup to plain text or Markdown, and length bounding
//! - [`atlassian`]: Confluence response normalization, request payloads and error
//!   classification
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use wikigate_core::atlassian::confluence::{normalize_page, parse_content};
//! use wikigate_core::markup::ContentFormat;
//!
//! let raw = parse_content(serde_json::json!({ /* GET /rest/api/content/{id} */ }))?;
//! let page = normalize_page(&raw, ContentFormat::Markdown)?;
//! println!("{} (v{}) in {}", page.title, page.version, page.space_key);
//! ```

pub mod atlassian;
pub mod markup;
