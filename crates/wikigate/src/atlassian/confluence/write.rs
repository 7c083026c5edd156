//! Create and update Confluence pages

use std::path::PathBuf;

use clap::Args;
use wikigate_core::atlassian::confluence::{CreatePage, EditorMode, UpdatePage};

use super::{client_from_env, read_body};
use crate::prelude::{println, *};

/// Create a new Confluence page
#[derive(Args, Debug, Clone)]
pub struct CreateOptions {
    /// Space key the page is created in
    #[arg(long, env = "CONFLUENCE_SPACE")]
    pub space: String,

    /// Page title
    #[arg(long)]
    pub title: String,

    /// Body in storage format
    #[arg(long)]
    pub content: Option<String>,

    /// Read the storage-format body from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Parent page id
    #[arg(long)]
    pub parent: Option<String>,

    /// Editor the page opens in: v1, v2 or auto (defaults to v2)
    #[arg(long)]
    pub editor: Option<EditorMode>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Replace the title and body of a Confluence page
#[derive(Args, Debug, Clone)]
pub struct UpdateOptions {
    /// Page id
    pub page_id: String,

    /// New page title
    #[arg(long)]
    pub title: String,

    /// Body in storage format
    #[arg(long)]
    pub content: Option<String>,

    /// Read the storage-format body from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Version you last saw; the update always writes the current version plus one
    #[arg(long, default_value_t = 0)]
    pub version: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the create command
pub async fn create_handler(options: CreateOptions) -> Result<()> {
    let request = CreatePage {
        space_key: options.space,
        title: options.title,
        content: read_body(options.content, options.file)?,
        parent_id: options.parent,
        editor_mode: options.editor,
    };

    let client = client_from_env()?;
    let page = client.create_page(&request).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        super::display_page(&page);
    }

    Ok(())
}

/// Handle the update command
pub async fn update_handler(options: UpdateOptions) -> Result<()> {
    let request = UpdatePage {
        page_id: options.page_id,
        title: options.title,
        content: read_body(options.content, options.file)?,
        version: options.version,
    };

    let client = client_from_env()?;
    let page = client.update_page(&request).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        super::display_page(&page);
    }

    Ok(())
}
