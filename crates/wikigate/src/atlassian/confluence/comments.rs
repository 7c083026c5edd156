use colored::Colorize;
use serde::{Deserialize, Serialize};
use wikigate_core::atlassian::confluence::payload::DEFAULT_COMMENT_LIMIT;

use super::client_from_env;
use crate::prelude::{println, *};

/// Options for listing the comments of a page
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct CommentsOptions {
    /// Page id
    pub page_id: String,

    /// Maximum number of comments to return
    #[arg(short, long, default_value_t = DEFAULT_COMMENT_LIMIT)]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for adding a comment
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct CommentOptions {
    /// Page id
    pub page_id: String,

    /// Comment body in storage format
    #[arg(long)]
    pub content: String,

    /// Id of the comment this one replies to
    #[arg(long)]
    pub parent: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the comments command
pub async fn list_handler(options: CommentsOptions) -> Result<()> {
    let client = client_from_env()?;
    let comments = client
        .get_comments(&options.page_id, Some(options.limit))
        .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&comments)?);
    } else {
        super::display_comments(&comments);
    }

    Ok(())
}

/// Handle the comment command
pub async fn add_handler(options: CommentOptions) -> Result<()> {
    let client = client_from_env()?;
    let comment = client
        .add_comment(&options.page_id, &options.content, options.parent.as_deref())
        .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&comment)?);
    } else {
        println!(
            "{} {} on page {}",
            "Added comment".green().bold(),
            comment.id.bright_white(),
            comment.page_id
        );
    }

    Ok(())
}
