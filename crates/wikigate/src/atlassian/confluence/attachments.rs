use std::path::PathBuf;

use colored::Colorize;
use wikigate_core::atlassian::confluence::Attachment;

use super::client_from_env;
use crate::prelude::{println, *};

/// Options for listing the attachments of a page
#[derive(Debug, clap::Args, Clone)]
pub struct AttachmentsOptions {
    /// Page id
    pub page_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for uploading a file
#[derive(Debug, clap::Args, Clone)]
pub struct AttachOptions {
    /// Page id
    pub page_id: String,

    /// File to upload
    pub file: PathBuf,

    /// Attachment comment
    #[arg(long)]
    pub comment: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Human-readable file size.
fn size_human(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

fn display_attachments(attachments: &[Attachment]) {
    if attachments.is_empty() {
        println!("No attachments found.");
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "ID".bold().cyan(),
        "Filename".bold().cyan(),
        "Size".bold().cyan(),
        "Type".bold().cyan(),
        "Comment".bold().cyan()
    ]);
    for att in attachments {
        table.add_row(prettytable::row![
            att.id.green().to_string(),
            att.title.bright_white().to_string(),
            att.file_size.map(size_human).unwrap_or_default().bright_yellow().to_string(),
            att.media_type.as_deref().unwrap_or("").bright_blue().to_string(),
            att.comment.as_deref().unwrap_or("")
        ]);
    }
    table.printstd();
}

/// Handle the attachments command
pub async fn list_handler(options: AttachmentsOptions) -> Result<()> {
    let client = client_from_env()?;
    let attachments = client.get_attachments(&options.page_id).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&attachments)?);
    } else {
        display_attachments(&attachments);
    }

    Ok(())
}

/// Handle the attach command
pub async fn attach_handler(options: AttachOptions) -> Result<()> {
    let file_name = options
        .file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| eyre!("Not a file: {}", options.file.display()))?;

    let content = tokio::fs::read(&options.file)
        .await
        .map_err(|e| eyre!("Failed to read {}: {e}", options.file.display()))?;

    let client = client_from_env()?;
    let attachment = client
        .add_attachment(
            &options.page_id,
            content,
            &file_name,
            options.comment.as_deref(),
        )
        .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&attachment)?);
    } else {
        println!(
            "{} {} ({})",
            "Uploaded".green().bold(),
            attachment.title.bright_white(),
            attachment.id
        );
    }

    Ok(())
}
