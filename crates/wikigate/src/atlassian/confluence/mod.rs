pub mod attachments;
pub mod client;
pub mod comments;
pub mod convert;
pub mod get;
pub mod http;
pub mod search;
pub mod spaces;
pub mod write;

use colored::Colorize;
use wikigate_core::atlassian::confluence::{Comment, Page};

use self::http::ReqwestTransport;
use crate::atlassian::ConfluenceConfig;
use crate::prelude::{eprintln, println, *};

pub use client::ConfluenceClient;

/// Confluence commands
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Get a page by id
    #[clap(name = "get")]
    Get(get::GetOptions),

    /// Search Confluence pages using CQL
    #[clap(name = "search")]
    Search(search::SearchOptions),

    /// List spaces
    #[clap(name = "spaces")]
    Spaces(spaces::SpacesOptions),

    /// Create a page
    #[clap(name = "create")]
    Create(write::CreateOptions),

    /// Replace the title and body of a page
    #[clap(name = "update")]
    Update(write::UpdateOptions),

    /// List the comments of a page
    #[clap(name = "comments")]
    Comments(comments::CommentsOptions),

    /// Add a comment to a page
    #[clap(name = "comment")]
    Comment(comments::CommentOptions),

    /// List the attachments of a page
    #[clap(name = "attachments")]
    Attachments(attachments::AttachmentsOptions),

    /// Upload a file to a page
    #[clap(name = "attach")]
    Attach(attachments::AttachOptions),

    /// Convert storage-format markup to plain text or Markdown (no network access)
    #[clap(name = "convert")]
    Convert(convert::ConvertOptions),
}

/// Build a client from the environment configuration.
pub fn client_from_env() -> Result<ConfluenceClient<ReqwestTransport>> {
    let config = ConfluenceConfig::from_env()?;
    ConfluenceClient::from_config(&config)
}

/// Read a storage-format body from an inline value or a file.
pub fn read_body(content: Option<String>, file: Option<std::path::PathBuf>) -> Result<String> {
    match (content, file) {
        (Some(content), None) => Ok(content),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .map_err(|e| eyre!("Failed to read {}: {}", path.display(), e)),
        (Some(_), Some(_)) => Err(eyre!("Use either --content or --file, not both")),
        (None, None) => Err(eyre!("A body is required: pass --content or --file")),
    }
}

/// Run Confluence commands
pub async fn run(cmd: Commands, global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Running Confluence command...");
    }

    match cmd {
        Commands::Get(options) => get::handler(options).await,
        Commands::Search(options) => search::handler(options).await,
        Commands::Spaces(options) => spaces::handler(options).await,
        Commands::Create(options) => write::create_handler(options).await,
        Commands::Update(options) => write::update_handler(options).await,
        Commands::Comments(options) => comments::list_handler(options).await,
        Commands::Comment(options) => comments::add_handler(options).await,
        Commands::Attachments(options) => attachments::list_handler(options).await,
        Commands::Attach(options) => attachments::attach_handler(options).await,
        Commands::Convert(options) => convert::handler(options),
    }
}

/// Display a page's details as a formatted CLI table.
///
/// Shared by the get, create and update handlers: header line, metadata table, then the
/// rendered content.
fn display_page(page: &Page) {
    println!("\n{} - {}\n", page.id.bold().cyan(), page.title.bright_white());

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Space".bold().cyan(),
        page.space_key.green().to_string()
    ]);
    table.add_row(prettytable::row![
        "Version".bold().cyan(),
        page.version.to_string().bright_yellow().to_string()
    ]);
    table.add_row(prettytable::row![
        "Created".bold().cyan(),
        format!("{} by {}", page.created, page.created_by.display_name)
    ]);
    table.add_row(prettytable::row![
        "Updated".bold().cyan(),
        format!("{} by {}", page.updated, page.updated_by.display_name)
    ]);
    if let Some(parent_id) = &page.parent_id {
        table.add_row(prettytable::row!["Parent".bold().cyan(), parent_id]);
    }
    if let Some(children) = page.children_ids.as_ref().filter(|c| !c.is_empty()) {
        table.add_row(prettytable::row!["Children".bold().cyan(), children.join(", ")]);
    }
    if let Some(labels) = page.labels.as_ref().filter(|l| !l.is_empty()) {
        let names = labels
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(prettytable::row!["Labels".bold().cyan(), names.bright_blue().to_string()]);
    }
    table.add_row(prettytable::row![
        "URL".bold().cyan(),
        page.links.webui.bright_black().to_string()
    ]);
    table.printstd();

    if !page.content.is_empty() {
        println!("\n{}\n", page.content);
    }
}

fn display_comments(comments: &[Comment]) {
    if comments.is_empty() {
        println!("No comments found.");
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "ID".bold().cyan(),
        "Author".bold().cyan(),
        "Created".bold().cyan(),
        "Reply to".bold().cyan(),
        "Content".bold().cyan()
    ]);
    for comment in comments {
        table.add_row(prettytable::row![
            comment.id.green().to_string(),
            comment.created_by.display_name.bright_white().to_string(),
            comment.created.bright_black().to_string(),
            comment.parent_id.as_deref().unwrap_or("-"),
            wikigate_core::markup::truncate(&comment.content, 80)
        ]);
    }
    table.printstd();
}
