use colored::Colorize;
use serde::{Deserialize, Serialize};
use wikigate_core::atlassian::confluence::payload::DEFAULT_SEARCH_LIMIT;
use wikigate_core::markup::ContentFormat;

use super::client_from_env;
use crate::prelude::{println, *};

/// Options for searching Confluence pages
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct SearchOptions {
    /// CQL query (e.g., "space = SPACE AND text ~ 'keyword'")
    #[clap(env = "CONFLUENCE_QUERY")]
    pub query: String,

    /// Maximum number of results to return
    #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub limit: usize,

    /// Content format: text or markdown
    #[arg(long, default_value = "text")]
    pub format: ContentFormat,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the search command
pub async fn handler(options: SearchOptions) -> Result<()> {
    let client = client_from_env()?;
    let data = client
        .search_pages_as(&options.query, Some(options.limit), options.format)
        .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!(
        "Found {} page(s), showing {}:\n",
        data.total.to_string().bold(),
        data.returned
    );

    if data.skipped > 0 {
        println!(
            "{}\n",
            format!("{} malformed result(s) skipped", data.skipped).yellow()
        );
    }

    if data.pages.is_empty() {
        println!("No pages found.");
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "ID".bold().cyan(),
        "Title".bold().cyan(),
        "Space".bold().cyan(),
        "Version".bold().cyan(),
        "URL".bold().cyan()
    ]);

    for page in data.pages {
        table.add_row(prettytable::row![
            page.id.green().to_string(),
            page.title.bright_white().to_string(),
            page.space_key,
            page.version,
            page.links.webui.bright_black().to_string()
        ]);
    }

    table.printstd();

    Ok(())
}
