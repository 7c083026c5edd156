use serde::{Deserialize, Serialize};
use wikigate_core::markup::ContentFormat;

use super::client_from_env;
use crate::prelude::{println, *};

/// Options for getting a Confluence page
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct GetOptions {
    /// Page id
    #[clap(env = "CONFLUENCE_PAGE_ID")]
    pub page_id: String,

    /// Content format: text or markdown
    #[arg(long, default_value = "text")]
    pub format: ContentFormat,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the get command
pub async fn handler(options: GetOptions) -> Result<()> {
    let client = client_from_env()?;
    let page = client.get_page_as(&options.page_id, options.format).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        super::display_page(&page);
    }

    Ok(())
}
