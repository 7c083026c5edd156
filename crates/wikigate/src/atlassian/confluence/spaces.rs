use colored::Colorize;
use serde::{Deserialize, Serialize};
use wikigate_core::atlassian::confluence::payload::DEFAULT_SPACE_LIMIT;

use super::client_from_env;
use crate::prelude::{println, *};

/// Options for listing spaces
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct SpacesOptions {
    /// Maximum number of spaces to return
    #[arg(short, long, default_value_t = DEFAULT_SPACE_LIMIT)]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the spaces command
pub async fn handler(options: SpacesOptions) -> Result<()> {
    let client = client_from_env()?;
    let spaces = client.get_spaces(Some(options.limit)).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&spaces)?);
        return Ok(());
    }

    if spaces.is_empty() {
        println!("No spaces found.");
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Key".bold().cyan(),
        "Name".bold().cyan(),
        "Type".bold().cyan(),
        "Status".bold().cyan(),
        "Description".bold().cyan()
    ]);

    for space in &spaces {
        table.add_row(prettytable::row![
            space.key.green().to_string(),
            space.name.bright_white().to_string(),
            space.space_type.as_str(),
            space.status.as_str(),
            wikigate_core::markup::truncate(space.description.as_deref().unwrap_or(""), 60)
        ]);
    }

    table.printstd();

    Ok(())
}
