use std::io::Read;
use std::path::PathBuf;

use wikigate_core::markup::{truncate, ContentFormat};

use crate::prelude::{println, *};

/// Options for converting storage-format markup
#[derive(Debug, clap::Args, Clone)]
pub struct ConvertOptions {
    /// File holding the markup (reads stdin when omitted)
    pub file: Option<PathBuf>,

    /// Output format: text or markdown
    #[arg(long, default_value = "markdown")]
    pub format: ContentFormat,

    /// Bound the output to this many characters
    #[arg(long)]
    pub max_length: Option<usize>,
}

/// Render markup, optionally bounded in length.
pub fn convert(markup: &str, format: ContentFormat, max_length: Option<usize>) -> String {
    let rendered = format.render(Some(markup));
    match max_length {
        Some(max) => truncate(&rendered, max),
        None => rendered,
    }
}

/// Handle the convert command
pub fn handler(options: ConvertOptions) -> Result<()> {
    let markup = match &options.file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| eyre!("Failed to read {}: {}", path.display(), e))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| eyre!("Failed to read stdin: {}", e))?;
            buffer
        }
    };

    println!("{}", convert(&markup, options.format, options.max_length));

    Ok(())
}
