#[derive(Debug, clap::Parser)]
#[command(name = "mcp")]
#[command(about = "Serve the Confluence tools over the Model Context Protocol")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Newline-delimited JSON-RPC on stdin/stdout
    #[clap(name = "stdio")]
    Stdio,

    /// HTTP server: SSE endpoint plus a message endpoint for JSON-RPC posts
    #[clap(name = "sse")]
    Sse(SseOptions),
}

#[derive(Debug, clap::Args)]
pub struct SseOptions {
    /// Port to listen on
    #[arg(short, long, env = "WIKIGATE_MCP_PORT", default_value = "3000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "WIKIGATE_MCP_HOST", default_value = "127.0.0.1")]
    pub host: String,
}
