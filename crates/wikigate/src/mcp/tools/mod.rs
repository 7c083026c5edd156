mod confluence;

use serde::{Deserialize, Serialize};

// Re-export types needed by tool handlers
pub use super::{JsonRpcError, Tool};

// MCP Protocol types for tools
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ToolsList {
    pub tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

pub(crate) fn internal_error(e: impl std::fmt::Display) -> JsonRpcError {
    JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    }
}

pub(crate) fn invalid_arguments(e: impl std::fmt::Display) -> JsonRpcError {
    JsonRpcError {
        code: -32602,
        message: format!("Invalid arguments: {e}"),
        data: None,
    }
}

pub fn handle_initialize() -> Result<serde_json::Value, JsonRpcError> {
    let result = InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {}),
        },
        server_info: ServerInfo {
            name: "wikigate".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    serde_json::to_value(result).map_err(internal_error)
}

const MAX_LENGTH_SCHEMA: &str = "Maximum characters of page or comment content to return (default: 8000). Longer content is cut on a word boundary and ends with '...'.";

const FORMAT_SCHEMA: &str = "Content format: 'text' (plain text, default) or 'markdown'";

pub fn tool_definitions() -> Vec<Tool> {
    vec![
        Tool {
            name: "confluence_get_page".to_string(),
            description: "Get a Confluence page by id. Returns title, space key, version, authors, links, parent and children ids, labels, and the page content as plain text or Markdown.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "pageId": { "type": "string", "description": "Page id" },
                    "format": { "type": "string", "enum": ["text", "markdown"], "description": FORMAT_SCHEMA },
                    "maxLength": { "type": "number", "description": MAX_LENGTH_SCHEMA }
                },
                "required": ["pageId"]
            }),
        },
        Tool {
            name: "confluence_search".to_string(),
            description: "Search Confluence pages using CQL (Confluence Query Language). Returns the matching pages, the total reported by Confluence, and how many results were returned or skipped as malformed.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "CQL query (e.g., 'space = SPACE AND text ~ \"keyword\"')"
                    },
                    "limit": { "type": "number", "description": "Maximum number of results to return (default: 50)" },
                    "format": { "type": "string", "enum": ["text", "markdown"], "description": FORMAT_SCHEMA },
                    "maxLength": { "type": "number", "description": MAX_LENGTH_SCHEMA }
                },
                "required": ["query"]
            }),
        },
        Tool {
            name: "confluence_get_spaces".to_string(),
            description: "List Confluence spaces with key, name, description, type (global, personal, team) and status (current, archived).".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "limit": { "type": "number", "description": "Maximum number of spaces to return (default: 100)" }
                },
                "required": []
            }),
        },
        Tool {
            name: "confluence_create_page".to_string(),
            description: "Create a Confluence page from a storage-format (XHTML) body and return the created page.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "spaceKey": { "type": "string", "description": "Key of the space to create the page in" },
                    "title": { "type": "string", "description": "Page title" },
                    "content": { "type": "string", "description": "Body in Confluence storage format (e.g., '<p>Hello</p>')" },
                    "parentId": { "type": "string", "description": "Id of the parent page (optional)" },
                    "editorMode": {
                        "type": "string",
                        "enum": ["v1", "v2", "auto"],
                        "description": "Editor the page opens in (default: v2). 'auto' lets Confluence decide."
                    },
                    "maxLength": { "type": "number", "description": MAX_LENGTH_SCHEMA }
                },
                "required": ["spaceKey", "title", "content"]
            }),
        },
        Tool {
            name: "confluence_update_page".to_string(),
            description: "Replace the title and body of a Confluence page. The current version is read first and the update is written as the next version.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "pageId": { "type": "string", "description": "Page id" },
                    "title": { "type": "string", "description": "New page title" },
                    "content": { "type": "string", "description": "New body in Confluence storage format" },
                    "version": { "type": "number", "description": "Version you last read. The update is always written as the current version plus one." },
                    "maxLength": { "type": "number", "description": MAX_LENGTH_SCHEMA }
                },
                "required": ["pageId", "title", "content", "version"]
            }),
        },
        Tool {
            name: "confluence_get_comments".to_string(),
            description: "List the comments of a Confluence page with author, creation time, reply parent and plain-text content.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "pageId": { "type": "string", "description": "Page id" },
                    "limit": { "type": "number", "description": "Maximum number of comments to return (default: 100)" },
                    "maxLength": { "type": "number", "description": MAX_LENGTH_SCHEMA }
                },
                "required": ["pageId"]
            }),
        },
        Tool {
            name: "confluence_add_comment".to_string(),
            description: "Add a comment to a Confluence page, optionally as a reply to another comment.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "pageId": { "type": "string", "description": "Page id" },
                    "content": { "type": "string", "description": "Comment body in Confluence storage format" },
                    "parentId": { "type": "string", "description": "Id of the comment to reply to (optional)" },
                    "maxLength": { "type": "number", "description": MAX_LENGTH_SCHEMA }
                },
                "required": ["pageId", "content"]
            }),
        },
        Tool {
            name: "confluence_get_attachments".to_string(),
            description: "List the attachments of a Confluence page with file name, media type, size and download link.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "pageId": { "type": "string", "description": "Page id" }
                },
                "required": ["pageId"]
            }),
        },
        Tool {
            name: "confluence_add_attachment".to_string(),
            description: "Upload a file to a Confluence page. The file content is passed base64-encoded.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "pageId": { "type": "string", "description": "Page id" },
                    "fileName": { "type": "string", "description": "File name, including extension (used to infer the media type)" },
                    "content": { "type": "string", "description": "File content, base64-encoded" },
                    "comment": { "type": "string", "description": "Attachment comment (optional)" }
                },
                "required": ["pageId", "fileName", "content"]
            }),
        },
        Tool {
            name: "confluence_convert_markup".to_string(),
            description: "Convert Confluence storage-format markup to plain text or Markdown without contacting Confluence.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "markup": { "type": "string", "description": "Storage-format markup" },
                    "format": {
                        "type": "string",
                        "enum": ["text", "markdown"],
                        "description": "Output format (default: markdown)"
                    },
                    "maxLength": { "type": "number", "description": "Maximum characters to return (optional)" }
                },
                "required": ["markup"]
            }),
        },
    ]
}

pub fn handle_tools_list() -> Result<serde_json::Value, JsonRpcError> {
    let result = ToolsList {
        tools: tool_definitions(),
    };

    serde_json::to_value(result).map_err(internal_error)
}

pub async fn handle_tools_call(
    params: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CallToolParams = serde_json::from_value(params.unwrap_or(serde_json::Value::Null))
        .map_err(|e| JsonRpcError {
            code: -32602,
            message: format!("Invalid params: {e}"),
            data: None,
        })?;

    let result = match params.name.as_str() {
        "confluence_convert_markup" => confluence::handle_convert_markup(params.arguments, global)?,
        name if confluence::is_remote_tool(name) => {
            confluence::handle_remote_tool(name, params.arguments, global).await?
        }
        _ => {
            return Err(JsonRpcError {
                code: -32602,
                message: format!("Unknown tool: {}", params.name),
                data: None,
            })
        }
    };

    serde_json::to_value(result).map_err(internal_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names() {
        let names: Vec<String> = tool_definitions().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "confluence_get_page",
                "confluence_search",
                "confluence_get_spaces",
                "confluence_create_page",
                "confluence_update_page",
                "confluence_get_comments",
                "confluence_add_comment",
                "confluence_get_attachments",
                "confluence_add_attachment",
                "confluence_convert_markup",
            ]
        );
    }

    #[test]
    fn test_every_remote_tool_is_dispatched() {
        for tool in tool_definitions() {
            if tool.name != "confluence_convert_markup" {
                assert!(confluence::is_remote_tool(&tool.name), "{}", tool.name);
            }
        }
    }

    #[test]
    fn test_initialize_names_server() {
        let value = handle_initialize().unwrap();
        assert_eq!(value["serverInfo"]["name"], "wikigate");
        assert_eq!(value["protocolVersion"], "2024-11-05");
    }
}
