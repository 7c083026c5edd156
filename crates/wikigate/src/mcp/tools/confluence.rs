//! Confluence tools.
//!
//! Classified operation failures are returned as tool results with `isError: true` so the
//! agent can read and react to them. Bad arguments and configuration problems are JSON-RPC
//! errors.

use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

use wikigate_core::atlassian::confluence::payload::DEFAULT_SEARCH_LIMIT;
use wikigate_core::atlassian::confluence::{ConfluenceError, CreatePage, EditorMode, UpdatePage};
use wikigate_core::markup::{truncate, ContentFormat, DEFAULT_MAX_LENGTH};

use super::{internal_error, invalid_arguments, CallToolResult, Content, JsonRpcError};
use crate::atlassian::confluence::http::HttpClient;
use crate::atlassian::confluence::ConfluenceClient;
use crate::atlassian::ConfluenceConfig;
use crate::prelude::eprintln;

const REMOTE_TOOLS: [&str; 9] = [
    "confluence_get_page",
    "confluence_search",
    "confluence_get_spaces",
    "confluence_create_page",
    "confluence_update_page",
    "confluence_get_comments",
    "confluence_add_comment",
    "confluence_get_attachments",
    "confluence_add_attachment",
];

pub fn is_remote_tool(name: &str) -> bool {
    REMOTE_TOOLS.contains(&name)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetPageArgs {
    page_id: String,
    format: Option<ContentFormat>,
    max_length: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchArgs {
    query: String,
    limit: Option<usize>,
    format: Option<ContentFormat>,
    max_length: Option<usize>,
}

#[derive(Deserialize)]
struct SpacesArgs {
    limit: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePageArgs {
    space_key: String,
    title: String,
    content: String,
    parent_id: Option<String>,
    editor_mode: Option<EditorMode>,
    max_length: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePageArgs {
    page_id: String,
    title: String,
    content: String,
    version: u32,
    max_length: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentsArgs {
    page_id: String,
    limit: Option<usize>,
    max_length: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddCommentArgs {
    page_id: String,
    content: String,
    parent_id: Option<String>,
    max_length: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentsArgs {
    page_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddAttachmentArgs {
    page_id: String,
    file_name: String,
    content: String,
    comment: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConvertArgs {
    markup: String,
    format: Option<ContentFormat>,
    max_length: Option<usize>,
}

fn parse_args<T: for<'de> Deserialize<'de>>(arguments: Option<Value>) -> Result<T, JsonRpcError> {
    serde_json::from_value(arguments.unwrap_or(Value::Null)).map_err(invalid_arguments)
}

fn text_result(value: &impl serde::Serialize) -> Result<CallToolResult, JsonRpcError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Serialization error: {e}"),
        data: None,
    })?;

    Ok(CallToolResult {
        content: vec![Content::Text { text }],
        is_error: None,
    })
}

/// Error body handed to the agent: `{kind, message, status?, resourceId?}`.
pub fn error_body(error: &ConfluenceError) -> Value {
    let mut body = serde_json::to_value(error).unwrap_or_else(|_| serde_json::json!({}));
    if let Value::Object(map) = &mut body {
        map.entry("kind")
            .or_insert_with(|| Value::String(error.kind().to_string()));
        map.entry("message")
            .or_insert_with(|| Value::String(error.to_string()));
    }
    body
}

fn error_result(error: &ConfluenceError) -> Result<CallToolResult, JsonRpcError> {
    let text = serde_json::to_string_pretty(&error_body(error)).map_err(internal_error)?;
    Ok(CallToolResult {
        content: vec![Content::Text { text }],
        is_error: Some(true),
    })
}

fn outcome<T: serde::Serialize>(
    result: Result<T, ConfluenceError>,
) -> Result<CallToolResult, JsonRpcError> {
    match result {
        Ok(value) => text_result(&value),
        Err(error) => error_result(&error),
    }
}

fn bound(max_length: Option<usize>) -> usize {
    max_length.unwrap_or(DEFAULT_MAX_LENGTH)
}

/// Load configuration, wait the configured delay, then run the tool against Confluence.
pub async fn handle_remote_tool(
    name: &str,
    arguments: Option<Value>,
    global: &crate::Global,
) -> Result<CallToolResult, JsonRpcError> {
    let config = ConfluenceConfig::from_env().map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Configuration error: {e}"),
        data: None,
    })?;

    if global.verbose {
        eprintln!("Calling {name}: arguments={arguments:?}");
    }

    if !config.request_delay.is_zero() {
        tokio::time::sleep(config.request_delay).await;
    }

    let client = ConfluenceClient::from_config(&config).map_err(internal_error)?;
    dispatch(&client, name, arguments).await
}

/// Run one Confluence tool against `client`.
pub async fn dispatch<C: HttpClient>(
    client: &ConfluenceClient<C>,
    name: &str,
    arguments: Option<Value>,
) -> Result<CallToolResult, JsonRpcError> {
    match name {
        "confluence_get_page" => {
            let args: GetPageArgs = parse_args(arguments)?;
            let result = client
                .get_page_as(&args.page_id, args.format.unwrap_or_default())
                .await
                .map(|mut page| {
                    page.content = truncate(&page.content, bound(args.max_length));
                    page
                });
            outcome(result)
        }
        "confluence_search" => {
            let args: SearchArgs = parse_args(arguments)?;
            let result = client
                .search_pages_as(
                    &args.query,
                    Some(args.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)),
                    args.format.unwrap_or_default(),
                )
                .await
                .map(|mut search| {
                    for page in &mut search.pages {
                        page.content = truncate(&page.content, bound(args.max_length));
                    }
                    search
                });
            outcome(result)
        }
        "confluence_get_spaces" => {
            let args: SpacesArgs = parse_args(arguments.or(Some(serde_json::json!({}))))?;
            outcome(client.get_spaces(args.limit).await)
        }
        "confluence_create_page" => {
            let args: CreatePageArgs = parse_args(arguments)?;
            let request = CreatePage {
                space_key: args.space_key,
                title: args.title,
                content: args.content,
                parent_id: args.parent_id,
                editor_mode: args.editor_mode,
            };
            let result = client.create_page(&request).await.map(|mut page| {
                page.content = truncate(&page.content, bound(args.max_length));
                page
            });
            outcome(result)
        }
        "confluence_update_page" => {
            let args: UpdatePageArgs = parse_args(arguments)?;
            let request = UpdatePage {
                page_id: args.page_id,
                title: args.title,
                content: args.content,
                version: args.version,
            };
            let result = client.update_page(&request).await.map(|mut page| {
                page.content = truncate(&page.content, bound(args.max_length));
                page
            });
            outcome(result)
        }
        "confluence_get_comments" => {
            let args: CommentsArgs = parse_args(arguments)?;
            let result = client
                .get_comments(&args.page_id, args.limit)
                .await
                .map(|mut comments| {
                    for comment in &mut comments {
                        comment.content = truncate(&comment.content, bound(args.max_length));
                    }
                    comments
                });
            outcome(result)
        }
        "confluence_add_comment" => {
            let args: AddCommentArgs = parse_args(arguments)?;
            let result = client
                .add_comment(&args.page_id, &args.content, args.parent_id.as_deref())
                .await
                .map(|mut comment| {
                    comment.content = truncate(&comment.content, bound(args.max_length));
                    comment
                });
            outcome(result)
        }
        "confluence_get_attachments" => {
            let args: AttachmentsArgs = parse_args(arguments)?;
            outcome(client.get_attachments(&args.page_id).await)
        }
        "confluence_add_attachment" => {
            let args: AddAttachmentArgs = parse_args(arguments)?;
            let content = base64::engine::general_purpose::STANDARD
                .decode(args.content.trim())
                .map_err(|e| invalid_arguments(format!("content is not valid base64: {e}")))?;
            outcome(
                client
                    .add_attachment(
                        &args.page_id,
                        content,
                        &args.file_name,
                        args.comment.as_deref(),
                    )
                    .await,
            )
        }
        _ => Err(JsonRpcError {
            code: -32602,
            message: format!("Unknown tool: {name}"),
            data: None,
        }),
    }
}

/// Convert markup locally; no configuration or network access involved.
pub fn handle_convert_markup(
    arguments: Option<Value>,
    global: &crate::Global,
) -> Result<CallToolResult, JsonRpcError> {
    let args: ConvertArgs = parse_args(arguments)?;

    if global.verbose {
        eprintln!(
            "Calling confluence_convert_markup: {} chars, format={:?}",
            args.markup.chars().count(),
            args.format
        );
    }

    let rendered = crate::atlassian::confluence::convert::convert(
        &args.markup,
        args.format.unwrap_or(ContentFormat::Markdown),
        args.max_length,
    );

    Ok(CallToolResult {
        content: vec![Content::Text { text: rendered }],
        is_error: None,
    })
}
