//! Pure transformation functions for Confluence storage-format markup
//!
//! Storage format is XHTML with Confluence-specific `ac:`/`ri:` elements. The functions in
//! this module produce a best-effort plain-text or Markdown view of it. They are not a DOM
//! parser: markup is split into a flat stream of tag and text events which is then folded
//! by a small state machine holding the stack of open elements.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default bound applied by [`truncate`] callers.
pub const DEFAULT_MAX_LENGTH: usize = 8000;

/// Marker appended when [`truncate`] cuts on a word boundary.
pub const ELLIPSIS: &str = "...";

static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=/>]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("attribute regex is valid")
});

static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank line regex is valid"));

/// Target representation for rendered content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    #[default]
    Text,
    Markdown,
}

impl ContentFormat {
    /// Render storage markup into this format.
    pub fn render(self, markup: Option<&str>) -> String {
        match self {
            ContentFormat::Text => extract_plain_text(markup),
            ContentFormat::Markdown => to_markdown(markup),
        }
    }
}

impl std::str::FromStr for ContentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(ContentFormat::Text),
            "markdown" | "md" => Ok(ContentFormat::Markdown),
            other => Err(format!("Unknown content format: {other}")),
        }
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Start {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    End {
        name: String,
    },
    Text(&'a str),
    CData(&'a str),
}

impl Token<'_> {
    fn attr(attrs: &[(String, String)], key: &str) -> Option<String> {
        attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

/// Split markup into a flat stream of tag and text events.
///
/// Comments, doctype and processing instructions are dropped. A `<` that does not open a
/// recognizable tag is kept as text.
fn tokenize(markup: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < markup.len() {
        let rest = &markup[pos..];

        let Some(lt) = rest.find('<') else {
            tokens.push(Token::Text(rest));
            break;
        };

        if lt > 0 {
            tokens.push(Token::Text(&rest[..lt]));
            pos += lt;
            continue;
        }

        if let Some(body) = rest.strip_prefix("<![CDATA[") {
            let end = body.find("]]>").unwrap_or(body.len());
            tokens.push(Token::CData(&body[..end]));
            pos += "<![CDATA[".len() + (end + 3).min(body.len());
            continue;
        }

        if let Some(body) = rest.strip_prefix("<!--") {
            let end = body.find("-->").map(|i| i + 3).unwrap_or(body.len());
            pos += 4 + end;
            continue;
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            pos += rest.find('>').map(|i| i + 1).unwrap_or(rest.len());
            continue;
        }

        match parse_tag(rest) {
            Some((token, consumed)) => {
                tokens.push(token);
                pos += consumed;
            }
            None => {
                tokens.push(Token::Text(&rest[..1]));
                pos += 1;
            }
        }
    }

    tokens
}

/// Parse a start or end tag at the beginning of `input`, returning the token and the number
/// of bytes consumed.
fn parse_tag(input: &str) -> Option<(Token<'static>, usize)> {
    let closing = input.starts_with("</");
    let name_start = if closing { 2 } else { 1 };

    let first = input[name_start..].chars().next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }

    let end = find_tag_end(input)?;
    let inner = &input[name_start..end];

    let name_len = inner
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(inner.len());
    let name = inner[..name_len].to_ascii_lowercase();

    if closing {
        return Some((Token::End { name }, end + 1));
    }

    let raw_attrs = inner[name_len..].trim();
    let self_closing = raw_attrs.ends_with('/');
    let raw_attrs = raw_attrs.trim_end_matches('/');

    let attrs = ATTRIBUTE_RE
        .captures_iter(raw_attrs)
        .map(|caps| {
            let key = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| html_escape::decode_html_entities(m.as_str()).into_owned())
                .unwrap_or_default();
            (key, value)
        })
        .collect();

    Some((
        Token::Start {
            name,
            attrs,
            self_closing,
        },
        end + 1,
    ))
}

/// Index of the `>` closing the tag that starts `input`, skipping quoted attribute values.
fn find_tag_end(input: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in input.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => return Some(i),
            (None, '<') => return None,
            _ => {}
        }
    }
    None
}

fn is_void(name: &str) -> bool {
    matches!(
        name,
        "br" | "hr" | "img" | "input" | "meta" | "link" | "col" | "area" | "wbr"
    )
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "div"
            | "section"
            | "article"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "ul"
            | "ol"
            | "li"
            | "table"
            | "thead"
            | "tbody"
            | "tr"
            | "td"
            | "th"
            | "blockquote"
            | "pre"
            | "br"
            | "hr"
            | "ac:structured-macro"
            | "ac:rich-text-body"
            | "ac:plain-text-body"
            | "ac:layout"
            | "ac:layout-section"
            | "ac:layout-cell"
            | "ac:task"
    )
}

/// Macro parameters carry configuration, not content.
fn is_suppressed(name: &str) -> bool {
    matches!(name, "ac:parameter" | "script" | "style")
}

// ============================================================================
// Plain text
// ============================================================================

/// Convert storage markup to plain text.
///
/// Tags are stripped (block-level tags separate words), entities are decoded, whitespace
/// runs collapse to a single space and the result is trimmed. Absent input yields `""`.
pub fn extract_plain_text(markup: Option<&str>) -> String {
    markup.map(extract_plain_text_str).unwrap_or_default()
}

/// [`extract_plain_text`] for a present string.
pub fn extract_plain_text_str(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut suppressed = 0usize;

    for token in tokenize(markup) {
        match token {
            Token::Start {
                name, self_closing, ..
            } => {
                if is_suppressed(&name) {
                    if !self_closing {
                        suppressed += 1;
                    }
                } else if is_block(&name) {
                    text.push(' ');
                }
            }
            Token::End { name } => {
                if is_suppressed(&name) {
                    suppressed = suppressed.saturating_sub(1);
                } else if is_block(&name) {
                    text.push(' ');
                }
            }
            Token::Text(raw) if suppressed == 0 => {
                text.push_str(&html_escape::decode_html_entities(raw));
            }
            Token::CData(raw) if suppressed == 0 => {
                text.push(' ');
                text.push_str(raw);
                text.push(' ');
            }
            _ => {}
        }
    }

    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Truncation
// ============================================================================

/// Bound `text` to at most `max_length` characters.
///
/// Text that already fits is returned unchanged. Otherwise the text is cut at the last
/// whitespace boundary that leaves room for [`ELLIPSIS`], and the marker is appended. A
/// boundary that only fits without the marker is cut there with no marker. When no boundary
/// exists at all the text is hard-cut at `max_length`. The result never exceeds
/// `max_length`, so truncating twice is the same as truncating once.
pub fn truncate(text: &str, max_length: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_length {
        return text.to_string();
    }

    let head = |end: usize| -> String {
        chars[..end]
            .iter()
            .collect::<String>()
            .trim_end()
            .to_string()
    };

    // Whitespace at character index `i` means the first `i` characters end on a word.
    let boundaries = chars
        .iter()
        .enumerate()
        .take(max_length + 1)
        .filter(|(i, c)| *i > 0 && c.is_whitespace())
        .map(|(i, _)| i)
        .filter(|&i| !head(i).is_empty())
        .collect::<Vec<_>>();

    let budget = max_length.saturating_sub(ELLIPSIS.chars().count());

    if let Some(&cut) = boundaries.iter().rev().find(|&&i| i <= budget) {
        return format!("{}{ELLIPSIS}", head(cut));
    }

    match boundaries.last() {
        Some(&cut) => head(cut),
        None => chars[..max_length].iter().collect(),
    }
}

// ============================================================================
// Markdown
// ============================================================================

#[derive(Debug)]
enum Frame {
    Heading,
    Paragraph,
    /// `start` is the byte offset of the opening marker in the current buffer.
    Strong { start: usize },
    Emphasis { start: usize },
    Code,
    Pre,
    List,
    ListItem,
    Link { href: Option<String> },
    PageLink { title: Option<String>, href: Option<String> },
    CodeMacro { language: Option<String>, code: String },
    MacroParameter { name: Option<String> },
    Suppressed,
    Block,
    Inline,
}

impl Frame {
    /// Frames that render their children into a private buffer.
    fn captures(&self) -> bool {
        matches!(
            self,
            Frame::Link { .. } | Frame::PageLink { .. } | Frame::Pre | Frame::MacroParameter { .. }
        )
    }
}

#[derive(Debug)]
struct Open {
    name: String,
    frame: Frame,
}

struct MarkdownRenderer {
    buffers: Vec<String>,
    stack: Vec<Open>,
}

impl MarkdownRenderer {
    fn new() -> Self {
        Self {
            buffers: vec![String::new()],
            stack: Vec::new(),
        }
    }

    fn out(&mut self) -> &mut String {
        // The document buffer is never popped.
        let last = self.buffers.len() - 1;
        &mut self.buffers[last]
    }

    fn ensure_line_start(&mut self) {
        let out = self.out();
        let trimmed_len = out.trim_end_matches(' ').len();
        out.truncate(trimmed_len);
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
    }

    fn ensure_blank_line(&mut self) {
        self.ensure_line_start();
        let out = self.out();
        if !out.is_empty() && !out.ends_with("\n\n") {
            out.push('\n');
        }
    }

    fn in_pre(&self) -> bool {
        self.stack
            .iter()
            .any(|o| matches!(o.frame, Frame::Pre | Frame::CodeMacro { .. }))
    }

    fn in_code_macro(&self) -> bool {
        self.stack
            .iter()
            .any(|o| matches!(o.frame, Frame::CodeMacro { .. }))
    }

    fn in_list_item(&self) -> bool {
        self.stack
            .iter()
            .any(|o| matches!(o.frame, Frame::ListItem))
    }

    fn suppressed(&self) -> bool {
        self.stack
            .iter()
            .any(|o| matches!(o.frame, Frame::Suppressed))
    }

    fn list_depth(&self) -> usize {
        self.stack
            .iter()
            .filter(|o| matches!(o.frame, Frame::List))
            .count()
    }

    fn text(&mut self, raw: &str) {
        if self.suppressed() {
            return;
        }

        let decoded = html_escape::decode_html_entities(raw);

        if self.in_code_macro() {
            // Only the body and parameters carry text; whitespace between children is noise.
            let innermost = self.stack.last();
            let in_body = innermost.is_some_and(|o| o.name == "ac:plain-text-body");
            let in_parameter =
                innermost.is_some_and(|o| matches!(o.frame, Frame::MacroParameter { .. }));
            if in_body {
                self.cdata(&decoded);
            } else if in_parameter {
                self.out().push_str(&decoded);
            }
            return;
        }

        if self.in_pre() {
            self.out().push_str(&decoded);
            return;
        }

        let mut collapsed = String::with_capacity(decoded.len());
        let mut last_space = false;
        for c in decoded.chars() {
            if c.is_whitespace() {
                if !last_space {
                    collapsed.push(' ');
                }
                last_space = true;
            } else {
                collapsed.push(c);
                last_space = false;
            }
        }

        let out = self.out();
        let at_boundary = out.is_empty() || out.ends_with(' ') || out.ends_with('\n');
        let collapsed = if at_boundary {
            collapsed.trim_start()
        } else {
            collapsed.as_str()
        };
        out.push_str(collapsed);
    }

    fn cdata(&mut self, raw: &str) {
        if self.suppressed() {
            return;
        }
        if let Some(code) = self.stack.iter_mut().rev().find_map(|o| match &mut o.frame {
            Frame::CodeMacro { code, .. } => Some(code),
            _ => None,
        }) {
            code.push_str(raw);
            return;
        }
        self.out().push_str(raw);
    }

    fn start(&mut self, name: String, attrs: Vec<(String, String)>, self_closing: bool) {
        if self.suppressed() {
            if !self_closing && !is_void(&name) {
                self.stack.push(Open {
                    name,
                    frame: Frame::Inline,
                });
            }
            return;
        }

        // Resource identifiers only annotate the enclosing link.
        if name.starts_with("ri:") {
            self.resource_identifier(&name, &attrs);
            if !self_closing {
                self.stack.push(Open {
                    name,
                    frame: Frame::Inline,
                });
            }
            return;
        }

        match name.as_str() {
            "br" => {
                self.out().push('\n');
                return;
            }
            "hr" => {
                self.ensure_blank_line();
                self.out().push_str("---\n\n");
                return;
            }
            _ if is_void(&name) => return,
            _ => {}
        }

        let frame = match name.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name[1..].parse::<usize>().unwrap_or(1);
                self.ensure_line_start();
                self.out().push_str(&"#".repeat(level));
                self.out().push(' ');
                Frame::Heading
            }
            "p" => {
                if !(self.in_list_item() && self.out().ends_with("- ")) {
                    self.ensure_line_start();
                }
                Frame::Paragraph
            }
            "strong" | "b" => {
                let start = self.out().len();
                self.out().push_str("**");
                Frame::Strong { start }
            }
            "em" | "i" => {
                let start = self.out().len();
                self.out().push('*');
                Frame::Emphasis { start }
            }
            "code" if !self.in_pre() => {
                self.out().push('`');
                Frame::Code
            }
            "pre" => {
                self.ensure_blank_line();
                Frame::Pre
            }
            "ul" | "ol" => {
                self.ensure_line_start();
                Frame::List
            }
            "li" => {
                self.ensure_line_start();
                let indent = "  ".repeat(self.list_depth().saturating_sub(1));
                self.out().push_str(&indent);
                self.out().push_str("- ");
                Frame::ListItem
            }
            "a" => Frame::Link {
                href: Token::attr(&attrs, "href"),
            },
            "ac:link" => Frame::PageLink {
                title: None,
                href: None,
            },
            "ac:structured-macro"
                if Token::attr(&attrs, "ac:name").as_deref() == Some("code") =>
            {
                self.ensure_blank_line();
                Frame::CodeMacro {
                    language: None,
                    code: String::new(),
                }
            }
            "ac:parameter" => Frame::MacroParameter {
                name: Token::attr(&attrs, "ac:name"),
            },
            "script" | "style" => Frame::Suppressed,
            "td" | "th" => {
                self.out().push(' ');
                Frame::Inline
            }
            _ if is_block(&name) => {
                self.ensure_line_start();
                Frame::Block
            }
            _ => Frame::Inline,
        };

        if frame.captures() {
            self.buffers.push(String::new());
        }

        if self_closing {
            self.close(frame);
        } else {
            self.stack.push(Open { name, frame });
        }
    }

    fn resource_identifier(&mut self, name: &str, attrs: &[(String, String)]) {
        let label = match name {
            "ri:page" | "ri:blog-post" => Token::attr(attrs, "ri:content-title"),
            "ri:attachment" => Token::attr(attrs, "ri:filename"),
            "ri:user" => Token::attr(attrs, "ri:username").or(Token::attr(attrs, "ri:userkey")),
            "ri:space" => Token::attr(attrs, "ri:space-key"),
            _ => None,
        };
        let url = match name {
            "ri:url" => Token::attr(attrs, "ri:value"),
            _ => None,
        };

        if let Some(Open {
            frame: Frame::PageLink { title, href },
            ..
        }) = self
            .stack
            .iter_mut()
            .rev()
            .find(|o| matches!(o.frame, Frame::PageLink { .. }))
        {
            if title.is_none() {
                *title = label;
            }
            if href.is_none() {
                *href = url;
            }
        }
    }

    fn end(&mut self, name: &str) {
        let Some(index) = self.stack.iter().rposition(|o| o.name == name) else {
            // Stray end tag.
            return;
        };
        while self.stack.len() > index {
            if let Some(open) = self.stack.pop() {
                self.close(open.frame);
            }
        }
    }

    fn close(&mut self, frame: Frame) {
        let captured = if frame.captures() {
            self.buffers.pop().unwrap_or_default()
        } else {
            String::new()
        };

        match frame {
            Frame::Heading => {
                let out = self.out();
                let trimmed_len = out.trim_end().len();
                out.truncate(trimmed_len);
                out.push('\n');
            }
            Frame::Paragraph => {
                if self.in_list_item() {
                    self.ensure_line_start();
                } else {
                    self.ensure_line_start();
                    self.out().push('\n');
                }
            }
            Frame::Strong { start } => self.close_emphasis(start, "**"),
            Frame::Emphasis { start } => self.close_emphasis(start, "*"),
            Frame::Code => self.out().push('`'),
            Frame::Pre => {
                let code = captured.trim_matches('\n');
                self.ensure_blank_line();
                self.out().push_str(&format!("```\n{code}\n```\n\n"));
            }
            Frame::List => {
                self.ensure_line_start();
                if self.list_depth() == 0 {
                    self.out().push('\n');
                }
            }
            Frame::ListItem => self.ensure_line_start(),
            Frame::Link { href } => {
                let text = collapse_whitespace(&captured);
                let rendered = match href {
                    Some(href) if text.is_empty() => format!("[{href}]({href})"),
                    Some(href) => format!("[{text}]({href})"),
                    None => text,
                };
                self.out().push_str(&rendered);
            }
            Frame::PageLink { title, href } => {
                let body = collapse_whitespace(&captured);
                let text = if body.is_empty() {
                    title.clone().unwrap_or_default()
                } else {
                    body
                };
                let rendered = match href {
                    Some(href) => format!("[{text}]({href})"),
                    None => text,
                };
                self.out().push_str(&rendered);
            }
            Frame::CodeMacro { language, code } => {
                let language = language.unwrap_or_default();
                let code = code.trim_matches('\n');
                self.ensure_blank_line();
                self.out().push_str(&format!("```{language}\n{code}\n```\n\n"));
            }
            Frame::MacroParameter { name } => {
                if name.as_deref() == Some("language") {
                    let value = captured.trim().to_string();
                    if let Some(Open {
                        frame: Frame::CodeMacro { language, .. },
                        ..
                    }) = self
                        .stack
                        .iter_mut()
                        .rev()
                        .find(|o| matches!(o.frame, Frame::CodeMacro { .. }))
                    {
                        *language = Some(value);
                    }
                }
            }
            Frame::Block => self.ensure_line_start(),
            Frame::Suppressed | Frame::Inline => {}
        }
    }

    /// Wrap the text written since `start` in `marker`, keeping edge whitespace outside.
    fn close_emphasis(&mut self, start: usize, marker: &str) {
        let out = self.out();
        if out.get(start..start + marker.len()) != Some(marker) {
            out.push_str(marker);
            return;
        }
        let inner = out.split_off(start + marker.len());
        out.truncate(start);

        let body = inner.trim();
        let leading = inner.starts_with(char::is_whitespace);
        let trailing = inner.ends_with(char::is_whitespace);

        if leading && !(out.is_empty() || out.ends_with(' ') || out.ends_with('\n')) {
            out.push(' ');
        }
        if !body.is_empty() {
            out.push_str(marker);
            out.push_str(body);
            out.push_str(marker);
            if trailing {
                out.push(' ');
            }
        }
    }

    fn finish(mut self) -> String {
        while let Some(open) = self.stack.pop() {
            self.close(open.frame);
        }

        let document = self.buffers.swap_remove(0);
        let lines = document
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n");

        BLANK_LINES_RE
            .replace_all(&lines, "\n\n")
            .trim()
            .to_string()
    }
}

/// Convert storage markup to Markdown.
///
/// Headings, paragraphs, emphasis, links, lists, line breaks, inline code, preformatted
/// blocks and the `code` macro are translated. Every other tag is stripped and its text
/// kept. Consecutive blank lines collapse into one and the result is trimmed. Absent input
/// yields `""`.
pub fn to_markdown(markup: Option<&str>) -> String {
    let Some(markup) = markup else {
        return String::new();
    };

    let mut renderer = MarkdownRenderer::new();

    for token in tokenize(markup) {
        match token {
            Token::Start {
                name,
                attrs,
                self_closing,
            } => renderer.start(name, attrs, self_closing),
            Token::End { name } => renderer.end(&name),
            Token::Text(raw) => renderer.text(raw),
            Token::CData(raw) => renderer.cdata(raw),
        }
    }

    renderer.finish()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tokenize_tags_and_text() {
        let tokens = tokenize(r#"<p class="x">Hi<br/></p>"#);
        assert_eq!(
            tokens,
            vec![
                Token::Start {
                    name: "p".to_string(),
                    attrs: vec![("class".to_string(), "x".to_string())],
                    self_closing: false,
                },
                Token::Text("Hi"),
                Token::Start {
                    name: "br".to_string(),
                    attrs: vec![],
                    self_closing: true,
                },
                Token::End {
                    name: "p".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_tokenize_cdata_and_comments() {
        let tokens = tokenize("<!-- note --><![CDATA[a < b]]>tail");
        assert_eq!(tokens, vec![Token::CData("a < b"), Token::Text("tail")]);
    }

    #[test]
    fn test_tokenize_keeps_stray_angle_bracket() {
        let tokens = tokenize("1 < 2");
        assert_eq!(
            tokens,
            vec![Token::Text("1 "), Token::Text("<"), Token::Text(" 2")]
        );
    }

    #[test]
    fn test_tokenize_quoted_gt_in_attribute() {
        let tokens = tokenize(r#"<a href="x?a>b">link</a>"#);
        assert_eq!(
            tokens[0],
            Token::Start {
                name: "a".to_string(),
                attrs: vec![("href".to_string(), "x?a>b".to_string())],
                self_closing: false,
            }
        );
    }

    #[test]
    fn test_extract_plain_text_basic() {
        let text = extract_plain_text(Some("<p>Hello <strong>World</strong></p>"));
        assert_eq!(text, "Hello World");
    }

    #[test]
    fn test_extract_plain_text_absent_and_empty() {
        assert_eq!(extract_plain_text(None), "");
        assert_eq!(extract_plain_text(Some("")), "");
        assert_eq!(extract_plain_text(Some("   <p> </p> ")), "");
    }

    #[test]
    fn test_extract_plain_text_entities() {
        let text = extract_plain_text(Some("&lt;div&gt; &amp; &quot;quotes&quot;"));
        assert_eq!(text, "<div> & \"quotes\"");
    }

    #[test]
    fn test_extract_plain_text_collapses_whitespace() {
        let text = extract_plain_text(Some("<p>  Too   much \n\t space  </p>"));
        assert_eq!(text, "Too much space");
    }

    #[test]
    fn test_extract_plain_text_separates_blocks() {
        let text =
            extract_plain_text(Some("<h1>Title</h1><p>One</p><ul><li>a</li><li>b</li></ul>"));
        assert_eq!(text, "Title One a b");
    }

    #[test]
    fn test_extract_plain_text_drops_macro_parameters() {
        let markup = r#"<ac:structured-macro ac:name="code"><ac:parameter ac:name="language">rust</ac:parameter><ac:plain-text-body><![CDATA[fn main() {}]]></ac:plain-text-body></ac:structured-macro>"#;
        assert_eq!(extract_plain_text(Some(markup)), "fn main() {}");
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn test_truncate_cuts_on_word_boundary() {
        let result = truncate("The quick brown fox jumps", 16);
        assert_eq!(result, "The quick...");
        assert!(result.chars().count() <= 16);
    }

    #[test]
    fn test_truncate_hard_cut_without_whitespace() {
        assert_eq!(truncate("abcdefghijklmnop", 5), "abcde");
    }

    #[test]
    fn test_truncate_is_idempotent() {
        let inputs = [
            "The quick brown fox jumps over the lazy dog",
            "abcdefghijklmnopqrstuvwxyz",
            "a b",
            "word boundary exactly here",
            " leading whitespace only",
        ];
        for input in inputs {
            for max in 0..input.len() + 2 {
                let once = truncate(input, max);
                assert_eq!(truncate(&once, max), once, "input={input:?} max={max}");
                assert!(once.chars().count() <= max.max(input.chars().count().min(max)));
            }
        }
    }

    #[test]
    fn test_truncate_boundary_inside_marker_room() {
        // The only space fits the limit but leaves no room for the marker.
        assert_eq!(truncate("abcdefghij klm", 12), "abcdefghij");
        assert_eq!(truncate("abcdefghij klm", 10), "abcdefghij");
    }

    #[test]
    fn test_truncate_prefers_boundary_with_marker_room() {
        assert_eq!(truncate("ab cdefghij klm", 12), "ab...");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "ééééé ééééé";
        let result = truncate(text, 9);
        assert_eq!(result, "ééééé...");
    }

    #[test]
    fn test_to_markdown_absent_and_empty() {
        assert_eq!(to_markdown(None), "");
        assert_eq!(to_markdown(Some("")), "");
    }

    #[test]
    fn test_to_markdown_heading_and_paragraph() {
        let md = to_markdown(Some("<h1>Title</h1><p>Hello <strong>world</strong></p>"));
        assert_eq!(md, "# Title\nHello **world**");
    }

    #[test]
    fn test_to_markdown_heading_levels() {
        let md = to_markdown(Some("<h2>Two</h2><h6>Six</h6>"));
        assert_eq!(md, "## Two\n###### Six");
    }

    #[test]
    fn test_to_markdown_emphasis_spellings() {
        let md = to_markdown(Some("<p><b>bold</b> <i>it</i> <em>em</em></p>"));
        assert_eq!(md, "**bold** *it* *em*");
    }

    #[test]
    fn test_to_markdown_emphasis_edge_whitespace_outside_markers() {
        let md = to_markdown(Some("<p>a<strong> x </strong>b <em>y </em>c</p>"));
        assert_eq!(md, "a **x** b *y* c");
    }

    #[test]
    fn test_to_markdown_empty_emphasis_dropped() {
        let md = to_markdown(Some("<p>a <strong> </strong>b</p>"));
        assert_eq!(md, "a b");
    }

    #[test]
    fn test_to_markdown_link() {
        let md = to_markdown(Some(r#"<p>See <a href="https://example.com">the docs</a>.</p>"#));
        assert_eq!(md, "See [the docs](https://example.com).");
    }

    #[test]
    fn test_to_markdown_lists() {
        let md = to_markdown(Some("<ul><li>One</li><li>Two</li></ul><ol><li>Three</li></ol>"));
        assert_eq!(md, "- One\n- Two\n\n- Three");
    }

    #[test]
    fn test_to_markdown_paragraph_inside_list_item() {
        let md = to_markdown(Some("<ul><li><p>One</p></li><li><p>Two</p></li></ul>"));
        assert_eq!(md, "- One\n- Two");
    }

    #[test]
    fn test_to_markdown_nested_lists_indent() {
        let md = to_markdown(Some("<ul><li>A<ul><li>B</li></ul></li></ul>"));
        assert_eq!(md, "- A\n  - B");
    }

    #[test]
    fn test_to_markdown_strips_unknown_tags() {
        let md = to_markdown(Some(r#"<p><span style="color: red">red</span> text</p>"#));
        assert_eq!(md, "red text");
    }

    #[test]
    fn test_to_markdown_collapses_blank_lines() {
        let md = to_markdown(Some("<p>One</p><p></p><p></p><p>Two</p>"));
        assert_eq!(md, "One\n\nTwo");
    }

    #[test]
    fn test_to_markdown_code_macro() {
        let markup = r#"<p>Example:</p><ac:structured-macro ac:name="code"><ac:parameter ac:name="language">rust</ac:parameter><ac:plain-text-body><![CDATA[fn main() {
    println!("hi");
}]]></ac:plain-text-body></ac:structured-macro>"#;
        let md = to_markdown(Some(markup));
        assert_eq!(
            md,
            "Example:\n\n```rust\nfn main() {\n    println!(\"hi\");\n}\n```"
        );
    }

    #[test]
    fn test_to_markdown_code_macro_language_with_empty_body() {
        let markup = r#"<ac:structured-macro ac:name="code"><ac:parameter ac:name="language">rust</ac:parameter><ac:plain-text-body><![CDATA[]]></ac:plain-text-body></ac:structured-macro>"#;
        assert_eq!(to_markdown(Some(markup)), "```rust\n\n```");
    }

    #[test]
    fn test_to_markdown_code_macro_without_language() {
        let markup = r#"<ac:structured-macro ac:name="code"><ac:plain-text-body><![CDATA[ls -la]]></ac:plain-text-body></ac:structured-macro>"#;
        assert_eq!(to_markdown(Some(markup)), "```\nls -la\n```");
    }

    #[test]
    fn test_to_markdown_info_macro_keeps_body_drops_parameters() {
        let markup = r#"<ac:structured-macro ac:name="info"><ac:parameter ac:name="title">Heads up</ac:parameter><ac:rich-text-body><p>Body text</p></ac:rich-text-body></ac:structured-macro>"#;
        assert_eq!(to_markdown(Some(markup)), "Body text");
    }

    #[test]
    fn test_to_markdown_page_link() {
        let markup = r#"<p>Go to <ac:link><ri:page ri:content-title="Home" /></ac:link> now</p>"#;
        assert_eq!(to_markdown(Some(markup)), "Go to Home now");
    }

    #[test]
    fn test_to_markdown_inline_code_and_pre() {
        let md = to_markdown(Some("<p>Run <code>cargo</code></p><pre>a\n  b</pre>"));
        assert_eq!(md, "Run `cargo`\n\n```\na\n  b\n```");
    }

    #[test]
    fn test_to_markdown_line_breaks_and_entities() {
        let md = to_markdown(Some("<p>a&amp;b<br/>c&nbsp;d</p>"));
        assert_eq!(md, "a&b\nc d");
    }

    #[test]
    fn test_to_markdown_unclosed_tags_are_flushed() {
        let md = to_markdown(Some(r#"<p>Open <a href="/x">link"#));
        assert_eq!(md, "Open [link](/x)");
    }

    #[test]
    fn test_to_markdown_stray_end_tag_ignored() {
        let md = to_markdown(Some("<p>text</strong></p>"));
        assert_eq!(md, "text");
    }

    #[test]
    fn test_content_format_render() {
        let markup = Some("<h1>T</h1><p>x</p>");
        assert_eq!(ContentFormat::Text.render(markup), "T x");
        assert_eq!(ContentFormat::Markdown.render(markup), "# T\nx");
        assert_eq!("md".parse::<ContentFormat>(), Ok(ContentFormat::Markdown));
        assert!("html".parse::<ContentFormat>().is_err());
    }
}
