//! Error taxonomy for Confluence operations
//!
//! Every failed operation is reported as one of five kinds. [`classify_failure`] maps a
//! non-success HTTP response onto them; transport failures become [`ConfluenceError::Network`]
//! in the shell.

use serde::Serialize;

/// Classified failure of a Confluence operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ConfluenceError {
    #[error("Resource not found: {resource_id}")]
    #[serde(rename_all = "camelCase")]
    NotFound { resource_id: String },

    #[error("Validation error [{status}]: {message}")]
    Validation { message: String, status: u16 },

    #[error("Server error [{status}]: {message}")]
    Server { message: String, status: u16 },

    #[error("Network error: {cause}")]
    Network { cause: String },

    #[error("Unknown error")]
    Unknown,
}

impl ConfluenceError {
    pub fn kind(&self) -> &'static str {
        match self {
            ConfluenceError::NotFound { .. } => "notFound",
            ConfluenceError::Validation { .. } => "validation",
            ConfluenceError::Server { .. } => "server",
            ConfluenceError::Network { .. } => "network",
            ConfluenceError::Unknown => "unknown",
        }
    }

    /// HTTP status code, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ConfluenceError::NotFound { .. } => Some(404),
            ConfluenceError::Validation { status, .. } | ConfluenceError::Server { status, .. } => {
                Some(*status)
            }
            ConfluenceError::Network { .. } | ConfluenceError::Unknown => None,
        }
    }
}

/// Classify a non-success response.
///
/// A 404 on a path that names a content resource becomes `NotFound` with the id taken from
/// the path. Otherwise the message is read from the JSON error body, falling back to the
/// status text, and the status code selects `Validation` (4xx) or `Server` (5xx). Any other
/// status is `Unknown`.
pub fn classify_failure(status: u16, status_text: &str, body: &str, path: &str) -> ConfluenceError {
    if status == 404 {
        if let Some(resource_id) = content_resource_id(path) {
            return ConfluenceError::NotFound { resource_id };
        }
    }

    let message = extract_error_message(body).unwrap_or_else(|| status_text.to_string());

    match status {
        400..=499 => ConfluenceError::Validation { message, status },
        500..=599 => ConfluenceError::Server { message, status },
        _ => ConfluenceError::Unknown,
    }
}

/// Id segment following `/content/` in a request path, if the path names a content
/// resource.
pub fn content_resource_id(path: &str) -> Option<String> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let mut segments = path.split('/').filter(|s| !s.is_empty());

    segments.find(|segment| *segment == "content")?;
    let id = segments.next()?;

    if id == "search" {
        return None;
    }

    Some(
        urlencoding::decode(id)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| id.to_string()),
    )
}

/// Read the human message out of a Confluence (or generic Atlassian) error body.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    if let Some(message) = value
        .get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.trim().is_empty())
    {
        return Some(message.to_string());
    }

    let messages: Vec<&str> = value
        .get("errorMessages")
        .and_then(|em| em.as_array())
        .map(|list| list.iter().filter_map(|m| m.as_str()).collect())
        .unwrap_or_default();

    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_not_found_on_content_path_carries_id() {
        let error = classify_failure(404, "Not Found", "", "/rest/api/content/abc-123");
        assert_eq!(
            error,
            ConfluenceError::NotFound {
                resource_id: "abc-123".to_string()
            }
        );
    }

    #[test]
    fn test_not_found_ignores_query_and_child_segments() {
        let error = classify_failure(
            404,
            "Not Found",
            r#"{"message":"No content found"}"#,
            "/rest/api/content/42/child/comment?expand=body.storage",
        );
        assert_eq!(
            error,
            ConfluenceError::NotFound {
                resource_id: "42".to_string()
            }
        );
    }

    #[test]
    fn test_not_found_outside_content_is_validation() {
        let error = classify_failure(
            404,
            "Not Found",
            r#"{"message":"No space with key"}"#,
            "/rest/api/space",
        );
        assert_eq!(
            error,
            ConfluenceError::Validation {
                message: "No space with key".to_string(),
                status: 404
            }
        );
    }

    #[test]
    fn test_search_path_is_not_a_resource() {
        assert_eq!(content_resource_id("/rest/api/content/search?cql=x"), None);
        assert_eq!(content_resource_id("/rest/api/content"), None);
        assert_eq!(
            content_resource_id("/wiki/rest/api/content/123%20x"),
            Some("123 x".to_string())
        );
    }

    #[test]
    fn test_validation_uses_body_message() {
        let error = classify_failure(
            400,
            "Bad Request",
            r#"{"statusCode":400,"message":"Space not found"}"#,
            "/rest/api/content",
        );
        assert_eq!(
            error,
            ConfluenceError::Validation {
                message: "Space not found".to_string(),
                status: 400
            }
        );
    }

    #[test]
    fn test_error_messages_array_is_joined() {
        let message = extract_error_message(r#"{"errorMessages":["first","second"]}"#);
        assert_eq!(message, Some("first; second".to_string()));
    }

    #[test]
    fn test_missing_body_falls_back_to_status_text() {
        let error = classify_failure(503, "Service Unavailable", "", "/rest/api/space");
        assert_eq!(
            error,
            ConfluenceError::Server {
                message: "Service Unavailable".to_string(),
                status: 503
            }
        );
    }

    #[test]
    fn test_unparseable_body_falls_back_to_status_text() {
        let error = classify_failure(409, "Conflict", "<html>oops</html>", "/rest/api/content/1");
        assert_eq!(
            error,
            ConfluenceError::Validation {
                message: "Conflict".to_string(),
                status: 409
            }
        );
    }

    #[test]
    fn test_other_statuses_are_unknown() {
        let error = classify_failure(302, "Found", "", "/rest/api/content/1");
        assert_eq!(error, ConfluenceError::Unknown);
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_serialized_shape() {
        let error = ConfluenceError::NotFound {
            resource_id: "7".to_string(),
        };
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "notFound", "resourceId": "7"}));

        let json = serde_json::to_value(ConfluenceError::Unknown).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "unknown"}));
    }
}
