//! Scripted in-memory [`HttpClient`] for operation tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use super::ConfluenceClient;
use crate::atlassian::confluence::http::{HttpClient, HttpRequest, HttpResponse, TransportError};

/// Replies with queued responses in order and records every request it receives.
#[derive(Debug, Default)]
pub struct FakeHttp {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: Value) -> Self {
        self.respond_raw(status, &body.to_string())
    }

    pub fn respond_raw(self, status: u16, body: &str) -> Self {
        let status_text = match status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            409 => "Conflict",
            500 => "Internal Server Error",
            _ => "",
        };
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        }));
        self
    }

    pub fn fail(self, cause: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError(cause.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn into_client(self) -> ConfluenceClient<Self> {
        ConfluenceClient::new(self)
    }
}

impl HttpClient for FakeHttp {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = request.path.clone();
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response left for {path}"))
    }
}

/// Raw page as returned by `GET /rest/api/content/{id}` with the page expansions.
pub fn page_json(id: &str, title: &str, version: u32) -> Value {
    serde_json::json!({
        "id": id,
        "type": "page",
        "status": "current",
        "title": title,
        "space": { "key": "OPS", "name": "Operations" },
        "history": {
            "createdDate": "2024-01-10T09:00:00.000Z",
            "createdBy": { "accountId": "acc-1", "displayName": "Ada Lovelace" }
        },
        "version": {
            "number": version,
            "when": "2024-02-01T12:30:00.000Z",
            "by": { "accountId": "acc-2", "displayName": "Grace Hopper" }
        },
        "ancestors": [],
        "body": { "storage": { "value": "<p>Body</p>", "representation": "storage" } },
        "_links": {
            "base": "https://acme.atlassian.net/wiki",
            "webui": format!("/spaces/OPS/pages/{id}")
        },
        "_expandable": { "space": "/rest/api/space/OPS" }
    })
}

/// Raw comment as returned by the comment endpoints.
pub fn comment_json(id: &str, ancestors: Value) -> Value {
    serde_json::json!({
        "id": id,
        "type": "comment",
        "history": {
            "createdDate": "2024-03-01T08:00:00.000Z",
            "createdBy": { "accountId": "acc-3", "displayName": "Linus" }
        },
        "version": { "number": 1 },
        "ancestors": ancestors,
        "body": { "storage": { "value": "<p>Looks good</p>", "representation": "storage" } }
    })
}
