//! HTTP review backend
//!
//! Talks to the redaction service's review API:
//! - `GET  /api/review/queue`
//! - `POST /api/review/chunks/{id}/approve` and `/reject`
//! - `POST /api/review/bulk/approve` and `/bulk/reject` with `{"chunk_ids": [...]}`
//!
//! Failed calls become a single message: the server's `detail` field when it
//! has one, otherwise the operation's fallback text.

use std::time::Duration;

use async_trait::async_trait;
use redline_core::{Result, ReviewError, ReviewQueueSnapshot};
use redline_workflow::{Ack, Operation, ReviewBackend};
use reqwest::Url;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Connection settings for [`HttpBackend`]
#[derive(Debug, Clone)]
pub struct HttpBackendOptions {
    pub base_url: String,
    pub timeout: Duration,
    /// Session cookie from an unlocked vault, sent on every request
    pub session_cookie: Option<String>,
}

impl Default for HttpBackendOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(30),
            session_cookie: None,
        }
    }
}

#[derive(Serialize)]
struct BulkRequest<'a> {
    chunk_ids: &'a [String],
}

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(options: HttpBackendOptions) -> Result<Self> {
        let base_url = Url::parse(&options.base_url).map_err(|e| {
            ReviewError::Transport(format!("Invalid API URL {}: {}", options.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ReviewError::Transport(format!(
                "Invalid API URL: {}",
                options.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        if let Some(cookie) = &options.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| ReviewError::Transport(format!("Invalid session cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("redline/", env!("CARGO_PKG_VERSION")))
            .timeout(options.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ReviewError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: Operation,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| ReviewError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ReviewError::Transport(format!("Failed to read response: {}", e)))?;

        debug!(
            operation = operation.name(),
            status = status.as_u16(),
            "Review API response"
        );

        if !status.is_success() {
            let message =
                detail_message(&body).unwrap_or_else(|| operation.fallback_message().to_string());
            return Err(ReviewError::backend(message));
        }

        let body = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str(body).map_err(|e| ReviewError::MalformedResponse(e.to_string()))
    }

    async fn post_single(&self, chunk_id: &str, action: &str, operation: Operation) -> Result<Ack> {
        let url = self.endpoint(&["api", "review", "chunks", chunk_id, action]);
        self.send(self.client.post(url), operation).await
    }

    async fn post_bulk(&self, chunk_ids: &[String], action: &str, operation: Operation) -> Result<Ack> {
        let url = self.endpoint(&["api", "review", "bulk", action]);
        let request = self.client.post(url).json(&BulkRequest { chunk_ids });
        self.send(request, operation).await
    }
}

#[async_trait]
impl ReviewBackend for HttpBackend {
    async fn fetch_queue(&self) -> Result<ReviewQueueSnapshot> {
        let url = self.endpoint(&["api", "review", "queue"]);
        self.send(self.client.get(url), Operation::FetchQueue).await
    }

    async fn approve_chunk(&self, chunk_id: &str) -> Result<Ack> {
        self.post_single(chunk_id, "approve", Operation::Approve).await
    }

    async fn reject_chunk(&self, chunk_id: &str) -> Result<Ack> {
        self.post_single(chunk_id, "reject", Operation::Reject).await
    }

    async fn bulk_approve(&self, chunk_ids: &[String]) -> Result<Ack> {
        self.post_bulk(chunk_ids, "approve", Operation::BulkApprove)
            .await
    }

    async fn bulk_reject(&self, chunk_ids: &[String]) -> Result<Ack> {
        self.post_bulk(chunk_ids, "reject", Operation::BulkReject)
            .await
    }
}

/// Extract a human-readable `detail` from an error body.
///
/// Accepts `{"detail": "..."}` and validation-style
/// `{"detail": [{"msg": "..."}, ...]}`.
pub fn detail_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = match value.get("detail")? {
        serde_json::Value::String(detail) => detail.trim().to_string(),
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
            .collect::<Vec<_>>()
            .join("; "),
        _ => return None,
    };

    (!message.is_empty()).then_some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response; resolves to the raw request text
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn backend(base_url: String) -> HttpBackend {
        HttpBackend::new(HttpBackendOptions {
            base_url,
            session_cookie: Some("session=abc".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_detail_message() {
        assert_eq!(
            detail_message(r#"{"detail": "Vault is locked"}"#).as_deref(),
            Some("Vault is locked")
        );
        assert_eq!(
            detail_message(r#"{"detail": [{"msg": "field required"}, {"msg": "bad id"}]}"#)
                .as_deref(),
            Some("field required; bad id")
        );
        assert_eq!(detail_message(r#"{"detail": ""}"#), None);
        assert_eq!(detail_message(r#"{"error": "nope"}"#), None);
        assert_eq!(detail_message("<html>502</html>"), None);
    }

    #[test]
    fn test_endpoint_encodes_chunk_id() {
        let backend = backend("http://localhost:8000/service/".to_string());
        let url = backend.endpoint(&["api", "review", "chunks", "doc 1/2", "approve"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/service/api/review/chunks/doc%201%2F2/approve"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpBackend::new(HttpBackendOptions {
            base_url: "not a url".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(ReviewError::Transport(_))));
    }

    #[tokio::test]
    async fn test_fetch_queue() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"chunks": [{"chunk_id": "doc-1", "document_id": "doc-1", "redacted_text": "Test content", "redactions": [], "status": "pending"}], "total_count": 1}"#,
        )
        .await;

        let snapshot = backend(base_url).fetch_queue().await.unwrap();
        assert_eq!(snapshot.total_count, 1);
        assert_eq!(snapshot.chunks[0].chunk_id, "doc-1");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/review/queue "));
        assert!(request.to_ascii_lowercase().contains("cookie: session=abc"));
    }

    #[tokio::test]
    async fn test_bulk_approve_body() {
        let (base_url, server) = serve_once("200 OK", r#"{"results": {"a": true}}"#).await;

        let ack = backend(base_url)
            .bulk_approve(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(ack["results"]["a"], true);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/review/bulk/approve "));
        assert!(request.ends_with(r#"{"chunk_ids":["a","b"]}"#));
    }

    #[tokio::test]
    async fn test_error_prefers_server_detail() {
        let (base_url, _server) =
            serve_once("404 Not Found", r#"{"detail": "Chunk doc-9 not found"}"#).await;

        let err = backend(base_url).approve_chunk("doc-9").await.unwrap_err();
        assert_eq!(err, ReviewError::backend("Chunk doc-9 not found"));
    }

    #[tokio::test]
    async fn test_error_falls_back_per_operation() {
        let (base_url, _server) = serve_once("500 Internal Server Error", "oops").await;

        let err = backend(base_url).reject_chunk("doc-1").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to reject chunk");
    }

    #[tokio::test]
    async fn test_malformed_queue() {
        let (base_url, _server) = serve_once("200 OK", r#"{"items": []}"#).await;

        let err = backend(base_url).fetch_queue().await.unwrap_err();
        assert!(matches!(err, ReviewError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_empty_ack_body() {
        let (base_url, _server) = serve_once("200 OK", "").await;

        let ack = backend(base_url).approve_chunk("doc-1").await.unwrap();
        assert!(ack.is_null());
    }
}
