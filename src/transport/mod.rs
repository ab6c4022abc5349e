// SPDX-License-Identifier: MPL-2.0
//! Request/response plumbing between the dossier client and the file service.
//!
//! A [`Transport`] never fails: every network or parse failure is folded into
//! the returned [`Response`] so callers can treat all outcomes uniformly as
//! `{ value, error, url, content_type }`.

pub mod http;

pub use http::HttpTransport;

use crate::error::Error;
use futures_util::future::BoxFuture;

/// Default `accept` header sent with every request unless overridden.
pub const DEFAULT_ACCEPT: &str = "application/json";

/// Content types whose bodies are decoded as text.
const TEXT_TYPES: [&str; 3] = ["text/plain", "application/xml", "text/xml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

/// One uploaded file inside a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    /// Form field name (`file_0`, `file_1`, ...).
    pub field: String,
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// A JSON document, already serialized.
    Json(String),
    Multipart(Vec<FilePart>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    /// Extra headers; these replace defaults with the same name.
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn put(url: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: Method::Put,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Text(String),
    Bytes(Vec<u8>),
}

impl Body {
    /// Returns the raw bytes of the body regardless of how it was decoded.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Body::Json(value) => value.to_string().into_bytes(),
            Body::Text(text) => text.into_bytes(),
            Body::Bytes(bytes) => bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Body::Json(value) => value.is_null(),
            Body::Text(text) => text.is_empty(),
            Body::Bytes(bytes) => bytes.is_empty(),
        }
    }
}

/// Outcome of a single request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub value: Option<Body>,
    pub error: Option<Error>,
    /// Final URL after redirects.
    pub url: Option<String>,
    pub content_type: Option<String>,
}

impl Response {
    pub fn failed(error: Error) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn json(value: serde_json::Value) -> Self {
        Self {
            value: Some(Body::Json(value)),
            content_type: Some(DEFAULT_ACCEPT.to_string()),
            ..Self::default()
        }
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    /// Converts into a `Result`, treating a missing body as `Ok(None)`.
    pub fn into_result(self) -> crate::error::Result<Option<Body>> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.value),
        }
    }
}

/// The seam between the dossier client and the network.
pub trait Transport: Send + Sync {
    fn request(&self, request: Request) -> BoxFuture<'_, Response>;
}

/// Stands in when the HTTP client could not be built; every request fails
/// with the construction error.
#[derive(Debug, Clone)]
pub struct UnavailableTransport(pub Error);

impl Transport for UnavailableTransport {
    fn request(&self, request: Request) -> BoxFuture<'_, Response> {
        log::debug!("transport unavailable, failing {}", request.url);
        let error = self.0.clone();
        Box::pin(async move { Response::failed(error) })
    }
}

/// Extracts the bare media type from a `content-type` header.
///
/// Returns `None` for 204/304 responses, which never carry a parseable body.
pub fn content_type_of(status: u16, header: Option<&str>) -> Option<String> {
    if status == 204 || status == 304 {
        return None;
    }
    let media_type = header?.split(';').next()?.trim().to_ascii_lowercase();
    (!media_type.is_empty()).then_some(media_type)
}

/// Turns a raw status/body pair into a `(value, error)` tuple.
///
/// Error statuses (anything outside 200..400) become `HttpStatus` with the
/// server-provided text, falling back to the reason phrase.
pub fn parse_body(
    status: u16,
    content_type: Option<&str>,
    raw: Vec<u8>,
    reason: &str,
) -> (Option<Body>, Option<Error>) {
    if !(200..400).contains(&status) {
        let text = String::from_utf8_lossy(&raw).trim().to_string();
        let message = if text.is_empty() {
            reason.to_string()
        } else {
            text
        };
        return (None, Some(Error::http(status, message)));
    }

    let Some(content_type) = content_type else {
        return (None, None);
    };

    if content_type == "application/json" {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return (None, None);
        }
        return match serde_json::from_slice::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Null) => (None, None),
            Ok(value) => (Some(Body::Json(value)), None),
            Err(err) => (None, Some(Error::Parse(err.to_string()))),
        };
    }

    if TEXT_TYPES.contains(&content_type) {
        return match String::from_utf8(raw) {
            Ok(text) => (Some(Body::Text(text)), None),
            Err(err) => (None, Some(Error::Parse(err.to_string()))),
        };
    }

    (Some(Body::Bytes(raw)), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_strips_parameters() {
        assert_eq!(
            content_type_of(200, Some("application/json; charset=utf-8")).as_deref(),
            Some("application/json")
        );
        assert_eq!(
            content_type_of(200, Some("Image/PNG")).as_deref(),
            Some("image/png")
        );
    }

    #[test]
    fn content_type_is_absent_for_no_content_statuses() {
        assert_eq!(content_type_of(204, Some("application/json")), None);
        assert_eq!(content_type_of(304, Some("application/json")), None);
        assert_eq!(content_type_of(200, None), None);
    }

    #[test]
    fn error_status_carries_server_text() {
        let (value, error) = parse_body(
            422,
            Some("text/plain"),
            b"file too large".to_vec(),
            "Unprocessable Entity",
        );
        assert!(value.is_none());
        assert_eq!(error, Some(Error::http(422, "file too large")));
    }

    #[test]
    fn error_status_falls_back_to_reason() {
        let (_, error) = parse_body(503, None, Vec::new(), "Service Unavailable");
        assert_eq!(format!("{}", error.unwrap()), "503: Service Unavailable");
    }

    #[test]
    fn json_body_is_decoded() {
        let (value, error) = parse_body(
            200,
            Some("application/json"),
            br#"{"name":"d"}"#.to_vec(),
            "OK",
        );
        assert!(error.is_none());
        assert_eq!(value, Some(Body::Json(serde_json::json!({"name": "d"}))));
    }

    #[test]
    fn empty_json_body_is_no_value() {
        let (value, error) = parse_body(200, Some("application/json"), Vec::new(), "OK");
        assert!(value.is_none());
        assert!(error.is_none());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let (value, error) = parse_body(200, Some("application/json"), b"{oops".to_vec(), "OK");
        assert!(value.is_none());
        assert!(matches!(error, Some(Error::Parse(_))));
    }

    #[test]
    fn xml_is_text_and_images_are_bytes() {
        let (value, _) = parse_body(200, Some("text/xml"), b"<a/>".to_vec(), "OK");
        assert_eq!(value, Some(Body::Text("<a/>".into())));

        let (value, _) = parse_body(200, Some("image/png"), vec![1, 2, 3], "OK");
        assert_eq!(value, Some(Body::Bytes(vec![1, 2, 3])));
    }

    #[test]
    fn missing_content_type_yields_nothing() {
        let (value, error) = parse_body(204, None, Vec::new(), "No Content");
        assert!(value.is_none());
        assert!(error.is_none());
    }

    #[test]
    fn request_builder_collects_headers() {
        let request = Request::get("https://x/a").header("accept", "*/*");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.headers, vec![("accept".into(), "*/*".into())]);
    }

    #[tokio::test]
    async fn unavailable_transport_fails_every_request() {
        let transport = UnavailableTransport(Error::Transport("no TLS backend".into()));
        let response = transport.request(Request::get("https://svc/x")).await;
        assert_eq!(response.error, Some(Error::Transport("no TLS backend".into())));
        assert!(response.value.is_none());
    }
}
