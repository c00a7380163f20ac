//! Response context: what handlers write into.
//!
//! # Responsibilities
//! - Accumulate status, headers and body during dispatch
//! - Content-type shorthands for the common formats
//! - Redirects and the "send now" finish flag that cuts a hook chain
//! - Conversion into the transport response
//!
//! # Design Decisions
//! - Headers keep insertion order; setting an existing name replaces it
//! - A fresh response is 204 No Content; setting a non-empty body
//!   promotes it to 200 automatically
//! - `finish()` marks the response complete; the dispatcher checks the
//!   flag between queue entries

use axum::body::Body;
use axum::http::StatusCode;

/// Short names for common content types. Text formats are completed with
/// the charset.
const CONTENT_TYPES: [(&str, &str); 8] = [
    ("text", "text/plain; charset=utf-8"),
    ("csv", "text/csv; charset=utf-8"),
    ("html", "text/html; charset=utf-8"),
    ("xml", "text/xml; charset=utf-8"),
    ("json", "application/json; charset=utf-8"),
    ("gif", "image/gif"),
    ("jpg", "image/jpeg"),
    ("png", "image/png"),
];

/// The framework response context.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    finished: bool,
}

impl Response {
    /// An empty response: 204, no headers, no body.
    pub fn new() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            headers: Vec::new(),
            body: Vec::new(),
            finished: false,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    /// Set a header, replacing any previous value for the same name.
    /// Names are normalized to lowercase.
    pub fn set_header(&mut self, name: &str, value: &str) -> &mut Self {
        let name = name.to_ascii_lowercase();
        if let Some(existing) = self.headers.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value.to_string();
        } else {
            self.headers.push((name, value.to_string()));
        }
        self
    }

    /// Append a header without replacing earlier values (needed for
    /// `Set-Cookie`).
    pub fn add_header(&mut self, name: &str, value: &str) -> &mut Self {
        self.headers.push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set the content type from a shorthand (`html`, `json`, ...) or a
    /// full MIME string.
    pub fn set_type(&mut self, type_or_mime: &str) -> &mut Self {
        let value = CONTENT_TYPES
            .iter()
            .find(|(short, _)| *short == type_or_mime)
            .map(|(_, mime)| *mime)
            .unwrap_or(type_or_mime);
        self.set_header("content-type", value)
    }

    /// Set the body. A non-empty body on a 204 response promotes the
    /// status to 200.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) -> &mut Self {
        self.body = body.into();
        if !self.body.is_empty() && self.status == StatusCode::NO_CONTENT {
            self.status = StatusCode::OK;
        }
        self
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text, for assertions and error rendering.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Redirect and finish the response. Unknown status codes fall back
    /// to 302.
    pub fn redirect(&mut self, location: &str, status: u16) -> &mut Self {
        self.status = StatusCode::from_u16(status)
            .ok()
            .filter(StatusCode::is_redirection)
            .unwrap_or(StatusCode::FOUND);
        self.set_header("location", location);
        self.body.clear();
        self.finish()
    }

    /// Mark the response complete. Remaining entries in the dispatch
    /// queue are skipped once this is set.
    pub fn finish(&mut self) -> &mut Self {
        self.finished = true;
        self
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Iterate headers in insertion order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Convert into the transport response.
    pub fn into_axum(self) -> axum::response::Response {
        let mut builder = axum::http::Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder.body(Body::from(self.body)).unwrap_or_else(|error| {
            tracing::error!(%error, "response conversion failed");
            let mut fallback = axum::http::Response::new(Body::empty());
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
