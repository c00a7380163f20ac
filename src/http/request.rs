//! Request context: the framework's view of one incoming request.
//!
//! # Responsibilities
//! - Normalize the URL path (percent-decoding, trailing-slash policy)
//! - Expose routing-relevant information (method, path, host, scheme)
//! - Detect client address behind forwarding proxies
//! - Probe the runtime environment (loopback clients mean development)
//!
//! # Design Decisions
//! - Built once per request from the transport layer; immutable afterwards
//! - The path is split on `/` and each segment percent-decoded before
//!   reassembly; malformed escapes pass through verbatim
//! - Forwarded-for headers are scanned in a fixed order and private or
//!   loopback candidates are skipped

use std::net::IpAddr;

use axum::http::{HeaderMap, Method};

/// Runtime environment, derived from the client address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// Headers consulted to find the real client address, most specific first.
const FORWARD_HEADERS: [&str; 5] = [
    "x-client-ip",
    "x-forwarded-for",
    "x-cluster-client-ip",
    "forwarded-for",
    "forwarded",
];

/// The framework request context.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    hostname: String,
    port: u16,
    secure: bool,
    headers: HeaderMap,
    remote_addr: IpAddr,
}

impl Request {
    /// Build a request from HTTP parts plus the peer address reported by
    /// the transport.
    pub fn from_http(parts: &axum::http::request::Parts, remote_addr: IpAddr) -> Self {
        let method = parts.method.clone();
        let path = normalize_path(parts.uri.path());
        let query = parts.uri.query().map(str::to_string);

        let host_header = parts
            .headers
            .get("host")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost");
        let (hostname, port_part) = match host_header.split_once(':') {
            Some((host, port)) => (host.to_string(), port.parse().ok()),
            None => (host_header.to_string(), None),
        };

        // TLS termination happens upstream of the framework; trust the
        // standard proxy header.
        let secure = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .map(|proto| proto.eq_ignore_ascii_case("https"))
            .unwrap_or(false);

        let port = port_part.unwrap_or(if secure { 443 } else { 80 });

        Self {
            method,
            path,
            query,
            hostname,
            port,
            secure,
            headers: parts.headers.clone(),
            remote_addr,
        }
    }

    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Decoded path with trailing slashes stripped (the root stays `/`).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn scheme(&self) -> &str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// A request header as text, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// A cookie value from the `Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.header("cookie")?.split(';').find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.header("user-agent")
    }

    /// True for requests marked by the common AJAX convention.
    pub fn is_xhr(&self) -> bool {
        self.header("x-requested-with")
            .map(|v| v.eq_ignore_ascii_case("xmlhttprequest"))
            .unwrap_or(false)
    }

    /// The client address: the first public address found in the known
    /// forwarding headers, else the transport peer address.
    pub fn client_ip(&self) -> IpAddr {
        for header in FORWARD_HEADERS {
            let Some(value) = self.header(header) else {
                continue;
            };
            for candidate in value.split(',') {
                if let Ok(ip) = candidate.trim().parse::<IpAddr>() {
                    if is_public(&ip) {
                        return ip;
                    }
                }
            }
        }
        self.remote_addr
    }

    /// Loopback clients are treated as development traffic; everything
    /// else is production.
    pub fn environment(&self) -> Environment {
        if self.remote_addr.is_loopback() {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment() == Environment::Development
    }

    pub fn is_production(&self) -> bool {
        self.environment() == Environment::Production
    }

    /// Absolute URL to the site root, omitting default ports.
    pub fn absolute_url(&self) -> String {
        let mut url = format!("{}://{}", self.scheme(), self.hostname);
        if self.port != 80 && self.port != 443 {
            url.push_str(&format!(":{}", self.port));
        }
        url
    }

    /// Absolute URL of the current page without the query string.
    pub fn canonical_url(&self) -> String {
        format!("{}{}", self.absolute_url(), self.path)
    }
}

/// Decode percent-escapes per segment and strip trailing slashes.
fn normalize_path(raw: &str) -> String {
    let decoded = raw
        .split('/')
        .map(decode_segment)
        .collect::<Vec<_>>()
        .join("/");

    if decoded.is_empty() || decoded == "/" {
        return "/".to_string();
    }
    let trimmed = decoded.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Percent-decode one path segment. Malformed escapes pass through
/// verbatim rather than failing the request.
fn decode_segment(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
            ) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn is_public(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => !v4.is_loopback() && !v4.is_private() && !v4.is_link_local() && !v4.is_unspecified(),
        IpAddr::V6(v6) => !v6.is_loopback() && !v6.is_unspecified(),
    }
}

/// Test-friendly constructor for the request context.
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    path: String,
    query: Option<String>,
    hostname: String,
    port: u16,
    secure: bool,
    headers: HeaderMap,
    remote_addr: IpAddr,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query: None,
            hostname: "localhost".to_string(),
            port: 80,
            secure: false,
            headers: HeaderMap::new(),
            remote_addr: IpAddr::from([127, 0, 0, 1]),
        }
    }
}

impl RequestBuilder {
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.path = normalize_path(path);
        self
    }

    pub fn query(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }

    pub fn hostname(mut self, hostname: &str) -> Self {
        self.hostname = hostname.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn remote_addr(mut self, addr: IpAddr) -> Self {
        self.remote_addr = addr;
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            path: self.path,
            query: self.query,
            hostname: self.hostname,
            port: self.port,
            secure: self.secure,
            headers: self.headers,
            remote_addr: self.remote_addr,
        }
    }
}
