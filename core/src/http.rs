//! HTTP request/response values exchanged with a `Transport`.
//!
//! # Design
//! These types describe requests and responses as plain data. `RunesClient`
//! builds `HttpRequest` values without touching the network; a `Transport`
//! executes them and hands back a `TransportResponse`. The gateway only ever
//! sees these values, so normalization can be tested without sockets.
//!
//! Response bodies are tagged by the transport adapter: `Payload::Raw` for a
//! textual body that still has to be JSON-decoded, `Payload::Structured` for
//! a body the adapter already decoded.

use serde_json::Value;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Ordered query parameters. `Value::Null` marks a parameter the caller left
/// unset; it stays in the descriptor and the transport decides how to
/// serialize it.
pub type Query = Vec<(String, Value)>;

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute or origin-relative URL, without the query string.
    pub url: String,
    pub query: Query,
    /// Serialized JSON body.
    pub body: Option<String>,
    /// Whether cookies and auth are attached. The gateway always forces this on.
    pub with_credentials: bool,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: String) -> Self {
        Self {
            method,
            url,
            query: Vec::new(),
            body: None,
            with_credentials: true,
        }
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up a query parameter by name.
    pub fn query_value(&self, name: &str) -> Option<&Value> {
        self.query.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Render the query as `application/x-www-form-urlencoded`.
    ///
    /// Null entries are dropped; strings are written verbatim, other
    /// scalars through their JSON representation.
    pub fn query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.query {
            match value {
                Value::Null => {}
                Value::String(s) => {
                    serializer.append_pair(name, s);
                }
                other => {
                    serializer.append_pair(name, &other.to_string());
                }
            }
        }
        serializer.finish()
    }

    /// URL including the rendered query string, if any.
    pub fn full_url(&self) -> String {
        let qs = self.query_string();
        if qs.is_empty() {
            self.url.clone()
        } else {
            format!("{}?{qs}", self.url)
        }
    }
}

/// Response body as handed over by the transport adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Textual body; JSON-decoded by the gateway.
    Raw(String),
    /// Body the adapter already decoded.
    Structured(Value),
}

/// A response received by the transport.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Payload,
}

/// Case-insensitive lookup of the first header called `name`.
pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
