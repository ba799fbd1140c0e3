//! Read-only view of the request being served.

use std::collections::HashMap;

/// The parts of an incoming HTTP request the transformer can draw values
/// from. Built once by the serving layer and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    url: String,
    body: String,
    headers: HashMap<String, String>,
}

impl Request {
    /// Create a request view with the given method and URL.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            body: String::new(),
            headers: HashMap::new(),
        }
    }

    /// Attach a raw body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Attach a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request URL, query-free, starting with `/`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw request body as text. Empty when the request carried none.
    pub fn body_as_string(&self) -> &str {
        &self.body
    }

    /// Request headers. Not consulted by the directive evaluator, but part
    /// of the view the serving layer hands over.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = Request::new("POST", "/orders/123")
            .with_body(r#"{"id": "A1"}"#)
            .with_header("Content-Type", "application/json");

        assert_eq!(request.method(), "POST");
        assert_eq!(request.url(), "/orders/123");
        assert_eq!(request.body_as_string(), r#"{"id": "A1"}"#);
        assert_eq!(
            request.headers().get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_body_defaults_to_empty() {
        let request = Request::new("GET", "/health");
        assert_eq!(request.body_as_string(), "");
        assert!(request.headers().is_empty());
    }
}
