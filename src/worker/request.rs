//! Request and response shapes exchanged with the page layer.
//!
//! The interceptor always resolves to a `Response`-shaped value; the caller
//! never sees an uncaught error.

use serde::Serialize;

#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// True when the request's Accept header indicates an HTML navigation.
    pub fn accepts_html(&self) -> bool {
        self.header("accept")
            .map(|a| a.contains("text/html"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, status_text: &str) -> Self {
        Self {
            status,
            status_text: status_text.to_string(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// 200 response carrying a JSON value, for tests and synthesized bodies.
    pub fn ok_json<T: Serialize>(value: &T) -> Self {
        Self::new(200, "OK")
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_vec(value).unwrap_or_default())
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = Request::get("https://a.example/").with_header("Accept", "text/html");
        assert_eq!(req.header("accept"), Some("text/html"));
        assert!(req.accepts_html());
    }

    #[test]
    fn test_accepts_html_false_without_accept_header() {
        let req = Request::get("https://a.example/");
        assert!(!req.accepts_html());
    }

    #[test]
    fn test_is_ok_bounds() {
        assert!(Response::new(200, "OK").is_ok());
        assert!(Response::new(299, "").is_ok());
        assert!(!Response::new(304, "Not Modified").is_ok());
        assert!(!Response::new(503, "Service Unavailable").is_ok());
    }
}
