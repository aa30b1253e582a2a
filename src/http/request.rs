/// HTTP request methods accepted by the server.
///
/// Only retrieval is supported; anything else is rejected while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the method (case-sensitive)
    ///
    /// # Returns
    ///
    /// `Some(Method)` if the string is exactly `GET` or `HEAD`, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use harbor::http::request::Method;
    /// assert_eq!(Method::from_str("HEAD"), Some(Method::HEAD));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "HEAD" => Some(Method::HEAD),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
        }
    }
}

/// A request decoded from the raw bytes of a connection.
///
/// The path has already been percent-decoded and had any query string
/// removed. Headers are read off the wire but never interpreted, so they are
/// not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    method: Method,
    path: String,
}

impl ParsedRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}
