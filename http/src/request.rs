//! Request boundary contract consumed from the HTTP layer.
//!
//! The binder never sees raw bytes: the HTTP layer hands over the method,
//! the decoded JSON body (when there was one), and the form-encoded fields
//! as a fallback. Payload resolution mirrors that precedence: a body that
//! decoded to a mapping wins, anything else falls back to the form fields.

use serde_json::{Map, Value};

/// Decoded request data for one incoming request.
///
/// # Examples
///
/// ```
/// use entity_bind_http::IncomingRequest;
/// use serde_json::json;
///
/// let request = IncomingRequest::new("POST").with_raw_body(r#"{"title": "x"}"#);
/// assert!(request.is_payload_method());
/// assert_eq!(request.payload().unwrap()["title"], json!("x"));
///
/// // Non-payload methods resolve no payload at all.
/// let get = IncomingRequest::new("GET").with_raw_body(r#"{"title": "x"}"#);
/// assert!(get.payload().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    method: String,
    body: Option<Value>,
    form: Map<String, Value>,
}

impl IncomingRequest {
    /// Creates a request with the given HTTP method and no data.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            body: None,
            form: Map::new(),
        }
    }

    /// Attaches an already-decoded JSON body.
    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Decodes and attaches a raw request body.
    ///
    /// Undecodable bodies are tolerated: the body stays empty and payload
    /// resolution falls through to the form fields.
    pub fn with_raw_body(mut self, raw: &str) -> Self {
        self.body = serde_json::from_str(raw).ok();
        self
    }

    /// Adds one form-encoded field.
    pub fn with_form_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.form.insert(key.into(), value);
        self
    }

    /// The request's HTTP method, as given.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Whether the method carries a payload (POST or PUT, any case).
    pub fn is_payload_method(&self) -> bool {
        self.method.eq_ignore_ascii_case("POST") || self.method.eq_ignore_ascii_case("PUT")
    }

    /// Resolves the payload to bind, if any.
    ///
    /// `None` for non-payload methods. For POST/PUT: the JSON body when it
    /// decoded to a mapping, else the form fields. The form fields may be
    /// empty, and an empty mapping still counts as a submitted payload.
    pub fn payload(&self) -> Option<&Map<String, Value>> {
        if !self.is_payload_method() {
            return None;
        }
        match self.body.as_ref().and_then(Value::as_object) {
            Some(body) => Some(body),
            None => Some(&self.form),
        }
    }
}
