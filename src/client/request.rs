//! Operation descriptor: one logical API call before it is sent

use reqwest::Method;
use serde::Serialize;

use crate::client::pagination::ListOptions;
use crate::client::validation::escape_id;
use crate::error::{Result, TfeError};

/// Path segment, either fixed by the resource module or supplied by a caller
#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Id { field: &'static str, value: String },
}

#[derive(Debug, Clone)]
enum Target {
    /// Relative to the API base URL
    Path(Vec<Segment>),
    /// Absolute URL (pre-signed links) or a server-relative `/api/v2/...` link
    Url(String),
}

/// Body of a request
#[derive(Debug)]
pub(crate) enum Payload {
    Empty,
    JsonApi(Vec<u8>),
    Raw {
        body: reqwest::Body,
        content_type: String,
    },
}

/// A single API operation: method, path, query, headers and payload
///
/// Builder methods never fail; problems are recorded and surfaced by the
/// pipeline before anything is sent.
#[derive(Debug)]
pub struct Request {
    method: Method,
    target: Target,
    query: Vec<(String, String)>,
    list_options: Option<ListOptions>,
    headers: Vec<(String, String)>,
    payload: Payload,
    retry_non_idempotent: bool,
    error: Option<TfeError>,
}

impl Request {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            target: Target::Path(Vec::new()),
            query: Vec::new(),
            list_options: None,
            headers: Vec::new(),
            payload: Payload::Empty,
            retry_non_idempotent: false,
            error: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Request to an absolute or server-relative URL taken from a `links` value
    pub fn to_url(method: Method, url: &str) -> Self {
        let mut request = Self::new(method);
        if url.is_empty() {
            request.fail(TfeError::invalid("url", "is required"));
        }
        request.target = Target::Url(url.to_string());
        request
    }

    /// Append a fixed path segment (may contain `/`)
    pub fn segment(mut self, segment: &str) -> Self {
        match self.target {
            Target::Path(ref mut segments) => {
                segments.push(Segment::Literal(segment.trim_matches('/').to_string()))
            }
            Target::Url(_) => self.fail(TfeError::invalid(
                "path",
                format!("cannot append '{}' to a link URL", segment),
            )),
        }
        self
    }

    /// Append a caller-supplied identifier segment, validated at execute time
    pub fn id(mut self, field: &'static str, value: &str) -> Self {
        match self.target {
            Target::Path(ref mut segments) => segments.push(Segment::Id {
                field,
                value: value.to_string(),
            }),
            Target::Url(_) => self.fail(TfeError::invalid(
                field,
                "cannot be appended to a link URL",
            )),
        }
        self
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Add a query parameter only when a value is present
    pub fn query_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Comma-joined list parameter; skipped when empty
    pub fn query_list<S: AsRef<str>>(self, key: &str, values: &[S]) -> Self {
        if values.is_empty() {
            return self;
        }
        let joined = values
            .iter()
            .map(|v| v.as_ref())
            .collect::<Vec<_>>()
            .join(",");
        self.query(key, joined)
    }

    /// Related resources to side-load into `included`
    pub fn include<S: AsRef<str>>(self, relations: &[S]) -> Self {
        self.query_list("include", relations)
    }

    pub fn list_options(mut self, options: ListOptions) -> Self {
        self.list_options = Some(options);
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Serialize a JSON:API document as the body
    pub fn json_api<T: Serialize>(mut self, document: &T) -> Self {
        if !self.allows_body() {
            let method = self.method.clone();
            self.fail(TfeError::invalid(
                "body",
                format!("{} requests cannot carry a payload", method),
            ));
            return self;
        }
        match serde_json::to_vec(document) {
            Ok(bytes) => self.payload = Payload::JsonApi(bytes),
            Err(e) => self.fail(TfeError::from(e)),
        }
        self
    }

    /// Send `body` verbatim, bypassing JSON:API encoding
    pub fn raw(mut self, body: impl Into<reqwest::Body>, content_type: &str) -> Self {
        if !self.allows_body() {
            let method = self.method.clone();
            self.fail(TfeError::invalid(
                "body",
                format!("{} requests cannot carry a payload", method),
            ));
            return self;
        }
        self.payload = Payload::Raw {
            body: body.into(),
            content_type: content_type.to_string(),
        };
        self
    }

    /// Allow the retry policy to repeat this non-GET request
    ///
    /// Only opt in when repeating the call cannot duplicate a remote resource.
    pub fn retry_non_idempotent(mut self) -> Self {
        self.retry_non_idempotent = true;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Whether the retry policy may repeat this request
    pub fn is_retry_allowed(&self) -> bool {
        self.method == Method::GET || self.retry_non_idempotent
    }

    pub(crate) fn has_raw_payload(&self) -> bool {
        matches!(self.payload, Payload::Raw { .. })
    }

    fn allows_body(&self) -> bool {
        !matches!(self.method, Method::GET | Method::HEAD | Method::DELETE)
    }

    fn fail(&mut self, error: TfeError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Surface any error recorded while building
    pub(crate) fn take_error(&mut self) -> Option<TfeError> {
        self.error.take()
    }

    /// Validated, escaped path or absolute URL
    pub(crate) fn resolve_target(&self) -> Result<ResolvedTarget> {
        match self.target {
            Target::Url(ref url) => {
                if url.starts_with("https://") || url.starts_with("http://") {
                    Ok(ResolvedTarget::Absolute(url.clone()))
                } else {
                    Ok(ResolvedTarget::ServerRelative(url.clone()))
                }
            }
            Target::Path(ref segments) => {
                let mut parts = Vec::with_capacity(segments.len());
                for segment in segments {
                    match segment {
                        Segment::Literal(s) => parts.push(s.clone()),
                        Segment::Id { field, value } => parts.push(escape_id(field, value)?),
                    }
                }
                let path = parts.join("/");
                if path.is_empty() {
                    return Err(TfeError::invalid("path", "is required"));
                }
                Ok(ResolvedTarget::Path(path))
            }
        }
    }

    /// Query pairs in insertion order, pagination last
    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.query.clone();
        if let Some(options) = self.list_options {
            pairs.extend(
                options
                    .query_pairs()
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v)),
            );
        }
        pairs
    }

    pub(crate) fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub(crate) fn take_payload(&mut self) -> Payload {
        std::mem::replace(&mut self.payload, Payload::Empty)
    }
}

/// Where a request goes once identifiers are validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ResolvedTarget {
    Path(String),
    ServerRelative(String),
    Absolute(String),
}
