//! Request pipeline: build, send, interpret, decode
//!
//! Every API call passes through [`TfeClient::execute`]. A call moves from
//! built to sent to either succeeded or failed within one invocation; no
//! state survives it.

use log::{debug, warn};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT,
};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::client::request::{Payload, ResolvedTarget};
use crate::client::retry::parse_retry_after;
use crate::client::{Context, Request, TfeClient};
use crate::config::{api, headers};
use crate::error::{Result, TfeError};
use crate::jsonapi::{Document, ErrorDocument};

/// Successful HTTP response with the body fully read
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Decode the body as JSON, keeping the raw body on failure
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| TfeError::Decode {
            message: e.to_string(),
            body: String::from_utf8_lossy(&self.body).into_owned(),
        })
    }

    /// Decode a JSON:API document, rejecting error envelopes on success
    pub fn decode_document<D: DeserializeOwned>(&self) -> Result<Document<D>> {
        if let Some(errors) = ErrorDocument::from_body(&self.body) {
            let has_data = serde_json::from_slice::<serde_json::Value>(&self.body)
                .map(|v| v.get("data").is_some_and(|d| !d.is_null()))
                .unwrap_or(false);
            if !has_data {
                return Err(TfeError::Server {
                    status: self.status.as_u16(),
                    message: errors
                        .message()
                        .unwrap_or_else(|| "response carried errors and no data".to_string()),
                });
            }
        }
        self.decode()
    }
}

impl TfeClient {
    /// Execute one operation and return the raw successful response
    ///
    /// Identifier validation happens here, before anything is sent. Non-2xx
    /// statuses are mapped to typed errors. Transient failures are retried
    /// when the client has a retry policy and the request allows it. The
    /// transport call races the context, so cancellation and deadlines
    /// interrupt a blocked call.
    pub async fn execute(&self, ctx: &Context, mut request: Request) -> Result<Response> {
        if let Some(error) = request.take_error() {
            return Err(error);
        }
        let http_request = self.build_http_request(&mut request)?;

        let retry_policy = self
            .retry_policy()
            .filter(|_| request.is_retry_allowed());

        let mut attempt: u32 = 1;
        let mut current = http_request;
        loop {
            // keep a copy for the next attempt; streamed bodies cannot be cloned
            let next = retry_policy.and_then(|_| current.try_clone());

            if let Some(reason) = ctx.check() {
                return Err(TfeError::Transport(reason));
            }

            let method = current.method().clone();
            let url = current.url().clone();
            debug!("{} {} (attempt {})", method, url, attempt);

            let outcome = tokio::select! {
                reason = ctx.done() => return Err(TfeError::Transport(reason)),
                outcome = self.send_and_read(current) => outcome,
            };

            let (error, retry_after) = match outcome {
                Ok(response) if response.status.is_success() => {
                    debug!("{} {} -> {}", method, url, response.status);
                    return Ok(response);
                }
                Ok(response) => {
                    debug!("{} {} -> {}", method, url, response.status);
                    let retry_after = parse_retry_after(response.header(headers::RETRY_AFTER));
                    (error_from_response(&response), retry_after)
                }
                Err(error) => (error, None),
            };

            let (policy, next) = match (retry_policy, next) {
                (Some(policy), Some(next)) if policy.should_retry(attempt, &error) => {
                    (policy, next)
                }
                _ => return Err(error),
            };

            let delay = policy.delay_for_attempt(attempt, retry_after);
            warn!(
                "{} {} failed (attempt {}/{}): {}; retrying in {:.1}s",
                method,
                url,
                attempt,
                policy.max_attempts,
                error,
                delay.as_secs_f64()
            );

            tokio::select! {
                reason = ctx.done() => return Err(TfeError::Transport(reason)),
                _ = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
            current = next;
        }
    }

    /// Execute and decode the body as JSON into `T`
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        request: Request,
    ) -> Result<T> {
        self.execute(ctx, request).await?.decode()
    }

    /// Execute and decode a JSON:API document
    pub async fn execute_document<D: DeserializeOwned>(
        &self,
        ctx: &Context,
        request: Request,
    ) -> Result<Document<D>> {
        self.execute(ctx, request).await?.decode_document()
    }

    /// Execute and discard the body
    pub async fn execute_unit(&self, ctx: &Context, request: Request) -> Result<()> {
        self.execute(ctx, request).await.map(|_| ())
    }

    /// Send through the transport and read the whole body
    async fn send_and_read(&self, request: reqwest::Request) -> Result<Response> {
        let response = self.transport().send(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(Response {
            status,
            headers,
            body,
        })
    }

    /// Turn the operation descriptor into an HTTP request
    fn build_http_request(&self, request: &mut Request) -> Result<reqwest::Request> {
        let target = request.resolve_target()?;
        let absolute = matches!(target, ResolvedTarget::Absolute(_));
        let raw_url = match target {
            ResolvedTarget::Path(path) => format!("{}/{}", self.base_url(), path),
            ResolvedTarget::ServerRelative(path) => format!("{}{}", self.address(), path),
            ResolvedTarget::Absolute(url) => url,
        };

        let mut url = Url::parse(&raw_url)
            .map_err(|e| TfeError::invalid("url", format!("'{}': {}", raw_url, e)))?;
        let first_party = !absolute || self.is_api_origin(&url);
        if !first_party {
            debug!(
                "{} is outside the API host, sending without credentials",
                url.origin().ascii_serialization()
            );
        }
        let query = request.query_pairs();
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &query {
                pairs.append_pair(key, value);
            }
        }

        let mut http_request = reqwest::Request::new(request.method().clone(), url);
        let headers = http_request.headers_mut();

        // credentials only go to the API host, never to pre-signed object storage links
        if first_party {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", self.token()))?);
            headers.insert(USER_AGENT, header_value(&self.user_agent())?);
            for (name, value) in self.extra_headers() {
                headers.insert(header_name(name)?, header_value(value)?);
            }
        }
        for (name, value) in request.headers() {
            headers.insert(header_name(name)?, header_value(value)?);
        }

        let raw = request.has_raw_payload();
        if !raw && !headers.contains_key(ACCEPT) {
            headers.insert(ACCEPT, HeaderValue::from_static(api::MEDIA_TYPE));
        }

        match request.take_payload() {
            Payload::Empty => {}
            Payload::JsonApi(bytes) => {
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static(api::MEDIA_TYPE));
                }
                *http_request.body_mut() = Some(reqwest::Body::from(bytes));
            }
            Payload::Raw { body, content_type } => {
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, header_value(&content_type)?);
                }
                *http_request.body_mut() = Some(body);
            }
        }

        Ok(http_request)
    }

    /// Whether `url` has the same scheme, host and port as the API address
    fn is_api_origin(&self, url: &Url) -> bool {
        Url::parse(self.address())
            .map(|address| address.origin() == url.origin())
            .unwrap_or(false)
    }
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| TfeError::invalid("header", format!("'{}': {}", name, e)))
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| TfeError::invalid("header", format!("invalid value: {}", e)))
}

/// Map a non-success response to a typed error
pub(crate) fn error_from_response(response: &Response) -> TfeError {
    let status = response.status();
    let errors = ErrorDocument::from_body(response.body());
    let detail = errors.as_ref().and_then(|e| e.message());
    let message = detail.unwrap_or_else(|| generic_message(status));

    match status.as_u16() {
        404 => TfeError::NotFound(message),
        401 | 403 => TfeError::Unauthorized {
            status: status.as_u16(),
            message,
        },
        409 => TfeError::Conflict(message),
        429 | 500..=599 => TfeError::Server {
            status: status.as_u16(),
            message,
        },
        _ => TfeError::InvalidInput {
            field: errors.as_ref().and_then(|e| e.field()),
            message,
        },
    }
}

fn generic_message(status: StatusCode) -> String {
    match status.as_u16() {
        404 => "resource not found".to_string(),
        401 => "unauthorized".to_string(),
        403 => "forbidden".to_string(),
        409 => "resource conflict".to_string(),
        429 => "rate limit exceeded".to_string(),
        _ => match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_u16(), reason.to_lowercase()),
            None => format!("unexpected status {}", status.as_u16()),
        },
    }
}
