//! TFE HTTP client and request pipeline

mod context;
mod credentials;
mod pagination;
mod pipeline;
mod request;
mod retry;
mod transport;
mod validation;

pub use context::{CancelHandle, Context};
pub use credentials::{TokenResolver, TokenSource};
pub use pagination::{List, ListOptions};
pub use pipeline::Response;
pub use request::Request;
pub use retry::RetryPolicy;
pub use transport::{default_http_client, Transport};
pub use validation::{valid_string_id, validate_id};

use log::debug;
use reqwest::Url;
use std::fmt;
use std::sync::Arc;

use crate::config::{api, credentials as credential_config, headers};
use crate::error::{Result, TfeError};

/// Settings a client is built from
///
/// `retry` is `None` by default: transient failures are reported as-is
/// unless a policy is configured.
#[derive(Clone)]
pub struct ClientConfig {
    /// Scheme and host, e.g. `https://app.terraform.io`
    pub address: String,
    /// API prefix appended to `address`
    pub base_path: String,
    pub token: String,
    /// Extra headers sent with every request
    pub headers: Vec<(String, String)>,
    pub retry: Option<RetryPolicy>,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: api::DEFAULT_ADDRESS.to_string(),
            base_path: api::BASE_PATH.to_string(),
            token: String::new(),
            headers: Vec::new(),
            retry: None,
            transport: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("address", &self.address)
            .field("base_path", &self.base_path)
            .field("token", &"<redacted>")
            .field("headers", &self.headers)
            .field("retry", &self.retry)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

impl ClientConfig {
    /// Configuration from the environment
    ///
    /// Address comes from `TFE_ADDRESS` or `TFE_HOSTNAME` (a bare hostname
    /// gets `https://`), defaulting to HCP Terraform. The token is resolved
    /// by [`TokenResolver`] for that host.
    pub fn from_env() -> Result<Self> {
        let address = credential_config::ADDRESS_ENV_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            .map(|value| normalize_address(&value))
            .unwrap_or_else(|| api::DEFAULT_ADDRESS.to_string());
        debug!("Using address: {}", address);

        let host = host_of(&address)?;
        let token = TokenResolver::new(&host).resolve(None)?;

        Ok(Self {
            address,
            token,
            ..Self::default()
        })
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Replace the HTTP transport, e.g. with a recording test double
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }
}

/// Facts the service reports about itself on `/ping`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceInfo {
    /// `TFP-API-Version`
    pub api_version: Option<String>,
    /// `TFP-AppName`, e.g. "HCP Terraform" or "Terraform Enterprise"
    pub app_name: Option<String>,
    /// `X-RateLimit-Limit`
    pub rate_limit: Option<u32>,
}

/// TFE API client
///
/// Immutable once built and cheap to clone; clones share the transport and
/// its connection pool, so one client can serve concurrent calls.
#[derive(Clone)]
pub struct TfeClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    address: String,
    base_url: String,
    token: String,
    headers: Vec<(String, String)>,
    retry: Option<RetryPolicy>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for TfeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TfeClient")
            .field("base_url", &self.inner.base_url)
            .field("retry", &self.inner.retry)
            .finish()
    }
}

impl TfeClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.token.is_empty() {
            return Err(TfeError::Config("API token is required".to_string()));
        }

        let address = config.address.trim_end_matches('/').to_string();
        let parsed = Url::parse(&address)
            .map_err(|e| TfeError::Config(format!("invalid address '{}': {}", address, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TfeError::Config(format!(
                "address '{}' must use http or https",
                address
            )));
        }

        let base_path = config.base_path.trim_matches('/');
        let base_url = if base_path.is_empty() {
            address.clone()
        } else {
            format!("{}/{}", address, base_path)
        };

        let transport = config
            .transport
            .unwrap_or_else(|| Arc::new(default_http_client()));

        debug!("Created client for {}", base_url);

        Ok(Self {
            inner: Arc::new(ClientInner {
                address,
                base_url,
                token: config.token,
                headers: config.headers,
                retry: config.retry,
                transport,
            }),
        })
    }

    /// Client configured from the environment, see [`ClientConfig::from_env`]
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a test client against a mock server with an empty API prefix
    #[cfg(test)]
    pub(crate) fn test_client(base_url: &str) -> Self {
        let config = ClientConfig {
            address: base_url.to_string(),
            base_path: String::new(),
            token: "test-token".to_string(),
            ..ClientConfig::default()
        };
        Self::new(config).expect("valid test client")
    }

    /// Base URL for API requests, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Scheme and host, used for server-relative links
    pub fn address(&self) -> &str {
        &self.inner.address
    }

    pub fn retry_policy(&self) -> Option<RetryPolicy> {
        self.inner.retry
    }

    pub(crate) fn token(&self) -> &str {
        &self.inner.token
    }

    pub(crate) fn extra_headers(&self) -> &[(String, String)] {
        &self.inner.headers
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.inner.transport.as_ref()
    }

    pub(crate) fn user_agent(&self) -> String {
        format!("tfe-client/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Check connectivity and read service metadata headers
    pub async fn ping(&self, ctx: &Context) -> Result<ServiceInfo> {
        let response = self.execute(ctx, Request::get().segment(api::PING)).await?;
        Ok(ServiceInfo {
            api_version: response.header(headers::API_VERSION).map(str::to_string),
            app_name: response.header(headers::APP_NAME).map(str::to_string),
            rate_limit: response
                .header(headers::RATE_LIMIT)
                .and_then(|v| v.trim().parse().ok()),
        })
    }
}

/// Prefix `https://` to a bare hostname
fn normalize_address(value: &str) -> String {
    let value = value.trim().trim_end_matches('/');
    if value.starts_with("http://") || value.starts_with("https://") {
        value.to_string()
    } else {
        format!("https://{}", value)
    }
}

/// Host (with port, if any) used as the credentials file key
fn host_of(address: &str) -> Result<String> {
    let url = Url::parse(address)
        .map_err(|e| TfeError::Config(format!("invalid address '{}': {}", address, e)))?;
    let host = url
        .host_str()
        .ok_or_else(|| TfeError::Config(format!("address '{}' has no host", address)))?;
    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_new_requires_token() {
        let err = TfeClient::new(ClientConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(matches!(err, TfeError::Config(_)));
    }

    #[test]
    fn test_new_rejects_bad_address() {
        let config = ClientConfig::default().token("t").address("not a url");
        assert!(matches!(TfeClient::new(config), Err(TfeError::Config(_))));

        let config = ClientConfig::default().token("t").address("ftp://example.com");
        assert!(matches!(TfeClient::new(config), Err(TfeError::Config(_))));
    }

    #[test]
    fn test_base_url_joins_address_and_path() {
        let client = TfeClient::new(ClientConfig::default().token("t")).unwrap();
        assert_eq!(client.base_url(), "https://app.terraform.io/api/v2");
        assert_eq!(client.address(), "https://app.terraform.io");

        let client = TfeClient::new(
            ClientConfig::default()
                .token("t")
                .address("https://tfe.example.com/"),
        )
        .unwrap();
        assert_eq!(client.base_url(), "https://tfe.example.com/api/v2");
    }

    #[test]
    fn test_config_debug_redacts_token() {
        let config = ClientConfig::default().token("secret-token");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("tfe.example.com"), "https://tfe.example.com");
        assert_eq!(
            normalize_address("http://localhost:8080/"),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://app.terraform.io").unwrap(), "app.terraform.io");
        assert_eq!(host_of("http://localhost:8080").unwrap(), "localhost:8080");
    }

    #[tokio::test]
    async fn test_ping_reads_service_headers() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(204)
                    .insert_header("TFP-API-Version", "2.6")
                    .insert_header("TFP-AppName", "Terraform Enterprise")
                    .insert_header("X-RateLimit-Limit", "30"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let info = client.ping(&Context::background()).await.unwrap();
        assert_eq!(info.api_version.as_deref(), Some("2.6"));
        assert_eq!(info.app_name.as_deref(), Some("Terraform Enterprise"));
        assert_eq!(info.rate_limit, Some(30));
    }

    #[tokio::test]
    async fn test_configured_headers_sent() {
        let mock_server = MockServer::start().await;
        let config = ClientConfig {
            address: mock_server.uri(),
            base_path: String::new(),
            ..ClientConfig::default()
        }
        .token("t")
        .header("X-Terraform-Integration", "cloud");
        let client = TfeClient::new(config).unwrap();

        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("x-terraform-integration", "cloud"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        client.ping(&Context::background()).await.unwrap();
    }

    #[tokio::test]
    async fn test_clones_share_configuration() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());
        let clone = client.clone();

        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(204))
            .expect(2)
            .mount(&mock_server)
            .await;

        let ctx = Context::background();
        let (a, b) = tokio::join!(client.ping(&ctx), clone.ping(&ctx));
        assert!(a.is_ok() && b.is_ok());
    }
}
