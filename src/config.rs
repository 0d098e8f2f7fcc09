/// Configuration constants for the TFE API
pub mod api {
    /// Default address of HCP Terraform
    pub const DEFAULT_ADDRESS: &str = "https://app.terraform.io";

    /// Base path for TFE API v2
    pub const BASE_PATH: &str = "/api/v2/";

    /// JSON:API media type used for Accept and Content-Type
    pub const MEDIA_TYPE: &str = "application/vnd.api+json";

    /// Content type for raw uploads to pre-signed URLs
    pub const OCTET_STREAM: &str = "application/octet-stream";

    /// Page size used when walking every page of a list endpoint
    pub const DEFAULT_PAGE_SIZE: u32 = 100;

    /// Maximum number of pages fetched concurrently
    pub const MAX_CONCURRENT_PAGE_REQUESTS: usize = 10;

    /// Query keys for pagination
    pub const PAGE_NUMBER: &str = "page[number]";
    pub const PAGE_SIZE: &str = "page[size]";

    /// Endpoint roots
    pub const ORGANIZATIONS: &str = "organizations";
    pub const WORKSPACES: &str = "workspaces";
    pub const PROJECTS: &str = "projects";
    pub const RUNS: &str = "runs";
    pub const PLANS: &str = "plans";
    pub const CONFIGURATION_VERSIONS: &str = "configuration-versions";
    pub const STATE_VERSIONS: &str = "state-versions";
    pub const REGISTRY_MODULES: &str = "registry-modules";
    pub const PING: &str = "ping";
}

/// Response headers describing the remote service
pub mod headers {
    pub const API_VERSION: &str = "TFP-API-Version";
    pub const APP_NAME: &str = "TFP-AppName";
    pub const RATE_LIMIT: &str = "X-RateLimit-Limit";
    pub const RETRY_AFTER: &str = "Retry-After";
}

/// Configuration constants for credentials
pub mod credentials {
    /// Credentials file name
    pub const FILE_NAME: &str = "terraform.d/credentials.tfrc.json";

    /// Path to Terraform credentials file on Unix (relative to HOME)
    pub const FILE_PATH_UNIX: &str = ".terraform.d/credentials.tfrc.json";

    /// Environment variable names for token (checked in order)
    pub const TOKEN_ENV_VARS: &[&str] = &["TFE_TOKEN", "HCP_TOKEN", "TFC_TOKEN"];

    /// Environment variable names for the service address (checked in order)
    pub const ADDRESS_ENV_VARS: &[&str] = &["TFE_ADDRESS", "TFE_HOSTNAME"];
}

/// Defaults for the opt-in retry policy
pub mod retry {
    use std::time::Duration;

    pub const MAX_ATTEMPTS: u32 = 3;
    pub const BASE_DELAY: Duration = Duration::from_millis(500);
    pub const MAX_DELAY: Duration = Duration::from_secs(30);
}

/// Connection settings for the default transport
pub mod transport {
    use std::time::Duration;

    pub const POOL_MAX_IDLE_PER_HOST: usize = 20;
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
    pub const TCP_KEEPALIVE: Duration = Duration::from_secs(60);
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}
