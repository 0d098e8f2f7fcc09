use std::fmt;

/// Closed set of error kinds callers branch on
///
/// Compare kinds by value: `err.kind() == ErrorKind::NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed identifiers, missing required fields, remote 400/422
    InvalidInput,
    /// Remote 404
    NotFound,
    /// Remote 401/403
    Unauthorized,
    /// Remote 409
    Conflict,
    /// Remote 5xx/429 or an undecodable success body
    ServerError,
    /// Connection, DNS, TLS, cancellation or deadline failures
    Transport,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::NotFound => "not found",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Conflict => "conflict",
            ErrorKind::ServerError => "server error",
            ErrorKind::Transport => "transport",
        };
        f.write_str(name)
    }
}

/// Why a request never produced an HTTP response
#[derive(Debug)]
pub enum TransportFailure {
    /// DNS, connect, TLS or body read failure
    Network(reqwest::Error),
    /// The caller's cancel signal fired
    Cancelled,
    /// The caller's deadline passed
    TimedOut,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Network(e) => write!(f, "HTTP request failed: {}", e),
            TransportFailure::Cancelled => write!(f, "request cancelled"),
            TransportFailure::TimedOut => write!(f, "request deadline exceeded"),
        }
    }
}

/// Custom error type for TFE operations
#[derive(Debug)]
pub enum TfeError {
    /// Input rejected locally or by the API (400/422)
    InvalidInput {
        field: Option<String>,
        message: String,
    },
    /// Resource does not exist or is not visible to the token
    NotFound(String),
    /// Token missing, invalid or lacking permission (401/403)
    Unauthorized { status: u16, message: String },
    /// Request conflicts with the current state of the resource (409)
    Conflict(String),
    /// API returned a server-side failure (5xx/429)
    Server { status: u16, message: String },
    /// Success response whose body could not be decoded
    Decode { message: String, body: String },
    /// Request never produced a response
    Transport(TransportFailure),
    /// Token not found in any source
    TokenNotFound(String),
    /// Failed to read or parse credentials file
    Credentials(String),
    /// Client configuration error
    Config(String),
}

impl TfeError {
    /// Build a locally raised `InvalidInput` for a named field
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        TfeError::InvalidInput {
            field: Some(field.to_string()),
            message: message.into(),
        }
    }

    /// Kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TfeError::InvalidInput { .. }
            | TfeError::TokenNotFound(_)
            | TfeError::Credentials(_)
            | TfeError::Config(_) => ErrorKind::InvalidInput,
            TfeError::NotFound(_) => ErrorKind::NotFound,
            TfeError::Unauthorized { .. } => ErrorKind::Unauthorized,
            TfeError::Conflict(_) => ErrorKind::Conflict,
            TfeError::Server { .. } | TfeError::Decode { .. } => ErrorKind::ServerError,
            TfeError::Transport(_) => ErrorKind::Transport,
        }
    }

    /// HTTP status that produced this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            TfeError::NotFound(_) => Some(404),
            TfeError::Conflict(_) => Some(409),
            TfeError::Unauthorized { status, .. } | TfeError::Server { status, .. } => {
                Some(*status)
            }
            TfeError::Transport(TransportFailure::Network(e)) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Offending field for `InvalidInput`, if known
    pub fn field(&self) -> Option<&str> {
        match self {
            TfeError::InvalidInput { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Raw response body retained for an undecodable success response
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            TfeError::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// True when the caller cancelled the request or its deadline passed
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            TfeError::Transport(TransportFailure::Cancelled | TransportFailure::TimedOut)
        )
    }

    /// True for transient failures the retry policy may repeat
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TfeError::Server { .. } | TfeError::Transport(TransportFailure::Network(_))
        )
    }
}

impl fmt::Display for TfeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TfeError::InvalidInput {
                field: Some(field),
                message,
            } => write!(f, "Invalid input for '{}': {}", field, message),
            TfeError::InvalidInput {
                field: None,
                message,
            } => write!(f, "Invalid input: {}", message),
            TfeError::NotFound(msg) => write!(f, "Not found: {}", msg),
            TfeError::Unauthorized { status, message } => {
                write!(f, "Unauthorized (status {}): {}", status, message)
            }
            TfeError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            TfeError::Server { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            TfeError::Decode { message, .. } => {
                write!(f, "Failed to decode response: {}", message)
            }
            TfeError::Transport(failure) => write!(f, "{}", failure),
            TfeError::TokenNotFound(msg) => write!(f, "{}", msg),
            TfeError::Credentials(msg) => write!(f, "{}", msg),
            TfeError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for TfeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TfeError::Transport(TransportFailure::Network(e)) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TfeError {
    fn from(err: reqwest::Error) -> Self {
        TfeError::Transport(TransportFailure::Network(err))
    }
}

impl From<serde_json::Error> for TfeError {
    fn from(err: serde_json::Error) -> Self {
        TfeError::InvalidInput {
            field: None,
            message: format!("JSON error: {}", err),
        }
    }
}

/// Result type alias for TFE operations
pub type Result<T> = std::result::Result<T, TfeError>;
