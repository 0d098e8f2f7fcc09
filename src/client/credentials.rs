//! API token discovery
//!
//! Sources are tried in order: an explicit value, the token environment
//! variables, then the Terraform CLI credentials file entry for the host.

use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use crate::config::credentials;
use crate::error::{Result, TfeError};

/// `credentials.tfrc.json` as written by `terraform login`
#[derive(Deserialize, Debug, Default)]
struct CredentialsFile {
    #[serde(default)]
    credentials: HashMap<String, HostCredentials>,
}

#[derive(Deserialize, Debug)]
struct HostCredentials {
    token: String,
}

/// Where a resolved token came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Explicit,
    Env(&'static str),
    CredentialsFile(PathBuf),
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Explicit => write!(f, "explicit configuration"),
            TokenSource::Env(var) => write!(f, "environment variable {}", var),
            TokenSource::CredentialsFile(path) => write!(f, "credentials file {}", path.display()),
        }
    }
}

/// Finds the API token for one host
pub struct TokenResolver {
    host: String,
    credentials_path: Option<PathBuf>,
}

impl TokenResolver {
    /// Resolver for `host` (hostname with optional port, no scheme)
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_ascii_lowercase(),
            credentials_path: default_credentials_path(),
        }
    }

    /// Read credentials from `path` instead of the platform default
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    pub fn resolve(&self, explicit: Option<&str>) -> Result<String> {
        self.resolve_with_source(explicit).map(|(token, _)| token)
    }

    /// Token plus the source it was taken from
    pub fn resolve_with_source(&self, explicit: Option<&str>) -> Result<(String, TokenSource)> {
        let found = match explicit.filter(|t| !t.is_empty()) {
            Some(token) => Some((token.to_string(), TokenSource::Explicit)),
            None => match env_token() {
                Some(found) => Some(found),
                None => self.credentials_file_token()?,
            },
        };

        match found {
            Some((token, source)) => {
                debug!("Using API token for {} from {}", self.host, source);
                Ok((token, source))
            }
            None => Err(TfeError::TokenNotFound(self.missing_token_message())),
        }
    }

    fn credentials_file_token(&self) -> Result<Option<(String, TokenSource)>> {
        let Some(path) = self.credentials_path.as_deref() else {
            return Ok(None);
        };
        let token = lookup_host(path, &self.host)?;
        Ok(token.map(|t| (t, TokenSource::CredentialsFile(path.to_path_buf()))))
    }

    fn missing_token_message(&self) -> String {
        let file_hint = self
            .credentials_path
            .as_deref()
            .map(|p| format!(", add it to {}", p.display()))
            .unwrap_or_default();
        format!(
            "no API token for '{}': set {}{}, or run `terraform login {}`",
            self.host,
            credentials::TOKEN_ENV_VARS.join(" / "),
            file_hint,
            self.host
        )
    }
}

fn env_token() -> Option<(String, TokenSource)> {
    credentials::TOKEN_ENV_VARS.iter().find_map(|var| {
        std::env::var(var)
            .ok()
            .filter(|t| !t.is_empty())
            .map(|t| (t, TokenSource::Env(*var)))
    })
}

/// Token stored for `host`, `None` when the file or the entry is absent
fn lookup_host(path: &Path, host: &str) -> Result<Option<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == IoErrorKind::NotFound => {
            debug!("No credentials file at {}", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(TfeError::Credentials(format!(
                "cannot read {}: {}",
                path.display(),
                e
            )))
        }
    };

    let file: CredentialsFile = serde_json::from_str(&content).map_err(|e| {
        TfeError::Credentials(format!("malformed credentials file {}: {}", path.display(), e))
    })?;

    Ok(file
        .credentials
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(host))
        .map(|(_, entry)| entry.token))
}

/// `%APPDATA%\terraform.d\credentials.tfrc.json` on Windows,
/// `~/.terraform.d/credentials.tfrc.json` elsewhere
fn default_credentials_path() -> Option<PathBuf> {
    if cfg!(windows) {
        dirs::config_dir().map(|p| p.join(credentials::FILE_NAME))
    } else {
        dirs::home_dir().map(|p| p.join(credentials::FILE_PATH_UNIX))
    }
}
