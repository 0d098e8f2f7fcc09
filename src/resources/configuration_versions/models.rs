//! Configuration version data models

use serde::{Deserialize, Serialize};

use crate::jsonapi::{JsonApiType, Relationship, Resource};

pub type ConfigurationVersion =
    Resource<ConfigurationVersionAttributes, ConfigurationVersionRelationships>;

/// Configuration version attributes
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigurationVersionAttributes {
    /// Source of the configuration (e.g., "tfe-api", "gitlab", "github")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Status: pending, fetching, uploaded, archived, errored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub speculative: bool,
    #[serde(default)]
    pub provisional: bool,
    #[serde(default)]
    pub auto_queue_runs: bool,
    /// Error message if status is "errored"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Pre-signed URL accepting the configuration tarball
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<String>,
}

impl JsonApiType for ConfigurationVersionAttributes {
    const TYPE: &'static str = "configuration-versions";
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigurationVersionRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress_attributes: Option<Relationship>,
}

/// Attributes accepted when creating a configuration version
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigurationVersionCreateOptions {
    /// Queue a run as soon as the upload finishes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_queue_runs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speculative: Option<bool>,
}

impl JsonApiType for ConfigurationVersionCreateOptions {
    const TYPE: &'static str = "configuration-versions";
}

impl ConfigurationVersion {
    /// Where to PUT the tarball: the `upload-url` attribute, else `links["upload"]`
    pub fn upload_url(&self) -> Option<&str> {
        self.attributes
            .upload_url
            .as_deref()
            .or_else(|| self.links.get("upload"))
    }

    /// Check if configuration version is downloadable
    pub fn is_downloadable(&self) -> bool {
        matches!(self.attributes.status.as_deref(), Some("uploaded"))
    }
}
