//! State version data models

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::client::ListOptions;
use crate::jsonapi::{JsonApiType, Relationship, Resource};

pub type StateVersion = Resource<StateVersionAttributes, StateVersionRelationships>;

/// State version attributes from TFE API
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct StateVersionAttributes {
    #[serde(default)]
    pub serial: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosted_state_download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosted_json_state_download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources_processed: Option<bool>,
}

impl JsonApiType for StateVersionAttributes {
    const TYPE: &'static str = "state-versions";
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct StateVersionRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Relationship>,
}

/// Filters for listing state versions; both names are required by the API
#[derive(Debug, Clone, Default)]
pub struct StateVersionListOptions {
    pub page: ListOptions,
    pub organization: String,
    pub workspace: String,
}

/// Input for uploading a new state version
#[derive(Debug, Clone, Default)]
pub struct StateVersionCreateOptions {
    pub serial: u64,
    pub lineage: Option<String>,
    /// Raw state file contents
    pub state: Vec<u8>,
    pub force: Option<bool>,
    /// Associate the state with the run that produced it
    pub run_id: Option<String>,
}

/// Wire attributes for a state version upload
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct StateVersionUpload {
    pub serial: u64,
    pub md5: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineage: Option<String>,
    /// Base64-encoded state
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

impl JsonApiType for StateVersionUpload {
    const TYPE: &'static str = "state-versions";
}

impl StateVersionUpload {
    pub(crate) fn from_options(options: &StateVersionCreateOptions) -> Self {
        let mut hasher = Md5::new();
        hasher.update(&options.state);
        Self {
            serial: options.serial,
            md5: format!("{:x}", hasher.finalize()),
            lineage: options.lineage.clone(),
            state: BASE64.encode(&options.state),
            force: options.force,
        }
    }
}

impl StateVersion {
    /// Where to fetch the raw state: the hosted URL, else `links["download"]`
    pub fn download_url(&self) -> Option<&str> {
        self.attributes
            .hosted_state_download_url
            .as_deref()
            .or_else(|| self.links.get("download"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_encodes_state() {
        let options = StateVersionCreateOptions {
            serial: 5,
            lineage: Some("lineage-456".into()),
            state: br#"{"version":4}"#.to_vec(),
            ..Default::default()
        };
        let upload = StateVersionUpload::from_options(&options);
        assert_eq!(upload.serial, 5);
        assert_eq!(upload.state, "eyJ2ZXJzaW9uIjo0fQ==");
        assert_eq!(upload.md5.len(), 32);

        let json = serde_json::to_value(&upload).unwrap();
        assert_eq!(json["lineage"], "lineage-456");
        assert!(json.get("force").is_none());
    }

    #[test]
    fn test_md5_of_empty_state() {
        let upload = StateVersionUpload::from_options(&StateVersionCreateOptions::default());
        assert_eq!(upload.md5, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(upload.state, "");
    }

    #[test]
    fn test_state_version_deserialization() {
        let sv: StateVersion = serde_json::from_value(serde_json::json!({
            "id": "sv-123",
            "type": "state-versions",
            "attributes": {
                "serial": 42,
                "terraform-version": "1.6.0",
                "hosted-state-download-url": "https://example.com/state",
                "resources-processed": true,
                "lineage": "abc-def-123"
            }
        }))
        .unwrap();

        assert_eq!(sv.attributes.serial, 42);
        assert_eq!(sv.download_url(), Some("https://example.com/state"));
        assert_eq!(sv.attributes.lineage.as_deref(), Some("abc-def-123"));
    }
}
