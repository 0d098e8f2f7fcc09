//! Registry module data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::validate_id;
use crate::error::Result;
use crate::jsonapi::{JsonApiType, Relationships, Resource};
use crate::resources::traits::TfeResource;

pub type RegistryModule = Resource<RegistryModuleAttributes, Relationships>;

pub type RegistryModuleVersion = Resource<RegistryModuleVersionAttributes, Relationships>;

/// Which registry a module lives in
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegistryName {
    #[default]
    Private,
    Public,
}

impl RegistryName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryName::Private => "private",
            RegistryName::Public => "public",
        }
    }
}

/// Registry module attributes from TFE API
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct RegistryModuleAttributes {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub registry_name: RegistryName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub version_statuses: Vec<VersionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl JsonApiType for RegistryModuleAttributes {
    const TYPE: &'static str = "registry-modules";
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct VersionStatus {
    pub version: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct RegistryModuleVersionAttributes {
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl JsonApiType for RegistryModuleVersionAttributes {
    const TYPE: &'static str = "registry-module-versions";
}

/// Attributes accepted when creating a module without a VCS connection
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RegistryModuleCreateOptions {
    pub name: String,
    pub provider: String,
    pub registry_name: RegistryName,
    /// Defaults to the organization name for private modules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl JsonApiType for RegistryModuleCreateOptions {
    const TYPE: &'static str = "registry-modules";
}

#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RegistryModuleVersionCreateOptions {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
}

impl JsonApiType for RegistryModuleVersionCreateOptions {
    const TYPE: &'static str = "registry-module-versions";
}

/// Full address of a registry module
///
/// Modules have no opaque ID in the API; they are addressed by
/// organization, registry, namespace, name and provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryModuleId {
    pub organization: String,
    pub registry_name: RegistryName,
    /// Empty means the organization name for private modules
    pub namespace: String,
    pub name: String,
    pub provider: String,
}

impl RegistryModuleId {
    pub fn private(organization: &str, name: &str, provider: &str) -> Self {
        Self {
            organization: organization.to_string(),
            registry_name: RegistryName::Private,
            namespace: organization.to_string(),
            name: name.to_string(),
            provider: provider.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        if self.namespace.is_empty() && self.registry_name == RegistryName::Private {
            &self.organization
        } else {
            &self.namespace
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_id("organization", &self.organization)?;
        validate_id("namespace", self.namespace())?;
        validate_id("name", &self.name)?;
        validate_id("provider", &self.provider)
    }
}

impl RegistryModule {
    /// Address of this module within `organization`
    pub fn module_id(&self, organization: &str) -> RegistryModuleId {
        RegistryModuleId {
            organization: organization.to_string(),
            registry_name: self.attributes.registry_name,
            namespace: self.attributes.namespace.clone(),
            name: self.attributes.name.clone(),
            provider: self.attributes.provider.clone(),
        }
    }
}

impl RegistryModuleVersion {
    /// Pre-signed URL for the version tarball
    pub fn upload_url(&self) -> Option<&str> {
        self.links.get("upload")
    }
}

impl TfeResource for RegistryModule {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.attributes.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_namespace_defaults_to_organization() {
        let id = RegistryModuleId {
            organization: "acme".into(),
            name: "vpc".into(),
            provider: "aws".into(),
            ..Default::default()
        };
        assert_eq!(id.namespace(), "acme");
        assert!(id.validate().is_ok());

        let public = RegistryModuleId {
            registry_name: RegistryName::Public,
            ..id
        };
        assert_eq!(public.validate().unwrap_err().field(), Some("namespace"));
    }

    #[test]
    fn test_version_upload_link() {
        let version: RegistryModuleVersion = serde_json::from_value(serde_json::json!({
            "id": "modver-1",
            "type": "registry-module-versions",
            "attributes": {"version": "1.0.0", "status": "pending"},
            "links": {"upload": "https://archivist.example.com/object/abc"}
        }))
        .unwrap();
        assert_eq!(
            version.upload_url(),
            Some("https://archivist.example.com/object/abc")
        );
    }

    #[test]
    fn test_registry_name_serialization() {
        let options = RegistryModuleCreateOptions {
            name: "vpc".into(),
            provider: "aws".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["registry-name"], "private");
        assert!(json.get("namespace").is_none());
    }
}
