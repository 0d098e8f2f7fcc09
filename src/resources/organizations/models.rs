//! Organization data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::jsonapi::{JsonApiType, Relationship, Resource};
use crate::resources::traits::TfeResource;

/// Organization as returned by the API
///
/// The API uses the organization name as `id`; `external-id` carries the
/// `org-...` identifier.
pub type Organization = Resource<OrganizationAttributes, OrganizationRelationships>;

/// Organization attributes from TFE API
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct OrganizationAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saml_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaborator_auth_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_estimation_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_timeout: Option<u32>,
}

impl JsonApiType for OrganizationAttributes {
    const TYPE: &'static str = "organizations";
}

/// Organization relationships from TFE API
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct OrganizationRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_project: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_tokens: Option<Relationship>,
}

/// Attributes accepted when creating an organization
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct OrganizationCreateOptions {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborator_auth_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_estimation_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_timeout: Option<u32>,
}

impl JsonApiType for OrganizationCreateOptions {
    const TYPE: &'static str = "organizations";
}

/// Attributes accepted when updating an organization; unset fields are left alone
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct OrganizationUpdateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborator_auth_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_estimation_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_timeout: Option<u32>,
}

impl JsonApiType for OrganizationUpdateOptions {
    const TYPE: &'static str = "organizations";
}

impl Organization {
    /// Get email from attributes
    pub fn email(&self) -> &str {
        self.attributes.email.as_deref().unwrap_or("")
    }

    /// Get external ID from attributes
    pub fn external_id(&self) -> &str {
        self.attributes.external_id.as_deref().unwrap_or("")
    }

    /// Get saml_enabled from attributes
    pub fn saml_enabled(&self) -> bool {
        self.attributes.saml_enabled.unwrap_or(false)
    }

    /// Get default project ID from relationships
    pub fn default_project_id(&self) -> Option<&str> {
        self.relationships
            .default_project
            .as_ref()
            .and_then(|r| r.id())
    }

    /// Get oauth tokens link from relationships
    pub fn oauth_tokens_link(&self) -> Option<&str> {
        self.relationships
            .oauth_tokens
            .as_ref()
            .and_then(|r| r.links.get("related"))
    }
}

impl TfeResource for Organization {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        self.attributes.name.as_deref().unwrap_or(&self.id)
    }

    /// Also match the `org-...` external ID
    fn matches(&self, input: &str) -> bool {
        self.id() == input || self.name() == input || self.external_id() == input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Organization {
        serde_json::from_value(serde_json::json!({
            "id": "my-org",
            "type": "organizations",
            "attributes": {
                "name": "my-org",
                "email": "admin@example.com",
                "external-id": "org-ABC123",
                "created-at": "2025-01-01T00:00:00.000Z",
                "saml-enabled": true
            },
            "relationships": {
                "default-project": {"data": {"id": "prj-default", "type": "projects"}},
                "oauth-tokens": {"links": {"related": "/api/v2/organizations/my-org/oauth-tokens"}}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_organization_deserialization() {
        let org = sample();
        assert_eq!(org.id, "my-org");
        assert_eq!(org.email(), "admin@example.com");
        assert_eq!(org.external_id(), "org-ABC123");
        assert!(org.saml_enabled());
        assert_eq!(
            org.attributes.created_at.map(|t| t.to_rfc3339()),
            Some("2025-01-01T00:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_organization_relationships() {
        let org = sample();
        assert_eq!(org.default_project_id(), Some("prj-default"));
        assert_eq!(
            org.oauth_tokens_link(),
            Some("/api/v2/organizations/my-org/oauth-tokens")
        );
    }

    #[test]
    fn test_organization_minimal() {
        let org: Organization =
            serde_json::from_str(r#"{"id": "minimal-org", "type": "organizations"}"#).unwrap();
        assert_eq!(org.email(), "");
        assert_eq!(org.name(), "minimal-org");
        assert!(!org.saml_enabled());
        assert_eq!(org.default_project_id(), None);
    }

    #[test]
    fn test_organization_matches_by_external_id() {
        let org = sample();
        assert!(org.matches("my-org"));
        assert!(org.matches("org-ABC123"));
        assert!(!org.matches("org-999"));
    }

    #[test]
    fn test_create_options_skip_unset() {
        let body = serde_json::to_value(Resource::<_>::new(OrganizationCreateOptions {
            name: "acme".into(),
            email: "ops@acme.test".into(),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "type": "organizations",
                "attributes": {"name": "acme", "email": "ops@acme.test"}
            })
        );
    }
}
