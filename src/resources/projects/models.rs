//! Project data models

use serde::{Deserialize, Serialize};

use crate::client::ListOptions;
use crate::jsonapi::{JsonApiType, Relationship, Resource};
use crate::resources::traits::TfeResource;

pub type Project = Resource<ProjectAttributes, ProjectRelationships>;

/// Project attributes from TFE API
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectAttributes {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JsonApiType for ProjectAttributes {
    const TYPE: &'static str = "projects";
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<Relationship>,
}

/// Query options for listing projects
#[derive(Debug, Clone, Default)]
pub struct ProjectListOptions {
    pub page: ListOptions,
    /// Case-insensitive server-side search (`q`)
    pub search: Option<String>,
    /// Exact project names (`filter[names]`)
    pub names: Vec<String>,
}

#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectCreateOptions {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JsonApiType for ProjectCreateOptions {
    const TYPE: &'static str = "projects";
}

#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectUpdateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JsonApiType for ProjectUpdateOptions {
    const TYPE: &'static str = "projects";
}

impl TfeResource for Project {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.attributes.name
    }
}

impl Project {
    /// Get the project description
    pub fn description(&self) -> &str {
        self.attributes.description.as_deref().unwrap_or("")
    }

    pub fn organization_name(&self) -> Option<&str> {
        self.relationships.organization.as_ref().and_then(|r| r.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_deserialization() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "id": "prj-abc123",
            "type": "projects",
            "attributes": {"name": "Default Project"},
            "relationships": {"organization": {"data": {"id": "acme", "type": "organizations"}}}
        }))
        .unwrap();
        assert_eq!(project.name(), "Default Project");
        assert_eq!(project.description(), "");
        assert_eq!(project.organization_name(), Some("acme"));
        assert!(project.matches("prj-abc123"));
        assert!(project.matches("Default Project"));
    }
}
