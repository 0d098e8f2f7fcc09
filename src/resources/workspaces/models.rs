//! Workspace data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ListOptions;
use crate::jsonapi::{JsonApiType, Relationship, Resource};
use crate::resources::traits::TfeResource;

pub type Workspace = Resource<WorkspaceAttributes, WorkspaceRelationships>;

/// Workspace attributes from TFE API
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct WorkspaceAttributes {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_apply: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl JsonApiType for WorkspaceAttributes {
    const TYPE: &'static str = "workspaces";
}

/// Workspace relationships from TFE API
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct WorkspaceRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_run: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_state_version: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_by: Option<Relationship>,
}

/// Related resources that can be side-loaded with a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceInclude {
    Organization,
    Project,
    CurrentRun,
    CurrentStateVersion,
    LockedBy,
}

impl WorkspaceInclude {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceInclude::Organization => "organization",
            WorkspaceInclude::Project => "project",
            WorkspaceInclude::CurrentRun => "current_run",
            WorkspaceInclude::CurrentStateVersion => "current_state_version",
            WorkspaceInclude::LockedBy => "locked_by",
        }
    }
}

/// Query options for listing workspaces
#[derive(Debug, Clone, Default)]
pub struct WorkspaceListOptions {
    pub page: ListOptions,
    /// Filter by workspace name (fuzzy server-side search)
    pub search: Option<String>,
    /// Only workspaces carrying all of these tags
    pub tags: Vec<String>,
    /// Filter by project ID
    pub project_id: Option<String>,
    pub include: Vec<WorkspaceInclude>,
}

/// Attributes accepted when creating a workspace
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct WorkspaceCreateOptions {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_apply: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_names: Vec<String>,
    /// Sent as the `project` relationship, not as an attribute
    #[serde(skip)]
    pub project_id: Option<String>,
}

impl JsonApiType for WorkspaceCreateOptions {
    const TYPE: &'static str = "workspaces";
}

/// Attributes accepted when updating a workspace; unset fields are left alone
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct WorkspaceUpdateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_apply: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    /// Move the workspace to another project
    #[serde(skip)]
    pub project_id: Option<String>,
}

impl JsonApiType for WorkspaceUpdateOptions {
    const TYPE: &'static str = "workspaces";
}

impl TfeResource for Workspace {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.attributes.name
    }
}

impl Workspace {
    /// Check if workspace name contains the given filter (substring match)
    pub fn matches_filter(&self, filter: &str) -> bool {
        self.attributes.name.contains(filter)
    }

    /// Get resource count, defaulting to 0 if not available
    pub fn resource_count(&self) -> u32 {
        self.attributes.resource_count.unwrap_or(0)
    }

    /// Check if workspace is locked
    pub fn is_locked(&self) -> bool {
        self.attributes.locked.unwrap_or(false)
    }

    /// Get project ID if available
    pub fn project_id(&self) -> Option<&str> {
        self.relationships.project.as_ref().and_then(|r| r.id())
    }

    /// Get organization name if available (from relationships)
    pub fn organization_name(&self) -> Option<&str> {
        self.relationships.organization.as_ref().and_then(|r| r.id())
    }

    pub fn current_run_id(&self) -> Option<&str> {
        self.relationships.current_run.as_ref().and_then(|r| r.id())
    }
}
