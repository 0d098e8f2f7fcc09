//! Plan data models

use serde::{Deserialize, Serialize};

use crate::jsonapi::{JsonApiType, Resource};

pub type Plan = Resource<PlanAttributes>;

/// Plan attributes from TFE API
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct PlanAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_changes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_additions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_changes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_destructions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_imports: Option<u32>,
    /// Temporary pre-authenticated URL for the plan log
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_read_url: Option<String>,
}

impl JsonApiType for PlanAttributes {
    const TYPE: &'static str = "plans";
}

impl Plan {
    /// Total resources touched by the plan
    pub fn total_changes(&self) -> u32 {
        let a = &self.attributes;
        a.resource_additions.unwrap_or(0)
            + a.resource_changes.unwrap_or(0)
            + a.resource_destructions.unwrap_or(0)
    }
}
