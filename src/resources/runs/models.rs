//! Run data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ListOptions;
use crate::jsonapi::{JsonApiType, Relationship, Resource};

pub type Run = Resource<RunAttributes, RunRelationships>;

/// Run lifecycle status
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Fetching,
    FetchingCompleted,
    PrePlanRunning,
    PrePlanCompleted,
    Queuing,
    PlanQueued,
    Planning,
    Planned,
    CostEstimating,
    CostEstimated,
    PolicyChecking,
    PolicyOverride,
    PolicySoftFailed,
    PolicyChecked,
    Confirmed,
    PostPlanRunning,
    PostPlanCompleted,
    PlannedAndFinished,
    PlannedAndSaved,
    ApplyQueued,
    Applying,
    Applied,
    Discarded,
    Errored,
    Canceled,
    ForceCanceled,
    /// Status introduced by a newer server
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Fetching => "fetching",
            RunStatus::FetchingCompleted => "fetching_completed",
            RunStatus::PrePlanRunning => "pre_plan_running",
            RunStatus::PrePlanCompleted => "pre_plan_completed",
            RunStatus::Queuing => "queuing",
            RunStatus::PlanQueued => "plan_queued",
            RunStatus::Planning => "planning",
            RunStatus::Planned => "planned",
            RunStatus::CostEstimating => "cost_estimating",
            RunStatus::CostEstimated => "cost_estimated",
            RunStatus::PolicyChecking => "policy_checking",
            RunStatus::PolicyOverride => "policy_override",
            RunStatus::PolicySoftFailed => "policy_soft_failed",
            RunStatus::PolicyChecked => "policy_checked",
            RunStatus::Confirmed => "confirmed",
            RunStatus::PostPlanRunning => "post_plan_running",
            RunStatus::PostPlanCompleted => "post_plan_completed",
            RunStatus::PlannedAndFinished => "planned_and_finished",
            RunStatus::PlannedAndSaved => "planned_and_saved",
            RunStatus::ApplyQueued => "apply_queued",
            RunStatus::Applying => "applying",
            RunStatus::Applied => "applied",
            RunStatus::Discarded => "discarded",
            RunStatus::Errored => "errored",
            RunStatus::Canceled => "canceled",
            RunStatus::ForceCanceled => "force_canceled",
            RunStatus::Unknown => "unknown",
        }
    }

    /// Whether the run has stopped and will not change again
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            RunStatus::Applied
                | RunStatus::Discarded
                | RunStatus::Errored
                | RunStatus::Canceled
                | RunStatus::ForceCanceled
                | RunStatus::PlannedAndFinished
                | RunStatus::PlannedAndSaved
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run attributes from TFE API
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct RunAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RunStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_changes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_destroy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_apply: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<RunActions>,
}

impl JsonApiType for RunAttributes {
    const TYPE: &'static str = "runs";
}

/// Run action flags
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct RunActions {
    #[serde(default)]
    pub is_cancelable: bool,
    #[serde(default)]
    pub is_confirmable: bool,
    #[serde(default)]
    pub is_discardable: bool,
    #[serde(default)]
    pub is_force_cancelable: bool,
}

/// Run relationships from TFE API
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct RunRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_version: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply: Option<Relationship>,
}

/// Related resources that can be side-loaded with a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunInclude {
    Plan,
    Apply,
    CreatedBy,
    ConfigurationVersion,
    Workspace,
}

impl RunInclude {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunInclude::Plan => "plan",
            RunInclude::Apply => "apply",
            RunInclude::CreatedBy => "created_by",
            RunInclude::ConfigurationVersion => "configuration_version",
            RunInclude::Workspace => "workspace",
        }
    }
}

/// Query options for listing runs of a workspace
#[derive(Debug, Clone, Default)]
pub struct RunListOptions {
    pub page: ListOptions,
    /// Filter by specific statuses (comma-separated in API)
    pub statuses: Vec<RunStatus>,
    /// Filter by operation: "plan_only", "plan_and_apply", "destroy", ...
    pub operations: Vec<String>,
    pub include: Vec<RunInclude>,
}

/// Attributes accepted when queuing a run
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RunCreateOptions {
    /// Sent as the `workspace` relationship
    #[serde(skip)]
    pub workspace_id: String,
    /// Sent as the `configuration-version` relationship
    #[serde(skip)]
    pub configuration_version_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_destroy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_apply: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_only: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_addrs: Vec<String>,
}

impl JsonApiType for RunCreateOptions {
    const TYPE: &'static str = "runs";
}

impl Run {
    pub fn status(&self) -> RunStatus {
        self.attributes.status.unwrap_or(RunStatus::Unknown)
    }

    pub fn workspace_id(&self) -> Option<&str> {
        self.relationships.workspace.as_ref().and_then(|r| r.id())
    }

    pub fn plan_id(&self) -> Option<&str> {
        self.relationships.plan.as_ref().and_then(|r| r.id())
    }

    pub fn apply_id(&self) -> Option<&str> {
        self.relationships.apply.as_ref().and_then(|r| r.id())
    }

    pub fn is_cancelable(&self) -> bool {
        self.attributes
            .actions
            .as_ref()
            .is_some_and(|a| a.is_cancelable)
    }

    pub fn is_discardable(&self) -> bool {
        self.attributes
            .actions
            .as_ref()
            .is_some_and(|a| a.is_discardable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_deserialization() {
        let run: Run = serde_json::from_value(serde_json::json!({
            "id": "run-abc",
            "type": "runs",
            "attributes": {
                "status": "planned",
                "message": "Triggered via API",
                "created-at": "2025-02-02T12:00:00Z",
                "has-changes": true,
                "actions": {"is-cancelable": false, "is-discardable": true}
            },
            "relationships": {
                "workspace": {"data": {"id": "ws-1", "type": "workspaces"}},
                "plan": {"data": {"id": "plan-1", "type": "plans"}}
            }
        }))
        .unwrap();

        assert_eq!(run.status(), RunStatus::Planned);
        assert!(!run.status().is_final());
        assert!(run.is_discardable());
        assert!(!run.is_cancelable());
        assert_eq!(run.workspace_id(), Some("ws-1"));
        assert_eq!(run.plan_id(), Some("plan-1"));
        assert_eq!(run.apply_id(), None);
    }

    #[test]
    fn test_unknown_status_tolerated() {
        let run: Run = serde_json::from_value(serde_json::json!({
            "id": "run-x",
            "type": "runs",
            "attributes": {"status": "brand_new_state"}
        }))
        .unwrap();
        assert_eq!(run.status(), RunStatus::Unknown);
    }

    #[test]
    fn test_status_display_matches_wire() {
        for status in [RunStatus::PlanQueued, RunStatus::ForceCanceled, RunStatus::Applied] {
            let wire = serde_json::to_value(status).unwrap();
            assert_eq!(wire, serde_json::json!(status.to_string()));
        }
        assert!(RunStatus::Applied.is_final());
        assert!(!RunStatus::Applying.is_final());
    }
}
