//! Run API operations

use log::debug;

use crate::client::{validate_id, Context, List, Request, TfeClient};
use crate::config::api;
use crate::error::Result;
use crate::jsonapi::{Document, Relationship, Resource, ResourceIdentifier};
use crate::resources::configuration_versions::ConfigurationVersionAttributes;
use crate::resources::plans::Plan;
use crate::resources::workspaces::WorkspaceAttributes;

use super::models::{Run, RunCreateOptions, RunInclude, RunListOptions, RunRelationships};

/// POST /runs/:run_id/actions/:action with an optional comment body
fn action_request(run_id: &str, action: &str, comment: Option<&str>) -> Request {
    let request = Request::post()
        .segment(api::RUNS)
        .id("run_id", run_id)
        .segment("actions")
        .segment(action);
    match comment {
        Some(comment) => request.json_api(&serde_json::json!({ "comment": comment })),
        None => request,
    }
}

impl TfeClient {
    /// List one page of runs for a workspace, newest first
    pub async fn list_runs(
        &self,
        ctx: &Context,
        workspace_id: &str,
        options: &RunListOptions,
    ) -> Result<List<Run>> {
        let statuses: Vec<&str> = options.statuses.iter().map(|s| s.as_str()).collect();
        let include: Vec<&str> = options.include.iter().map(|i| i.as_str()).collect();
        let request = Request::get()
            .segment(api::WORKSPACES)
            .id("workspace_id", workspace_id)
            .segment(api::RUNS)
            .query_list("filter[status]", &statuses)
            .query_list("filter[operation]", &options.operations)
            .include(&include)
            .list_options(options.page);
        self.list(ctx, request).await
    }

    pub async fn read_run(&self, ctx: &Context, run_id: &str) -> Result<Run> {
        let request = Request::get().segment(api::RUNS).id("run_id", run_id);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    /// Get a run with its plan side-loaded in the same response
    pub async fn read_run_with_plan(
        &self,
        ctx: &Context,
        run_id: &str,
    ) -> Result<(Run, Option<Plan>)> {
        let request = Request::get()
            .segment(api::RUNS)
            .id("run_id", run_id)
            .include(&[RunInclude::Plan.as_str()]);
        let document: Document<Run> = self.execute_document(ctx, request).await?;
        let plan = document.resolve_relationship(document.data.relationships.plan.as_ref())?;
        Ok((document.data, plan))
    }

    /// Queue a new run in a workspace
    pub async fn create_run(&self, ctx: &Context, options: RunCreateOptions) -> Result<Run> {
        validate_id("workspace_id", &options.workspace_id)?;
        if let Some(ref cv_id) = options.configuration_version_id {
            validate_id("configuration_version_id", cv_id)?;
        }

        let relationships = RunRelationships {
            workspace: Some(Relationship::to_one(
                ResourceIdentifier::of::<WorkspaceAttributes>(&options.workspace_id),
            )),
            configuration_version: options.configuration_version_id.as_ref().map(|id| {
                Relationship::to_one(ResourceIdentifier::of::<ConfigurationVersionAttributes>(
                    id,
                ))
            }),
            ..Default::default()
        };

        debug!("Creating run in workspace {}", options.workspace_id);
        let body = Document::new(Resource::new(options).with_relationships(relationships));
        let request = Request::post().segment(api::RUNS).json_api(&body);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    /// Confirm a run that is waiting for approval
    pub async fn apply_run(
        &self,
        ctx: &Context,
        run_id: &str,
        comment: Option<&str>,
    ) -> Result<()> {
        debug!("Applying run: {}", run_id);
        self.execute_unit(ctx, action_request(run_id, "apply", comment))
            .await
    }

    /// Cancel a run that is actively executing (planning or applying)
    ///
    /// The run must have is-cancelable: true in its actions.
    pub async fn cancel_run(
        &self,
        ctx: &Context,
        run_id: &str,
        comment: Option<&str>,
    ) -> Result<()> {
        debug!("Canceling run: {}", run_id);
        self.execute_unit(ctx, action_request(run_id, "cancel", comment))
            .await
    }

    /// Force-cancel a run after a regular cancel did not stop it
    pub async fn force_cancel_run(
        &self,
        ctx: &Context,
        run_id: &str,
        comment: Option<&str>,
    ) -> Result<()> {
        debug!("Force-canceling run: {}", run_id);
        self.execute_unit(ctx, action_request(run_id, "force-cancel", comment))
            .await
    }

    /// Discard a run that is waiting for confirmation or priority
    ///
    /// The run must have is-discardable: true in its actions.
    pub async fn discard_run(
        &self,
        ctx: &Context,
        run_id: &str,
        comment: Option<&str>,
    ) -> Result<()> {
        debug!("Discarding run: {}", run_id);
        self.execute_unit(ctx, action_request(run_id, "discard", comment))
            .await
    }
}
