//! Workspace API operations

use log::debug;

use crate::client::{validate_id, Context, List, Request, TfeClient};
use crate::config::api;
use crate::error::{Result, TfeError};
use crate::jsonapi::{Document, Relationship, Resource, ResourceIdentifier};
use crate::resources::projects::ProjectAttributes;
use crate::resources::runs::Run;

use super::models::{
    Workspace, WorkspaceCreateOptions, WorkspaceInclude, WorkspaceListOptions,
    WorkspaceRelationships, WorkspaceUpdateOptions,
};

fn list_request(organization: &str, options: &WorkspaceListOptions) -> Request {
    let include: Vec<&str> = options.include.iter().map(|i| i.as_str()).collect();
    Request::get()
        .segment(api::ORGANIZATIONS)
        .id("organization", organization)
        .segment(api::WORKSPACES)
        .query_opt("search[name]", options.search.as_deref())
        .query_list("search[tags]", &options.tags)
        .query_opt("filter[project][id]", options.project_id.as_deref())
        .include(&include)
}

fn project_relationship(project_id: &Option<String>) -> WorkspaceRelationships {
    WorkspaceRelationships {
        project: project_id
            .as_ref()
            .map(|id| Relationship::to_one(ResourceIdentifier::of::<ProjectAttributes>(id))),
        ..Default::default()
    }
}

impl TfeClient {
    /// List one page of workspaces in an organization
    pub async fn list_workspaces(
        &self,
        ctx: &Context,
        organization: &str,
        options: &WorkspaceListOptions,
    ) -> Result<List<Workspace>> {
        let request = list_request(organization, options).list_options(options.page);
        self.list(ctx, request).await
    }

    /// Get all workspaces of an organization, walking every page
    pub async fn list_all_workspaces(
        &self,
        ctx: &Context,
        organization: &str,
        options: &WorkspaceListOptions,
    ) -> Result<Vec<Workspace>> {
        self.fetch_all_pages(ctx, || list_request(organization, options))
            .await
    }

    /// Get a workspace by organization and name
    pub async fn read_workspace(
        &self,
        ctx: &Context,
        organization: &str,
        name: &str,
    ) -> Result<Workspace> {
        debug!("Fetching workspace '{}' in '{}'", name, organization);
        let request = Request::get()
            .segment(api::ORGANIZATIONS)
            .id("organization", organization)
            .segment(api::WORKSPACES)
            .id("workspace", name);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    /// Get a workspace by ID
    pub async fn read_workspace_by_id(
        &self,
        ctx: &Context,
        workspace_id: &str,
    ) -> Result<Workspace> {
        let request = Request::get()
            .segment(api::WORKSPACES)
            .id("workspace_id", workspace_id);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    /// Get a workspace together with its current run, side-loaded in one call
    pub async fn read_workspace_with_current_run(
        &self,
        ctx: &Context,
        workspace_id: &str,
    ) -> Result<(Workspace, Option<Run>)> {
        let request = Request::get()
            .segment(api::WORKSPACES)
            .id("workspace_id", workspace_id)
            .include(&[WorkspaceInclude::CurrentRun.as_str()]);
        let document: Document<Workspace> = self.execute_document(ctx, request).await?;
        let run = document.resolve_relationship(document.data.relationships.current_run.as_ref())?;
        Ok((document.data, run))
    }

    pub async fn create_workspace(
        &self,
        ctx: &Context,
        organization: &str,
        options: WorkspaceCreateOptions,
    ) -> Result<Workspace> {
        if options.name.is_empty() {
            return Err(TfeError::invalid("name", "is required"));
        }
        if let Some(ref project_id) = options.project_id {
            validate_id("project_id", project_id)?;
        }

        let relationships = project_relationship(&options.project_id);
        let body = Document::new(Resource::new(options).with_relationships(relationships));
        let request = Request::post()
            .segment(api::ORGANIZATIONS)
            .id("organization", organization)
            .segment(api::WORKSPACES)
            .json_api(&body);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    pub async fn update_workspace(
        &self,
        ctx: &Context,
        workspace_id: &str,
        options: WorkspaceUpdateOptions,
    ) -> Result<Workspace> {
        if options.name.as_deref() == Some("") {
            return Err(TfeError::invalid("name", "cannot be empty"));
        }
        if let Some(ref project_id) = options.project_id {
            validate_id("project_id", project_id)?;
        }

        let relationships = project_relationship(&options.project_id);
        let body = Document::new(Resource::new(options).with_relationships(relationships));
        let request = Request::patch()
            .segment(api::WORKSPACES)
            .id("workspace_id", workspace_id)
            .json_api(&body);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    pub async fn delete_workspace(&self, ctx: &Context, workspace_id: &str) -> Result<()> {
        debug!("Deleting workspace: {}", workspace_id);
        let request = Request::delete()
            .segment(api::WORKSPACES)
            .id("workspace_id", workspace_id);
        self.execute_unit(ctx, request).await
    }

    /// Lock a workspace to prevent concurrent modifications
    ///
    /// A workspace that is already locked yields a `Conflict` error.
    pub async fn lock_workspace(
        &self,
        ctx: &Context,
        workspace_id: &str,
        reason: Option<&str>,
    ) -> Result<Workspace> {
        debug!("Locking workspace: {}", workspace_id);
        let mut request = Request::post()
            .segment(api::WORKSPACES)
            .id("workspace_id", workspace_id)
            .segment("actions/lock");
        if let Some(reason) = reason {
            request = request.json_api(&serde_json::json!({ "reason": reason }));
        }
        Ok(self.execute_document(ctx, request).await?.data)
    }

    /// Unlock a workspace locked by the current token
    pub async fn unlock_workspace(&self, ctx: &Context, workspace_id: &str) -> Result<Workspace> {
        debug!("Unlocking workspace: {}", workspace_id);
        let request = Request::post()
            .segment(api::WORKSPACES)
            .id("workspace_id", workspace_id)
            .segment("actions/unlock");
        Ok(self.execute_document(ctx, request).await?.data)
    }

    /// Unlock a workspace regardless of who holds the lock
    pub async fn force_unlock_workspace(
        &self,
        ctx: &Context,
        workspace_id: &str,
    ) -> Result<Workspace> {
        debug!("Force-unlocking workspace: {}", workspace_id);
        let request = Request::post()
            .segment(api::WORKSPACES)
            .id("workspace_id", workspace_id)
            .segment("actions/force-unlock");
        Ok(self.execute_document(ctx, request).await?.data)
    }
}
