//! Project API operations

use log::debug;

use crate::client::{Context, List, Request, TfeClient};
use crate::config::api;
use crate::error::{Result, TfeError};
use crate::jsonapi::{Document, Resource};
use crate::resources::traits::TfeResource;

use super::models::{Project, ProjectCreateOptions, ProjectListOptions, ProjectUpdateOptions};

fn list_request(organization: &str, options: &ProjectListOptions) -> Request {
    Request::get()
        .segment(api::ORGANIZATIONS)
        .id("organization", organization)
        .segment(api::PROJECTS)
        .query_opt("q", options.search.as_deref())
        .query_list("filter[names]", &options.names)
}

impl TfeClient {
    /// List one page of projects in an organization
    ///
    /// `search` uses the API's `q=` parameter for case-insensitive
    /// server-side filtering.
    pub async fn list_projects(
        &self,
        ctx: &Context,
        organization: &str,
        options: &ProjectListOptions,
    ) -> Result<List<Project>> {
        let request = list_request(organization, options).list_options(options.page);
        self.list(ctx, request).await
    }

    /// Get all projects of an organization, walking every page
    pub async fn list_all_projects(
        &self,
        ctx: &Context,
        organization: &str,
        options: &ProjectListOptions,
    ) -> Result<Vec<Project>> {
        self.fetch_all_pages(ctx, || list_request(organization, options))
            .await
    }

    pub async fn read_project(&self, ctx: &Context, project_id: &str) -> Result<Project> {
        debug!("Fetching project '{}'", project_id);
        let request = Request::get()
            .segment(api::PROJECTS)
            .id("project_id", project_id);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    /// Get a project by exact name within an organization
    pub async fn read_project_by_name(
        &self,
        ctx: &Context,
        organization: &str,
        name: &str,
    ) -> Result<Project> {
        if name.is_empty() {
            return Err(TfeError::invalid("name", "is required"));
        }
        let options = ProjectListOptions {
            names: vec![name.to_string()],
            ..Default::default()
        };
        let projects = self.list_all_projects(ctx, organization, &options).await?;
        projects
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| {
                TfeError::NotFound(format!(
                    "project '{}' in organization '{}'",
                    name, organization
                ))
            })
    }

    pub async fn create_project(
        &self,
        ctx: &Context,
        organization: &str,
        options: ProjectCreateOptions,
    ) -> Result<Project> {
        if options.name.trim().is_empty() {
            return Err(TfeError::invalid("name", "is required"));
        }

        let body = Document::new(Resource::<_>::new(options));
        let request = Request::post()
            .segment(api::ORGANIZATIONS)
            .id("organization", organization)
            .segment(api::PROJECTS)
            .json_api(&body);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    pub async fn update_project(
        &self,
        ctx: &Context,
        project_id: &str,
        options: ProjectUpdateOptions,
    ) -> Result<Project> {
        if options.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(TfeError::invalid("name", "must not be blank"));
        }

        let body = Document::new(Resource::<_>::new(options));
        let request = Request::patch()
            .segment(api::PROJECTS)
            .id("project_id", project_id)
            .json_api(&body);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    pub async fn delete_project(&self, ctx: &Context, project_id: &str) -> Result<()> {
        let request = Request::delete()
            .segment(api::PROJECTS)
            .id("project_id", project_id);
        self.execute_unit(ctx, request).await
    }
}
