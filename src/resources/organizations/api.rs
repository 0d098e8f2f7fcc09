//! Organization API operations

use log::debug;

use crate::client::{Context, List, ListOptions, Request, TfeClient};
use crate::config::api;
use crate::error::{Result, TfeError};
use crate::jsonapi::{Document, Resource};

use super::models::{Organization, OrganizationCreateOptions, OrganizationUpdateOptions};

impl TfeClient {
    /// List one page of organizations accessible to the token
    pub async fn list_organizations(
        &self,
        ctx: &Context,
        options: ListOptions,
    ) -> Result<List<Organization>> {
        let request = Request::get()
            .segment(api::ORGANIZATIONS)
            .list_options(options);
        self.list(ctx, request).await
    }

    /// Get all organizations, walking every page
    pub async fn list_all_organizations(&self, ctx: &Context) -> Result<Vec<Organization>> {
        self.fetch_all_pages(ctx, || Request::get().segment(api::ORGANIZATIONS))
            .await
    }

    /// Get a single organization by name
    pub async fn read_organization(&self, ctx: &Context, name: &str) -> Result<Organization> {
        debug!("Fetching organization '{}'", name);
        let request = Request::get()
            .segment(api::ORGANIZATIONS)
            .id("organization", name);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    pub async fn create_organization(
        &self,
        ctx: &Context,
        options: OrganizationCreateOptions,
    ) -> Result<Organization> {
        if options.name.is_empty() {
            return Err(TfeError::invalid("name", "is required"));
        }
        if options.email.is_empty() {
            return Err(TfeError::invalid("email", "is required"));
        }

        let body = Document::new(Resource::<_>::new(options));
        let request = Request::post().segment(api::ORGANIZATIONS).json_api(&body);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    pub async fn update_organization(
        &self,
        ctx: &Context,
        name: &str,
        options: OrganizationUpdateOptions,
    ) -> Result<Organization> {
        if options.name.as_deref() == Some("") {
            return Err(TfeError::invalid("name", "cannot be empty"));
        }

        let body = Document::new(Resource::<_>::new(options));
        let request = Request::patch()
            .segment(api::ORGANIZATIONS)
            .id("organization", name)
            .json_api(&body);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    pub async fn delete_organization(&self, ctx: &Context, name: &str) -> Result<()> {
        debug!("Deleting organization '{}'", name);
        let request = Request::delete()
            .segment(api::ORGANIZATIONS)
            .id("organization", name);
        self.execute_unit(ctx, request).await
    }
}
