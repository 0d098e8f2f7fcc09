//! Plan API operations

use log::debug;
use reqwest::Method;

use crate::client::{Context, Request, TfeClient};
use crate::config::api;
use crate::error::{Result, TfeError};

use super::models::Plan;

impl TfeClient {
    pub async fn read_plan(&self, ctx: &Context, plan_id: &str) -> Result<Plan> {
        let request = Request::get().segment(api::PLANS).id("plan_id", plan_id);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    /// Download the JSON execution plan
    ///
    /// The API answers with a redirect to a temporary archive URL, which the
    /// transport follows. The body is returned as-is.
    pub async fn read_plan_json_output(&self, ctx: &Context, plan_id: &str) -> Result<Vec<u8>> {
        let request = Request::get()
            .segment(api::PLANS)
            .id("plan_id", plan_id)
            .segment("json-output");
        let response = self.execute(ctx, request).await?;
        debug!("Plan {} JSON output: {} bytes", plan_id, response.body().len());
        Ok(response.into_body())
    }

    /// Fetch the plan log from its `log-read-url`
    ///
    /// The URL is pre-authenticated and expires shortly after the plan is read.
    pub async fn read_plan_log(&self, ctx: &Context, plan: &Plan) -> Result<String> {
        let url = plan
            .attributes
            .log_read_url
            .as_deref()
            .ok_or_else(|| TfeError::invalid("log_read_url", "plan has no log URL"))?;
        debug!("Fetching log content from: {}", url);
        let response = self.execute(ctx, Request::to_url(Method::GET, url)).await?;
        Ok(String::from_utf8_lossy(response.body()).into_owned())
    }
}
