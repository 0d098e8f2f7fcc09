//! State version API operations

use log::debug;
use reqwest::Method;

use crate::client::{validate_id, Context, List, Request, TfeClient};
use crate::config::api;
use crate::error::{Result, TfeError};
use crate::jsonapi::{Document, Relationship, Resource, ResourceIdentifier};
use crate::resources::runs::RunAttributes;

use super::models::{
    StateVersion, StateVersionCreateOptions, StateVersionListOptions, StateVersionRelationships,
    StateVersionUpload,
};

impl TfeClient {
    /// List one page of state versions for a workspace
    pub async fn list_state_versions(
        &self,
        ctx: &Context,
        options: &StateVersionListOptions,
    ) -> Result<List<StateVersion>> {
        validate_id("organization", &options.organization)?;
        validate_id("workspace", &options.workspace)?;

        let request = Request::get()
            .segment(api::STATE_VERSIONS)
            .query("filter[workspace][name]", options.workspace.as_str())
            .query("filter[organization][name]", options.organization.as_str())
            .list_options(options.page);
        self.list(ctx, request).await
    }

    pub async fn read_state_version(&self, ctx: &Context, sv_id: &str) -> Result<StateVersion> {
        let request = Request::get()
            .segment(api::STATE_VERSIONS)
            .id("state_version_id", sv_id);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    /// Get the current state version of a workspace
    ///
    /// A workspace without state yields `NotFound`.
    pub async fn current_state_version(
        &self,
        ctx: &Context,
        workspace_id: &str,
    ) -> Result<StateVersion> {
        debug!("Fetching current state version for: {}", workspace_id);
        let request = Request::get()
            .segment(api::WORKSPACES)
            .id("workspace_id", workspace_id)
            .segment("current-state-version");
        Ok(self.execute_document(ctx, request).await?.data)
    }

    /// Upload a new state version to a workspace
    ///
    /// The workspace must be locked by the caller. The state is sent
    /// base64-encoded along with its MD5 digest.
    pub async fn create_state_version(
        &self,
        ctx: &Context,
        workspace_id: &str,
        options: StateVersionCreateOptions,
    ) -> Result<StateVersion> {
        if options.state.is_empty() {
            return Err(TfeError::invalid("state", "is required"));
        }
        if let Some(ref run_id) = options.run_id {
            validate_id("run_id", run_id)?;
        }

        debug!(
            "Uploading state version (serial: {}) for: {}",
            options.serial, workspace_id
        );

        let relationships = StateVersionRelationships {
            run: options
                .run_id
                .as_ref()
                .map(|id| Relationship::to_one(ResourceIdentifier::of::<RunAttributes>(id))),
            ..Default::default()
        };
        let upload = StateVersionUpload::from_options(&options);
        let body = Document::new(Resource::new(upload).with_relationships(relationships));
        let request = Request::post()
            .segment(api::WORKSPACES)
            .id("workspace_id", workspace_id)
            .segment(api::STATE_VERSIONS)
            .json_api(&body);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    /// Download the raw state file of a state version
    pub async fn download_state_version(
        &self,
        ctx: &Context,
        sv: &StateVersion,
    ) -> Result<Vec<u8>> {
        let url = sv.download_url().ok_or_else(|| {
            TfeError::invalid("download_url", "state version has no download URL")
        })?;
        debug!("Downloading state from: {}", url);
        let response = self.execute(ctx, Request::to_url(Method::GET, url)).await?;
        Ok(response.into_body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sv_json(id: &str, serial: u64, download: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "type": "state-versions",
            "attributes": {
                "serial": serial,
                "lineage": "abc-123",
                "hosted-state-download-url": download
            }
        })
    }

    #[tokio::test]
    async fn test_list_state_versions() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/state-versions"))
            .and(query_param("filter[workspace][name]", "prod"))
            .and(query_param("filter[organization][name]", "acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [sv_json("sv-2", 2, "https://a/2"), sv_json("sv-1", 1, "https://a/1")]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let options = StateVersionListOptions {
            organization: "acme".into(),
            workspace: "prod".into(),
            ..Default::default()
        };
        let list = client
            .list_state_versions(&Context::background(), &options)
            .await
            .unwrap();
        assert_eq!(list.items[0].attributes.serial, 2);
    }

    #[tokio::test]
    async fn test_list_state_versions_requires_filters() {
        let client = TfeClient::test_client("http://127.0.0.1:9");
        let err = client
            .list_state_versions(&Context::background(), &StateVersionListOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("organization"));
    }

    #[tokio::test]
    async fn test_current_state_version_not_found() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/workspaces/ws-empty/current-state-version"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = client
            .current_state_version(&Context::background(), "ws-empty")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_state_version() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/workspaces/ws-1/state-versions"))
            .and(body_partial_json(serde_json::json!({
                "data": {
                    "type": "state-versions",
                    "attributes": {
                        "serial": 11,
                        "md5": "d751713988987e9331980363e24189ce",
                        "state": "W10=",
                        "lineage": "abc-123"
                    },
                    "relationships": {"run": {"data": {"type": "runs", "id": "run-1"}}}
                }
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({"data": sv_json("sv-new", 11, "https://a/n")})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let sv = client
            .create_state_version(
                &Context::background(),
                "ws-1",
                StateVersionCreateOptions {
                    serial: 11,
                    lineage: Some("abc-123".into()),
                    state: b"[]".to_vec(),
                    run_id: Some("run-1".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(sv.id, "sv-new");
    }

    #[tokio::test]
    async fn test_create_state_version_conflict() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/workspaces/ws-1/state-versions"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&mock_server)
            .await;

        let err = client
            .create_state_version(
                &Context::background(),
                "ws-1",
                StateVersionCreateOptions {
                    serial: 1,
                    state: b"{}".to_vec(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_download_state_version() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());
        let url = format!("{}/archivist/state-1", mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/archivist/state-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"version":4,"serial":3}"#))
            .mount(&mock_server)
            .await;

        let sv: StateVersion = serde_json::from_value(sv_json("sv-1", 3, &url)).unwrap();
        let body = client
            .download_state_version(&Context::background(), &sv)
            .await
            .unwrap();
        let state: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(state["serial"], 3);
    }
}
