//! Configuration versions API operations

use log::debug;
use reqwest::Method;

use crate::client::{Context, List, ListOptions, Request, TfeClient};
use crate::config::api;
use crate::error::{Result, TfeError};
use crate::jsonapi::{Document, Resource};

use super::models::{ConfigurationVersion, ConfigurationVersionCreateOptions};

impl TfeClient {
    /// List one page of configuration versions for a workspace
    pub async fn list_configuration_versions(
        &self,
        ctx: &Context,
        workspace_id: &str,
        options: ListOptions,
    ) -> Result<List<ConfigurationVersion>> {
        let request = Request::get()
            .segment(api::WORKSPACES)
            .id("workspace_id", workspace_id)
            .segment(api::CONFIGURATION_VERSIONS)
            .list_options(options);
        self.list(ctx, request).await
    }

    /// Get a single configuration version by ID
    pub async fn read_configuration_version(
        &self,
        ctx: &Context,
        cv_id: &str,
    ) -> Result<ConfigurationVersion> {
        let request = Request::get()
            .segment(api::CONFIGURATION_VERSIONS)
            .id("configuration_version_id", cv_id);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    /// Create a configuration version awaiting upload
    pub async fn create_configuration_version(
        &self,
        ctx: &Context,
        workspace_id: &str,
        options: ConfigurationVersionCreateOptions,
    ) -> Result<ConfigurationVersion> {
        let body = Document::new(Resource::<_>::new(options));
        let request = Request::post()
            .segment(api::WORKSPACES)
            .id("workspace_id", workspace_id)
            .segment(api::CONFIGURATION_VERSIONS)
            .json_api(&body);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    /// Upload a configuration tarball (tar.gz) to the version's pre-signed URL
    pub async fn upload_configuration_version(
        &self,
        ctx: &Context,
        cv: &ConfigurationVersion,
        tarball: impl Into<reqwest::Body>,
    ) -> Result<()> {
        let url = cv.upload_url().ok_or_else(|| {
            TfeError::invalid("upload_url", "configuration version has no upload URL")
        })?;
        debug!("Uploading configuration for {}", cv.id);
        let request = Request::to_url(Method::PUT, url).raw(tarball, api::OCTET_STREAM);
        self.execute_unit(ctx, request).await
    }

    /// Download configuration files as tar.gz
    ///
    /// The /download endpoint redirects to the actual file. A version with
    /// no uploaded content is reported as `InvalidInput`.
    pub async fn download_configuration_version(
        &self,
        ctx: &Context,
        cv_id: &str,
    ) -> Result<Vec<u8>> {
        let request = Request::get()
            .segment(api::CONFIGURATION_VERSIONS)
            .id("configuration_version_id", cv_id)
            .segment("download");
        let response = self.execute(ctx, request).await?;

        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Err(TfeError::invalid(
                "configuration_version_id",
                format!(
                    "configuration version '{}' has no downloadable content",
                    cv_id
                ),
            ));
        }

        debug!("Downloaded {} bytes for {}", response.body().len(), cv_id);
        Ok(response.into_body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cv_json(id: &str, upload_url: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "type": "configuration-versions",
            "attributes": {"status": "pending", "source": "tfe-api", "upload-url": upload_url}
        })
    }

    #[tokio::test]
    async fn test_create_then_upload() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());
        let upload_url = format!("{}/object/upload-token", mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/workspaces/ws-1/configuration-versions"))
            .and(body_json(serde_json::json!({
                "data": {"type": "configuration-versions", "attributes": {"auto-queue-runs": false}}
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({"data": cv_json("cv-1", &upload_url)})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/object/upload-token"))
            .and(header("content-type", "application/octet-stream"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let ctx = Context::background();
        let cv = client
            .create_configuration_version(
                &ctx,
                "ws-1",
                ConfigurationVersionCreateOptions {
                    auto_queue_runs: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        client
            .upload_configuration_version(&ctx, &cv, vec![0x1f, 0x8b, 0x08, 0x00])
            .await
            .unwrap();

        let received = mock_server.received_requests().await.unwrap();
        let upload = received.iter().find(|r| r.method.as_str() == "PUT").unwrap();
        assert_eq!(upload.body, vec![0x1f, 0x8b, 0x08, 0x00]);
    }

    #[tokio::test]
    async fn test_upload_without_url() {
        let client = TfeClient::test_client("http://127.0.0.1:9");
        let cv = ConfigurationVersion::new(Default::default()).with_id("cv-1");
        let err = client
            .upload_configuration_version(&Context::background(), &cv, Vec::<u8>::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_list_and_read() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/workspaces/ws-1/configuration-versions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [cv_json("cv-1", "https://a/1"), cv_json("cv-2", "https://a/2")]
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/configuration-versions/cv-2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": cv_json("cv-2", "https://a/2")})),
            )
            .mount(&mock_server)
            .await;

        let ctx = Context::background();
        let list = client
            .list_configuration_versions(&ctx, "ws-1", ListOptions::default())
            .await
            .unwrap();
        assert_eq!(list.len(), 2);
        let cv = client.read_configuration_version(&ctx, "cv-2").await.unwrap();
        assert_eq!(cv.attributes.source.as_deref(), Some("tfe-api"));
    }

    #[tokio::test]
    async fn test_download() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/configuration-versions/cv-1/download"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/configuration-versions/cv-empty/download"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let ctx = Context::background();
        assert_eq!(
            client.download_configuration_version(&ctx, "cv-1").await.unwrap(),
            vec![1u8, 2, 3]
        );
        let err = client
            .download_configuration_version(&ctx, "cv-empty")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
