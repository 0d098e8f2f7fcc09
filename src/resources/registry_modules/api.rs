//! Registry module API operations

use log::debug;
use reqwest::Method;

use crate::client::{validate_id, Context, List, ListOptions, Request, TfeClient};
use crate::config::api;
use crate::error::{Result, TfeError};
use crate::jsonapi::{Document, Resource};

use super::models::{
    RegistryModule, RegistryModuleCreateOptions, RegistryModuleId, RegistryModuleVersion,
    RegistryModuleVersionCreateOptions, RegistryName,
};

fn module_request(method: Method, id: &RegistryModuleId) -> Result<Request> {
    id.validate()?;
    Ok(Request::new(method)
        .segment(api::ORGANIZATIONS)
        .id("organization", &id.organization)
        .segment(api::REGISTRY_MODULES)
        .segment(id.registry_name.as_str())
        .id("namespace", id.namespace())
        .id("name", &id.name)
        .id("provider", &id.provider))
}

impl TfeClient {
    /// List one page of registry modules in an organization
    pub async fn list_registry_modules(
        &self,
        ctx: &Context,
        organization: &str,
        options: ListOptions,
    ) -> Result<List<RegistryModule>> {
        let request = Request::get()
            .segment(api::ORGANIZATIONS)
            .id("organization", organization)
            .segment(api::REGISTRY_MODULES)
            .list_options(options);
        self.list(ctx, request).await
    }

    /// Create a module in the private registry without a VCS connection
    pub async fn create_registry_module(
        &self,
        ctx: &Context,
        organization: &str,
        mut options: RegistryModuleCreateOptions,
    ) -> Result<RegistryModule> {
        validate_id("name", &options.name)?;
        validate_id("provider", &options.provider)?;
        if options.registry_name == RegistryName::Public && options.namespace.is_none() {
            return Err(TfeError::invalid(
                "namespace",
                "is required for public registry modules",
            ));
        }
        if let Some(ref namespace) = options.namespace {
            validate_id("namespace", namespace)?;
        } else {
            options.namespace = Some(organization.to_string());
        }

        debug!(
            "Creating registry module {}/{} in {}",
            options.name, options.provider, organization
        );
        let body = Document::new(Resource::<_>::new(options));
        let request = Request::post()
            .segment(api::ORGANIZATIONS)
            .id("organization", organization)
            .segment(api::REGISTRY_MODULES)
            .json_api(&body);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    pub async fn read_registry_module(
        &self,
        ctx: &Context,
        id: &RegistryModuleId,
    ) -> Result<RegistryModule> {
        let request = module_request(Method::GET, id)?;
        Ok(self.execute_document(ctx, request).await?.data)
    }

    /// Delete one provider of a module, with all its versions
    pub async fn delete_registry_module(&self, ctx: &Context, id: &RegistryModuleId) -> Result<()> {
        let request = module_request(Method::DELETE, id)?;
        self.execute_unit(ctx, request).await
    }

    /// Register a new module version awaiting upload
    pub async fn create_registry_module_version(
        &self,
        ctx: &Context,
        id: &RegistryModuleId,
        options: RegistryModuleVersionCreateOptions,
    ) -> Result<RegistryModuleVersion> {
        if options.version.is_empty() {
            return Err(TfeError::invalid("version", "is required"));
        }
        let body = Document::new(Resource::<_>::new(options));
        let request = module_request(Method::POST, id)?
            .segment("versions")
            .json_api(&body);
        Ok(self.execute_document(ctx, request).await?.data)
    }

    /// Upload a module tarball (tar.gz) to the version's upload link
    pub async fn upload_registry_module_version(
        &self,
        ctx: &Context,
        version: &RegistryModuleVersion,
        tarball: impl Into<reqwest::Body>,
    ) -> Result<()> {
        let url = version
            .upload_url()
            .ok_or_else(|| TfeError::invalid("upload_url", "module version has no upload link"))?;
        debug!("Uploading module version {}", version.attributes.version);
        let request = Request::to_url(Method::PUT, url).raw(tarball, api::OCTET_STREAM);
        self.execute_unit(ctx, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn module_json() -> serde_json::Value {
        serde_json::json!({
            "id": "mod-abc",
            "type": "registry-modules",
            "attributes": {
                "name": "vpc",
                "provider": "aws",
                "namespace": "acme",
                "registry-name": "private",
                "status": "setup_complete",
                "version-statuses": [{"version": "1.0.0", "status": "ok"}]
            }
        })
    }

    #[tokio::test]
    async fn test_create_registry_module_defaults_namespace() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/organizations/acme/registry-modules"))
            .and(body_json(serde_json::json!({
                "data": {
                    "type": "registry-modules",
                    "attributes": {
                        "name": "vpc",
                        "provider": "aws",
                        "registry-name": "private",
                        "namespace": "acme"
                    }
                }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": module_json()
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let module = client
            .create_registry_module(
                &Context::background(),
                "acme",
                RegistryModuleCreateOptions {
                    name: "vpc".into(),
                    provider: "aws".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(module.attributes.version_statuses[0].version, "1.0.0");
    }

    #[tokio::test]
    async fn test_create_public_module_requires_namespace() {
        let client = TfeClient::test_client("http://127.0.0.1:9");
        let err = client
            .create_registry_module(
                &Context::background(),
                "acme",
                RegistryModuleCreateOptions {
                    name: "vpc".into(),
                    provider: "aws".into(),
                    registry_name: RegistryName::Public,
                    namespace: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_read_and_delete_registry_module() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());
        let module_path = "/organizations/acme/registry-modules/private/acme/vpc/aws";

        Mock::given(method("GET"))
            .and(path(module_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": module_json()
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(module_path))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let ctx = Context::background();
        let id = RegistryModuleId::private("acme", "vpc", "aws");
        let module = client.read_registry_module(&ctx, &id).await.unwrap();
        assert_eq!(module.module_id("acme"), id);

        client.delete_registry_module(&ctx, &id).await.unwrap();
    }

    #[tokio::test]
    async fn test_version_create_and_upload() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());
        let upload_url = format!("{}/object/modver-1", mock_server.uri());

        Mock::given(method("POST"))
            .and(path(
                "/organizations/acme/registry-modules/private/acme/vpc/aws/versions",
            ))
            .and(body_json(serde_json::json!({
                "data": {
                    "type": "registry-module-versions",
                    "attributes": {"version": "1.2.0", "commit-sha": "abc123"}
                }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": {
                    "id": "modver-1",
                    "type": "registry-module-versions",
                    "attributes": {"version": "1.2.0", "status": "pending"},
                    "links": {"upload": upload_url}
                }
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/object/modver-1"))
            .and(header("content-type", api::OCTET_STREAM))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let ctx = Context::background();
        let id = RegistryModuleId::private("acme", "vpc", "aws");
        let version = client
            .create_registry_module_version(
                &ctx,
                &id,
                RegistryModuleVersionCreateOptions {
                    version: "1.2.0".into(),
                    commit_sha: Some("abc123".into()),
                },
            )
            .await
            .unwrap();

        client
            .upload_registry_module_version(&ctx, &version, b"tarball".to_vec())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_invalid_module_address_is_rejected() {
        let client = TfeClient::test_client("http://127.0.0.1:9");
        let id = RegistryModuleId::private("acme", "bad/name", "aws");
        let err = client
            .read_registry_module(&Context::background(), &id)
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }
}
