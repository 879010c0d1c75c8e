use std::future::Future;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use siteferry_manifest::UploadItem;

use crate::error::{Error, Result};
use crate::types::{DeploymentRecord, ProjectRecord};

/// Hosting-platform deployment API, abstracted to the minimal surface
/// the pipeline engines need.
///
/// Implementations own their transport concerns (base URL, auth
/// headers, TLS) and their own error mapping. Engines in this crate
/// are generic over this trait; tests drive them with an in-memory
/// mock.
pub trait PagesApi: Send + Sync {
    /// Fetch a project record. Its `canonical_deployment` id is the
    /// authoritative production id for deletion protection.
    fn get_project(&self, project: &str) -> impl Future<Output = Result<ProjectRecord>> + Send;

    /// Exchange the account credential for a short-lived upload token
    /// scoped to one project.
    fn upload_token(&self, project: &str) -> impl Future<Output = Result<String>> + Send;

    /// Push a batch of content-addressed assets under the upload token.
    fn upload_assets(
        &self,
        token: &str,
        batch: &[UploadItem],
    ) -> impl Future<Output = Result<()>> + Send;

    /// Submit a manifest to create a deployment.
    fn create_deployment(
        &self,
        project: &str,
        manifest_json: String,
    ) -> impl Future<Output = Result<DeploymentRecord>> + Send;

    /// One page of deployment history, in the order the platform
    /// returns it. An empty page means the history is exhausted.
    fn list_deployments(
        &self,
        project: &str,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<Vec<DeploymentRecord>>> + Send;

    /// Delete a single deployment by id.
    fn delete_deployment(&self, project: &str, id: &str)
    -> impl Future<Output = Result<()>> + Send;
}

/// Response envelope the platform wraps every payload in.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct UploadToken {
    jwt: String,
}

/// Production implementation backed by `reqwest`.
pub struct HttpPagesApi {
    client: reqwest::Client,
    base_url: String,
    account_id: String,
    token: String,
}

impl HttpPagesApi {
    pub fn new(
        base_url: impl Into<String>,
        account_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.into();
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_owned(),
            account_id: account_id.into(),
            token: token.into(),
        })
    }

    fn projects_url(&self) -> String {
        format!(
            "{}/accounts/{}/pages/projects",
            self.base_url, self.account_id
        )
    }

    fn project_url(&self, project: &str) -> String {
        format!("{}/{}", self.projects_url(), project)
    }

    async fn checked(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(Error::Upstream { status, body })
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = Self::checked(response).await?;
        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.result)
    }

    // Routine pass-through calls the admin routes forward verbatim.

    pub async fn list_projects(&self) -> Result<Vec<serde_json::Value>> {
        let response = self
            .client
            .get(self.projects_url())
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn create_project(&self, name: &str) -> Result<serde_json::Value> {
        let body = serde_json::json!({ "name": name, "production_branch": "main" });
        let response = self
            .client
            .post(self.projects_url())
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn patch_project(
        &self,
        project: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let response = self
            .client
            .patch(self.project_url(project))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Ask the platform to rebuild and redeploy the current production
    /// deployment (no archive involved).
    pub async fn trigger_deployment(&self, project: &str) -> Result<serde_json::Value> {
        let url = format!("{}/deployments", self.project_url(project));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn list_domains(&self, project: &str) -> Result<serde_json::Value> {
        let url = format!("{}/domains", self.project_url(project));
        let response = self.client.get(url).bearer_auth(&self.token).send().await?;
        Self::parse(response).await
    }

    pub async fn add_domain(&self, project: &str, domain: &str) -> Result<serde_json::Value> {
        let url = format!("{}/domains", self.project_url(project));
        let body = serde_json::json!({ "name": domain });
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn delete_domain(&self, project: &str, domain: &str) -> Result<()> {
        let url = format!("{}/domains/{}", self.project_url(project), domain);
        let response = self
            .client
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }
}

impl PagesApi for HttpPagesApi {
    async fn get_project(&self, project: &str) -> Result<ProjectRecord> {
        let response = self
            .client
            .get(self.project_url(project))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn upload_token(&self, project: &str) -> Result<String> {
        let url = format!("{}/upload-token", self.project_url(project));
        let response = self.client.get(url).bearer_auth(&self.token).send().await?;
        match Self::parse::<UploadToken>(response).await {
            Ok(token) => Ok(token.jwt),
            // An unknown project or a token without the pages scope
            // surfaces here, before anything is uploaded.
            Err(Error::Upstream { body, .. }) => Err(Error::Credential {
                project: project.to_owned(),
                detail: body,
            }),
            Err(err) => Err(err),
        }
    }

    async fn upload_assets(&self, token: &str, batch: &[UploadItem]) -> Result<()> {
        let url = format!("{}/pages/assets/upload", self.base_url);
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(batch)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    async fn create_deployment(
        &self,
        project: &str,
        manifest_json: String,
    ) -> Result<DeploymentRecord> {
        let url = format!("{}/deployments", self.project_url(project));
        let form = reqwest::multipart::Form::new().text("manifest", manifest_json);
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn list_deployments(
        &self,
        project: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<DeploymentRecord>> {
        let url = format!("{}/deployments", self.project_url(project));
        let response = self
            .client
            .get(url)
            .query(&[("page", page), ("per_page", per_page)])
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn delete_deployment(&self, project: &str, id: &str) -> Result<()> {
        let url = format!("{}/deployments/{}", self.project_url(project), id);
        let response = self
            .client
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_on_base_url_is_trimmed() {
        let api = HttpPagesApi::new("https://api.example/client/v4/", "acct-1", "tok").unwrap();
        assert_eq!(
            api.project_url("my-site"),
            "https://api.example/client/v4/accounts/acct-1/pages/projects/my-site"
        );
    }

    #[test]
    fn envelope_unwraps_result() {
        let envelope: Envelope<Vec<String>> =
            serde_json::from_str(r#"{"success":true,"result":["a","b"]}"#).unwrap();
        assert_eq!(envelope.result, vec!["a", "b"]);
    }

    #[test]
    fn upload_token_payload_shape() {
        let envelope: Envelope<UploadToken> =
            serde_json::from_str(r#"{"result":{"jwt":"header.body.sig"}}"#).unwrap();
        assert_eq!(envelope.result.jwt, "header.body.sig");
    }
}
