//! In-memory [`PagesApi`] used by the engine tests.

use std::collections::HashSet;
use std::sync::Mutex;

use siteferry_manifest::UploadItem;

use crate::client::PagesApi;
use crate::error::{Error, Result};
use crate::types::{DeploymentRecord, DeploymentRef, ProjectRecord};

pub(crate) fn record(id: &str) -> DeploymentRecord {
    DeploymentRecord {
        id: id.into(),
        status: None,
        created_on: None,
        url: None,
        extra: serde_json::Map::new(),
    }
}

fn upstream(body: &str) -> Error {
    Error::Upstream {
        status: 500,
        body: body.into(),
    }
}

#[derive(Default)]
pub(crate) struct MockApi {
    pub production_id: Option<String>,
    /// History pages, 1-indexed by position; pages past the end are
    /// empty unless `endless_pages` is set.
    pub pages: Vec<Vec<DeploymentRecord>>,
    pub endless_pages: bool,
    pub fail_project: bool,
    pub fail_page: Option<u32>,
    pub fail_token: bool,
    pub fail_assets: bool,
    pub fail_manifest: bool,
    pub failing_deletes: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

impl MockApi {
    fn log(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

impl PagesApi for MockApi {
    async fn get_project(&self, project: &str) -> Result<ProjectRecord> {
        self.log("get_project");
        if self.fail_project {
            return Err(upstream("project lookup failed"));
        }
        Ok(ProjectRecord {
            name: project.into(),
            subdomain: None,
            canonical_deployment: self
                .production_id
                .clone()
                .map(|id| DeploymentRef { id }),
            latest_deployment: None,
            build_config: None,
            deployment_configs: None,
            production_branch: None,
        })
    }

    async fn upload_token(&self, project: &str) -> Result<String> {
        self.log("upload_token");
        if self.fail_token {
            return Err(Error::Credential {
                project: project.to_owned(),
                detail: "no such project".into(),
            });
        }
        Ok("jwt-token".into())
    }

    async fn upload_assets(&self, _token: &str, batch: &[UploadItem]) -> Result<()> {
        self.log(format!("upload_assets:{}", batch.len()));
        if self.fail_assets {
            return Err(upstream("asset upload failed"));
        }
        Ok(())
    }

    async fn create_deployment(
        &self,
        _project: &str,
        _manifest_json: String,
    ) -> Result<DeploymentRecord> {
        self.log("create_deployment");
        if self.fail_manifest {
            return Err(upstream("manifest rejected"));
        }
        Ok(record("new-deployment"))
    }

    async fn list_deployments(
        &self,
        _project: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<DeploymentRecord>> {
        self.log(format!("list_deployments:{page}"));
        if Some(page) == self.fail_page {
            return Err(upstream("page fetch failed"));
        }
        if self.endless_pages {
            return Ok((0..per_page)
                .map(|i| record(&format!("dep-{page}-{i}")))
                .collect());
        }
        Ok(self
            .pages
            .get((page - 1) as usize)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_deployment(&self, _project: &str, id: &str) -> Result<()> {
        self.log(format!("delete:{id}"));
        if self.failing_deletes.contains(id) {
            return Err(upstream("delete failed"));
        }
        self.deleted.lock().unwrap().push(id.to_owned());
        Ok(())
    }
}
