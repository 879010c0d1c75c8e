use siteferry_manifest::{DeploymentManifest, UploadItem};
use tracing::info;

use crate::client::PagesApi;
use crate::error::Result;
use crate::types::DeploymentRecord;

/// Upload a content-addressed batch and publish its manifest as a new
/// deployment.
///
/// The three steps are strictly ordered: credential, assets, manifest.
/// A failure at any step aborts the publish, so a manifest referencing
/// content that was never uploaded is never submitted. Already-uploaded
/// assets are not rolled back; the platform stores them by content hash
/// and unreferenced blobs are inert.
pub async fn publish<A: PagesApi>(
    api: &A,
    project: &str,
    batch: &[UploadItem],
    manifest: &DeploymentManifest,
) -> Result<DeploymentRecord> {
    let token = api.upload_token(project).await?;

    info!(project, files = batch.len(), "uploading content-addressed assets");
    api.upload_assets(&token, batch).await?;

    let manifest_json = serde_json::to_string(manifest)?;
    let record = api.create_deployment(project, manifest_json).await?;
    info!(project, deployment = %record.id, "deployment created");

    Ok(record)
}

#[cfg(test)]
mod tests {
    use siteferry_archive::ArchiveEntry;

    use super::*;
    use crate::error::Error;
    use crate::mock::MockApi;

    fn sample_build() -> siteferry_manifest::ArchiveBuild {
        siteferry_manifest::build(vec![
            Ok(ArchiveEntry {
                name: "index.html".into(),
                bytes: b"<h1>hi</h1>".to_vec(),
                is_directory: false,
            }),
            Ok(ArchiveEntry {
                name: "assets/app.js".into(),
                bytes: b"let x = 1;".to_vec(),
                is_directory: false,
            }),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn steps_run_in_protocol_order() {
        let api = MockApi::default();
        let build = sample_build();

        let record = publish(&api, "my-site", &build.batch, &build.manifest)
            .await
            .unwrap();

        assert_eq!(record.id, "new-deployment");
        assert_eq!(
            api.calls(),
            vec!["upload_token", "upload_assets:2", "create_deployment"]
        );
    }

    #[tokio::test]
    async fn credential_failure_aborts_before_upload() {
        let api = MockApi {
            fail_token: true,
            ..MockApi::default()
        };
        let build = sample_build();

        let err = publish(&api, "my-site", &build.batch, &build.manifest)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Credential { .. }));
        assert_eq!(api.calls(), vec!["upload_token"]);
    }

    #[tokio::test]
    async fn asset_failure_prevents_manifest_submission() {
        let api = MockApi {
            fail_assets: true,
            ..MockApi::default()
        };
        let build = sample_build();

        let err = publish(&api, "my-site", &build.batch, &build.manifest)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Upstream { .. }));
        assert_eq!(api.calls(), vec!["upload_token", "upload_assets:2"]);
    }

    #[tokio::test]
    async fn manifest_failure_surfaces_upstream_error() {
        let api = MockApi {
            fail_manifest: true,
            ..MockApi::default()
        };
        let build = sample_build();

        let err = publish(&api, "my-site", &build.batch, &build.manifest)
            .await
            .unwrap_err();

        assert!(err.upstream_detail().is_some());
        assert_eq!(api.calls().len(), 3);
    }
}
