use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{ConnectInfo, Multipart, Path, State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use siteferry_api::{DeleteOptions, DeletionReport, DeploymentRecord, PAGE_SIZE, PagesApi};
use siteferry_archive::ArchiveReader;
use siteferry_manifest::ArchiveBuild;

use crate::error::AppError;
use crate::state::AppState;
use crate::uploads::TransientArchive;
use crate::validate::require_project_name;

pub async fn list(
    State(state): State<AppState>,
    Path(project): Path<String>,
) -> Result<Json<Vec<DeploymentRecord>>, AppError> {
    require_project_name(&project)?;
    let records = state.api.list_deployments(&project, 1, PAGE_SIZE).await?;
    Ok(Json(records))
}

/// Ask the platform to rebuild the current production deployment.
pub async fn trigger(
    State(state): State<AppState>,
    Path(project): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_project_name(&project)?;
    Ok(Json(state.api.trigger_deployment(&project).await?))
}

/// Turn an uploaded archive into a content-addressed deployment.
pub async fn upload(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(project): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    require_project_name(&project)?;
    if !state.upload_limiter.check(&addr.ip().to_string()) {
        return Err(AppError::RateLimited);
    }

    let mut archive = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::Validation(format!("invalid multipart payload: {err}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|err| AppError::Validation(format!("invalid multipart payload: {err}")))?;
            archive = Some(bytes);
        }
    }
    let bytes = archive.ok_or_else(|| AppError::Validation("no file uploaded".into()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("no file uploaded".into()));
    }

    info!(%project, size = bytes.len(), "starting deployment");

    // This request owns the transient file from here on. `remove` is
    // the success-path release; drop covers the failure paths.
    let transient = TransientArchive::store(&state.config.uploads_dir, &bytes)?;
    let result = deploy(&state, &project, transient.path().to_owned()).await;
    if let Err(err) = transient.remove() {
        warn!(error = %err, "failed to remove transient archive");
    }
    let record = result?;

    Ok(Json(json!({
        "success": true,
        "message": "deployment created",
        "deployment": record.id,
    })))
}

async fn deploy(
    state: &AppState,
    project: &str,
    archive_path: PathBuf,
) -> Result<DeploymentRecord, AppError> {
    let build = tokio::task::spawn_blocking(move || -> Result<ArchiveBuild, AppError> {
        let file = std::fs::File::open(&archive_path)?;
        let reader = ArchiveReader::new(file)?;
        Ok(siteferry_manifest::build(reader)?)
    })
    .await
    .map_err(|_| AppError::Internal)??;

    if !build.rejected.is_empty() {
        warn!(
            project,
            dropped = build.rejected.len(),
            "archive entries dropped by the path sanitizer"
        );
    }

    let record =
        siteferry_api::publish(state.api.as_ref(), project, &build.batch, &build.manifest).await?;
    Ok(record)
}

#[derive(Deserialize, Default)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    ids: Option<Vec<String>>,
}

/// Delete deployment history. An explicit id list deletes one
/// caller-sized chunk; no body means "everything but production".
pub async fn bulk_delete(
    State(state): State<AppState>,
    Path(project): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    require_project_name(&project)?;

    let options = DeleteOptions::default();
    let explicit = if body.is_empty() {
        None
    } else {
        let request: BulkDeleteRequest = serde_json::from_slice(&body)
            .map_err(|err| AppError::Validation(format!("invalid request body: {err}")))?;
        request.ids.filter(|ids| !ids.is_empty())
    };

    let report = match explicit {
        Some(ids) => {
            // The protection id is re-derived server-side on every
            // chunk; whatever the client believes is ignored.
            let record = state.api.get_project(&project).await?;
            let protected = record.canonical_deployment.map(|d| d.id);
            siteferry_api::delete_many(
                state.api.as_ref(),
                &project,
                &ids,
                protected.as_deref(),
                &options,
            )
            .await
        }
        None => siteferry_api::delete_all(state.api.as_ref(), &project, &options).await?,
    };

    info!(
        %project,
        deleted = report.deleted,
        skipped = report.skipped,
        failed = report.failed,
        "bulk deletion finished"
    );
    Ok(Json(deletion_response(&report)))
}

fn deletion_response(report: &DeletionReport) -> Value {
    json!({
        "message": format!(
            "{} deployments deleted, {} skipped, {} failed",
            report.deleted, report.skipped, report.failed
        ),
        "success": report.deleted,
        "failed": report.failed,
    })
}
