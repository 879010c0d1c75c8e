use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::state::AppState;
use crate::validate::{is_valid_project_name, require_project_name};

/// Trim a raw platform project record down to what the panel shows.
fn project_summary(project: &Value) -> Value {
    json!({
        "id": project.get("id").cloned().unwrap_or(Value::Null),
        "name": project.get("name").cloned().unwrap_or(Value::Null),
        "subdomain": project.get("subdomain").cloned().unwrap_or(Value::Null),
        "source": project.get("source").cloned().unwrap_or(Value::Null),
        "latest_deployment": project
            .get("latest_deployment")
            .cloned()
            .unwrap_or_else(|| json!({ "status": "unknown" })),
        "build_config": project.get("build_config").cloned().unwrap_or(Value::Null),
    })
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let projects = state.api.list_projects().await?;
    let summaries: Vec<Value> = projects.iter().map(project_summary).collect();
    Ok(Json(Value::Array(summaries)))
}

#[derive(Deserialize)]
pub struct CreateProject {
    name: String,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProject>,
) -> Result<Json<Value>, AppError> {
    if !is_valid_project_name(&body.name) {
        return Err(AppError::Validation("invalid project name".into()));
    }
    Ok(Json(state.api.create_project(&body.name).await?))
}

#[derive(Deserialize, Default)]
pub struct UpdateProject {
    #[serde(default)]
    build_config: Option<BuildConfigPatch>,
}

#[derive(Deserialize)]
pub struct BuildConfigPatch {
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    output_dir: Option<String>,
}

pub async fn update(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Json(body): Json<UpdateProject>,
) -> Result<Json<Value>, AppError> {
    require_project_name(&project)?;

    let mut build_config = serde_json::Map::new();
    if let Some(patch) = body.build_config {
        if let Some(command) = patch.command {
            build_config.insert("build_command".into(), Value::String(command));
        }
        if let Some(output_dir) = patch.output_dir {
            build_config.insert("destination_dir".into(), Value::String(output_dir));
        }
    }
    let patch = json!({ "build_config": build_config });

    Ok(Json(state.api.patch_project(&project, &patch).await?))
}
