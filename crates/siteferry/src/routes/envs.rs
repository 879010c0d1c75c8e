use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{Value, json};

use siteferry_api::PagesApi;

use crate::error::AppError;
use crate::state::AppState;
use crate::validate::require_project_name;

/// Flatten the platform's production env block into plain key→value
/// pairs for the settings form.
fn simplify_env(deployment_configs: Option<&Value>) -> Value {
    let mut simple = serde_json::Map::new();
    if let Some(envs) = deployment_configs
        .and_then(|configs| configs.pointer("/production/env"))
        .and_then(Value::as_object)
    {
        for (key, entry) in envs {
            let value = entry.get("value").and_then(Value::as_str).unwrap_or_default();
            simple.insert(key.clone(), Value::String(value.to_owned()));
        }
    }
    Value::Object(simple)
}

fn build_config_summary(build_config: Option<&Value>) -> Value {
    json!({
        "command": build_config
            .and_then(|config| config.get("build_command"))
            .and_then(Value::as_str)
            .unwrap_or(""),
        "output_dir": build_config
            .and_then(|config| config.get("destination_dir"))
            .and_then(Value::as_str)
            .unwrap_or(""),
    })
}

pub async fn show(
    State(state): State<AppState>,
    Path(project): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_project_name(&project)?;
    let record = state.api.get_project(&project).await?;

    Ok(Json(json!({
        "env": simplify_env(record.deployment_configs.as_ref()),
        "build_config": build_config_summary(record.build_config.as_ref()),
        "production_branch": record.production_branch,
    })))
}

#[derive(Deserialize)]
pub struct UpdateEnv {
    env: serde_json::Map<String, Value>,
}

pub async fn update(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Json(body): Json<UpdateEnv>,
) -> Result<Json<Value>, AppError> {
    require_project_name(&project)?;

    let formatted: serde_json::Map<String, Value> = body
        .env
        .into_iter()
        .map(|(key, value)| (key, json!({ "value": value })))
        .collect();
    let patch = json!({
        "deployment_configs": {
            "production": { "env": formatted.clone() },
            "preview": { "env": formatted },
        }
    });

    state.api.patch_project(&project, &patch).await?;
    Ok(Json(json!({ "success": true })))
}
