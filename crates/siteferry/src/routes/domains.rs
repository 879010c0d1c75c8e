use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::state::AppState;
use crate::validate::{require_domain_name, require_project_name};

pub async fn list(
    State(state): State<AppState>,
    Path(project): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_project_name(&project)?;
    Ok(Json(state.api.list_domains(&project).await?))
}

#[derive(Deserialize)]
pub struct AddDomain {
    name: String,
}

pub async fn add(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Json(body): Json<AddDomain>,
) -> Result<Json<Value>, AppError> {
    require_project_name(&project)?;
    require_domain_name(&body.name)?;
    Ok(Json(state.api.add_domain(&project, &body.name).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path((project, domain)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    require_project_name(&project)?;
    require_domain_name(&domain)?;
    state.api.delete_domain(&project, &domain).await?;
    Ok(Json(json!({ "success": true })))
}
