use serde::{Deserialize, Serialize};

/// Project record as returned by the hosting platform.
///
/// Only the fields the admin panel relies on are modeled; anything else
/// the platform sends is ignored on deserialization.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProjectRecord {
    pub name: String,
    #[serde(default)]
    pub subdomain: Option<String>,
    /// The live deployment for the project. Its id is the authoritative
    /// production id for deletion protection.
    #[serde(default)]
    pub canonical_deployment: Option<DeploymentRef>,
    #[serde(default)]
    pub latest_deployment: Option<serde_json::Value>,
    #[serde(default)]
    pub build_config: Option<serde_json::Value>,
    #[serde(default)]
    pub deployment_configs: Option<serde_json::Value>,
    #[serde(default)]
    pub production_branch: Option<String>,
}

/// Reference to a deployment by id.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DeploymentRef {
    pub id: String,
}

/// Deployment record as returned by the hosting platform.
///
/// Unmodeled fields are retained verbatim so listings can be relayed
/// to the browser without loss.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DeploymentRecord {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_on: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_record_tolerates_missing_fields() {
        let record: ProjectRecord = serde_json::from_str(r#"{"name":"my-site"}"#).unwrap();
        assert_eq!(record.name, "my-site");
        assert!(record.canonical_deployment.is_none());
    }

    #[test]
    fn production_id_comes_from_canonical_deployment() {
        let record: ProjectRecord = serde_json::from_str(
            r#"{"name":"my-site","canonical_deployment":{"id":"dep-1","url":"https://x"}}"#,
        )
        .unwrap();
        assert_eq!(record.canonical_deployment.unwrap().id, "dep-1");
    }

    #[test]
    fn deployment_record_keeps_unmodeled_fields() {
        let record: DeploymentRecord = serde_json::from_str(
            r#"{"id":"dep-1","status":"active","aliases":["https://a.example"]}"#,
        )
        .unwrap();
        assert_eq!(record.id, "dep-1");
        assert_eq!(record.status.as_deref(), Some("active"));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["aliases"][0], "https://a.example");
    }
}
