use tracing::warn;

use crate::client::PagesApi;
use crate::error::Result;

/// Fixed history page size.
pub const PAGE_SIZE: u32 = 25;

/// Hard ceiling on pages fetched per scan. Reaching it is not an
/// error; the scan just stops with what it has.
pub const MAX_PAGES: u32 = 50;

/// Result of walking a project's deployment history.
///
/// Best-effort: the scan stops early at the page ceiling or at the
/// first page that fails to load, so the id list may be incomplete.
#[derive(Clone, Debug)]
pub struct HistoryScan {
    pub ids: Vec<String>,
    pub production_id: Option<String>,
}

/// Enumerate a project's deployment history and identify the protected
/// production deployment.
///
/// The project record is fetched once for the production id; failing
/// that fetch is a hard error, since no deletion protection could be
/// established from a missing record. History pages are then
/// concatenated in the order the platform returns them until an empty
/// page, a failed page, or the ceiling.
pub async fn scan<A: PagesApi>(api: &A, project: &str) -> Result<HistoryScan> {
    let record = api.get_project(project).await?;
    let production_id = record.canonical_deployment.map(|d| d.id);

    let mut ids = Vec::new();
    for page in 1..=MAX_PAGES {
        match api.list_deployments(project, page, PAGE_SIZE).await {
            Ok(items) => {
                if items.is_empty() {
                    break;
                }
                ids.extend(items.into_iter().map(|d| d.id));
            }
            Err(err) => {
                warn!(project, page, error = %err, "history page failed, returning partial scan");
                break;
            }
        }
    }

    Ok(HistoryScan { ids, production_id })
}
