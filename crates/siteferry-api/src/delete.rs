use std::time::Duration;

use tracing::{debug, warn};

use crate::client::PagesApi;
use crate::error::Result;
use crate::history::{self, HistoryScan};

/// Pacing knobs for a deletion sweep.
#[derive(Clone, Debug)]
pub struct DeleteOptions {
    /// Pause between consecutive delete calls. Keeps the sweep under
    /// the platform's rate limit; not needed for correctness.
    pub pause: Duration,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            pause: Duration::from_millis(250),
        }
    }
}

impl DeleteOptions {
    pub fn pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }
}

/// Outcome counts for one deletion sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub deleted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Delete candidate deployments one at a time, never touching the
/// protected production deployment.
///
/// Ids are processed sequentially, never in parallel. A failed delete
/// is counted and the sweep moves on: bulk deletion is a best-effort
/// sweep, not a transaction. The engine holds no state between calls,
/// so a caller wanting progress feedback invokes it in chunks of its
/// own sizing and accumulates the reports.
pub async fn delete_many<A: PagesApi>(
    api: &A,
    project: &str,
    candidates: &[String],
    protected: Option<&str>,
    options: &DeleteOptions,
) -> DeletionReport {
    let mut report = DeletionReport::default();
    let mut first = true;

    for id in candidates {
        if Some(id.as_str()) == protected {
            debug!(project, id = %id, "skipping protected production deployment");
            report.skipped += 1;
            continue;
        }

        // Skips make no network call, so only pace between deletes.
        if !first && !options.pause.is_zero() {
            tokio::time::sleep(options.pause).await;
        }
        first = false;

        match api.delete_deployment(project, id).await {
            Ok(()) => report.deleted += 1,
            Err(err) => {
                warn!(project, id = %id, error = %err, "failed to delete deployment");
                report.failed += 1;
            }
        }
    }

    report
}

/// Scan the full history and delete everything except the production
/// deployment.
pub async fn delete_all<A: PagesApi>(
    api: &A,
    project: &str,
    options: &DeleteOptions,
) -> Result<DeletionReport> {
    let HistoryScan { ids, production_id } = history::scan(api, project).await?;
    Ok(delete_many(api, project, &ids, production_id.as_deref(), options).await)
}
