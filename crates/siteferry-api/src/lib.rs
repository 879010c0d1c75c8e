//! Client and engines for the hosting platform's deployment API.
//!
//! # Architecture
//!
//! - `client` - [`PagesApi`] trait + reqwest implementation
//! - `publish` - Two-phase upload-and-publish protocol
//! - `history` - Paginated history scanning
//! - `delete` - Paced, best-effort bulk deletion
//! - `types` - Platform wire records

pub use client::{HttpPagesApi, PagesApi};
pub use delete::{DeleteOptions, DeletionReport, delete_all, delete_many};
pub use error::{Error, Result};
pub use history::{HistoryScan, MAX_PAGES, PAGE_SIZE, scan};
pub use publish::publish;
pub use types::{DeploymentRecord, DeploymentRef, ProjectRecord};

mod client;
mod delete;
mod error;
mod history;
#[cfg(test)]
pub(crate) mod mock;
mod publish;
mod types;
