//! Content-addressed manifest construction for static deployments.
//!
//! # Architecture
//!
//! - `build.rs` - Single pass over archive entries: sanitize, hash, encode
//! - `manifest.rs` - Ordered path→hash mapping
//! - `media.rs` - Extension → content-type table

pub use build::{ArchiveBuild, UploadItem, UploadMetadata, build, content_hash};
pub use error::{Error, Result};
pub use manifest::DeploymentManifest;
pub use media::content_type_for;

mod build;
mod error;
mod manifest;
mod media;
