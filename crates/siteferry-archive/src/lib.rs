//! Zip archive reading with deployment path sanitization.
//!
//! # Architecture
//!
//! - `read.rs` - Lazy entry iteration over an uploaded zip
//! - `sanitize.rs` - Deployment path sanitization (zip-slip prevention)
//! - `entry.rs` - Shared entry types

pub use entry::ArchiveEntry;
pub use error::{Error, Result};
pub use read::ArchiveReader;
pub use sanitize::{RejectReason, Rejected, SafePath, sanitize};

mod entry;
mod error;
mod read;
mod sanitize;
