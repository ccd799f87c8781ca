//! Reconciliation of `package.json` dependency versions with the versions
//! Yarn actually resolved.
//!
//! This crate provides:
//! - Loading, editing, and rewriting `package.json` manifests
//! - Resolution queries against the `yarn` command-line tool
//! - Classification of `yarn info --json` replies
//! - The reconciliation engine that pins declared versions to resolved ones

mod manifest;
mod query;
mod reconcile;
mod reply;
mod version;

pub use manifest::{DependencySection, Manifest, ManifestError, MANIFEST_FILE};
pub use query::{QueryError, ResolutionSource, YarnCli};
pub use reconcile::{
    reconcile, sync_manifest, Change, Skip, SkipReason, SyncError, SyncEvent, SyncOptions,
    SyncReport, Unmatched,
};
pub use reply::ResolutionReply;
pub use version::extract_version;
