//! Reconciliation of declared versions with resolved versions.
//!
//! For every dependency in `dependencies`, `devDependencies` and
//! `peerDependencies` (in that order, each in document order):
//! 1. Ask the [`ResolutionSource`] how it was resolved
//! 2. Classify the reply and pick the resolution identifier
//! 3. Extract the exact version from the identifier
//! 4. Record a [`Change`] when it differs from the declared value
//!
//! The manifest on disk is written at most once, after every dependency has
//! been processed.

use crate::manifest::{DependencySection, Manifest, ManifestError};
use crate::query::{QueryError, ResolutionSource};
use crate::reply::ResolutionReply;
use crate::version::extract_version;
use log::{debug, info};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a sync before or after reconciliation.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("{} not found", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("package manager is not installed or not in PATH")]
    PackageManagerUnavailable(#[source] QueryError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Options for a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Path to the manifest to reconcile.
    pub manifest_path: PathBuf,
    /// Compute and report changes without writing the manifest.
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(crate::MANIFEST_FILE),
            dry_run: false,
        }
    }
}

/// A declared version that differs from the resolved one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Dependency name.
    pub name: String,
    /// Section the dependency is declared in.
    pub section: DependencySection,
    /// Previously declared value.
    pub from: String,
    /// Resolved version.
    pub to: String,
}

/// Why a dependency was left alone.
#[derive(Error, Debug)]
pub enum SkipReason {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Could not find resolved identifier")]
    MissingIdentifier,
}

/// A dependency that could not be reconciled.
#[derive(Debug)]
pub struct Skip {
    /// Dependency name.
    pub name: String,
    /// Section the dependency is declared in.
    pub section: DependencySection,
    /// What went wrong.
    pub reason: SkipReason,
}

/// A resolved identifier whose version could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unmatched {
    /// Dependency name.
    pub name: String,
    /// Section the dependency is declared in.
    pub section: DependencySection,
    /// The identifier that did not match.
    pub identifier: String,
}

/// Progress notifications, delivered as each dependency is processed.
#[derive(Debug)]
pub enum SyncEvent<'a> {
    /// A declared version differs from the resolved one.
    Updated(&'a Change),
    /// A dependency was skipped.
    Skipped(&'a Skip),
}

/// Outcome of a sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Changes, in processing order.
    pub changes: Vec<Change>,
    /// Dependencies that were skipped with a reportable reason.
    pub skipped: Vec<Skip>,
    /// Identifiers whose version could not be extracted. These are not
    /// reported as skips.
    pub unmatched: Vec<Unmatched>,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Whether the manifest was written.
    pub written: bool,
}

impl SyncReport {
    /// Returns true if no changes were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of dependencies updated (or that would be, in a dry run).
    #[must_use]
    pub fn updated_count(&self) -> usize {
        self.changes.len()
    }
}

/// Reconcile a manifest in memory.
///
/// Outside a dry run each change is written into `manifest` as soon as it is
/// found. Nothing is persisted.
pub fn reconcile<S, F>(
    manifest: &mut Manifest,
    source: &S,
    dry_run: bool,
    mut on_event: F,
) -> SyncReport
where
    S: ResolutionSource + ?Sized,
    F: FnMut(SyncEvent<'_>),
{
    let mut report = SyncReport {
        dry_run,
        ..SyncReport::default()
    };

    for section in DependencySection::ALL {
        for name in manifest.dependency_names(section) {
            let identifier = match resolve_identifier(source, &name) {
                Ok(identifier) => identifier,
                Err(reason) => {
                    let skip = Skip {
                        name,
                        section,
                        reason,
                    };
                    on_event(SyncEvent::Skipped(&skip));
                    report.skipped.push(skip);
                    continue;
                }
            };

            let Some(resolved) = extract_version(&identifier) else {
                debug!("no version in identifier `{identifier}` for {name} ({section})");
                report.unmatched.push(Unmatched {
                    name,
                    section,
                    identifier,
                });
                continue;
            };

            let declared = manifest.declared_version(section, &name);
            if declared.and_then(Value::as_str) == Some(resolved) {
                continue;
            }

            let change = Change {
                from: declared.map(display_declared).unwrap_or_default(),
                to: resolved.to_string(),
                name,
                section,
            };

            if !dry_run {
                manifest.set_version(section, &change.name, &change.to);
            }

            on_event(SyncEvent::Updated(&change));
            report.changes.push(change);
        }
    }

    report
}

/// Validate the environment, reconcile the manifest, and write it back.
///
/// # Errors
///
/// Returns an error if the manifest is missing or unreadable, the package
/// manager cannot be run, or the final write fails. Per-dependency failures
/// are reported through `on_event` and never abort the run.
pub fn sync_manifest<S, F>(
    options: &SyncOptions,
    source: &S,
    on_event: F,
) -> Result<SyncReport, SyncError>
where
    S: ResolutionSource + ?Sized,
    F: FnMut(SyncEvent<'_>),
{
    let path = &options.manifest_path;
    if !path.exists() {
        return Err(SyncError::ManifestNotFound(path.clone()));
    }

    source
        .check_available()
        .map_err(SyncError::PackageManagerUnavailable)?;

    let mut manifest = Manifest::from_path(path)?;
    let mut report = reconcile(&mut manifest, source, options.dry_run, on_event);

    if !report.is_empty() && !options.dry_run {
        manifest.write(path)?;
        info!(
            "wrote {} updated version(s) to {}",
            report.updated_count(),
            path.display()
        );
        report.written = true;
    }

    Ok(report)
}

fn resolve_identifier<S>(source: &S, name: &str) -> Result<String, SkipReason>
where
    S: ResolutionSource + ?Sized,
{
    let reply = source.resolve(name)?;
    ResolutionReply::classify(&reply)
        .identifier(name)
        .ok_or(SkipReason::MissingIdentifier)
}

/// Render a declared value for display; strings are shown without quotes.
fn display_declared(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
