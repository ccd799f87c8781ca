//! Implementation of the sync run.

use anyhow::Result;
use std::io::Write;
use yarnsync_pkg::{sync_manifest, ResolutionSource, SyncEvent, SyncOptions, SyncReport, YarnCli};

use crate::output;

/// Options for a sync run from the command line.
#[derive(Debug, Default)]
pub struct SyncCommandOptions {
    /// Preview changes without modifying the manifest.
    pub dry_run: bool,
    /// Only print errors.
    pub silent: bool,
}

/// Sync the manifest in the current directory using the `yarn` on `PATH`.
pub fn run(options: &SyncCommandOptions) -> Result<SyncReport> {
    let sync_options = SyncOptions {
        dry_run: options.dry_run,
        ..SyncOptions::default()
    };
    let mut stdout = std::io::stdout().lock();
    run_with(&sync_options, &YarnCli::default(), options.silent, &mut stdout)
}

/// Sync a manifest against a query source, streaming progress to `out`.
///
/// With `silent` set nothing is written to `out`; errors are returned.
pub fn run_with<S, W>(
    options: &SyncOptions,
    source: &S,
    silent: bool,
    out: &mut W,
) -> Result<SyncReport>
where
    S: ResolutionSource + ?Sized,
    W: Write + ?Sized,
{
    let mut say = |line: String| -> std::io::Result<()> {
        if silent {
            Ok(())
        } else {
            writeln!(out, "{line}")
        }
    };

    say(output::banner())?;

    // The event callback cannot fail, so the first write error is held until
    // reconciliation finishes.
    let mut write_error = None;
    let report = sync_manifest(options, source, |event| {
        let line = match event {
            SyncEvent::Updated(change) => output::change_line(change, options.dry_run),
            SyncEvent::Skipped(skip) => output::skip_line(skip),
        };
        if let Err(err) = say(line) {
            if write_error.is_none() {
                write_error = Some(err);
            }
        }
    })?;
    if let Some(err) = write_error {
        return Err(err.into());
    }

    if report.is_empty() {
        say(output::in_sync_line())?;
    } else if report.written {
        let path = &options.manifest_path;
        let file = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
        say(output::updated_line(report.updated_count(), &file))?;
    } else {
        say(output::would_update_line(report.updated_count()))?;
    }

    Ok(report)
}
