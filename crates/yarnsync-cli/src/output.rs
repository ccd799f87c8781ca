//! Terminal rendering of sync progress.

use ansi_term::{Colour, Style};
use yarnsync_pkg::{Change, Skip};

pub fn banner() -> String {
    Colour::Cyan
        .paint("🔄 Syncing package.json versions with yarn.lock...")
        .to_string()
}

/// One line per changed dependency: `[dry-run] ✓ name: from → to`.
pub fn change_line(change: &Change, dry_run: bool) -> String {
    let prefix = if dry_run {
        Style::new().dimmed().paint("[dry-run]").to_string()
    } else {
        String::new()
    };

    format!(
        "{prefix} {} {}: {} → {}",
        Colour::Green.paint("✓"),
        change.name,
        Style::new().dimmed().paint(change.from.as_str()),
        Colour::Green.paint(change.to.as_str()),
    )
}

pub fn skip_line(skip: &Skip) -> String {
    Colour::Yellow
        .paint(format!("⚠ Skipped {}: {}", skip.name, skip.reason))
        .to_string()
}

pub fn in_sync_line() -> String {
    Colour::Green
        .paint("✨ All versions are already in sync!")
        .to_string()
}

pub fn updated_line(count: usize, file: &str) -> String {
    Colour::Green
        .paint(format!("\n🎉 Updated {count} package(s) in {file}"))
        .to_string()
}

pub fn would_update_line(count: usize) -> String {
    Colour::Cyan
        .paint(format!("\n📋 Would update {count} package(s) (dry-run mode)"))
        .to_string()
}

pub fn error_line(message: &str) -> String {
    Colour::Red.paint(format!("❌ Error: {message}")).to_string()
}
