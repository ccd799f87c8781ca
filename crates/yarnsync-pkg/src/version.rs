//! Version extraction from resolution identifiers.

use regex::Regex;
use std::sync::OnceLock;

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#":(?P<version>[0-9A-Za-z_.\-]+)"?$"#).expect("version pattern is valid")
    })
}

/// Extract the exact version from an identifier such as `react@npm:18.2.0`.
///
/// The version is everything after the final `:`, minus one trailing `"`,
/// provided it only contains ASCII letters, digits, `_`, `.` and `-`.
/// Ranges, tags with operators, or paths yield `None`.
pub fn extract_version(identifier: &str) -> Option<&str> {
    version_pattern()
        .captures(identifier)
        .and_then(|caps| caps.name("version"))
        .map(|m| m.as_str())
}
