//! Project manifest (`package.json`) loading, editing, and serialization.

use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

/// The manifest file name looked up in the working directory.
pub const MANIFEST_FILE: &str = "package.json";

/// Errors that can occur when working with manifests.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("manifest root must be a JSON object")]
    NotAnObject,
}

/// One of the fixed top-level dependency groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencySection {
    /// Runtime dependencies.
    Dependencies,
    /// Development-only dependencies.
    DevDependencies,
    /// Peer dependencies.
    PeerDependencies,
}

impl DependencySection {
    /// All sections, in the order they are reconciled.
    pub const ALL: [Self; 3] = [
        Self::Dependencies,
        Self::DevDependencies,
        Self::PeerDependencies,
    ];

    /// Returns the JSON key of this section.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Dependencies => "dependencies",
            Self::DevDependencies => "devDependencies",
            Self::PeerDependencies => "peerDependencies",
        }
    }
}

impl std::fmt::Display for DependencySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A parsed manifest document.
///
/// The whole document is kept as a JSON object so that fields this tool does
/// not understand survive a rewrite untouched, in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    root: Map<String, Value>,
}

impl Manifest {
    /// Load a manifest from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a manifest from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or its root is not an object.
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        match serde_json::from_str(content)? {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(ManifestError::NotAnObject),
        }
    }

    /// Names declared in a section, in document order.
    ///
    /// A missing section, or one that is not an object, has no names.
    pub fn dependency_names(&self, section: DependencySection) -> Vec<String> {
        self.section(section)
            .map(|deps| deps.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// The declared value for a dependency, if present.
    pub fn declared_version(&self, section: DependencySection, name: &str) -> Option<&Value> {
        self.section(section).and_then(|deps| deps.get(name))
    }

    /// Overwrite the declared version of a dependency.
    ///
    /// Returns false if the section is missing or not an object. The entry
    /// keeps its position when it already exists.
    pub fn set_version(&mut self, section: DependencySection, name: &str, version: &str) -> bool {
        match self.root.get_mut(section.key()) {
            Some(Value::Object(deps)) => {
                deps.insert(name.to_string(), Value::String(version.to_string()));
                true
            }
            _ => false,
        }
    }

    /// Serialize as 2-space indented JSON with a single trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(&self.root)?;
        out.push('\n');
        Ok(out)
    }

    /// Write the manifest to a file, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ManifestError> {
        let content = self.to_json_string()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn section(&self, section: DependencySection) -> Option<&Map<String, Value>> {
        self.root.get(section.key()).and_then(Value::as_object)
    }
}
