//! Resolution queries against the package manager.
//!
//! The package manager is the source of truth for resolved versions. It is
//! asked one dependency at a time; the lockfile itself is never read here.

use log::debug;
use serde_json::Value;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Output};
use thiserror::Error;

/// Errors from a single package-manager invocation.
///
/// Dependencies resolved from git, workspace links, or aliases routinely
/// fail here; callers treat these as a per-dependency skip.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The program could not be started at all.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but exited unsuccessfully.
    #[error("{message}")]
    Failed { status: ExitStatus, message: String },

    /// The reply was not valid JSON.
    #[error("invalid JSON reply: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Something that can report how a dependency was resolved.
pub trait ResolutionSource {
    /// Probe that the package manager can be invoked at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe command cannot be run or fails.
    fn check_available(&self) -> Result<(), QueryError>;

    /// Return the raw structured reply for one dependency.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or its output is not JSON.
    fn resolve(&self, name: &str) -> Result<Value, QueryError>;
}

/// Queries the Yarn (Berry) command-line tool.
#[derive(Debug, Clone)]
pub struct YarnCli {
    /// Program to invoke.
    pub program: String,
    /// Directory the program runs in (defaults to the current directory).
    pub working_dir: Option<PathBuf>,
}

impl Default for YarnCli {
    fn default() -> Self {
        Self {
            program: String::from("yarn"),
            working_dir: None,
        }
    }
}

impl YarnCli {
    /// Create a query adapter that runs in `dir`.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
            ..Self::default()
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn run(&self, args: &[&str]) -> Result<Output, QueryError> {
        debug!("running {} {}", self.program, args.join(" "));

        let output = self
            .command()
            .args(args)
            .output()
            .map_err(|source| QueryError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(QueryError::Failed {
                status: output.status,
                message: failure_message(&self.program, args, &output),
            });
        }

        Ok(output)
    }
}

impl ResolutionSource for YarnCli {
    fn check_available(&self) -> Result<(), QueryError> {
        self.run(&["--version"]).map(|_| ())
    }

    fn resolve(&self, name: &str) -> Result<Value, QueryError> {
        let output = self.run(&["info", name, "--json"])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(serde_json::from_str(stdout.trim())?)
    }
}

/// Describe a failed invocation, preferring what the tool printed on stderr.
fn failure_message(program: &str, args: &[&str], output: &Output) -> String {
    let command = format!("{program} {}", args.join(" "));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();

    if stderr.is_empty() {
        format!("Command failed: {command} ({})", output.status)
    } else {
        format!("Command failed: {command}\n{stderr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_program_is_yarn() {
        let yarn = YarnCli::default();
        assert_eq!(yarn.program, "yarn");
        assert!(yarn.working_dir.is_none());
    }

    #[test]
    fn in_dir_sets_working_dir() {
        let yarn = YarnCli::in_dir("/tmp/project");
        assert_eq!(yarn.working_dir, Some(PathBuf::from("/tmp/project")));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let yarn = YarnCli {
            program: String::from("definitely-not-a-package-manager-7c1f"),
            working_dir: None,
        };
        let err = yarn.check_available().unwrap_err();
        assert!(matches!(err, QueryError::Spawn { .. }));
        assert!(err.to_string().contains("definitely-not-a-package-manager-7c1f"));

        let err = yarn.resolve("lodash").unwrap_err();
        assert!(matches!(err, QueryError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_failed() {
        let shell = YarnCli {
            program: String::from("false"),
            working_dir: None,
        };
        let err = shell.check_available().unwrap_err();
        match err {
            QueryError::Failed { status, message } => {
                assert!(!status.success());
                assert!(message.starts_with("Command failed: false --version"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_json_stdout_is_parse_error() {
        // `echo info lodash --json` succeeds and prints plain text.
        let echo = YarnCli {
            program: String::from("echo"),
            working_dir: None,
        };
        let err = echo.resolve("lodash").unwrap_err();
        assert!(matches!(err, QueryError::Parse(..)));
    }
}
