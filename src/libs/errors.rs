//! Error and outcome types shared by every installer.
//!
//! Only [`SetupError::SourceMissing`] is recovered locally (by the font installer, which
//! reports it and hands control back to the menu). Everything else propagates to `main`
//! and ends the process with a non-zero status.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    /// The bundled font directory does not exist.
    #[error("font source directory not found: {}", path.display())]
    SourceMissing { path: PathBuf },

    /// An external command ran but exited unsuccessfully.
    #[error("command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// An external command could not be started at all.
    #[error("failed to start `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A program that was just installed still cannot be found on `PATH`.
    #[error("`{program}` is not on PATH")]
    ProgramNotFound { program: String },

    /// Downloading a remote install script failed.
    #[error("failed to fetch {url}: {message}")]
    FetchFailed { url: String, message: String },

    /// A configuration file exists but could not be parsed.
    #[error("invalid configuration at {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SetupError>;

/// What an installer did on a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// State was changed.
    Installed,
    /// Target state already held; only informational output was produced.
    AlreadySatisfied,
    /// There was no input to act on (e.g. an empty font source directory).
    NothingToDo,
}

impl InstallOutcome {
    /// Folds the outcome of a sub-step into a composite outcome. A composite
    /// counts as `Installed` as soon as any of its steps changed something.
    pub fn merge(self, other: InstallOutcome) -> InstallOutcome {
        match (self, other) {
            (InstallOutcome::Installed, _) | (_, InstallOutcome::Installed) => {
                InstallOutcome::Installed
            }
            (InstallOutcome::NothingToDo, InstallOutcome::NothingToDo) => {
                InstallOutcome::NothingToDo
            }
            _ => InstallOutcome::AlreadySatisfied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_missing_displays_path() {
        let err = SetupError::SourceMissing {
            path: PathBuf::from("/tmp/fonts"),
        };
        assert_eq!(err.to_string(), "font source directory not found: /tmp/fonts");
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = SetupError::CommandFailed {
            command: "apt-get update".to_string(),
            code: Some(100),
        };
        assert!(err.to_string().contains("apt-get update"));
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn merge_prefers_installed() {
        use InstallOutcome::*;
        assert_eq!(AlreadySatisfied.merge(Installed), Installed);
        assert_eq!(Installed.merge(AlreadySatisfied), Installed);
        assert_eq!(AlreadySatisfied.merge(AlreadySatisfied), AlreadySatisfied);
        assert_eq!(NothingToDo.merge(AlreadySatisfied), AlreadySatisfied);
        assert_eq!(NothingToDo.merge(NothingToDo), NothingToDo);
    }
}
