//! Error types shared by both entry points.
//!
//! Every failure is terminal for the current invocation. Each variant maps to
//! a distinct process exit code so scripts driving the tools can tell a bad
//! invocation apart from a failing toolchain.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for orchestration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid command-line arguments.
pub const EXIT_USAGE: i32 = 64;

/// A required host tool is not installed.
pub const EXIT_UNAVAILABLE: i32 = 69;

/// A subprocess could not be started.
pub const EXIT_OS_ERROR: i32 = 71;

/// Working directory or archive destination problem.
pub const EXIT_IO_ERROR: i32 = 74;

/// Main error type for the build and package pipelines.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or unrecognized flag value. The message names the flag and
    /// its allowed values.
    #[error("{message}")]
    Configuration {
        /// Rendered parser diagnostic
        message: String,
    },

    /// An external tool exited non-zero.
    #[error("{step} step failed: '{command}' exited with code {code}")]
    SubprocessFailure {
        /// Name of the failing step (configure, compile, install, archive)
        step: String,
        /// The full command line as echoed to the operator
        command: String,
        /// Exit code, or -1 when the process was killed by a signal
        code: i32,
    },

    /// The program for a step could not be executed at all.
    #[error("failed to execute '{program}': {source}")]
    Spawn {
        /// Program name
        program: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be created or entered, or the archive
    /// destination is not writable.
    #[error("{}: {source}", .path.display())]
    Filesystem {
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Preflight found a required program missing from PATH.
    #[error("'{tool}' not found in PATH (install the '{package}' package)")]
    MissingTool {
        /// Program name
        tool: String,
        /// Package that usually provides it
        package: String,
    },
}

impl Error {
    /// Build a filesystem error for `path`.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error.
    ///
    /// Subprocess failures propagate the child's own code so the operator
    /// sees the same status the toolchain reported.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Configuration { .. } => EXIT_USAGE,
            Error::SubprocessFailure { code, .. } if (1..=255).contains(code) => *code,
            Error::SubprocessFailure { .. } => 1,
            Error::Spawn { .. } => EXIT_OS_ERROR,
            Error::Filesystem { .. } => EXIT_IO_ERROR,
            Error::MissingTool { .. } => EXIT_UNAVAILABLE,
        }
    }
}
