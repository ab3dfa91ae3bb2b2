/// Errors for every deployer command.
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that can occur while running a deployer command.
#[derive(Debug, Error)]
pub enum DeployerError {
    /// A file could not be read or written.
    #[error("Failed to access '{}': {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Standard input could not be read.
    #[error("Failed to read standard input: {0}")]
    Stdin(#[source] std::io::Error),

    /// Standard output could not be written.
    #[error("Failed to write standard output: {0}")]
    Stdout(#[source] std::io::Error),

    /// `exec` was given nothing to run.
    #[error("No command given to run")]
    EmptyCommand,

    /// An external program could not be started.
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        /// Program name or path.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An external program ran but exited unsuccessfully.
    #[error("'{program}' exited with {status}")]
    CommandFailed {
        /// Program name or path.
        program: String,
        /// The child's exit status.
        status: ExitStatus,
    },

    /// A file named as a secret is not sops-encrypted.
    #[error(
        "Expected a `sops` key in encrypted file '{}' but none was found. \
         Regenerate this secret in case it was committed in plaintext and leaked",
        path.display()
    )]
    MissingSopsMetadata {
        /// The offending secret file.
        path: PathBuf,
    },

    /// A key or credentials file has an unexpected shape.
    #[error("Failed to parse '{}': {reason}", path.display())]
    ParseKeyFile {
        /// The file being parsed.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// A deployment matrix argument is not valid JSON of the expected shape.
    #[error("Invalid {which} matrix: {reason}")]
    InvalidMatrix {
        /// Which matrix failed (`support-staging` or `prod`).
        which: &'static str,
        /// Parser message.
        reason: String,
    },
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, DeployerError>;

impl DeployerError {
    /// Return the CLI exit code for this error.
    ///
    /// A failed child passes its own exit code through, so CI sees the same
    /// status the external tool reported.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { status, .. } => match status.code() {
                Some(0) | None => 1,
                Some(code) => code,
            },
            Self::InvalidMatrix { .. } | Self::ParseKeyFile { .. } | Self::EmptyCommand => 2,
            Self::Io { .. }
            | Self::Stdin(_)
            | Self::Stdout(_)
            | Self::Spawn { .. }
            | Self::MissingSopsMetadata { .. } => 1,
        }
    }

    /// Machine-readable code used in the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_error",
            Self::Stdin(_) => "stdin_error",
            Self::Stdout(_) => "stdout_error",
            Self::EmptyCommand => "empty_command",
            Self::Spawn { .. } => "spawn_failed",
            Self::CommandFailed { .. } => "command_failed",
            Self::MissingSopsMetadata { .. } => "missing_sops_metadata",
            Self::ParseKeyFile { .. } => "invalid_key_file",
            Self::InvalidMatrix { .. } => "invalid_matrix",
        }
    }
}
