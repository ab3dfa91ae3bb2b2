/// Shared serializable output types for all commands.
///
/// These are what gets written in JSON mode. They are decoupled from the
/// internal record and error types.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::DeployerError;

/// Result of `deployer comment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentOutput {
    /// Always `true`.
    pub ok: bool,
    /// Where the comment body was written.
    pub path: PathBuf,
    /// Number of support/staging jobs in the plan.
    pub support_staging_jobs: usize,
    /// Number of production hub jobs in the plan.
    pub prod_jobs: usize,
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (`snake_case`).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Process exit code deployer terminates with.
    pub exit_code: i32,
}

impl ErrorOutput {
    /// Construct from a `DeployerError`.
    #[must_use]
    pub fn from_error(err: &DeployerError) -> Self {
        Self {
            ok: false,
            error: ErrorDetail {
                code: err.code().to_owned(),
                message: err.to_string(),
                exit_code: err.exit_code(),
            },
        }
    }
}
