/// Scoped access to plaintext copies of sops-encrypted files.
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::{DeployerError, Result};
use crate::process;

/// A readable path to decrypted file contents.
///
/// Files that needed decryption live in a temporary file that is removed
/// when this value is dropped; files that were never encrypted are passed
/// through untouched.
#[derive(Debug)]
pub enum DecryptedFile {
    /// The original file, which is not a secret.
    Plain(PathBuf),
    /// A temporary plaintext copy produced by sops.
    Temporary(NamedTempFile),
}

impl DecryptedFile {
    /// Path to the plaintext contents.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Plain(path) => path,
            Self::Temporary(file) => file.path(),
        }
    }
}

/// Only files with `secret` in their name are expected to be sops-encrypted.
fn is_secret(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().contains("secret"))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().ends_with("json"))
}

/// Check that `contents` is a mapping with a top-level `sops` key.
///
/// JSON files are parsed as JSON; anything else is parsed as YAML.
fn has_sops_metadata(path: &Path, contents: &str) -> Result<bool> {
    let parse_error = |reason: String| DeployerError::ParseKeyFile {
        path: path.to_path_buf(),
        reason,
    };
    if is_json(path) {
        let value: serde_json::Value =
            serde_json::from_str(contents).map_err(|e| parse_error(e.to_string()))?;
        Ok(value.get("sops").is_some())
    } else {
        let value: serde_yaml::Value =
            serde_yaml::from_str(contents).map_err(|e| parse_error(e.to_string()))?;
        Ok(value.get("sops").is_some())
    }
}

/// Get a plaintext view of `path`, decrypting it with sops if it is a secret.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, `ParseKeyFile` if a secret is not
/// valid JSON/YAML, `MissingSopsMetadata` if a secret is not sops-encrypted,
/// and `Spawn`/`CommandFailed` if sops fails.
pub fn get_decrypted_file(sops: &OsStr, path: &Path) -> Result<DecryptedFile> {
    if !is_secret(path) {
        debug!(path = %path.display(), "not a secret, using as-is");
        return Ok(DecryptedFile::Plain(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path).map_err(|source| DeployerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !has_sops_metadata(path, &contents)? {
        return Err(DeployerError::MissingSopsMetadata {
            path: path.to_path_buf(),
        });
    }

    let temp = NamedTempFile::new().map_err(|source| DeployerError::Io {
        path: std::env::temp_dir(),
        source,
    })?;
    debug!(path = %path.display(), "decrypting with sops");
    process::run(
        sops,
        [
            OsStr::new("--output"),
            temp.path().as_os_str(),
            OsStr::new("--decrypt"),
            path.as_os_str(),
        ],
    )?;
    Ok(DecryptedFile::Temporary(temp))
}
