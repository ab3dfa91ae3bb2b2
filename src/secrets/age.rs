/// Decryption of age-encrypted secrets via the `age` binary.
use std::ffi::{OsStr, OsString};
use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, info};

use super::decrypted_file::get_decrypted_file;
use crate::errors::{DeployerError, Result};
use crate::process;

/// Location of the sops-encrypted age identity, relative to the repository
/// root. It is resolved against the current working directory.
pub const DEFAULT_KEY_PATH: &str = "config/secrets/enc-age-private.secret.key.json";

/// Shown before waiting for ciphertext on stdin.
pub const STDIN_PROMPT: &str = "Paste the encrypted file contents, hit enter and then press Ctrl+D";

/// Read ciphertext from `path`, or from `stdin` when no path is given.
///
/// Files are read as raw bytes so non-armored ciphertext survives; stdin is
/// read as text, which is what a pasted armored block is.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, `Stdin` if stdin cannot be read
/// or is not valid UTF-8.
pub fn read_ciphertext(path: Option<&Path>, mut stdin: impl Read) -> Result<Vec<u8>> {
    if let Some(path) = path {
        return std::fs::read(path).map_err(|source| DeployerError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .map_err(DeployerError::Stdin)?;
    Ok(text.into_bytes())
}

/// Runs `age --decrypt` with a sops-protected identity.
#[derive(Debug, Clone)]
pub struct AgeDecryptor {
    age: OsString,
    sops: OsString,
}

impl AgeDecryptor {
    /// Use the given `age` and `sops` binaries.
    #[must_use]
    pub fn new(age: impl Into<OsString>, sops: impl Into<OsString>) -> Self {
        Self {
            age: age.into(),
            sops: sops.into(),
        }
    }

    /// Decrypt `ciphertext` with the identity at `key_path`, writing the
    /// plaintext straight to this process's stdout.
    ///
    /// # Errors
    ///
    /// Returns any key acquisition error, or `CommandFailed` if `age` exits
    /// non-zero.
    pub fn decrypt(&self, ciphertext: &[u8], key_path: &Path) -> Result<()> {
        let identity = get_decrypted_file(&self.sops, key_path)?;
        debug!(key_path = %key_path.display(), bytes = ciphertext.len(), "invoking age");
        process::run_with_input(
            &self.age,
            [
                OsStr::new("--decrypt"),
                OsStr::new("--identity"),
                identity.path().as_os_str(),
            ],
            ciphertext,
        )
        // identity drops here, removing any temporary plaintext key.
    }
}

/// Decrypt a file (or stdin when `encrypted_file` is `None`) to stdout.
///
/// # Errors
///
/// Returns an error if the ciphertext cannot be read or decryption fails.
pub fn decrypt_age(
    decryptor: &AgeDecryptor,
    encrypted_file: Option<&Path>,
    key_path: &Path,
) -> Result<()> {
    if encrypted_file.is_none() {
        let stderr = std::io::stderr();
        let mut err = stderr.lock();
        let _ = writeln!(err, "{STDIN_PROMPT}");
    }
    let ciphertext = read_ciphertext(encrypted_file, std::io::stdin().lock())?;
    let source = encrypted_file.map_or_else(|| "<stdin>".to_owned(), |p| p.display().to_string());
    info!(%source, "decrypting age secret");
    decryptor.decrypt(&ciphertext, key_path)
}
