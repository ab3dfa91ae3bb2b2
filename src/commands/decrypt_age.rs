/// `decrypt-age` command: decrypt a secret a user sent us with age.
use crate::cli::args::DecryptAgeArgs;
use crate::config::Tools;
use crate::errors::Result;
use crate::secrets::{AgeDecryptor, decrypt_age};

/// Run `deployer decrypt-age`.
///
/// Plaintext goes to stdout through `age` itself, so no output format applies.
///
/// # Errors
///
/// Returns `DeployerError` if the ciphertext or key cannot be read, or if
/// sops or age fail.
pub fn run(args: &DecryptAgeArgs, tools: &Tools) -> Result<()> {
    let decryptor = AgeDecryptor::new(tools.age.clone(), tools.sops.clone());
    decrypt_age(&decryptor, args.encrypted_file.as_deref(), &args.key_path)
}
