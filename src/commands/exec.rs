/// `exec` command: run a cloud CLI with scoped credentials.
use crate::auth::{AwsCredentials, with_aws_auth, with_gcp_auth};
use crate::cli::OutputCtx;
use crate::cli::args::{ExecArgs, ExecCommand};
use crate::config::Tools;
use crate::console::Colour;
use crate::errors::{DeployerError, Result};
use crate::process;
use crate::secrets::get_decrypted_file;

/// Run `deployer exec {gcp|aws}`.
///
/// The decrypted key file and the credential environment both live only
/// for the duration of the child process.
///
/// # Errors
///
/// Returns key acquisition errors, `ParseKeyFile` for malformed AWS keys,
/// `EmptyCommand` if there is nothing to run, and `Spawn`/`CommandFailed`
/// if the command fails.
pub fn run(command: &ExecCommand, ctx: &OutputCtx, tools: &Tools) -> Result<()> {
    match command {
        ExecCommand::Gcp(args) => {
            let key = get_decrypted_file(&tools.sops, &args.key_path)?;
            with_gcp_auth(key.path(), || run_child(args, ctx, "GCP"))
        }
        ExecCommand::Aws(args) => {
            let key = get_decrypted_file(&tools.sops, &args.key_path)?;
            let credentials = AwsCredentials::from_file(key.path())?;
            with_aws_auth(&credentials, || run_child(args, ctx, "AWS"))
        }
    }
}

fn run_child(args: &ExecArgs, ctx: &OutputCtx, provider: &str) -> Result<()> {
    let Some((program, rest)) = args.command.split_first() else {
        return Err(DeployerError::EmptyCommand);
    };
    ctx.status(
        &format!(
            "Running {} with {provider} credentials",
            program.to_string_lossy()
        ),
        Colour::Yellow,
    )?;
    process::run(program, rest)
}
