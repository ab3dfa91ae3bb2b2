/// CLI argument definitions via clap derive.
use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_AGE, DEFAULT_SOPS, DEFAULT_TPUT, Tools};
use crate::secrets::DEFAULT_KEY_PATH;

/// deployer — helpers for deploying hubs from CI.
#[derive(Debug, Parser)]
#[command(
    name = "deployer",
    about = "Decrypt secrets, post deployment plans, and run cloud CLIs with scoped credentials",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output format for results and errors. Auto-detects: text when TTY, json when piped.
    #[arg(long, global = true, value_name = "FORMAT", default_value = "auto")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Log debug detail to stderr (`RUST_LOG` takes precedence).
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(flatten)]
    pub tools: ToolArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Locations of external programs.
#[derive(Debug, Args)]
pub struct ToolArgs {
    /// `age` binary.
    #[arg(
        long = "age-bin",
        global = true,
        env = "DEPLOYER_AGE_BIN",
        default_value = DEFAULT_AGE
    )]
    pub age: OsString,

    /// `sops` binary.
    #[arg(
        long = "sops-bin",
        global = true,
        env = "DEPLOYER_SOPS_BIN",
        default_value = DEFAULT_SOPS
    )]
    pub sops: OsString,

    /// `tput` binary.
    #[arg(
        long = "tput-bin",
        global = true,
        env = "DEPLOYER_TPUT_BIN",
        default_value = DEFAULT_TPUT
    )]
    pub tput: OsString,
}

impl From<&ToolArgs> for Tools {
    fn from(args: &ToolArgs) -> Self {
        Self {
            age: args.age.clone(),
            sops: args.sops.clone(),
            tput: args.tput.clone(),
        }
    }
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Auto-detect: text when stdout is a TTY, json when piped.
    #[default]
    Auto,
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// All subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decrypt an age-encrypted secret sent by a user.
    DecryptAge(DecryptAgeArgs),
    /// Write the deployment-plan comment for a pull request.
    Comment(CommentArgs),
    /// Run a command with cloud credentials set in its environment.
    #[command(subcommand)]
    Exec(ExecCommand),
}

/// Arguments for `deployer decrypt-age`.
#[derive(Debug, Parser)]
pub struct DecryptAgeArgs {
    /// Path to the age-encrypted file. Leave empty to read from stdin.
    pub encrypted_file: Option<PathBuf>,

    /// Path to the sops-encrypted age private key used to decrypt. Relative
    /// paths resolve against the current working directory, so the default
    /// only works when run from the repository root.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_KEY_PATH)]
    pub key_path: PathBuf,
}

/// Arguments for `deployer comment`.
#[derive(Debug, Parser)]
pub struct CommentArgs {
    /// JSON array of support and staging upgrade jobs.
    #[arg(long, value_name = "JSON", default_value = "[]")]
    pub support_staging_matrix: String,

    /// JSON array of production hub upgrade jobs.
    #[arg(long, value_name = "JSON", default_value = "[]")]
    pub prod_matrix: String,

    /// Directory to write comment-body.txt into.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

/// Cloud providers for `deployer exec`.
#[derive(Debug, Subcommand)]
pub enum ExecCommand {
    /// Authenticate with a GCP service-account key file.
    Gcp(ExecArgs),
    /// Authenticate with an AWS access-key JSON file.
    Aws(ExecArgs),
}

/// Arguments shared by `deployer exec` providers.
#[derive(Debug, Parser)]
pub struct ExecArgs {
    /// Path to the (optionally sops-encrypted) credentials file.
    #[arg(long, value_name = "PATH")]
    pub key_path: PathBuf,

    /// Command to run, after `--`.
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<OsString>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrypt_age_defaults() {
        let cli = Cli::try_parse_from(["deployer", "decrypt-age"]).unwrap();
        let Command::DecryptAge(args) = cli.command else {
            panic!("expected decrypt-age");
        };
        assert!(args.encrypted_file.is_none());
        assert_eq!(args.key_path, PathBuf::from(DEFAULT_KEY_PATH));
    }

    #[test]
    fn test_decrypt_age_with_file() {
        let cli = Cli::try_parse_from([
            "deployer",
            "decrypt-age",
            "secret.age",
            "--key-path",
            "k.json",
        ])
        .unwrap();
        let Command::DecryptAge(args) = cli.command else {
            panic!("expected decrypt-age");
        };
        assert_eq!(args.encrypted_file, Some(PathBuf::from("secret.age")));
        assert_eq!(args.key_path, PathBuf::from("k.json"));
    }

    #[test]
    fn test_exec_collects_trailing_command() {
        let cli = Cli::try_parse_from([
            "deployer",
            "exec",
            "gcp",
            "--key-path",
            "sa.json",
            "--",
            "gcloud",
            "container",
            "clusters",
            "list",
        ])
        .unwrap();
        let Command::Exec(ExecCommand::Gcp(args)) = cli.command else {
            panic!("expected exec gcp");
        };
        assert_eq!(args.command.len(), 4);
        assert_eq!(args.command[0], "gcloud");
    }

    #[test]
    fn test_exec_requires_command() {
        assert!(Cli::try_parse_from(["deployer", "exec", "aws", "--key-path", "k.json"]).is_err());
    }

    #[test]
    fn test_json_conflicts_with_output() {
        let result = Cli::try_parse_from(["deployer", "--json", "--output", "text", "comment"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_tool_flags_keep_bin_suffix() {
        let cli = Cli::try_parse_from([
            "deployer",
            "--age-bin",
            "/opt/age/age",
            "--sops-bin",
            "/opt/sops",
            "comment",
        ])
        .unwrap();
        let tools = Tools::from(&cli.tools);
        assert_eq!(tools.age, "/opt/age/age");
        assert_eq!(tools.sops, "/opt/sops");
    }

    #[test]
    fn test_key_path_help_mentions_working_directory() {
        use clap::CommandFactory;
        let cmd = Cli::command();
        let decrypt = cmd.find_subcommand("decrypt-age").unwrap();
        let key_path = decrypt
            .get_arguments()
            .find(|arg| arg.get_id() == "key_path")
            .unwrap();
        let help = key_path.get_help().unwrap().to_string();
        assert!(help.contains("current working directory"));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
