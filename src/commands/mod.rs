/// Command dispatch: routes `Command` enum variants to their implementations.
pub mod comment;
pub mod decrypt_age;
pub mod exec;

use crate::cli::OutputCtx;
use crate::cli::args::Command;
use crate::config::Tools;
use crate::errors::Result;

/// Dispatch a parsed `Command` to its handler.
///
/// # Errors
///
/// Returns `DeployerError` on any command failure.
pub fn dispatch(command: &Command, ctx: &OutputCtx, tools: &Tools) -> Result<()> {
    match command {
        Command::DecryptAge(args) => decrypt_age::run(args, tools),
        Command::Comment(args) => comment::run(args, ctx),
        Command::Exec(exec) => exec::run(exec, ctx, tools),
    }
}
