/// Command-line surface: clap definitions and result/error rendering.
pub mod args;
pub mod output;

pub use args::Cli;
pub use output::{OutputCtx, write_error};
