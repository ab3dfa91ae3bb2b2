/// Output formatting: text or JSON results and errors. TTY detection.
use std::ffi::{OsStr, OsString};
use std::io::{IsTerminal, Write};

use serde::Serialize;

use super::args::OutputFormat;
use crate::console::{Colour, has_term, paint, print_colour};
use crate::errors::Result;
use crate::process;
use crate::types::ErrorOutput;

/// Resolve the effective output format, handling `--json` flag and TTY auto-detection.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        return OutputFormat::Json;
    }
    if fmt == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Text
        } else {
            OutputFormat::Json
        }
    } else {
        fmt
    }
}

/// Output context passed to all commands.
pub struct OutputCtx {
    pub format: OutputFormat,
    /// `tput` binary for coloured text output.
    pub tput: OsString,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, tput: OsString) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            tput,
        }
    }

    /// Report a result: coloured `message` in text mode, `value` in JSON mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal capability query fails or stdout
    /// cannot be written.
    pub fn report<T: Serialize>(&self, value: &T, message: &str, colour: Colour) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                print_json(value);
                Ok(())
            }
            OutputFormat::Text | OutputFormat::Auto => print_colour(&self.tput, message, colour),
        }
    }

    /// Print a coloured status line in text mode; silent in JSON mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal capability query fails or stdout
    /// cannot be written.
    pub fn status(&self, message: &str, colour: Colour) -> Result<()> {
        match self.format {
            OutputFormat::Json => Ok(()),
            OutputFormat::Text | OutputFormat::Auto => print_colour(&self.tput, message, colour),
        }
    }
}

/// Write a structured error to stderr, in red when a terminal is attached.
pub fn write_error(err: &ErrorOutput, format: OutputFormat, json_flag: bool, tput: &OsStr) {
    let fmt = resolve_format(format, json_flag);
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    match fmt {
        OutputFormat::Json => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        OutputFormat::Text | OutputFormat::Auto => {
            let plain = format!("Error: {}", err.error.message);
            // Already failing: fall back to plain text rather than mask the error.
            let line = paint(&plain, Colour::Red, has_term(), |args| {
                process::capture(tput, args)
            })
            .unwrap_or(plain);
            let _ = writeln!(out, "{line}");
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_flag_wins() {
        assert_eq!(resolve_format(OutputFormat::Text, true), OutputFormat::Json);
    }

    #[test]
    fn test_explicit_format_kept() {
        assert_eq!(resolve_format(OutputFormat::Text, false), OutputFormat::Text);
        assert_eq!(resolve_format(OutputFormat::Json, false), OutputFormat::Json);
    }

    #[test]
    fn test_auto_resolves_to_concrete_format() {
        let fmt = resolve_format(OutputFormat::Auto, false);
        assert_ne!(fmt, OutputFormat::Auto);
    }
}
