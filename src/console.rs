/// Colour-aware console printing for CI logs.
///
/// Colour codes come from `tput`, and only when `TERM` is set; CI runners
/// without a terminal get plain text.
use std::ffi::OsStr;
use std::io::Write;

use crate::errors::{DeployerError, Result};
use crate::process;

/// Message colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    Green,
    Red,
    Yellow,
}

impl Colour {
    /// `tput setaf` colour number.
    fn setaf(self) -> &'static str {
        match self {
            Self::Red => "1",
            Self::Green => "2",
            Self::Yellow => "3",
        }
    }
}

/// Whether a terminal is attached, judged by a non-empty `TERM`.
#[must_use]
pub fn has_term() -> bool {
    std::env::var_os("TERM").is_some_and(|t| !t.is_empty())
}

/// Wrap `msg` in bold + colour + reset codes obtained from `query`.
///
/// `query` receives `tput`-style capability arguments. When `term` is false
/// the message is returned unchanged and `query` is never called.
///
/// # Errors
///
/// Propagates any error from `query`.
pub fn paint<F>(msg: &str, colour: Colour, term: bool, query: F) -> Result<String>
where
    F: Fn(&[&str]) -> Result<String>,
{
    if !term {
        return Ok(msg.to_owned());
    }
    let bold = query(&["bold"][..])?;
    let code = query(&["setaf", colour.setaf()][..])?;
    let reset = query(&["sgr0"][..])?;
    Ok(format!("{bold}{code}{msg}{reset}"))
}

/// Print `msg` to stdout in `colour`, falling back to plain text without a terminal.
///
/// # Errors
///
/// Returns an error if the `tput` capability query fails or stdout cannot
/// be written.
pub fn print_colour(tput: &OsStr, msg: &str, colour: Colour) -> Result<()> {
    let line = paint(msg, colour, has_term(), |args| process::capture(tput, args))?;
    write_line(&mut std::io::stdout().lock(), &line)
}

fn write_line(out: &mut impl Write, line: &str) -> Result<()> {
    writeln!(out, "{line}").map_err(DeployerError::Stdout)?;
    out.flush().map_err(DeployerError::Stdout)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn fake_tput(args: &[&str]) -> String {
        match args {
            ["bold"] => "<b>".to_owned(),
            ["setaf", n] => format!("<c{n}>"),
            ["sgr0"] => "</>".to_owned(),
            _ => String::new(),
        }
    }

    fn paint_fake(msg: &str, colour: Colour) -> String {
        paint(msg, colour, true, |args| Ok(fake_tput(args))).unwrap()
    }

    #[test]
    fn test_plain_without_term() {
        let calls = RefCell::new(0);
        let out = paint("deploying", Colour::Green, false, |_| {
            *calls.borrow_mut() += 1;
            Ok(String::new())
        })
        .unwrap();
        assert_eq!(out, "deploying");
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_colours_with_term() {
        assert_eq!(paint_fake("ok", Colour::Green), "<b><c2>ok</>");
        assert_eq!(paint_fake("bad", Colour::Red), "<b><c1>bad</>");
        assert_eq!(paint_fake("hmm", Colour::Yellow), "<b><c3>hmm</>");
    }

    #[test]
    fn test_query_failure_is_fatal() {
        let result = paint("x", Colour::Red, true, |_| {
            Err(DeployerError::Stdin(std::io::Error::other("no terminfo")))
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_write_line_appends_newline() {
        let mut buf = Vec::new();
        write_line(&mut buf, "deployed").unwrap();
        assert_eq!(buf, b"deployed\n");
    }

    #[test]
    fn test_write_failure_is_reported() {
        struct ClosedPipe;
        impl Write for ClosedPipe {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = write_line(&mut ClosedPipe, "deployed").unwrap_err();
        assert!(matches!(err, DeployerError::Stdout(_)));
        assert_eq!(err.code(), "stdout_error");
    }
}
