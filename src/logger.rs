//! Leveled console output for command-line front ends.
//!
//! [`Logger`] writes human-facing lines to a sink (stdout by default).
//! It is separate from `tracing`, which carries diagnostics; the logger
//! carries what the user asked to see.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Output switches for [`Logger`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct LoggerOptions {
    /// Running under CI: [`Logger::obtrusive`] skips blank-line padding
    pub is_ci: bool,
    /// Commands passed to [`Logger::exec`] are echoed
    pub dry_run: bool,
    /// [`Logger::debug`] and [`Logger::verbose`] produce output
    pub debug: bool,
    /// Nothing is written at all
    pub silent: bool,
}

/// Console logger writing to an injected sink.
///
/// # Example
///
/// ```
/// use req_scheduler::logger::{Logger, LoggerOptions};
///
/// let logger = Logger::with_writer(
///     LoggerOptions { dry_run: true, ..LoggerOptions::default() },
///     Vec::new(),
/// );
/// logger.exec(["curl", "-X", "GET", "https://example.com"]);
/// ```
pub struct Logger {
    options: LoggerOptions,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Logger {
    /// Creates a logger writing to stdout.
    #[must_use]
    pub fn new(options: LoggerOptions) -> Self {
        Self::with_writer(options, io::stdout())
    }

    /// Creates a logger writing to `writer`.
    #[must_use]
    pub fn with_writer<W: Write + Send + 'static>(options: LoggerOptions, writer: W) -> Self {
        Self {
            options,
            sink: Mutex::new(Box::new(writer)),
        }
    }

    /// Returns the logger's options.
    #[must_use]
    pub const fn options(&self) -> LoggerOptions {
        self.options
    }

    /// Writes a line without a level tag.
    pub fn log(&self, message: impl fmt::Display) {
        self.write_line(format_args!("{message}"));
    }

    /// Writes an informational line.
    pub fn info(&self, message: impl fmt::Display) {
        self.write_line(format_args!("info: {message}"));
    }

    /// Writes a warning line.
    pub fn warn(&self, message: impl fmt::Display) {
        self.write_line(format_args!("warn: {message}"));
    }

    /// Writes an error line.
    pub fn error(&self, message: impl fmt::Display) {
        self.write_line(format_args!("error: {message}"));
    }

    /// Writes a debug line when debug output is enabled.
    pub fn debug(&self, message: impl fmt::Display) {
        if self.options.debug {
            self.write_line(format_args!("debug: {message}"));
        }
    }

    /// Writes an untagged line when debug output is enabled.
    pub fn verbose(&self, message: impl fmt::Display) {
        if self.options.debug {
            self.write_line(format_args!("{message}"));
        }
    }

    /// Echoes `$ cmd args...` in dry-run mode; does nothing otherwise.
    ///
    /// Arguments containing shell metacharacters are single-quoted so the
    /// echoed line can be pasted back into a shell.
    pub fn exec<I, S>(&self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.options.dry_run {
            return;
        }
        let line = args
            .into_iter()
            .map(|arg| quote_arg(arg.as_ref()))
            .collect::<Vec<_>>()
            .join(" ");
        self.write_line(format_args!("$ {line}"));
    }

    /// Writes a line surrounded by blank lines, unless running under CI.
    pub fn obtrusive(&self, message: impl fmt::Display) {
        if self.options.is_ci {
            self.write_line(format_args!("{message}"));
        } else {
            self.write_line(format_args!("\n{message}\n"));
        }
    }

    fn write_line(&self, line: fmt::Arguments<'_>) {
        if self.options.silent {
            return;
        }
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        // Console output is best-effort
        let _ = writeln!(sink, "{line}");
        let _ = sink.flush();
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Quotes a single argument for display as a shell word.
fn quote_arg(arg: &str) -> String {
    const SHELL_META: &[char] = &[
        ' ', '\t', '\n', '\'', '"', '\\', '$', '`', '!', '*', '?', '[', ']', '(', ')', '{', '}',
        '<', '>', '|', '&', ';', '#', '~',
    ];

    if arg.is_empty() {
        return "''".to_string();
    }
    if !arg.contains(SHELL_META) {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', "'\\''"))
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
