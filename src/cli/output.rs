//! Colored terminal output.

use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Writes status lines to the terminal, honoring verbose and quiet modes.
///
/// Progress and success go to stdout; warnings and errors go to stderr and
/// are printed even in quiet mode. With stdout reserved for a report, every
/// status line goes to stderr and only [`OutputManager::println`] uses stdout.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    stdout_reserved: bool,
    color_choice: ColorChoice,
}

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        let color_choice = if std::env::var_os("NO_COLOR").is_some() {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        Self {
            verbose,
            quiet,
            stdout_reserved: false,
            color_choice,
        }
    }

    /// Keep stdout for machine-readable output.
    pub fn reserve_stdout(mut self) -> Self {
        self.stdout_reserved = true;
        self
    }

    /// Detail line, only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        self.write_stdout(None, false, &format!("  {message}"))
    }

    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_stdout(Some(Color::Cyan), false, message)
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_stdout(Some(Color::Green), true, message)
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.write_stderr(Some(Color::Yellow), true, &format!("Warning: {message}"))
    }

    pub fn error(&self, message: &str) -> io::Result<()> {
        self.write_stderr(Some(Color::Red), true, message)
    }

    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_stdout(Some(Color::White), true, &format!("\n=== {title} ==="))
    }

    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_stdout(None, false, &format!("  {message}"))
    }

    /// Unconditional plain line on stdout, used for machine-readable output.
    pub fn println(&self, message: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{message}")
    }

    fn write_stdout(&self, color: Option<Color>, bold: bool, message: &str) -> io::Result<()> {
        if self.stdout_reserved {
            return self.write_stderr(color, bold, message);
        }
        let mut stream = StandardStream::stdout(self.color_choice);
        write_colored(&mut stream, color, bold, message)
    }

    fn write_stderr(&self, color: Option<Color>, bold: bool, message: &str) -> io::Result<()> {
        let mut stream = StandardStream::stderr(self.color_choice);
        write_colored(&mut stream, color, bold, message)
    }
}

fn write_colored(
    stream: &mut StandardStream,
    color: Option<Color>,
    bold: bool,
    message: &str,
) -> io::Result<()> {
    stream.set_color(ColorSpec::new().set_fg(color).set_bold(bold))?;
    writeln!(stream, "{message}")?;
    stream.reset()
}
