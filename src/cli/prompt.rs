//! Terminal recovery prompt.

use crate::signer::{RecoveryChoice, RecoveryPrompt};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Asks on stdin/stderr how to recover a missing signtool.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl StdinPrompt {
    fn read_line(question: &str) -> Option<String> {
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "{question}");
        let _ = stderr.flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn read_path(question: &str) -> Option<PathBuf> {
        Self::read_line(question)
            .filter(|answer| !answer.is_empty())
            .map(|answer| PathBuf::from(answer.trim_matches('"')))
    }
}

impl RecoveryPrompt for StdinPrompt {
    fn ask_recovery_choice(&self) -> RecoveryChoice {
        eprintln!("signtool.exe is required to sign files.");
        eprintln!("  [i] Install Windows SDK automatically");
        eprintln!("  [l] Locate signtool.exe manually");
        eprintln!("  [c] Cancel signing");

        loop {
            let Some(answer) = Self::read_line("Choice [i/l/c]: ") else {
                return RecoveryChoice::Abort;
            };
            match parse_choice(&answer) {
                Some(Choice::Install) => return RecoveryChoice::Provision,
                Some(Choice::Locate) => {
                    return match Self::read_path("Path to signtool.exe: ") {
                        Some(path) => RecoveryChoice::ManualPath(path),
                        None => RecoveryChoice::Abort,
                    };
                }
                Some(Choice::Cancel) => return RecoveryChoice::Abort,
                None => eprintln!("Please answer i, l or c."),
            }
        }
    }

    fn manual_install_required(&self, url: &str) -> Option<PathBuf> {
        eprintln!("No package manager (winget/choco) found.");
        eprintln!("Download and install the Windows SDK from: {url}");
        eprintln!("Make sure to select the 'Signing Tools for Windows' component.");
        Self::read_path("Path to signtool.exe once installed (leave empty to cancel): ")
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Choice {
    Install,
    Locate,
    Cancel,
}

fn parse_choice(answer: &str) -> Option<Choice> {
    match answer.to_ascii_lowercase().as_str() {
        "i" | "install" | "y" | "yes" => Some(Choice::Install),
        "l" | "locate" | "n" | "no" => Some(Choice::Locate),
        "c" | "cancel" | "" => Some(Choice::Cancel),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_parse() {
        assert_eq!(parse_choice("I"), Some(Choice::Install));
        assert_eq!(parse_choice("locate"), Some(Choice::Locate));
        assert_eq!(parse_choice(""), Some(Choice::Cancel));
        assert_eq!(parse_choice("maybe"), None);
    }
}
