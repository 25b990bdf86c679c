//! CLI module for framejudge
//!
//! This module provides the command-line interface a judge runner drives.
//!
//! ## Commands
//!
//! - `generate <descriptor> -l <lang>` - Write a harness and print its manifest
//! - `selector -l <lang> <context>...` - Print a selector program
//! - `check <descriptor>` - Validate a descriptor and report per-language support
//! - `languages` - List the target language registry
//! - `collect` - Reconstruct per-unit records from sink histories
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use framejudge_core::lang::languages::LanguageId;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a library diagnostic with its code and help text.
    pub fn diagnostic(err: impl miette::Diagnostic + Send + Sync + 'static) -> Self {
        Self::failure(format!("{:?}", miette::Report::new(err)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Separator-framed harness generator for a grading judge
#[derive(Parser, Debug)]
#[command(name = "framejudge")]
#[command(version = VERSION)]
#[command(about = "Generate and collect separator-framed test harnesses", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the harness of one context and print its manifest
    Generate {
        /// Context descriptor (JSON)
        #[arg(value_name = "DESCRIPTOR")]
        descriptor: PathBuf,
        /// Target language
        #[arg(short, long = "language", value_name = "LANG")]
        language: LanguageId,
        /// Directory the harness is written to
        #[arg(short, long = "output", value_name = "DIR", default_value = ".")]
        output: PathBuf,
        /// Use this token instead of allocating one
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,
        /// Context name before conventionalization
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
        /// Directory of the value and exception files, as the harness sees it
        #[arg(long = "sink-dir", value_name = "DIR")]
        sink_dir: Option<String>,
    },

    /// Print a selector program for languages that compile contexts together
    Selector {
        /// Target language
        #[arg(short, long = "language", value_name = "LANG")]
        language: LanguageId,
        /// Context names before conventionalization
        #[arg(value_name = "CONTEXT", required = true)]
        contexts: Vec<String>,
    },

    /// Validate a descriptor and report which languages can run it
    Check {
        /// Context descriptor (JSON)
        #[arg(value_name = "DESCRIPTOR")]
        descriptor: PathBuf,
    },

    /// List supported target languages
    Languages,

    /// Reconstruct per-unit records from the sink histories of one run
    Collect {
        /// Token the harness was generated with
        #[arg(long, value_name = "TOKEN")]
        token: String,
        /// Value sink history
        #[arg(long, value_name = "FILE")]
        values: PathBuf,
        /// Exception sink history
        #[arg(long, value_name = "FILE")]
        exceptions: PathBuf,
        /// Captured standard output
        #[arg(long, value_name = "FILE")]
        stdout: Option<PathBuf>,
        /// Captured standard error
        #[arg(long, value_name = "FILE")]
        stderr: Option<PathBuf>,
        /// Separator count of a complete run (from the manifest)
        #[arg(long, value_name = "N")]
        expected: usize,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Generate {
            descriptor,
            language,
            output,
            token,
            name,
            sink_dir,
        } => commands::generate(&commands::GenerateArgs {
            descriptor,
            language,
            output,
            token,
            name,
            sink_dir,
        }),
        Command::Selector { language, contexts } => commands::selector(language, &contexts),
        Command::Check { descriptor } => commands::check(&descriptor),
        Command::Languages => commands::languages(),
        Command::Collect {
            token,
            values,
            exceptions,
            stdout,
            stderr,
            expected,
        } => commands::collect(&commands::CollectArgs {
            token,
            values,
            exceptions,
            stdout,
            stderr,
            expected,
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::try_parse_from(["framejudge", "generate", "ctx.json", "-l", "python", "--name", "context_1_2"])
            .unwrap();
        if let Command::Generate {
            language, name, output, ..
        } = cli.command
        {
            assert_eq!(language, LanguageId::Python);
            assert_eq!(name.as_deref(), Some("context_1_2"));
            assert_eq!(output, PathBuf::from("."));
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cli_parse_language_alias() {
        let cli = Cli::try_parse_from(["framejudge", "generate", "ctx.json", "-l", "c#"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Generate {
                language: LanguageId::CSharp,
                ..
            }
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_language() {
        assert!(Cli::try_parse_from(["framejudge", "generate", "ctx.json", "-l", "cobol"]).is_err());
    }

    #[test]
    fn test_cli_parse_selector() {
        let cli = Cli::try_parse_from(["framejudge", "selector", "-l", "java", "context_0_0", "context_0_1"]).unwrap();
        if let Command::Selector { contexts, .. } = cli.command {
            assert_eq!(contexts.len(), 2);
        } else {
            panic!("Expected Selector command");
        }
    }

    #[test]
    fn test_cli_selector_requires_a_context() {
        assert!(Cli::try_parse_from(["framejudge", "selector", "-l", "java"]).is_err());
    }

    #[test]
    fn test_cli_parse_collect() {
        let cli = Cli::try_parse_from([
            "framejudge",
            "collect",
            "--token",
            "abcdEFGH12",
            "--values",
            "v.txt",
            "--exceptions",
            "e.txt",
            "--expected",
            "3",
        ])
        .unwrap();
        if let Command::Collect {
            expected, stdout, ..
        } = cli.command
        {
            assert_eq!(expected, 3);
            assert!(stdout.is_none());
        } else {
            panic!("Expected Collect command");
        }
    }
}
