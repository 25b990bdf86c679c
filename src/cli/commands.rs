//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::{Path, PathBuf};

use framejudge_core::Token;
use framejudge_core::lang::constructs;
use framejudge_core::lang::languages::{self, LanguageId};
use serde::Serialize;

use crate::backend::generator::{check_integer_range, check_support};
use crate::backend::{GeneratedHarness, GeneratorConfig, HarnessGenerator, generate_selector, generate_with_token};
use crate::collect::{self, SinkHistories};
use crate::descriptor::{Context, required_constructs, validate};

use super::{CliError, CliResult, ExitCode};

/// Arguments of `framejudge generate`.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub descriptor: PathBuf,
    pub language: LanguageId,
    pub output: PathBuf,
    pub token: Option<String>,
    pub name: Option<String>,
    pub sink_dir: Option<String>,
}

/// Arguments of `framejudge collect`.
#[derive(Debug, Clone)]
pub struct CollectArgs {
    pub token: String,
    pub values: PathBuf,
    pub exceptions: PathBuf,
    pub stdout: Option<PathBuf>,
    pub stderr: Option<PathBuf>,
    pub expected: usize,
}

/// Manifest printed after `generate`, telling the runner how to run and collect the harness.
#[derive(Debug, Serialize)]
struct Manifest<'a> {
    path: String,
    #[serde(flatten)]
    harness: &'a GeneratedHarness,
}

// ============================================================================
// Commands
// ============================================================================

/// Generate the harness of one context, write it to the output directory and print its manifest.
pub fn generate(args: &GenerateArgs) -> CliResult<ExitCode> {
    let context = load_descriptor(&args.descriptor)?;

    let mut config = GeneratorConfig::new();
    if let Some(name) = &args.name {
        config = config.with_context_name(name.as_str());
    }
    if let Some(dir) = &args.sink_dir {
        config = config.with_sink_dir(dir.as_str());
    }

    let harness = match &args.token {
        Some(raw) => {
            let token = Token::parse(raw).map_err(|e| CliError::failure(format!("Invalid token '{}': {}", raw, e)))?;
            generate_with_token(&context, args.language, &token, &config)
        }
        None => HarnessGenerator::new(config).generate(&context, args.language),
    }
    .map_err(CliError::diagnostic)?;

    validate_output_dir(&args.output)?;
    fs::create_dir_all(&args.output).map_err(|e| {
        CliError::failure(format!(
            "Error creating output directory '{}': {}",
            args.output.display(),
            e
        ))
    })?;
    let path = args.output.join(&harness.file_name);
    fs::write(&path, &harness.source)
        .map_err(|e| CliError::failure(format!("Error writing '{}': {}", path.display(), e)))?;

    let manifest = Manifest {
        path: path.display().to_string(),
        harness: &harness,
    };
    print_json(&manifest)?;
    Ok(ExitCode::SUCCESS)
}

/// Print the selector program for `contexts`.
pub fn selector(language: LanguageId, contexts: &[String]) -> CliResult<ExitCode> {
    let selector = generate_selector(language, contexts, &GeneratorConfig::default()).map_err(CliError::diagnostic)?;
    print!("{}", selector.source);
    Ok(ExitCode::SUCCESS)
}

/// Validate a descriptor and report, per language, whether it can be generated.
///
/// An invalid descriptor fails; a descriptor that only some languages can express succeeds.
pub fn check(descriptor: &Path) -> CliResult<ExitCode> {
    let context = load_descriptor(descriptor)?;
    validate(&context).map_err(|e| CliError::failure(format!("Error: {}", e)))?;

    let used: Vec<&str> = required_constructs(&context)
        .into_iter()
        .map(constructs::as_str)
        .collect();
    println!("constructs: {}", used.join(", "));
    for info in languages::LANGUAGES {
        match check_support(&context, info.id()).and_then(|()| check_integer_range(&context, info.id())) {
            Ok(()) => println!("  {:<12} ok", info.canonical()),
            Err(e) => println!("  {:<12} {}", info.canonical(), e),
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// List every target language with its aliases.
pub fn languages() -> CliResult<ExitCode> {
    for info in languages::LANGUAGES {
        let aliases = if info.item.aliases.is_empty() {
            String::new()
        } else {
            format!(" ({})", info.item.aliases.join(", "))
        };
        let selector = if info.needs_selector { ", selector" } else { "" };
        println!(
            "{}{} .{}{} - {}",
            info.canonical(),
            aliases,
            info.extension,
            selector,
            info.item.description
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Reconstruct per-unit records and print them as JSON.
///
/// A truncated history still prints what was recovered, then exits with failure.
pub fn collect(args: &CollectArgs) -> CliResult<ExitCode> {
    let token = Token::parse(&args.token)
        .map_err(|e| CliError::failure(format!("Invalid token '{}': {}", args.token, e)))?;
    let histories = SinkHistories::read(
        &args.values,
        &args.exceptions,
        args.stdout.as_deref(),
        args.stderr.as_deref(),
    )
    .map_err(CliError::diagnostic)?;
    let collected = collect::collect(token.as_str(), &histories, args.expected).map_err(CliError::diagnostic)?;

    print_json(&collected)?;
    if collected.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn load_descriptor(path: &Path) -> CliResult<Context> {
    let source = fs::read_to_string(path)
        .map_err(|e| CliError::failure(format!("Error reading '{}': {}", path.display(), e)))?;
    Context::from_json(&source)
        .map_err(|e| CliError::failure(format!("Error parsing descriptor '{}': {}", path.display(), e)))
}

fn print_json(value: &impl Serialize) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::failure(format!("Error serializing output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// Validate an output directory path for safety.
///
/// Rejects paths containing `..` components to prevent writing outside the intended location.
fn validate_output_dir(path: &Path) -> CliResult<()> {
    for component in path.components() {
        if let std::path::Component::ParentDir = component {
            return Err(CliError::failure(format!(
                "Output directory '{}' contains path traversal (..)",
                path.display()
            )));
        }
    }

    // Warn about absolute paths (but allow them for flexibility)
    if path.is_absolute() {
        tracing::warn!(
            "Using absolute output path: {}. Consider using a relative path.",
            path.display()
        );
    }

    Ok(())
}
