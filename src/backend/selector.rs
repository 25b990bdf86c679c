//! Selector programs for languages that compile every context of a run together.
//!
//! A selector is the single entry point of such a build. Its first argument names the context to run; the remaining
//! arguments are passed on. An unknown name is a runner bug, so the selector prints it and exits non-zero without
//! touching any sink.

use framejudge_core::lang::languages::{self, LanguageId};

use super::config::GeneratorConfig;
use super::emit::csharp::NAMESPACE;
use super::emit::strings::quote_json;
use super::errors::GenerationError;
use super::writer::SourceWriter;

/// A generated selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSelector {
    pub file_name: String,
    pub source: String,
}

/// Generate the selector dispatching to `contexts` (unconventionalized context names).
pub fn generate_selector(
    language: LanguageId,
    contexts: &[String],
    config: &GeneratorConfig,
) -> Result<GeneratedSelector, GenerationError> {
    let info = languages::info_for(language);
    if !info.needs_selector {
        return Err(GenerationError::SelectorNotNeeded(language));
    }
    if contexts.is_empty() {
        return Err(GenerationError::EmptySelector);
    }
    let classes: Vec<String> = contexts.iter().map(|c| info.naming.class.apply(c)).collect();
    let mut out = SourceWriter::new(config.indent_width);

    match language {
        LanguageId::Java => {
            out.block("public class Selector {", "}", |w| {
                w.block("public static void main(String[] args) throws Exception {", "}", |w| {
                    w.writeln("String name = args[0];");
                    w.writeln("String[] rest = java.util.Arrays.copyOfRange(args, 1, args.length);");
                    w.block("switch (name) {", "}", |w| {
                        for class in &classes {
                            w.block(&format!("case {}:", quote_json(class)), "", |w| {
                                w.writeln(&format!("{class}.main(rest);"));
                                w.writeln("break;");
                            });
                        }
                        w.block("default:", "", |w| {
                            w.writeln("System.err.println(\"Non-existing context '\" + name + \"' selected.\");");
                            w.writeln("System.exit(1);");
                        });
                    });
                });
            });
        }
        LanguageId::Kotlin => {
            out.block("fun main(args: Array<String>) {", "}", |w| {
                w.writeln("val rest = args.copyOfRange(1, args.size)");
                w.block("when (args[0]) {", "}", |w| {
                    for class in &classes {
                        w.writeln(&format!("{} -> {class}.main(rest)", quote_json(class)));
                    }
                    w.block("else -> {", "}", |w| {
                        w.writeln("System.err.println(\"Non-existing context '${args[0]}' selected.\")");
                        w.writeln("kotlin.system.exitProcess(1)");
                    });
                });
            });
        }
        LanguageId::CSharp => {
            out.writeln(&format!("namespace {NAMESPACE}"));
            out.block("{", "}", |w| {
                w.writeln("public class Selector");
                w.block("{", "}", |w| {
                    w.writeln("public static void Main(string[] args)");
                    w.block("{", "}", |w| {
                        w.writeln("string[] rest = args[1..];");
                        w.writeln("switch (args[0])");
                        w.block("{", "}", |w| {
                            for class in &classes {
                                w.block(&format!("case {}:", quote_json(class)), "", |w| {
                                    w.writeln(&format!("{class}.Main(rest);"));
                                    w.writeln("break;");
                                });
                            }
                            w.block("default:", "", |w| {
                                w.writeln(
                                    "System.Console.Error.WriteLine(\"Non-existing context '\" + args[0] + \"' selected.\");",
                                );
                                w.writeln("System.Environment.Exit(1);");
                                w.writeln("break;");
                            });
                        });
                    });
                });
            });
        }
        // `needs_selector` is false for every other language.
        other => return Err(GenerationError::SelectorNotNeeded(other)),
    }

    tracing::debug!(language = %language, contexts = classes.len(), "generated selector");
    Ok(GeneratedSelector {
        file_name: format!("Selector.{}", info.extension),
        source: out.finish(),
    })
}
