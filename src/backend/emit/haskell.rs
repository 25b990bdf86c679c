//! Haskell harness emitter.
//!
//! The harness is a `Main` module run with `runhaskell`. Sink handles are opened in `main` and passed to top-level
//! helpers; the units run in one `do` block under `finally`, which closes both handles.
//!
//! Bindings are immutable, so an assignment is a fresh `<-` binding that falls back to the previous value (or the
//! type's default on first use) when the right-hand side throws. `evaluate` only forces weak head normal form;
//! a failure deeper inside an assigned value surfaces in the unit that sends it.

use framejudge_core::lang::conventions::NamingConventions;
use framejudge_core::lang::languages::{self, LanguageId};

use super::expr::ExprSyntax;
use super::strings::{quote_haskell, real};
use super::{HarnessEmitter, HarnessNames};
use crate::backend::errors::GenerationError;
use crate::backend::plan::{HarnessPlan, TestcaseUnit};
use crate::backend::writer::SourceWriter;
use crate::descriptor::{Command, ExceptionChannel, MainInvocation, ValueChannel, VarType};

pub struct HaskellEmitter {
    names: HarnessNames,
    out: SourceWriter,
}

struct HaskellSyntax;

/// Wrap negative numbers so they can be passed as arguments.
fn signed(text: String) -> String {
    if text.starts_with('-') {
        format!("({text})")
    } else {
        text
    }
}

impl ExprSyntax for HaskellSyntax {
    fn naming(&self) -> NamingConventions {
        languages::info_for(LanguageId::Haskell).naming
    }

    fn text(&self, value: &str) -> String {
        quote_haskell(value)
    }

    fn integer(&self, value: i64) -> String {
        signed(value.to_string())
    }

    fn real(&self, value: f64) -> String {
        if value.is_nan() {
            "(0 / 0 :: Double)".to_string()
        } else if value.is_infinite() {
            let sign = if value > 0.0 { "" } else { "-" };
            format!("({sign}1 / 0 :: Double)")
        } else {
            signed(real(value))
        }
    }

    fn boolean(&self, value: bool) -> String {
        let literal = if value { "True" } else { "False" };
        literal.to_string()
    }

    fn nothing(&self) -> String {
        "()".to_string()
    }

    fn function(&self, name: &str, arguments: &[String]) -> String {
        let name = self.naming().function.apply(name);
        if arguments.is_empty() {
            name
        } else {
            format!("({} {})", name, arguments.join(" "))
        }
    }
}

/// Haskell type and default value of a declared variable.
fn haskell_type(ty: &VarType) -> Result<(String, String), GenerationError> {
    Ok(match ty {
        VarType::Integer => ("Int".into(), "0".into()),
        VarType::Real => ("Double".into(), "0.0".into()),
        VarType::Text => ("String".into(), "\"\"".into()),
        VarType::Boolean => ("Bool".into(), "False".into()),
        VarType::Sequence(inner) => (format!("[{}]", haskell_type(inner)?.0), "[]".into()),
        VarType::Custom(_) => {
            return Err(GenerationError::Unsupported {
                language: LanguageId::Haskell,
                construct: "class-typed variables",
            });
        }
    })
}

fn unsupported_oracle() -> GenerationError {
    GenerationError::Unsupported {
        language: LanguageId::Haskell,
        construct: "evaluation",
    }
}

impl HaskellEmitter {
    pub fn new(names: HarnessNames) -> Self {
        let out = SourceWriter::new(names.indent_width);
        Self { names, out }
    }

    /// Run `action` under `try` and record its outcome on the exception sink.
    fn guarded(&mut self, action: &str) {
        self.out.writeln(&format!("harnessResult <- try ({action})"));
        self.out.writeln("recordOutcome exceptionFile harnessResult");
    }
}

impl HarnessEmitter for HaskellEmitter {
    fn prologue(&mut self, _plan: &HarnessPlan<'_>) -> Result<(), GenerationError> {
        for import in [
            "Control.Exception (SomeException, evaluate, finally, try)",
            "System.Environment (withArgs)",
            "System.IO",
            "qualified Values",
        ] {
            self.out.writeln(&format!("import {import}"));
        }
        let submission = &self.names.submission;
        self.out.writeln(&format!("import {submission} hiding (main)"));
        self.out.writeln(&format!("import qualified {submission}"));
        self.out.newline();

        let frame = quote_haskell(&self.names.frame);
        self.out.writeln("writeSeparator :: Handle -> Handle -> IO ()");
        self.out.block("writeSeparator valueFile exceptionFile = do", "", |w| {
            for sink in ["valueFile", "exceptionFile", "stdout", "stderr"] {
                w.writeln(&format!("hPutStr {sink} {frame}"));
                w.writeln(&format!("hFlush {sink}"));
            }
        });
        self.out.newline();

        self.out.block("sendValue valueFile value = do", "", |w| {
            w.writeln("Values.sendValue valueFile value");
            w.writeln("hFlush valueFile");
        });
        self.out.newline();

        self.out.writeln("sendException :: Handle -> Maybe SomeException -> IO ()");
        self.out.block("sendException exceptionFile exception = do", "", |w| {
            w.writeln("Values.sendException exceptionFile exception");
            w.writeln("hFlush exceptionFile");
        });
        self.out.newline();

        self.out.writeln("recordOutcome :: Handle -> Either SomeException a -> IO ()");
        self.out
            .writeln("recordOutcome exceptionFile (Left harnessError) = sendException exceptionFile (Just harnessError)");
        self.out.writeln("recordOutcome exceptionFile (Right _) = sendException exceptionFile Nothing");
        self.out.newline();

        self.out.writeln("main :: IO ()");
        self.out.writeln("main = do");
        self.out.indent();
        self.out.writeln(&format!(
            "valueFile <- openFile {} WriteMode",
            quote_haskell(&self.names.value_path)
        ));
        self.out.writeln(&format!(
            "exceptionFile <- openFile {} WriteMode",
            quote_haskell(&self.names.exception_path)
        ));
        self.out.writeln("flip finally (hClose valueFile >> hClose exceptionFile) $ do");
        self.out.indent();
        Ok(())
    }

    fn before(&mut self, code: &str) -> Result<(), GenerationError> {
        self.out.write_raw(code);
        Ok(())
    }

    fn separator(&mut self) -> Result<(), GenerationError> {
        self.out.writeln("writeSeparator valueFile exceptionFile");
        Ok(())
    }

    fn main_unit(&mut self, main: &MainInvocation) -> Result<(), GenerationError> {
        if let ExceptionChannel::Specific { .. } = main.exception {
            return Err(unsupported_oracle());
        }
        let arguments: Vec<String> = main.arguments.iter().map(|a| quote_haskell(a)).collect();
        let action = format!("withArgs [{}] {}.main", arguments.join(", "), self.names.submission);
        self.guarded(&action);
        Ok(())
    }

    fn testcase(&mut self, unit: &TestcaseUnit<'_>) -> Result<(), GenerationError> {
        if let ExceptionChannel::Specific { .. } = unit.exception() {
            return Err(unsupported_oracle());
        }
        let expression = HaskellSyntax.render(unit.command().expression());
        match (unit.command(), &unit.value) {
            (Command::Assignment { variable, ty, .. }, _) => {
                let name = HaskellSyntax.identifier(variable);
                let (ty, default) = haskell_type(ty)?;
                let fallback = if unit.declare { default } else { name.clone() };
                self.out.writeln(&format!("harnessResult <- try (evaluate ({expression}))"));
                self.out.writeln(&format!(
                    "{name} <- pure (either (const ({fallback})) id harnessResult :: {ty})"
                ));
                self.out.writeln("recordOutcome exceptionFile harnessResult");
            }
            (Command::Expression { .. }, ValueChannel::Ignored) => {
                self.guarded(&format!("() <$ evaluate ({expression})"));
            }
            (Command::Expression { .. }, ValueChannel::Value) => {
                self.guarded(&format!("sendValue valueFile ({expression})"));
            }
            (Command::Expression { .. }, ValueChannel::Specific { .. }) => return Err(unsupported_oracle()),
        }
        Ok(())
    }

    fn after(&mut self, code: &str) -> Result<(), GenerationError> {
        self.out.write_raw(code);
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<String, GenerationError> {
        // A `do` block must end in an expression.
        self.out.writeln("pure ()");
        self.out.dedent();
        self.out.dedent();
        Ok(self.out.finish())
    }
}
