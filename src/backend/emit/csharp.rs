//! C# harness emitter.

use framejudge_core::lang::conventions::NamingConventions;
use framejudge_core::lang::languages::{self, LanguageId};

use super::expr::ExprSyntax;
use super::strings::quote_json;
use super::unit::SendApi;
use super::{HarnessEmitter, HarnessNames};
use crate::backend::errors::{GenerationError, UnitLabel};
use crate::backend::plan::{HarnessPlan, TestcaseUnit};
use crate::backend::writer::SourceWriter;
use crate::descriptor::{Command, MainInvocation, VarType};

const API: SendApi = SendApi::PASCAL;

/// Namespace every generated class and the submission live in.
pub const NAMESPACE: &str = "Tested";

pub struct CSharpEmitter {
    names: HarnessNames,
    out: SourceWriter,
    syntax: CSharpSyntax,
}

struct CSharpSyntax {
    submission: String,
}

impl ExprSyntax for CSharpSyntax {
    fn naming(&self) -> NamingConventions {
        languages::info_for(LanguageId::CSharp).naming
    }

    fn submission(&self) -> Option<&str> {
        Some(&self.submission)
    }

    fn integer(&self, value: i64) -> String {
        if i32::try_from(value).is_ok() {
            value.to_string()
        } else {
            format!("{value}L")
        }
    }

    fn real(&self, value: f64) -> String {
        if value.is_nan() {
            "double.NaN".to_string()
        } else if value.is_infinite() {
            let name = if value > 0.0 { "PositiveInfinity" } else { "NegativeInfinity" };
            format!("double.{name}")
        } else {
            super::strings::real(value)
        }
    }

    fn sequence(&self, elements: &[String]) -> String {
        if elements.is_empty() {
            "new List<object>()".to_string()
        } else {
            format!("new[] {{ {} }}.ToList()", elements.join(", "))
        }
    }
}

fn csharp_type(ty: &VarType) -> String {
    match ty {
        VarType::Integer => "int".to_string(),
        VarType::Real => "double".to_string(),
        VarType::Text => "string".to_string(),
        VarType::Boolean => "bool".to_string(),
        VarType::Sequence(inner) => format!("List<{}>", csharp_type(inner)),
        VarType::Custom(name) => format!("{name}?"),
    }
}

fn default_value(ty: &VarType) -> String {
    match ty {
        VarType::Integer => "0".to_string(),
        VarType::Real => "0.0".to_string(),
        VarType::Text => "\"\"".to_string(),
        VarType::Boolean => "false".to_string(),
        VarType::Sequence(_) => format!("new {}()", csharp_type(ty)),
        VarType::Custom(_) => "null".to_string(),
    }
}

impl CSharpEmitter {
    pub fn new(names: HarnessNames) -> Self {
        let out = SourceWriter::new(names.indent_width);
        let syntax = CSharpSyntax {
            submission: names.submission.clone(),
        };
        Self { names, out, syntax }
    }

    /// Allman-style block: header, `{`, body, `}`.
    fn braced(out: &mut SourceWriter, header: &str, body: impl FnOnce(&mut SourceWriter)) {
        out.writeln(header);
        out.block("{", "}", body);
    }

    fn unit(&mut self, primary: &str, on_success: &str, on_error: &str) {
        Self::braced(&mut self.out, "try", |w| {
            w.writeln(&format!("{primary};"));
            w.writeln(&format!("{on_success};"));
        });
        Self::braced(&mut self.out, &format!("catch (Exception {})", API.error), |w| {
            w.writeln(&format!("{on_error};"));
        });
    }
}

impl HarnessEmitter for CSharpEmitter {
    fn prologue(&mut self, _plan: &HarnessPlan<'_>) -> Result<(), GenerationError> {
        let class = self.names.context.clone();
        let frame = quote_json(&self.names.frame);

        for using in ["System", "System.IO", "System.Linq", "System.Collections.Generic"] {
            self.out.writeln(&format!("using {using};"));
        }
        self.out.newline();
        self.out.writeln(&format!("namespace {NAMESPACE}"));
        self.out.writeln("{");
        self.out.indent();
        self.out.writeln(&format!("public class {class} : IDisposable"));
        self.out.writeln("{");
        self.out.indent();
        self.out.writeln(&format!(
            "private readonly StreamWriter valueWriter = new StreamWriter({});",
            quote_json(&self.names.value_path)
        ));
        self.out.writeln(&format!(
            "private readonly StreamWriter exceptionWriter = new StreamWriter({});",
            quote_json(&self.names.exception_path)
        ));
        self.out.newline();
        Self::braced(&mut self.out, "private void WriteSeparator()", |w| {
            for sink in ["valueWriter", "exceptionWriter", "Console.Out", "Console.Error"] {
                w.writeln(&format!("{sink}.Write({frame});"));
                w.writeln(&format!("{sink}.Flush();"));
            }
        });

        let helpers = [
            (API.value, "object? value", "Values.WriteValue(valueWriter, value)", "valueWriter"),
            (
                API.exception,
                "Exception? exception",
                "Values.WriteException(exceptionWriter, exception)",
                "exceptionWriter",
            ),
            (
                API.specific_value,
                "EvaluationResult result",
                "Values.WriteEvaluated(valueWriter, result)",
                "valueWriter",
            ),
            (
                API.specific_exception,
                "EvaluationResult result",
                "Values.WriteEvaluated(exceptionWriter, result)",
                "exceptionWriter",
            ),
        ];
        for (name, param, call, writer) in helpers {
            self.out.newline();
            Self::braced(&mut self.out, &format!("private void {name}({param})"), |w| {
                w.writeln(&format!("{call};"));
                w.writeln(&format!("{writer}.Flush();"));
            });
        }

        self.out.newline();
        self.out.writeln("public void Execute()");
        self.out.writeln("{");
        self.out.indent();
        Ok(())
    }

    fn before(&mut self, code: &str) -> Result<(), GenerationError> {
        self.out.write_raw(code);
        Ok(())
    }

    fn separator(&mut self) -> Result<(), GenerationError> {
        self.out.writeln("this.WriteSeparator();");
        Ok(())
    }

    fn main_unit(&mut self, main: &MainInvocation) -> Result<(), GenerationError> {
        let exception = API.exception_code(&main.exception, LanguageId::CSharp, UnitLabel::Main)?;
        let arguments: Vec<String> = main.arguments.iter().map(|a| quote_json(a)).collect();
        let call = format!(
            "{}.Main(new string[] {{ {} }})",
            self.names.submission,
            arguments.join(", ")
        );
        self.unit(&call, &exception.on_success, &exception.on_error);
        Ok(())
    }

    fn testcase(&mut self, unit: &TestcaseUnit<'_>) -> Result<(), GenerationError> {
        let code = API.testcase_code(unit, LanguageId::CSharp, &self.syntax)?;
        if let (true, Command::Assignment { variable, ty, .. }) = (unit.declare, unit.command()) {
            self.out.writeln(&format!(
                "{} {} = {};",
                csharp_type(ty),
                self.syntax.identifier(variable),
                default_value(ty)
            ));
        }
        self.unit(&code.primary, &code.exception.on_success, &code.exception.on_error);
        Ok(())
    }

    fn after(&mut self, code: &str) -> Result<(), GenerationError> {
        self.out.write_raw(code);
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<String, GenerationError> {
        let class = self.names.context.clone();
        self.out.dedent();
        self.out.writeln("}");
        self.out.newline();
        Self::braced(&mut self.out, "public void Dispose()", |w| {
            w.writeln("valueWriter.Close();");
            w.writeln("exceptionWriter.Close();");
        });
        self.out.newline();
        Self::braced(&mut self.out, "public static void Main(string[] args)", |w| {
            w.writeln(&format!("var context = new {class}();"));
            Self::braced(w, "try", |w| w.writeln("context.Execute();"));
            Self::braced(w, "finally", |w| w.writeln("context.Dispose();"));
        });
        self.out.dedent();
        self.out.writeln("}");
        self.out.dedent();
        self.out.writeln("}");
        Ok(self.out.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::config::GeneratorConfig;
    use crate::backend::emit::drive;
    use crate::descriptor::{Context, Expr, Testcase};

    fn generate(ctx: &Context) -> String {
        let names = HarnessNames::new(LanguageId::CSharp, "tokenABC1", &GeneratorConfig::default());
        let plan = HarnessPlan::lower(ctx, LanguageId::CSharp);
        drive(&plan, Box::new(CSharpEmitter::new(names))).unwrap()
    }

    #[test]
    fn test_pascal_case_and_namespace() {
        let ctx = Context {
            testcases: vec![Testcase::expression(Expr::function("compute_sum", vec![Expr::integer(2)]))],
            ..Context::default()
        };
        let src = generate(&ctx);
        assert!(src.starts_with("using System;\n"));
        assert!(src.contains("namespace Tested\n{\n"));
        assert!(src.contains("    public class Context00 : IDisposable\n    {\n"));
        assert!(src.contains("SendValue(Submission.ComputeSum(2));"));
        assert!(src.contains("catch (Exception harnessError)"));
    }

    #[test]
    fn test_separator_flushes_console() {
        let ctx = Context {
            testcases: vec![Testcase::expression(Expr::integer(1))],
            ..Context::default()
        };
        let src = generate(&ctx);
        assert!(src.contains(r#"Console.Error.Write("--tokenABC1-- SEP");"#));
        assert!(src.contains("Console.Error.Flush();"));
        assert_eq!(src.matches("this.WriteSeparator();").count(), 2);
    }

    #[test]
    fn test_main_invocation() {
        let ctx = Context {
            main: Some(MainInvocation {
                arguments: vec!["x".into()],
                ..MainInvocation::default()
            }),
            ..Context::default()
        };
        let src = generate(&ctx);
        assert!(src.contains(r#"Submission.Main(new string[] { "x" });"#));
    }
}
