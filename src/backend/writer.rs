//! Source writer with indentation tracking
//!
//! Every text emitter builds its harness through a [`SourceWriter`], so indentation of generated code and of raw
//! before/after fragments is handled in one place.

/// Writer that tracks indentation and builds generated source
pub struct SourceWriter {
    /// The output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Spaces per indentation level
    indent_width: usize,
    /// Whether we're at the start of a line
    at_line_start: bool,
}

impl SourceWriter {
    /// Create a new writer with the given indentation width
    pub fn new(indent_width: usize) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_width,
            at_line_start: true,
        }
    }

    /// Get the generated source
    pub fn finish(self) -> String {
        self.output
    }

    /// Increase indentation level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation level
    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn current_indent(&self) -> usize {
        self.indent_level
    }

    fn write_indent(&mut self) {
        if self.at_line_start {
            let indent = " ".repeat(self.indent_level * self.indent_width);
            self.output.push_str(&indent);
            self.at_line_start = false;
        }
    }

    /// Write a string (with auto-indent)
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
    }

    /// Write a string and newline
    pub fn writeln(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    /// Write just a newline
    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Write multiple blank lines
    pub fn blank_lines(&mut self, count: usize) {
        for _ in 0..count {
            self.newline();
        }
    }

    /// Write `header`, an opening line, then the body one level deeper, then `close`.
    ///
    /// Braced languages pass `"{"`-terminated headers and `"}"`; Python passes a `:`-terminated header and an empty
    /// `close`.
    pub fn block(&mut self, header: &str, close: &str, body: impl FnOnce(&mut Self)) {
        self.writeln(header);
        self.indent();
        body(self);
        self.dedent();
        if !close.is_empty() {
            self.writeln(close);
        }
    }

    /// Write a raw multi-line fragment at the current indentation.
    ///
    /// The fragment's common leading whitespace is removed first, so relative indentation inside it (Python blocks)
    /// survives. Blank lines are written without trailing spaces.
    pub fn write_raw(&mut self, code: &str) {
        let lines: Vec<&str> = code.lines().collect();
        let common = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| &l[..l.len() - l.trim_start().len()])
            .reduce(common_prefix)
            .unwrap_or("");
        for line in lines {
            if line.trim().is_empty() {
                self.newline();
            } else {
                self.writeln(line.strip_prefix(common).unwrap_or(line).trim_end());
            }
        }
    }
}

/// Longest common prefix of `a` and `b`, compared by `char`.
fn common_prefix<'a>(a: &'a str, b: &'a str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map_or(a.len().min(b.len()), |((i, _), _)| i);
    &a[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_writer() -> SourceWriter {
        SourceWriter::new(4)
    }

    // ========================================
    // Write tests
    // ========================================

    #[test]
    fn test_new_writer_empty_output() {
        assert_eq!(default_writer().finish(), "");
    }

    #[test]
    fn test_write_empty_string() {
        let mut writer = default_writer();
        writer.write("");
        assert_eq!(writer.finish(), "");
    }

    #[test]
    fn test_writeln_multiple() {
        let mut writer = default_writer();
        writer.writeln("line1");
        writer.writeln("line2");
        assert_eq!(writer.finish(), "line1\nline2\n");
    }

    // ========================================
    // Indent/dedent tests
    // ========================================

    #[test]
    fn test_indent_applies_to_new_lines() {
        let mut writer = SourceWriter::new(2);
        writer.indent();
        writer.writeln("a");
        writer.dedent();
        writer.writeln("b");
        assert_eq!(writer.finish(), "  a\nb\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let mut writer = default_writer();
        writer.dedent();
        assert_eq!(writer.current_indent(), 0);
    }

    // ========================================
    // Block tests
    // ========================================

    #[test]
    fn test_braced_block() {
        let mut writer = default_writer();
        writer.block("try {", "}", |w| w.writeln("run();"));
        assert_eq!(writer.finish(), "try {\n    run();\n}\n");
    }

    #[test]
    fn test_python_block_has_no_closer() {
        let mut writer = default_writer();
        writer.block("try:", "", |w| w.writeln("run()"));
        assert_eq!(writer.finish(), "try:\n    run()\n");
    }

    // ========================================
    // Raw fragment tests
    // ========================================

    #[test]
    fn test_raw_fragment_is_reindented() {
        let mut writer = default_writer();
        writer.indent();
        writer.write_raw("    if x:\n        y()\n\n    z()");
        assert_eq!(writer.finish(), "    if x:\n        y()\n\n    z()\n");
    }

    #[test]
    fn test_raw_fragment_with_multibyte_indentation() {
        let mut writer = default_writer();
        writer.write_raw("\u{a0}x = 1\n y = 2");
        assert_eq!(writer.finish(), "\u{a0}x = 1\n y = 2\n");
    }

    #[test]
    fn test_raw_fragment_strips_shared_tab_prefix() {
        let mut writer = default_writer();
        writer.write_raw("\t\tx = 1\n\t\t\ty = 2");
        assert_eq!(writer.finish(), "x = 1\n\ty = 2\n");
    }

    #[test]
    fn test_raw_empty_fragment_writes_nothing() {
        let mut writer = default_writer();
        writer.write_raw("");
        assert_eq!(writer.finish(), "");
    }
}
