//! Generator configuration
//!
//! Names and layout choices a harness generator needs besides the descriptor itself.

/// Harness generation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Number of spaces per indentation level
    pub indent_width: usize,
    /// Context name before per-language conventionalization (`context_0_0` becomes `Context00` in Java)
    pub context_name: String,
    /// Name of the submission module, class or file stem
    pub submission_name: String,
    /// Directory prefix for the value and exception files, relative to the harness's working directory
    pub sink_dir: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            context_name: "context_0_0".to_string(),
            submission_name: "submission".to_string(),
            sink_dir: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the context name
    pub fn with_context_name(mut self, name: impl Into<String>) -> Self {
        self.context_name = name.into();
        self
    }

    /// Set the submission name
    pub fn with_submission_name(mut self, name: impl Into<String>) -> Self {
        self.submission_name = name.into();
        self
    }

    /// Write the value and exception files into `dir`
    pub fn with_sink_dir(mut self, dir: impl Into<String>) -> Self {
        self.sink_dir = Some(dir.into());
        self
    }

    /// Path of a sink file as the harness will open it.
    pub fn sink_path(&self, file_name: &str) -> String {
        match &self.sink_dir {
            Some(dir) if !dir.is_empty() => format!("{}/{}", dir.trim_end_matches('/'), file_name),
            _ => file_name.to_string(),
        }
    }
}
