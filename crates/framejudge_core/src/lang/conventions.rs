//! Naming conventions of target languages.
//!
//! Descriptor names are written once (usually in `snake_case`) and conventionalized per target: a descriptor
//! function `compute_sum` becomes `compute_sum` in Python, `computeSum` in Java and `ComputeSum` in C#.

/// A casing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamingCase {
    /// `snake_case`
    Snake,
    /// `camelCase`
    Camel,
    /// `PascalCase`
    Pascal,
    /// `MACRO_CASE`
    Macro,
}

impl NamingCase {
    /// Re-case `name`.
    ///
    /// Leading underscores are kept. Word boundaries are underscores, dashes, spaces, lower-to-upper transitions and
    /// the end of an upper-case run followed by a lower-case letter (`HTTPServer` is `HTTP` + `Server`).
    ///
    /// ## Examples
    /// ```rust
    /// use framejudge_core::lang::conventions::NamingCase;
    ///
    /// assert_eq!(NamingCase::Camel.apply("compute_sum"), "computeSum");
    /// assert_eq!(NamingCase::Pascal.apply("context_0_0"), "Context00");
    /// assert_eq!(NamingCase::Snake.apply("computeSum"), "compute_sum");
    /// assert_eq!(NamingCase::Macro.apply("max-size"), "MAX_SIZE");
    /// ```
    pub fn apply(self, name: &str) -> String {
        let trimmed = name.trim_start_matches('_');
        let prefix = &name[..name.len() - trimmed.len()];
        let words = split_words(trimmed);
        let body = match self {
            NamingCase::Snake => words.iter().map(|w| w.to_lowercase()).collect::<Vec<_>>().join("_"),
            NamingCase::Macro => words.iter().map(|w| w.to_uppercase()).collect::<Vec<_>>().join("_"),
            NamingCase::Pascal => words.iter().map(|w| capitalize(w)).collect::<String>(),
            NamingCase::Camel => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
                .collect::<String>(),
        };
        format!("{prefix}{body}")
    }
}

/// The casing each kind of name uses in one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingConventions {
    /// Free functions of the submission.
    pub function: NamingCase,
    /// Local variables bound by assignments.
    pub identifier: NamingCase,
    /// Properties accessed on objects.
    pub property: NamingCase,
    /// Classes (constructors and class-typed variables).
    pub class: NamingCase,
    /// Namespaces and generated file stems.
    pub module: NamingCase,
}

impl NamingConventions {
    pub const fn uniform(case: NamingCase, class: NamingCase) -> Self {
        Self {
            function: case,
            identifier: case,
            property: case,
            class,
            module: case,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
