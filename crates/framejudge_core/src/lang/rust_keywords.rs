//! Rust keyword vocabulary, for escaping descriptor identifiers in generated Rust harnesses.

/// Strict and reserved keywords that can be used as raw identifiers (`r#type`).
pub const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try", "gen",
];

/// Check whether an identifier must be written as a raw identifier in Rust.
///
/// ## Notes
/// - `self`, `Self`, `super` and `crate` cannot be raw identifiers; callers must reject them instead.
pub fn is_keyword(name: &str) -> bool {
    RUST_KEYWORDS.contains(&name)
}

/// Check whether an identifier can never be used as a binding or item name in Rust.
pub fn is_unusable(name: &str) -> bool {
    matches!(name, "self" | "Self" | "super" | "crate" | "_")
}
