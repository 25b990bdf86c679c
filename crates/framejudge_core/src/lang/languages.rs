//! Supported target languages and their capability tables.
//!
//! Each entry says which file extension a harness gets, how names are cased, which [`ConstructId`]s the language can
//! express and whether the language compiles all contexts of a run into one program (and therefore needs a
//! selector to pick a context at run time).
//!
//! ## Notes
//! - Matching is **case-sensitive** and uses lower-case spellings.

use super::constructs::ConstructId;
use super::conventions::{NamingCase, NamingConventions};
use super::registry::ItemInfo;

/// Stable identifier for a target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LanguageId {
    Python,
    Java,
    Kotlin,
    CSharp,
    JavaScript,
    TypeScript,
    C,
    Rust,
    Haskell,
}

/// Metadata for a target language.
#[derive(Debug, Clone, Copy)]
pub struct LanguageInfo {
    pub item: ItemInfo<LanguageId>,
    /// File extension of generated harnesses (without the dot).
    pub extension: &'static str,
    pub naming: NamingConventions,
    pub constructs: &'static [ConstructId],
    /// Whether contexts are compiled together and dispatched by a selector program.
    pub needs_selector: bool,
}

impl LanguageInfo {
    pub fn id(&self) -> LanguageId {
        self.item.id
    }

    pub fn canonical(&self) -> &'static str {
        self.item.canonical
    }

    /// Check whether the language can express `construct`.
    pub fn supports(&self, construct: ConstructId) -> bool {
        self.constructs.contains(&construct)
    }
}

const ALL_CONSTRUCTS: &[ConstructId] = &[
    ConstructId::FunctionCalls,
    ConstructId::Assignments,
    ConstructId::Exceptions,
    ConstructId::Objects,
    ConstructId::Collections,
    ConstructId::Evaluation,
];

/// Registry of all target languages.
pub const LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        item: ItemInfo {
            id: LanguageId::Python,
            canonical: "python",
            aliases: &["py", "python3"],
            description: "CPython 3 harness executed as a script.",
        },
        extension: "py",
        naming: NamingConventions::uniform(NamingCase::Snake, NamingCase::Pascal),
        constructs: ALL_CONSTRUCTS,
        needs_selector: false,
    },
    LanguageInfo {
        item: ItemInfo {
            id: LanguageId::Java,
            canonical: "java",
            aliases: &[],
            description: "Java class implementing `Closeable`, dispatched by a selector.",
        },
        extension: "java",
        naming: NamingConventions {
            function: NamingCase::Camel,
            identifier: NamingCase::Camel,
            property: NamingCase::Camel,
            class: NamingCase::Pascal,
            module: NamingCase::Pascal,
        },
        constructs: ALL_CONSTRUCTS,
        needs_selector: true,
    },
    LanguageInfo {
        item: ItemInfo {
            id: LanguageId::Kotlin,
            canonical: "kotlin",
            aliases: &["kt"],
            description: "Kotlin class implementing `AutoCloseable`, dispatched by a selector.",
        },
        extension: "kt",
        naming: NamingConventions {
            function: NamingCase::Camel,
            identifier: NamingCase::Camel,
            property: NamingCase::Camel,
            class: NamingCase::Pascal,
            module: NamingCase::Pascal,
        },
        constructs: ALL_CONSTRUCTS,
        needs_selector: true,
    },
    LanguageInfo {
        item: ItemInfo {
            id: LanguageId::CSharp,
            canonical: "csharp",
            aliases: &["cs", "c#"],
            description: "C# class in the `Tested` namespace, dispatched by a selector.",
        },
        extension: "cs",
        naming: NamingConventions::uniform(NamingCase::Pascal, NamingCase::Pascal),
        constructs: ALL_CONSTRUCTS,
        needs_selector: true,
    },
    LanguageInfo {
        item: ItemInfo {
            id: LanguageId::JavaScript,
            canonical: "javascript",
            aliases: &["js", "node"],
            description: "Node.js script writing sinks with synchronous file descriptors.",
        },
        extension: "js",
        naming: NamingConventions {
            function: NamingCase::Camel,
            identifier: NamingCase::Camel,
            property: NamingCase::Camel,
            class: NamingCase::Pascal,
            module: NamingCase::Snake,
        },
        constructs: ALL_CONSTRUCTS,
        needs_selector: false,
    },
    LanguageInfo {
        item: ItemInfo {
            id: LanguageId::TypeScript,
            canonical: "typescript",
            aliases: &["ts"],
            description: "TypeScript variant of the Node.js harness with typed declarations.",
        },
        extension: "ts",
        naming: NamingConventions {
            function: NamingCase::Camel,
            identifier: NamingCase::Camel,
            property: NamingCase::Camel,
            class: NamingCase::Pascal,
            module: NamingCase::Snake,
        },
        constructs: ALL_CONSTRUCTS,
        needs_selector: false,
    },
    LanguageInfo {
        item: ItemInfo {
            id: LanguageId::C,
            canonical: "c",
            aliases: &[],
            description: "C translation unit without exceptions; units cannot be recovered from crashes.",
        },
        extension: "c",
        naming: NamingConventions::uniform(NamingCase::Snake, NamingCase::Snake),
        constructs: &[ConstructId::FunctionCalls, ConstructId::Assignments],
        needs_selector: false,
    },
    LanguageInfo {
        item: ItemInfo {
            id: LanguageId::Rust,
            canonical: "rust",
            aliases: &["rs"],
            description: "Rust binary linked against `framejudge_runtime`; panics are recoverable errors.",
        },
        extension: "rs",
        naming: NamingConventions::uniform(NamingCase::Snake, NamingCase::Pascal),
        constructs: ALL_CONSTRUCTS,
        needs_selector: false,
    },
    LanguageInfo {
        item: ItemInfo {
            id: LanguageId::Haskell,
            canonical: "haskell",
            aliases: &["hs", "runhaskell"],
            description: "Haskell program run with `runhaskell`; units are guarded with `Control.Exception.try`.",
        },
        extension: "hs",
        naming: NamingConventions {
            function: NamingCase::Camel,
            identifier: NamingCase::Camel,
            property: NamingCase::Camel,
            class: NamingCase::Pascal,
            module: NamingCase::Pascal,
        },
        constructs: &[
            ConstructId::FunctionCalls,
            ConstructId::Assignments,
            ConstructId::Collections,
        ],
        needs_selector: false,
    },
];

/// Resolve a spelling (canonical or alias) to a [`LanguageId`].
///
/// ## Examples
/// ```rust
/// use framejudge_core::lang::languages::{self, LanguageId};
///
/// assert_eq!(languages::from_str("c#"), Some(LanguageId::CSharp));
/// assert_eq!(languages::from_str("cobol"), None);
/// ```
pub fn from_str(name: &str) -> Option<LanguageId> {
    LANGUAGES.iter().find(|l| l.item.matches(name)).map(|l| l.item.id)
}

/// Return the canonical spelling for a language.
pub fn as_str(id: LanguageId) -> &'static str {
    info_for(id).item.canonical
}

/// Return the full metadata entry for a language.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: LanguageId) -> &'static LanguageInfo {
    LANGUAGES.iter().find(|l| l.item.id == id).expect("language info missing")
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(as_str(*self))
    }
}

impl std::str::FromStr for LanguageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_str(s).ok_or_else(|| format!("unknown target language `{s}`"))
    }
}
