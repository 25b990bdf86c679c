//! Language constructs a descriptor may require.
//!
//! A generator compares the constructs a context uses against the constructs a target language supports and refuses
//! to emit a harness that could not honour the context.

use super::registry::ItemInfo;

/// Stable identifier for a construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstructId {
    FunctionCalls,
    Assignments,
    Exceptions,
    Objects,
    Collections,
    Evaluation,
}

/// Metadata for a construct.
pub type ConstructInfo = ItemInfo<ConstructId>;

/// Registry of all constructs.
pub const CONSTRUCTS: &[ConstructInfo] = &[
    info(
        ConstructId::FunctionCalls,
        "function_calls",
        "Calls to free functions of the submission.",
    ),
    info(
        ConstructId::Assignments,
        "assignments",
        "Testcases that bind a typed variable.",
    ),
    info(
        ConstructId::Exceptions,
        "exceptions",
        "Catchable runtime errors routed to a language-specific exception oracle.",
    ),
    info(
        ConstructId::Objects,
        "objects",
        "Constructors, methods, properties and class-typed variables.",
    ),
    info(ConstructId::Collections, "collections", "Sequence literals and sequence-typed variables."),
    info(
        ConstructId::Evaluation,
        "evaluation",
        "Language-specific oracles producing an evaluation result.",
    ),
];

/// Resolve a spelling to a [`ConstructId`].
pub fn from_str(name: &str) -> Option<ConstructId> {
    CONSTRUCTS.iter().find(|c| c.matches(name)).map(|c| c.id)
}

/// Return the canonical spelling for a construct.
pub fn as_str(id: ConstructId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a construct.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: ConstructId) -> &'static ConstructInfo {
    CONSTRUCTS.iter().find(|c| c.id == id).expect("construct info missing")
}

const fn info(id: ConstructId, canonical: &'static str, description: &'static str) -> ConstructInfo {
    ItemInfo {
        id,
        canonical,
        aliases: &[],
        description,
    }
}
