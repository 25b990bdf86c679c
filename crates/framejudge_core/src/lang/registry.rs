//! Shareable metadata for `framejudge_core::lang` registries.
//!
//! ## Notes
//! - These types are `Copy`-friendly so registries can live in `const` tables.

/// Shared metadata shape for registry items.
///
/// Every registry item has:
/// - stable identity (`id`)
/// - accepted spellings (`canonical` + `aliases`)
/// - a one-line `description`
///
/// Registries that need extra per-item data wrap this struct in their own info type.
///
/// ## Examples
/// ```rust
/// use framejudge_core::lang::registry::ItemInfo;
///
/// let item = ItemInfo { id: 1u8, canonical: "one", aliases: &["1"], description: "The number one." };
/// assert!(item.matches("1"));
/// assert!(!item.matches("two"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ItemInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

impl<Id> ItemInfo<Id> {
    /// Check whether `spelling` is the canonical spelling or one of the aliases.
    pub fn matches(&self, spelling: &str) -> bool {
        self.canonical == spelling || self.aliases.contains(&spelling)
    }
}
