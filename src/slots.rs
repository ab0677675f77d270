//! Open affix slot counting.
//!
//! An item's affix capacity comes from its category and rarity; open slots
//! are capacity minus the affixes already rolled, never below zero.

use crate::{AffixKind, ItemSnapshot, ModsSnapshot, Rarity};

/// Number of prefix slots still open on `item`.
#[must_use]
pub fn open_prefix_count(item: &ItemSnapshot) -> i64 {
    open_count(item, AffixKind::Prefix)
}

/// Number of suffix slots still open on `item`.
#[must_use]
pub fn open_suffix_count(item: &ItemSnapshot) -> i64 {
    open_count(item, AffixKind::Suffix)
}

#[must_use]
pub fn open_count(item: &ItemSnapshot, kind: AffixKind) -> i64 {
    (max_affixes(item) - used_affixes(item, kind)).max(0)
}

/// Per-kind affix capacity. Items without a modifier component have none.
#[must_use]
pub fn max_affixes(item: &ItemSnapshot) -> i64 {
    let Some(mods) = &item.mods else {
        return 0;
    };
    let tags = item.category_tags();
    let base = if tags.contains("flask") {
        1
    } else if ["jewel", "abyssjewel", "clusterjewel"]
        .iter()
        .any(|t| tags.contains(*t))
    {
        2
    } else {
        3
    };
    match mods.rarity() {
        Some(Rarity::Normal | Rarity::Unique) => 0,
        Some(Rarity::Magic) => base.min(1),
        Some(Rarity::Rare) | None => base,
    }
}

/// Affixes of `kind` already on the item: the host's direct count when it
/// reports one, otherwise the explicit modifiers classified as `kind`.
#[must_use]
pub fn used_affixes(item: &ItemSnapshot, kind: AffixKind) -> i64 {
    item.mods
        .as_ref()
        .map_or(0, |mods| mods.direct_count(kind).unwrap_or_else(|| count_by_kind(mods, kind)))
}

fn count_by_kind(mods: &ModsSnapshot, kind: AffixKind) -> i64 {
    let count = mods
        .explicit_mods
        .iter()
        .filter(|m| m.affix_kind() == Some(kind))
        .count();
    i64::try_from(count).unwrap_or(i64::MAX)
}
