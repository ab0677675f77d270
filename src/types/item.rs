use std::collections::HashSet;
use std::fmt;

use super::properties::Properties;

/// Which affix bucket a modifier occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

impl fmt::Display for AffixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AffixKind::Prefix => write!(f, "prefix"),
            AffixKind::Suffix => write!(f, "suffix"),
        }
    }
}

/// Item rarity tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rarity {
    Normal,
    Magic,
    Rare,
    Unique,
}

impl Rarity {
    /// Map the host's numeric rarity code. Codes outside `0..=3` are unknown.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Rarity> {
        match code {
            0 => Some(Rarity::Normal),
            1 => Some(Rarity::Magic),
            2 => Some(Rarity::Rare),
            3 => Some(Rarity::Unique),
            _ => None,
        }
    }

    /// Case-insensitive match on the rarity name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Rarity> {
        match name.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(Rarity::Normal),
            "magic" => Some(Rarity::Magic),
            "rare" => Some(Rarity::Rare),
            "unique" => Some(Rarity::Unique),
            _ => None,
        }
    }
}

/// Axis-aligned screen rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Overlap test. Rectangles that only share an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        other.x < self.x + self.width
            && self.x < other.x + other.width
            && other.y < self.y + self.height
            && self.y < other.y + other.height
    }
}

/// Modifier record data as exposed by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModRecord {
    /// Affix or generation type text, e.g. `"Prefix"`.
    pub generation_type: Option<String>,
    /// Numeric generation id; `1` is prefix, `2` is suffix.
    pub generation_id: Option<i64>,
    pub stat_names: Vec<String>,
}

/// One explicit modifier on an item. Each field is a signal the host may or
/// may not provide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModSnapshot {
    pub is_prefix: Option<bool>,
    pub is_suffix: Option<bool>,
    pub record: Option<ModRecord>,
}

impl ModSnapshot {
    /// Classify this modifier using the first signal that answers:
    /// explicit flags, then generation type text, then generation id.
    ///
    /// Returns `None` when no signal identifies the bucket.
    #[must_use]
    pub fn affix_kind(&self) -> Option<AffixKind> {
        if self.is_prefix == Some(true) {
            return Some(AffixKind::Prefix);
        }
        if self.is_suffix == Some(true) {
            return Some(AffixKind::Suffix);
        }
        let record = self.record.as_ref()?;
        if let Some(text) = &record.generation_type {
            let text = text.to_ascii_lowercase();
            return if text.contains("prefix") {
                Some(AffixKind::Prefix)
            } else if text.contains("suffix") {
                Some(AffixKind::Suffix)
            } else {
                None
            };
        }
        match record.generation_id? {
            1 => Some(AffixKind::Prefix),
            2 => Some(AffixKind::Suffix),
            _ => None,
        }
    }
}

/// The item's modifier component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModsSnapshot {
    pub rarity_code: Option<i64>,
    pub rarity_name: Option<String>,
    /// Direct prefix count, when the host exposes one.
    pub prefix_count: Option<i64>,
    /// Direct suffix count, when the host exposes one.
    pub suffix_count: Option<i64>,
    pub explicit_mods: Vec<ModSnapshot>,
}

impl ModsSnapshot {
    /// Numeric code wins over the name; an out-of-range code is unknown even
    /// if a name is present.
    #[must_use]
    pub fn rarity(&self) -> Option<Rarity> {
        match self.rarity_code {
            Some(code) => Rarity::from_code(code),
            None => self.rarity_name.as_deref().and_then(Rarity::from_name),
        }
    }

    #[must_use]
    pub fn direct_count(&self, kind: AffixKind) -> Option<i64> {
        match kind {
            AffixKind::Prefix => self.prefix_count,
            AffixKind::Suffix => self.suffix_count,
        }
    }
}

/// Read-only, per-frame view of one item.
#[derive(Debug, Clone, Default)]
pub struct ItemSnapshot {
    /// Entity address; identifies the item across snapshots.
    pub address: u64,
    /// Metadata path, e.g. `Metadata/Items/Flasks/FlaskLife1`.
    pub path: String,
    pub name: String,
    pub base_name: String,
    /// Tags reported by the item's base type.
    pub tags: Vec<String>,
    pub mods: Option<ModsSnapshot>,
    /// Values the expression evaluator reads.
    pub properties: Properties,
    /// Screen rectangle of the item's inventory slot.
    pub rect: Rect,
}

impl ItemSnapshot {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Lowercased category tags: the base type's tags plus tags implied by
    /// the metadata path. Empty when the item has no path.
    #[must_use]
    pub fn category_tags(&self) -> HashSet<String> {
        let mut tags = HashSet::new();
        if self.path.is_empty() {
            return tags;
        }
        tags.extend(
            self.tags
                .iter()
                .filter(|t| !t.trim().is_empty())
                .map(|t| t.to_ascii_lowercase()),
        );
        let path = self.path.to_ascii_lowercase();
        for (needle, tag) in [
            ("flask", "flask"),
            ("jewel", "jewel"),
            ("abyss", "abyssjewel"),
            ("cluster", "clusterjewel"),
        ] {
            if path.contains(needle) {
                tags.insert(tag.to_owned());
            }
        }
        tags
    }
}
