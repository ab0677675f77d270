//! Per-frame highlight planning.
//!
//! Turns the visible items into a list of [`Frame`]s for the host overlay to
//! draw, and dumps inventory affixes to text files for rule authoring.
//! Nothing here touches the screen.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::evaluate::ExpressionEvaluator;
use crate::library::RuleLibrary;
use crate::settings::Settings;
use crate::{Color, ItemSnapshot, Rect};

/// Alpha used for frames underneath another item's tooltip.
pub const OBSCURED_ALPHA: u8 = 45;

const ALWAYS_CANDIDATE_PREFIXES: [&str; 2] = ["metadata/items/currency/", "metadata/items/questitems/"];

/// A rectangle outline the overlay should draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub rect: Rect,
    pub color: Color,
    pub thickness: u32,
}

/// The item under the cursor, if any, and its tooltip.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hovered {
    pub address: u64,
    pub tooltip_rect: Option<Rect>,
}

/// Which item panel is being planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Inventory,
    Stash,
}

/// Inventory items are only considered once their modifiers are fully
/// loaded. Currency and quest items qualify regardless.
#[must_use]
pub fn is_highlight_candidate(item: &ItemSnapshot) -> bool {
    let path = item.path.to_ascii_lowercase();
    if ALWAYS_CANDIDATE_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return true;
    }
    item.mods.as_ref().is_some_and(|mods| {
        !mods.explicit_mods.is_empty() && mods.explicit_mods.iter().all(|m| m.record.is_some())
    })
}

/// Plan the frames for one panel.
///
/// Items are visited in order; each item matched by an enabled rule gets a
/// frame in that rule's color. Frames under the hovered item's tooltip are
/// dimmed.
#[must_use]
pub fn plan_frames<E: ExpressionEvaluator>(
    panel: Panel,
    items: &[ItemSnapshot],
    hovered: Option<&Hovered>,
    library: &RuleLibrary<E>,
    settings: &Settings,
) -> Vec<Frame> {
    if panel == Panel::Stash && !settings.enable_for_stash {
        return Vec::new();
    }
    items
        .iter()
        .filter(|item| panel == Panel::Stash || is_highlight_candidate(item))
        .filter_map(|item| {
            let color = library.color_for(item)?;
            let obscured = hovered.is_some_and(|h| {
                h.address != item.address
                    && h.tooltip_rect.is_some_and(|tip| tip.intersects(&item.rect))
            });
            Some(Frame {
                rect: item.rect,
                color: if obscured { color.with_alpha(OBSCURED_ALPHA) } else { color },
                thickness: settings.frame_thickness,
            })
        })
        .collect()
}

/// Human-readable affix listing: a `"<base> - <name>"` header followed by
/// one line per explicit modifier stat. Empty for items without a modifier
/// component.
#[must_use]
pub fn dump_affixes(item: &ItemSnapshot) -> Vec<String> {
    let Some(mods) = &item.mods else {
        return Vec::new();
    };
    let mut lines = vec![format!("{} - {}", item.base_name, item.name)];
    lines.extend(
        mods.explicit_mods
            .iter()
            .filter_map(|m| m.record.as_ref())
            .flat_map(|record| record.stat_names.iter())
            .map(|stat| format!("  - {stat}")),
    );
    lines
}

/// Write the affix listing of `items` to `<dir>/Dumps/<area>.txt`,
/// creating the directory if needed. Returns the written path.
///
/// # Errors
///
/// Returns the underlying I/O error when the directory or file cannot be
/// written.
pub fn write_dump(dir: &Path, area: &str, items: &[ItemSnapshot]) -> io::Result<PathBuf> {
    let dumps = dir.join("Dumps");
    fs::create_dir_all(&dumps)?;
    let path = dumps.join(format!("{area}.txt"));
    let mut text = String::new();
    for line in items.iter().flat_map(dump_affixes) {
        text.push_str(&line);
        text.push('\n');
    }
    fs::write(&path, text)?;
    tracing::info!(path = %path.display(), items = items.len(), "inventory items dumped");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BuiltinEvaluator, ModRecord, ModSnapshot, ModsSnapshot, Properties, RuleEntry, RuleSet};

    fn loaded_mod(stat: &str) -> ModSnapshot {
        ModSnapshot {
            record: Some(ModRecord {
                stat_names: vec![stat.to_owned()],
                ..ModRecord::default()
            }),
            ..ModSnapshot::default()
        }
    }

    fn ring(address: u64, rarity: &str, rect: Rect) -> ItemSnapshot {
        ItemSnapshot {
            address,
            name: "Doom Loop".into(),
            base_name: "Ruby Ring".into(),
            mods: Some(ModsSnapshot {
                rarity_code: Some(2),
                explicit_mods: vec![loaded_mod("+10 to maximum Life"), loaded_mod("+20% Fire Res")],
                ..ModsSnapshot::default()
            }),
            properties: Properties::new().set("Rarity", rarity),
            rect,
            ..ItemSnapshot::new("Metadata/Items/Rings/Ring1")
        }
    }

    fn library(rules: &[(&str, &str, Color)]) -> RuleLibrary<BuiltinEvaluator> {
        let mut library = RuleLibrary::new(BuiltinEvaluator);
        let compiled = rules
            .iter()
            .map(|(name, source, color)| {
                let mut entry = RuleEntry::new(*name, format!("{name}.ifl"), true);
                entry.color = *color;
                crate::compile_rule(entry, source, &BuiltinEvaluator).unwrap()
            })
            .collect();
        library.replace_rules(RuleSet::new(compiled));
        library
    }

    #[test]
    fn candidates() {
        assert!(is_highlight_candidate(&ItemSnapshot::new(
            "Metadata/Items/Currency/CurrencyRerollRare"
        )));
        assert!(is_highlight_candidate(&ItemSnapshot::new("metadata/items/questitems/Key")));
        assert!(!is_highlight_candidate(&ItemSnapshot::new("Metadata/Items/Rings/Ring1")));
        assert!(is_highlight_candidate(&ring(1, "Rare", Rect::default())));

        let mut pending = ring(1, "Rare", Rect::default());
        if let Some(mods) = pending.mods.as_mut() {
            mods.explicit_mods.push(ModSnapshot::default());
        }
        assert!(!is_highlight_candidate(&pending));
    }

    #[test]
    fn frames_use_matching_rule_color() {
        let green = Color::rgba(0, 255, 0, 255);
        let lib = library(&[("rares", "Rarity == Rare", green)]);
        let settings = Settings {
            frame_thickness: 3,
            ..Settings::default()
        };
        let items = [
            ring(1, "Rare", Rect::new(0.0, 0.0, 10.0, 10.0)),
            ring(2, "Magic", Rect::new(10.0, 0.0, 10.0, 10.0)),
        ];
        let frames = plan_frames(Panel::Inventory, &items, None, &lib, &settings);
        assert_eq!(
            frames,
            [Frame {
                rect: items[0].rect,
                color: green,
                thickness: 3
            }]
        );
    }

    #[test]
    fn tooltip_dims_other_items() {
        let lib = library(&[("all", "true", Color::WHITE)]);
        let settings = Settings::default();
        let items = [
            ring(1, "Rare", Rect::new(0.0, 0.0, 10.0, 10.0)),
            ring(2, "Rare", Rect::new(50.0, 0.0, 10.0, 10.0)),
        ];
        let hovered = Hovered {
            address: 2,
            tooltip_rect: Some(Rect::new(5.0, 5.0, 100.0, 100.0)),
        };
        let frames = plan_frames(Panel::Inventory, &items, Some(&hovered), &lib, &settings);
        assert_eq!(frames[0].color.a, OBSCURED_ALPHA);
        assert_eq!(frames[1].color, Color::WHITE);
    }

    #[test]
    fn stash_toggle_and_candidate_filter() {
        let lib = library(&[("all", "true", Color::WHITE)]);
        let unloaded = ItemSnapshot::new("Metadata/Items/Rings/Ring1");
        let items = [unloaded];

        let mut settings = Settings::default();
        assert!(plan_frames(Panel::Inventory, &items, None, &lib, &settings).is_empty());
        assert_eq!(plan_frames(Panel::Stash, &items, None, &lib, &settings).len(), 1);
        settings.enable_for_stash = false;
        assert!(plan_frames(Panel::Stash, &items, None, &lib, &settings).is_empty());
    }

    #[test]
    fn affix_dump() {
        assert_eq!(
            dump_affixes(&ring(1, "Rare", Rect::default())),
            [
                "Ruby Ring - Doom Loop",
                "  - +10 to maximum Life",
                "  - +20% Fire Res"
            ]
        );
        assert!(dump_affixes(&ItemSnapshot::new("Metadata/Items/Currency/CurrencyRerollRare")).is_empty());

        let mut no_stats = ring(1, "Rare", Rect::default());
        if let Some(mods) = no_stats.mods.as_mut() {
            mods.explicit_mods.clear();
        }
        assert_eq!(dump_affixes(&no_stats), ["Ruby Ring - Doom Loop"]);
    }
}
