//! Persisted plugin settings.
//!
//! Stored as TOML:
//!
//! ```toml
//! enable_for_stash = true
//! default_frame_color = "#FF0000FF"
//! frame_thickness = 2
//! custom_config_directory = ""
//!
//! [[rules]]
//! name = "rares.ifl"
//! location = "rares.ifl"
//! enabled = true
//! color = "#00FF00FF"
//! ```

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Color, RuleEntry};

pub const MIN_FRAME_THICKNESS: u32 = 1;
pub const MAX_FRAME_THICKNESS: u32 = 20;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write settings to {path}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Kept only so the host and its settings UI round-trip the value;
    /// nothing in this crate reads it.
    pub run_outside_town: bool,
    pub enable_for_stash: bool,
    /// Kept only so the host and its settings UI round-trip the value;
    /// rule colors come from each [`RuleEntry`].
    pub default_frame_color: Color,
    pub frame_thickness: u32,
    /// Rule directory override, relative to the parent of the default
    /// config directory. Empty means no override.
    pub custom_config_directory: String,
    /// Rules in precedence order.
    pub rules: Vec<RuleEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            run_outside_town: true,
            enable_for_stash: true,
            default_frame_color: Color::RED,
            frame_thickness: MIN_FRAME_THICKNESS,
            custom_config_directory: String::new(),
            rules: Vec::new(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML. Missing keys take their defaults and the
    /// frame thickness is clamped into range.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] on malformed TOML.
    pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = toml::from_str(text)?;
        settings.frame_thickness = settings
            .frame_thickness
            .clamp(MIN_FRAME_THICKNESS, MAX_FRAME_THICKNESS);
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::Serialize`] if encoding fails.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns [`SettingsError`] on I/O or parse failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// unreadable.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => settings,
            Err(SettingsError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file; using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load settings; using defaults");
                Self::default()
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`SettingsError`] on encoding or I/O failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let text = self.to_toml()?;
        fs::write(path, text).map_err(|source| SettingsError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    /// Swap rule `index` with the one above it. Returns whether the order
    /// changed, in which case the rules must be reloaded.
    pub fn move_rule_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.rules.len() {
            return false;
        }
        self.rules.swap(index - 1, index);
        true
    }

    /// Swap rule `index` with the one below it. Returns whether the order
    /// changed, in which case the rules must be reloaded.
    pub fn move_rule_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.rules.len() {
            return false;
        }
        self.rules.swap(index, index + 1);
        true
    }

    /// Returns whether the flag changed, in which case the rules must be
    /// reloaded.
    pub fn set_rule_enabled(&mut self, index: usize, enabled: bool) -> bool {
        match self.rules.get_mut(index) {
            Some(rule) if rule.enabled != enabled => {
                rule.enabled = enabled;
                true
            }
            _ => false,
        }
    }

    /// Returns whether the color changed.
    pub fn set_rule_color(&mut self, index: usize, color: Color) -> bool {
        match self.rules.get_mut(index) {
            Some(rule) if rule.color != color => {
                rule.color = color;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_rules(names: &[&str]) -> Settings {
        Settings {
            rules: names
                .iter()
                .map(|n| RuleEntry::new(*n, format!("{n}.ifl"), true))
                .collect(),
            ..Settings::default()
        }
    }

    fn names(settings: &Settings) -> Vec<&str> {
        settings.rules.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn parse_full_document() {
        let text = r##"
enable_for_stash = false
default_frame_color = "#00FF00"
frame_thickness = 3

[[rules]]
name = "rares.ifl"
location = "rares.ifl"
enabled = true
color = "#0000FF80"

[[rules]]
name = "uniques.ifl"
location = "uniques.ifl"
"##;
        let s = Settings::from_toml(text).unwrap();
        assert!(!s.enable_for_stash);
        assert!(s.run_outside_town);
        assert_eq!(s.default_frame_color, Color::rgba(0, 255, 0, 255));
        assert_eq!(s.frame_thickness, 3);
        assert_eq!(s.rules.len(), 2);
        assert_eq!(s.rules[0].color, Color::rgba(0, 0, 255, 0x80));
        assert!(!s.rules[1].enabled);
        assert_eq!(s.rules[1].color, Color::RED);
    }

    #[test]
    fn thickness_is_clamped() {
        assert_eq!(Settings::from_toml("frame_thickness = 0").unwrap().frame_thickness, 1);
        assert_eq!(Settings::from_toml("frame_thickness = 99").unwrap().frame_thickness, 20);
    }

    #[test]
    fn bad_color_is_a_parse_error() {
        let err = Settings::from_toml("default_frame_color = \"purple\"").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn toml_round_trip() {
        let mut s = with_rules(&["a", "b"]);
        s.rules[1].color = Color::rgba(1, 2, 3, 4);
        s.custom_config_directory = "my_rules".into();
        let text = s.to_toml().unwrap();
        assert_eq!(Settings::from_toml(&text).unwrap(), s);
    }

    #[test]
    fn move_up_and_down() {
        let mut s = with_rules(&["a", "b", "c"]);
        assert!(s.move_rule_up(2));
        assert_eq!(names(&s), ["a", "c", "b"]);
        assert!(s.move_rule_down(0));
        assert_eq!(names(&s), ["c", "a", "b"]);
        assert!(!s.move_rule_up(0));
        assert!(!s.move_rule_down(2));
        assert!(!s.move_rule_up(7));
        assert_eq!(names(&s), ["c", "a", "b"]);
    }

    #[test]
    fn toggles_report_changes() {
        let mut s = with_rules(&["a"]);
        assert!(!s.set_rule_enabled(0, true));
        assert!(s.set_rule_enabled(0, false));
        assert!(!s.rules[0].enabled);
        assert!(!s.set_rule_enabled(5, true));
        assert!(s.set_rule_color(0, Color::WHITE));
        assert!(!s.set_rule_color(0, Color::WHITE));
    }

    #[test]
    fn load_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        assert!(matches!(Settings::load(&path), Err(SettingsError::Read { .. })));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let s = with_rules(&["x"]);
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), s);
    }
}
