//! Rule discovery and reloading.
//!
//! Rules live as `.ifl` files in a config directory. A reload lists the
//! directory, reconciles the files with the persisted rule list, compiles
//! every rule and swaps the new [`RuleSet`] in as a whole.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::compile::{compile_filter, compile_rule};
use crate::evaluate::ExpressionEvaluator;
use crate::settings::{Settings, SettingsError};
use crate::{Color, InvFilterError, CompileError, CompiledRule, ItemSnapshot, RuleEntry, RuleSet};

/// File extension of rule files, compared case-insensitively.
pub const RULE_EXTENSION: &str = "ifl";

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to list rule directory {path}")]
    Discover {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Outcome of one reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct ReloadReport {
    /// Rules compiled into the active set, in precedence order.
    pub loaded: Vec<String>,
    /// Rules whose file could not be read or compiled.
    pub failed: Vec<String>,
    /// Listed rules whose file no longer exists.
    pub missing: Vec<String>,
}

/// Pick the rule directory. A non-empty `custom` override is resolved
/// against the parent of `default_dir` and used when it exists.
#[must_use]
pub fn resolve_config_dir(default_dir: &Path, custom: &str) -> PathBuf {
    let custom = custom.trim();
    if custom.is_empty() {
        return default_dir.to_path_buf();
    }
    let candidate = default_dir
        .parent()
        .unwrap_or(default_dir)
        .join(custom);
    if candidate.is_dir() {
        candidate
    } else {
        tracing::error!(
            path = %candidate.display(),
            "custom config folder does not exist; using default"
        );
        default_dir.to_path_buf()
    }
}

/// List the rule files directly inside `dir` as new, disabled entries.
///
/// # Errors
///
/// Returns [`LibraryError::Discover`] when the directory cannot be read.
pub fn discover_rules(dir: &Path) -> Result<Vec<RuleEntry>, LibraryError> {
    let discover_err = |source| LibraryError::Discover {
        path: dir.display().to_string(),
        source,
    };
    let mut found = Vec::new();
    for dirent in fs::read_dir(dir).map_err(discover_err)? {
        let path = dirent.map_err(discover_err)?.path();
        let is_rule = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(RULE_EXTENSION));
        if !is_rule || !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        found.push(RuleEntry::new(name, name, false));
    }
    Ok(found)
}

/// Merge discovered files into the existing rule list.
///
/// Existing entries whose file still exists keep their position and
/// settings; the others are dropped and returned as missing. Newly found
/// files are appended sorted by name, case-insensitively.
pub fn reconcile(
    existing: &[RuleEntry],
    discovered: Vec<RuleEntry>,
    dir: &Path,
) -> (Vec<RuleEntry>, Vec<String>) {
    let mut fresh: HashMap<String, RuleEntry> = discovered
        .into_iter()
        .map(|entry| (entry.location.to_lowercase(), entry))
        .collect();

    let mut rules = Vec::with_capacity(existing.len() + fresh.len());
    let mut missing = Vec::new();
    for entry in existing {
        if dir.join(&entry.location).is_file() {
            fresh.remove(&entry.location.to_lowercase());
            rules.push(entry.clone());
        } else {
            tracing::error!(rule = %entry.name, "rule file does not exist");
            missing.push(entry.name.clone());
        }
    }

    let mut appended: Vec<RuleEntry> = fresh.into_values().collect();
    appended.sort_by_cached_key(|entry| entry.name.to_lowercase());
    rules.extend(appended);
    (rules, missing)
}

/// Compiled rules plus the evaluator they were compiled for.
#[derive(Debug)]
pub struct RuleLibrary<E: ExpressionEvaluator> {
    evaluator: E,
    rules: RuleSet<E::Program>,
}

impl<E: ExpressionEvaluator> RuleLibrary<E> {
    #[must_use]
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            rules: RuleSet::default(),
        }
    }

    /// Load settings from `settings_path`, reload the rules and save the
    /// reconciled rule list back.
    ///
    /// A missing settings file starts from defaults.
    ///
    /// # Errors
    ///
    /// Returns [`InvFilterError::Settings`] when the settings cannot be read,
    /// parsed or saved, and [`InvFilterError::Library`] when the rule
    /// directory cannot be listed.
    pub fn open(
        evaluator: E,
        settings_path: &Path,
        default_dir: &Path,
    ) -> Result<(Self, Settings, ReloadReport), InvFilterError> {
        let mut settings = match Settings::load(settings_path) {
            Ok(settings) => settings,
            Err(SettingsError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Settings::default()
            }
            Err(e) => return Err(e.into()),
        };
        let mut library = Self::new(evaluator);
        let report = library.reload(&mut settings, default_dir)?;
        settings.save(settings_path)?;
        Ok((library, settings, report))
    }

    #[must_use]
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet<E::Program> {
        &self.rules
    }

    /// Swap in an already compiled rule set.
    pub fn replace_rules(&mut self, rules: RuleSet<E::Program>) {
        self.rules = rules;
    }

    /// Rediscover, reconcile and recompile all rules.
    ///
    /// The reconciled list is written back to `settings.rules`. Rules that
    /// fail to compile are logged and left out of the active set. When the
    /// rule directory cannot be listed, nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Discover`] when the rule directory cannot be
    /// listed.
    pub fn reload(
        &mut self,
        settings: &mut Settings,
        default_dir: &Path,
    ) -> Result<ReloadReport, LibraryError> {
        let dir = resolve_config_dir(default_dir, &settings.custom_config_directory);
        let discovered = discover_rules(&dir).inspect_err(|e| {
            tracing::error!(error = %e, "rule reload aborted; keeping previous rules");
        })?;
        let (entries, missing) = reconcile(&settings.rules, discovered, &dir);

        let mut report = ReloadReport {
            missing,
            ..ReloadReport::default()
        };
        let mut compiled = Vec::with_capacity(entries.len());
        for entry in &entries {
            match self.load_rule(&dir, entry.clone()) {
                Ok(rule) => {
                    report.loaded.push(entry.name.clone());
                    compiled.push(rule);
                }
                Err(e) => {
                    tracing::warn!(rule = %entry.name, error = %e, "skipping rule");
                    report.failed.push(entry.name.clone());
                }
            }
        }

        settings.rules = entries;
        self.replace_rules(RuleSet::new(compiled));
        tracing::info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            missing = report.missing.len(),
            "rules reloaded"
        );
        Ok(report)
    }

    fn load_rule(&self, dir: &Path, entry: RuleEntry) -> Result<CompiledRule<E::Program>, CompileError> {
        let source = fs::read_to_string(dir.join(&entry.location)).map_err(|source| {
            CompileError::Read {
                rule: entry.name.clone(),
                source,
            }
        })?;
        compile_rule(entry, &source, &self.evaluator)
    }

    /// Whether any enabled rule matches `item`.
    #[must_use]
    pub fn matches(&self, item: &ItemSnapshot) -> bool {
        self.rules.first_match(item, &self.evaluator).is_some()
    }

    /// Color of the first enabled rule matching `item`.
    #[must_use]
    pub fn color_for(&self, item: &ItemSnapshot) -> Option<Color> {
        self.rules.color_for(item, &self.evaluator)
    }

    /// Evaluate ad-hoc filter text against one item, e.g. the hovered item.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] when the text does not compile.
    pub fn test_expression(&self, source: &str, item: &ItemSnapshot) -> Result<bool, CompileError> {
        let filter = compile_filter(source, &self.evaluator)?;
        Ok(filter.matches(item, &self.evaluator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BuiltinEvaluator;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    fn names(entries: &[RuleEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn discover_only_rule_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.ifl", "true");
        write(dir.path(), "B.IFL", "true");
        write(dir.path(), "notes.txt", "x");
        fs::create_dir(dir.path().join("sub.ifl")).unwrap();
        let mut found = discover_rules(dir.path()).unwrap();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(names(&found), ["B.IFL", "a.ifl"]);
        assert!(found.iter().all(|e| !e.enabled));
    }

    #[test]
    fn discover_missing_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_rules(&dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().starts_with("failed to list rule directory"));
    }

    #[test]
    fn reconcile_keeps_order_drops_missing_appends_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["z.ifl", "m.ifl", "b.ifl", "C.ifl"] {
            write(dir.path(), name, "true");
        }
        let existing = vec![
            RuleEntry::new("z.ifl", "z.ifl", true),
            RuleEntry::new("gone.ifl", "gone.ifl", true),
            RuleEntry::new("m.ifl", "M.IFL", false),
        ];
        let discovered = discover_rules(dir.path()).unwrap();
        let (rules, missing) = reconcile(&existing, discovered, dir.path());
        assert!(rules[0].enabled);

        // Case-insensitive file systems resolve "M.IFL" and keep the entry.
        if dir.path().join("M.IFL").is_file() {
            assert_eq!(missing, ["gone.ifl"]);
            assert_eq!(names(&rules), ["z.ifl", "m.ifl", "b.ifl", "C.ifl"]);
        } else {
            assert_eq!(missing, ["gone.ifl", "m.ifl"]);
            assert_eq!(names(&rules), ["z.ifl", "b.ifl", "C.ifl", "m.ifl"]);
        }
    }

    #[test]
    fn custom_dir_resolution() {
        let root = tempfile::tempdir().unwrap();
        let default_dir = root.path().join("InvFilter");
        fs::create_dir(&default_dir).unwrap();
        fs::create_dir(root.path().join("custom")).unwrap();

        assert_eq!(resolve_config_dir(&default_dir, ""), default_dir);
        assert_eq!(resolve_config_dir(&default_dir, "custom"), root.path().join("custom"));
        assert_eq!(resolve_config_dir(&default_dir, "missing"), default_dir);
    }

    #[test]
    fn failed_reload_keeps_previous_rules() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "all.ifl", "true");
        let mut settings = Settings::default();
        let mut library = RuleLibrary::new(BuiltinEvaluator);
        library.reload(&mut settings, dir.path()).unwrap();
        assert_eq!(library.rules().len(), 1);

        let gone = dir.path().join("gone");
        assert!(library.reload(&mut settings, &gone).is_err());
        assert_eq!(library.rules().len(), 1);
        assert_eq!(settings.rules.len(), 1);
    }

    #[test]
    fn open_creates_settings_and_loads_rules() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "all.ifl", "true");
        let settings_path = dir.path().join("settings.toml");

        let (library, settings, report) =
            RuleLibrary::open(BuiltinEvaluator, &settings_path, dir.path()).unwrap();
        assert_eq!(report.loaded, ["all.ifl"]);
        assert_eq!(library.rules().len(), 1);
        assert_eq!(Settings::load(&settings_path).unwrap(), settings);
    }

    #[test]
    fn open_reports_settings_and_discovery_failures() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("settings.toml");

        fs::write(&settings_path, "frame_thickness = \"wide\"").unwrap();
        let err = RuleLibrary::open(BuiltinEvaluator, &settings_path, dir.path()).unwrap_err();
        assert!(matches!(err, InvFilterError::Settings(SettingsError::Parse(_))));

        fs::remove_file(&settings_path).unwrap();
        let gone = dir.path().join("gone");
        let err = RuleLibrary::open(BuiltinEvaluator, &settings_path, &gone).unwrap_err();
        assert!(matches!(err, InvFilterError::Library(LibraryError::Discover { .. })));
        assert!(!settings_path.exists());
    }
}
