//! Filter-rule preprocessing and item highlighting for inventory overlays.
//!
//! Rule files hold one boolean expression each, plus `OpenPrefixCount()` and
//! `OpenSuffixCount()` comparisons that are checked against an item's open
//! affix slots instead of being handed to the expression evaluator.

mod compile;
mod error;
mod evaluate;
mod types;

pub mod highlight;
pub mod library;
pub mod parse;
pub mod preprocess;
pub mod settings;
pub mod slots;

pub use compile::{compile_filter, compile_rule};
pub use error::InvFilterError;
pub use evaluate::{BuiltinEvaluator, ExpressionEvaluator, constraints_satisfied};
pub use library::{LibraryError, ReloadReport, RuleLibrary};
pub use settings::{Settings, SettingsError};
pub use types::{
    AffixKind, BoundOp, Bounds, Color, ColorParseError, CompareOp, CompileError, CompiledFilter,
    CompiledRule, Constraints, Expr, ItemSnapshot, ModRecord, ModSnapshot, ModsSnapshot, PropExpr,
    Properties, Rarity, Rect, RuleEntry, RuleSet, StringMethod, Value, prop,
};
