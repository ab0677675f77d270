mod bounds;
mod color;
mod error;
mod expr;
mod item;
mod properties;
mod rule;
mod ruleset;
mod value;

pub use bounds::{BoundOp, Bounds, Constraints};
pub use color::{Color, ColorParseError};
pub use error::CompileError;
pub use expr::{CompareOp, Expr, PropExpr, StringMethod, prop};
pub use item::{AffixKind, ItemSnapshot, ModRecord, ModSnapshot, ModsSnapshot, Rarity, Rect};
pub use properties::Properties;
pub use rule::{CompiledFilter, CompiledRule, RuleEntry};
pub use ruleset::RuleSet;
pub use value::Value;
