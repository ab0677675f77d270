use std::fmt;

use super::item::AffixKind;

/// Comparison operators accepted after `OpenPrefixCount()` and `OpenSuffixCount()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl fmt::Display for BoundOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundOp::Eq => write!(f, "=="),
            BoundOp::Gt => write!(f, ">"),
            BoundOp::Gte => write!(f, ">="),
            BoundOp::Lt => write!(f, "<"),
            BoundOp::Lte => write!(f, "<="),
        }
    }
}

/// Inclusive integer range on one open-affix count. `None` leaves that side
/// unconstrained.
///
/// `min <= max` is not enforced: merging contradictory constraints yields a
/// range no item can satisfy. Use [`is_contradictory()`](Self::is_contradictory)
/// to detect it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl Bounds {
    /// A range with neither side constrained.
    pub const UNBOUNDED: Bounds = Bounds {
        min: None,
        max: None,
    };

    /// Fold one `op value` constraint into this range.
    ///
    /// Every operator except `==` can only tighten the range. `==` pins both
    /// sides to `value` regardless of what was merged before.
    #[must_use]
    pub fn merge(self, op: BoundOp, value: i64) -> Bounds {
        match op {
            BoundOp::Gt => self.raise_min(value.saturating_add(1)),
            BoundOp::Gte => self.raise_min(value),
            BoundOp::Lt => self.lower_max(value.saturating_sub(1)),
            BoundOp::Lte => self.lower_max(value),
            BoundOp::Eq => Bounds {
                min: Some(value),
                max: Some(value),
            },
        }
    }

    /// Merge a sequence of constraints left to right, starting unbounded.
    #[must_use]
    pub fn fold(constraints: impl IntoIterator<Item = (BoundOp, i64)>) -> Bounds {
        constraints
            .into_iter()
            .fold(Bounds::UNBOUNDED, |acc, (op, value)| acc.merge(op, value))
    }

    fn raise_min(self, value: i64) -> Bounds {
        Bounds {
            min: Some(self.min.map_or(value, |min| min.max(value))),
            ..self
        }
    }

    fn lower_max(self, value: i64) -> Bounds {
        Bounds {
            max: Some(self.max.map_or(value, |max| max.min(value))),
            ..self
        }
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// `true` when `min > max`; no count can satisfy such a range.
    #[must_use]
    pub fn is_contradictory(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }

    #[must_use]
    pub fn contains(&self, count: i64) -> bool {
        self.min.is_none_or(|min| count >= min) && self.max.is_none_or(|max| count <= max)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{min}..={max}"),
            (Some(min), None) => write!(f, "{min}.."),
            (None, Some(max)) => write!(f, "..={max}"),
            (None, None) => write!(f, ".."),
        }
    }
}

/// Open-affix constraints extracted from one rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Constraints {
    pub prefix: Bounds,
    pub suffix: Bounds,
}

impl Constraints {
    /// Fold a constraint into the bounds for `kind`.
    #[must_use]
    pub fn merge(self, kind: AffixKind, op: BoundOp, value: i64) -> Constraints {
        match kind {
            AffixKind::Prefix => Constraints {
                prefix: self.prefix.merge(op, value),
                ..self
            },
            AffixKind::Suffix => Constraints {
                suffix: self.suffix.merge(op, value),
                ..self
            },
        }
    }

    #[must_use]
    pub fn bounds(&self, kind: AffixKind) -> Bounds {
        match kind {
            AffixKind::Prefix => self.prefix,
            AffixKind::Suffix => self.suffix,
        }
    }

    /// `true` when no `Open*Count()` call was found, so slot counting can be skipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefix.is_unbounded() && self.suffix.is_unbounded()
    }

    #[must_use]
    pub fn is_contradictory(&self) -> bool {
        self.prefix.is_contradictory() || self.suffix.is_contradictory()
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prefix {}, suffix {}", self.prefix, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gt_sets_exclusive_min() {
        let b = Bounds::UNBOUNDED.merge(BoundOp::Gt, 2);
        assert_eq!(b, Bounds { min: Some(3), max: None });
    }

    #[test]
    fn lt_sets_exclusive_max() {
        let b = Bounds::UNBOUNDED.merge(BoundOp::Lt, 2);
        assert_eq!(b, Bounds { min: None, max: Some(1) });
    }

    #[test]
    fn gt_then_gte_keeps_tighter_min() {
        let b = Bounds::fold([(BoundOp::Gt, 2), (BoundOp::Gte, 1)]);
        assert_eq!(b.min, Some(3));
        assert_eq!(b.max, None);
    }

    #[test]
    fn lte_then_eq_pins_both_sides() {
        let b = Bounds::fold([(BoundOp::Lte, 2), (BoundOp::Eq, 1)]);
        assert_eq!(b, Bounds { min: Some(1), max: Some(1) });
    }

    #[test]
    fn eq_overrides_wider_history() {
        let b = Bounds::fold([(BoundOp::Gte, 2), (BoundOp::Lte, 2), (BoundOp::Eq, 5)]);
        assert_eq!(b, Bounds { min: Some(5), max: Some(5) });
    }

    #[test]
    fn lte_never_widens() {
        let b = Bounds::fold([(BoundOp::Lte, 1), (BoundOp::Lte, 3)]);
        assert_eq!(b.max, Some(1));
    }

    #[test]
    fn contradictory_range_is_preserved() {
        let b = Bounds::fold([(BoundOp::Gt, 2), (BoundOp::Lt, 1)]);
        assert_eq!(b, Bounds { min: Some(3), max: Some(0) });
        assert!(b.is_contradictory());
        for n in -5..10 {
            assert!(!b.contains(n));
        }
    }

    #[test]
    fn saturating_edges() {
        assert_eq!(Bounds::UNBOUNDED.merge(BoundOp::Gt, i64::MAX).min, Some(i64::MAX));
        assert_eq!(Bounds::UNBOUNDED.merge(BoundOp::Lt, i64::MIN).max, Some(i64::MIN));
    }

    #[test]
    fn contains_respects_open_sides() {
        assert!(Bounds::UNBOUNDED.contains(0));
        let b = Bounds { min: Some(1), max: None };
        assert!(!b.contains(0));
        assert!(b.contains(100));
        let b = Bounds { min: None, max: Some(2) };
        assert!(b.contains(-1));
        assert!(!b.contains(3));
    }

    #[test]
    fn display() {
        assert_eq!(Bounds { min: Some(1), max: Some(2) }.to_string(), "1..=2");
        assert_eq!(Bounds { min: Some(1), max: None }.to_string(), "1..");
        assert_eq!(Bounds { min: None, max: Some(2) }.to_string(), "..=2");
        assert_eq!(Bounds::UNBOUNDED.to_string(), "..");
        assert_eq!(BoundOp::Gte.to_string(), ">=");
    }

    #[test]
    fn constraints_merge_by_kind() {
        let c = Constraints::default()
            .merge(AffixKind::Suffix, BoundOp::Gte, 2)
            .merge(AffixKind::Prefix, BoundOp::Eq, 1);
        assert_eq!(c.suffix, Bounds { min: Some(2), max: None });
        assert_eq!(c.prefix, Bounds { min: Some(1), max: Some(1) });
        assert_eq!(c.bounds(AffixKind::Suffix), c.suffix);
        assert!(!c.is_empty());
        assert!(Constraints::default().is_empty());
    }
}
