use std::fmt;
use std::ops::Not;

use super::Value;

/// Comparison operators supported in filter expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// String methods callable on a property, e.g. `BaseName.Contains("Ring")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringMethod {
    Contains,
    StartsWith,
    EndsWith,
}

impl StringMethod {
    #[must_use]
    pub fn from_name(name: &str) -> Option<StringMethod> {
        match name {
            "Contains" => Some(StringMethod::Contains),
            "StartsWith" => Some(StringMethod::StartsWith),
            "EndsWith" => Some(StringMethod::EndsWith),
            _ => None,
        }
    }
}

/// Filter expression AST evaluated by the built-in evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(bool),
    /// Bare property reference; true when the property is `Bool(true)`.
    Flag(String),
    Compare {
        path: String,
        op: CompareOp,
        value: Value,
    },
    Method {
        path: String,
        method: StringMethod,
        arg: String,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Neq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

impl fmt::Display for StringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringMethod::Contains => write!(f, "Contains"),
            StringMethod::StartsWith => write!(f, "StartsWith"),
            StringMethod::EndsWith => write!(f, "EndsWith"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(b) => write!(f, "{b}"),
            Expr::Flag(path) => write!(f, "{path}"),
            Expr::Compare { path, op, value } => write!(f, "{path} {op} {value}"),
            Expr::Method { path, method, arg } => write!(f, "{path}.{method}({arg:?})"),
            Expr::And(a, b) => write!(f, "({a} && {b})"),
            Expr::Or(a, b) => write!(f, "({a} || {b})"),
            Expr::Not(inner) => write!(f, "!{inner}"),
        }
    }
}

impl Expr {
    #[must_use]
    pub fn and(self, other: Expr) -> Expr {
        Expr::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Expr) -> Expr {
        Expr::Or(Box::new(self), Box::new(other))
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

/// Intermediate builder for property expressions. Created by [`prop()`].
#[derive(Debug, Clone)]
pub struct PropExpr {
    path: String,
}

impl PropExpr {
    fn compare(self, op: CompareOp, value: impl Into<Value>) -> Expr {
        Expr::Compare {
            path: self.path,
            op,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> Expr {
        self.compare(CompareOp::Eq, value)
    }

    #[must_use]
    pub fn neq(self, value: impl Into<Value>) -> Expr {
        self.compare(CompareOp::Neq, value)
    }

    #[must_use]
    pub fn gt(self, value: impl Into<Value>) -> Expr {
        self.compare(CompareOp::Gt, value)
    }

    #[must_use]
    pub fn gte(self, value: impl Into<Value>) -> Expr {
        self.compare(CompareOp::Gte, value)
    }

    #[must_use]
    pub fn lt(self, value: impl Into<Value>) -> Expr {
        self.compare(CompareOp::Lt, value)
    }

    #[must_use]
    pub fn lte(self, value: impl Into<Value>) -> Expr {
        self.compare(CompareOp::Lte, value)
    }

    #[must_use]
    pub fn contains(self, arg: &str) -> Expr {
        Expr::Method {
            path: self.path,
            method: StringMethod::Contains,
            arg: arg.to_owned(),
        }
    }

    #[must_use]
    pub fn is_true(self) -> Expr {
        Expr::Flag(self.path)
    }
}

#[must_use]
pub fn prop(path: &str) -> PropExpr {
    PropExpr {
        path: path.to_owned(),
    }
}
