use winnow::ascii::digit1;
use winnow::combinator::{alt, cut_err, delimited, fail, opt, preceded, repeat};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::{CompareOp, Expr, StringMethod, Value};

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., char::is_whitespace).void().parse_next(input)
}

// -- Property paths ---------------------------------------------------------

fn segment<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

/// Dot-separated segments. Whitespace around dots is allowed because
/// normalization joins `Name\n.Contains(..)` as `Name .Contains(..)`.
fn path<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    let first = segment(input)?;
    let rest: Vec<&str> = repeat(0.., preceded((ws, '.', ws), segment)).parse_next(input)?;
    let mut segments = Vec::with_capacity(rest.len() + 1);
    segments.push(first);
    segments.extend(rest);
    Ok(segments)
}

// -- Values -----------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn float_text<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (opt('-'), digit1, '.', digit1).take().parse_next(input)
}

fn int_text<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (opt('-'), digit1).take().parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<Value> {
    alt((
        float_text.try_map(|s: &str| s.parse::<f64>().map(Value::Float)),
        int_text.try_map(|s: &str| s.parse::<i64>().map(Value::Int)),
    ))
    .parse_next(input)
}

/// Bare words are symbolic values: `Rare`, or `ItemRarity.Rare` which reads
/// as its last segment. `true` and `false` are booleans.
fn word(input: &mut &str) -> ModalResult<Value> {
    let segments = path(input)?;
    Ok(match segments.as_slice() {
        ["true"] => Value::Bool(true),
        ["false"] => Value::Bool(false),
        [.., last] => Value::String((*last).to_owned()),
        [] => Value::String(String::new()),
    })
}

fn value(input: &mut &str) -> ModalResult<Value> {
    ws.parse_next(input)?;
    alt((string_literal.map(Value::String), number, word))
        .context(StrContext::Expected(StrContextValue::Description("value")))
        .parse_next(input)
}

// -- Comparison operators ---------------------------------------------------

fn compare_op(input: &mut &str) -> ModalResult<CompareOp> {
    ws.parse_next(input)?;
    alt((
        ">=".value(CompareOp::Gte),
        ">".value(CompareOp::Gt),
        "<=".value(CompareOp::Lte),
        "<".value(CompareOp::Lt),
        "==".value(CompareOp::Eq),
        "!=".value(CompareOp::Neq),
    ))
    .parse_next(input)
}

// -- Expressions (precedence: || < && < ! < primary) ------------------------

fn method_call(mut segments: Vec<&str>, input: &mut &str) -> ModalResult<Expr> {
    let name = segments.pop().unwrap_or_default();
    let method = match StringMethod::from_name(name) {
        Some(method) if !segments.is_empty() => method,
        _ => {
            return cut_err(fail)
                .context(StrContext::Label("string method"))
                .context(StrContext::Expected(StrContextValue::Description(
                    "Contains, StartsWith or EndsWith",
                )))
                .parse_next(input);
        }
    };
    let arg = delimited(
        ('(', ws),
        cut_err(string_literal),
        (ws, cut_err(')')),
    )
    .parse_next(input)?;
    Ok(Expr::Method {
        path: segments.join("."),
        method,
        arg,
    })
}

fn property_expr(input: &mut &str) -> ModalResult<Expr> {
    let segments = path(input)?;
    ws.parse_next(input)?;
    if input.starts_with('(') {
        return method_call(segments, input);
    }
    if let Some(op) = opt(compare_op).parse_next(input)? {
        let val = cut_err(value).parse_next(input)?;
        return Ok(Expr::Compare {
            path: segments.join("."),
            op,
            value: val,
        });
    }
    Ok(match segments.as_slice() {
        ["true"] => Expr::Literal(true),
        ["false"] => Expr::Literal(false),
        _ => Expr::Flag(segments.join(".")),
    })
}

fn primary(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    alt((delimited('(', expr, (ws, cut_err(')'))), property_expr))
        .context(StrContext::Expected(StrContextValue::Description(
            "expression",
        )))
        .parse_next(input)
}

fn unary(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    if opt('!').parse_next(input)?.is_some() {
        let inner = cut_err(unary).parse_next(input)?;
        Ok(Expr::Not(Box::new(inner)))
    } else {
        primary(input)
    }
}

fn and_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = unary(input)?;
    let rest: Vec<Expr> = repeat(0.., preceded((ws, "&&"), cut_err(unary))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Expr::And(Box::new(acc), Box::new(r))))
}

fn or_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = and_expr(input)?;
    let rest: Vec<Expr> =
        repeat(0.., preceded((ws, "||"), cut_err(and_expr))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Expr::Or(Box::new(acc), Box::new(r))))
}

fn expr(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    or_expr(input)
}

// -- Top level --------------------------------------------------------------

pub fn filter(input: &mut &str) -> ModalResult<Expr> {
    let parsed = expr(input)?;
    ws.parse_next(input)?;
    Ok(parsed)
}
