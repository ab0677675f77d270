use winnow::ascii::digit1;
use winnow::combinator::alt;
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::take_while;

use crate::{AffixKind, BoundOp};

/// Text every pseudo-function call starts with; used to skip ahead cheaply.
const CALL_PREFIX: &str = "Open";

/// A matched `Open*Count() op N` occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PseudoCall {
    pub kind: AffixKind,
    pub op: BoundOp,
    pub value: i64,
}

fn space(input: &mut &str) -> ModalResult<()> {
    take_while(0.., char::is_whitespace).void().parse_next(input)
}

fn digits<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    digit1.parse_next(input)
}

fn pseudo_fn(input: &mut &str) -> ModalResult<AffixKind> {
    alt((
        "OpenPrefixCount".value(AffixKind::Prefix),
        "OpenSuffixCount".value(AffixKind::Suffix),
    ))
    .parse_next(input)
}

fn bound_op(input: &mut &str) -> ModalResult<BoundOp> {
    alt((
        "==".value(BoundOp::Eq),
        ">=".value(BoundOp::Gte),
        "<=".value(BoundOp::Lte),
        ">".value(BoundOp::Gt),
        "<".value(BoundOp::Lt),
    ))
    .parse_next(input)
}

/// `OpenPrefixCount ( ) >= 2`, whitespace allowed between every token.
fn pseudo_call(input: &mut &str) -> ModalResult<PseudoCall> {
    let kind = pseudo_fn(input)?;
    (space, '(', space, ')', space).void().parse_next(input)?;
    let op = bound_op(input)?;
    space(input)?;
    // Only ASCII digits reach the parse, so it can only fail on overflow.
    let value = digits(input)?.parse().unwrap_or(i64::MAX);
    Ok(PseudoCall { kind, op, value })
}

/// Replace every pseudo-function comparison in `text` with `true`, calling
/// `on_call` for each match in left-to-right order.
pub(crate) fn replace_calls(text: &str, mut on_call: impl FnMut(PseudoCall)) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(CALL_PREFIX) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let mut attempt = rest;
        if let Ok(call) = pseudo_call(&mut attempt) {
            on_call(call);
            out.push_str("true");
            rest = attempt;
        } else {
            out.push('O');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}
