/// Tokens that continue the previous line instead of starting a new alternative.
const CONTINUATIONS: [&str; 7] = ["&&", "||", ")", "]", ",", "}", "."];

/// Characters after which the next line is always a continuation.
const OPENERS: [char; 6] = ['(', '{', '[', ',', '&', '|'];

/// Collapse a multi-line rule body into one logical expression.
///
/// Lines are trimmed and blank lines dropped. A line that neither starts with a
/// continuation token nor follows an opener is joined with `" || "`, so each
/// independent line of a rule file is an alternative. Other lines are joined
/// with a single space.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    for line in text.split(['\r', '\n']).map(str::trim).filter(|l| !l.is_empty()) {
        if !out.is_empty() {
            let continues = CONTINUATIONS.iter().any(|t| line.starts_with(t));
            let after_opener = out.ends_with(&OPENERS[..]);
            out.push_str(if continues || after_opener { " " } else { " || " });
        }
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn independent_lines_are_or_joined() {
        assert_eq!(normalize("line1\nline2"), "line1 || line2");
    }

    #[test]
    fn trailing_operator_continues() {
        assert_eq!(normalize("a &&\nb"), "a && b");
        assert_eq!(normalize("a ||\nb"), "a || b");
    }

    #[test]
    fn leading_operator_continues() {
        assert_eq!(normalize("a\n&& b"), "a && b");
        assert_eq!(normalize("a\n|| b"), "a || b");
    }

    #[test]
    fn brackets_and_members_continue() {
        assert_eq!(normalize("(a\n)"), "(a )");
        assert_eq!(normalize("f(\nx,\ny\n)"), "f( x, y )");
        assert_eq!(normalize("BaseName\n.Contains(\"Ring\")"), "BaseName .Contains(\"Ring\")");
        assert_eq!(normalize("{a\n}"), "{a }");
        assert_eq!(normalize("[a\n]"), "[a ]");
    }

    #[test]
    fn every_line_break_convention() {
        assert_eq!(normalize("a\r\nb\rc\nd"), "a || b || c || d");
    }

    #[test]
    fn blank_lines_and_padding_dropped() {
        assert_eq!(normalize("  a  \n\n   \n\tb\t"), "a || b");
    }

    #[test]
    fn empty_and_whitespace_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\r\n\t "), "");
    }

    #[test]
    fn idempotent() {
        let once = normalize("a &&\n b\n c\n(\nd\n)");
        assert_eq!(normalize(&once), once);
    }
}
