//! Placeholder tokenizer
//!
//! Splits redacted text into literal runs and placeholder tokens such as
//! `[EMAIL_ADDRESS_1]`. The split keeps the delimiters, so concatenating the
//! segments always reproduces the input.

use regex::Regex;
use std::sync::LazyLock;

// Matches: [EMAIL_ADDRESS_1], [US_SSN_12], [AWS_ACCESS_KEY_3]
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[A-Z_]+_[0-9]+\]").unwrap());

/// A piece of redacted text, borrowed from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain text between placeholders. May be empty.
    Literal(&'a str),
    /// A token matching the placeholder format, brackets included
    Placeholder(&'a str),
}

impl<'a> Segment<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Literal(text) | Segment::Placeholder(text) => text,
        }
    }
}

/// Tokenize `text` into alternating literal and placeholder segments.
///
/// Never fails. The result always starts and ends with a literal, and every
/// placeholder is surrounded by literals (possibly empty), so for `n`
/// placeholders there are exactly `2n + 1` segments.
pub fn parse(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in PLACEHOLDER_REGEX.find_iter(text) {
        segments.push(Segment::Literal(&text[last..m.start()]));
        segments.push(Segment::Placeholder(m.as_str()));
        last = m.end();
    }
    segments.push(Segment::Literal(&text[last..]));

    segments
}

/// Whether `token` is exactly one well-formed placeholder
pub fn is_placeholder(token: &str) -> bool {
    PLACEHOLDER_REGEX
        .find(token)
        .is_some_and(|m| m.start() == 0 && m.end() == token.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(segments: &[Segment<'_>]) -> String {
        segments.iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn test_single_placeholder() {
        let segments = parse("Contact [EMAIL_ADDRESS_1] for help");
        assert_eq!(
            segments,
            vec![
                Segment::Literal("Contact "),
                Segment::Placeholder("[EMAIL_ADDRESS_1]"),
                Segment::Literal(" for help"),
            ]
        );
    }

    #[test]
    fn test_no_placeholders() {
        assert_eq!(parse("Just text"), vec![Segment::Literal("Just text")]);
        assert_eq!(parse(""), vec![Segment::Literal("")]);
    }

    #[test]
    fn test_adjacent_placeholders_leave_empty_literals() {
        let segments = parse("[US_SSN_1][EMAIL_ADDRESS_2]");
        assert_eq!(
            segments,
            vec![
                Segment::Literal(""),
                Segment::Placeholder("[US_SSN_1]"),
                Segment::Literal(""),
                Segment::Placeholder("[EMAIL_ADDRESS_2]"),
                Segment::Literal(""),
            ]
        );
    }

    #[test]
    fn test_malformed_brackets_stay_literal() {
        for input in [
            "[lower_1]",
            "[NOINDEX]",
            "[EMAIL_]",
            "[_1",
            "EMAIL_1]",
            "[EMAIL 1]",
            "[[]]",
            "[1_2]",
            "[US_SSN_\u{0661}]",
        ] {
            let segments = parse(input);
            assert!(
                segments.iter().all(|s| matches!(s, Segment::Literal(_))),
                "unexpected placeholder in {input:?}"
            );
        }
    }

    #[test]
    fn test_placeholder_inside_noise() {
        let segments = parse("[[US_SSN_1]]");
        assert_eq!(
            segments,
            vec![
                Segment::Literal("["),
                Segment::Placeholder("[US_SSN_1]"),
                Segment::Literal("]"),
            ]
        );
    }

    #[test]
    fn test_round_trip() {
        let inputs = [
            "",
            "plain",
            "SSN: [US_SSN_1]",
            "[A_1]",
            "[A_1][B_2] and [C_D_30] tail",
            "multi\nline [EMAIL_ADDRESS_1]\n\u{e9}t\u{e9} [X_9]",
            "[not_one] [ALSO_NOT] [OK_7]",
        ];
        for input in inputs {
            assert_eq!(rejoin(&parse(input)), input);
        }
    }

    #[test]
    fn test_segment_count_invariant() {
        let segments = parse("a [X_1] b [Y_2] c [Z_3]");
        assert_eq!(segments.len(), 7);
        assert!(matches!(segments.first(), Some(Segment::Literal(_))));
        assert!(matches!(segments.last(), Some(Segment::Literal(""))));
    }

    #[test]
    fn test_is_placeholder() {
        assert!(is_placeholder("[AWS_ACCESS_KEY_1]"));
        assert!(!is_placeholder("x[AWS_ACCESS_KEY_1]"));
        assert!(!is_placeholder("[AWS_ACCESS_KEY_1] "));
        assert!(!is_placeholder("[aws_1]"));
    }
}
