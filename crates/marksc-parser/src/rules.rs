//! Token rules of the two scanning modes, selected from the lookahead at the cursor.

use crate::cursor::{Cursor, Token};
use marksc_base::node::Variant;

/// Whether the scanner is at the start of a physical line or inside a paragraph line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    LineStart,
    Inline,
}

/// Delimiter pairs enclosing a formula.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormulaDelimiter {
    /// `$$ ... $$`
    Dollars,
    /// `\[ ... \]`
    Brackets,
    /// `$ ... $`
    Dollar,
    /// `\( ... \)`
    Parens,
}

impl FormulaDelimiter {
    pub fn open(&self) -> &'static str {
        match self {
            FormulaDelimiter::Dollars => "$$",
            FormulaDelimiter::Brackets => "\\[",
            FormulaDelimiter::Dollar => "$",
            FormulaDelimiter::Parens => "\\(",
        }
    }

    pub fn close(&self) -> &'static str {
        match self {
            FormulaDelimiter::Dollars => "$$",
            FormulaDelimiter::Brackets => "\\]",
            FormulaDelimiter::Dollar => "$",
            FormulaDelimiter::Parens => "\\)",
        }
    }
}

/// Line-level markup, in recognition order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LineRule {
    /// `#`: the line is skipped.
    Comment,
    /// `^path^`
    Image,
    /// `!`, `!!`, ...
    Alert,
    /// `=`, `==`, ...
    Heading,
    /// One or more empty lines.
    BlankLines,
    /// `->`: the paragraph goes on.
    Continuation,
    /// `- `
    ListItem,
    DisplayFormula(FormulaDelimiter),
    /// `~~~`
    CodeBlock,
    /// `%` on its own line.
    EndOfBlock,
    /// Anything else, handed to the in-line rules.
    Text,
}

/// In-line markup.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InlineRule {
    Formula(FormulaDelimiter),
    /// `*`, `/` or `+`, toggling the span variant.
    Span(Variant),
    Newline,
    /// A plain or escaped character, already unescaped.
    Text(Token),
}

pub fn line_rule(cursor: &Cursor<'_>) -> Option<LineRule> {
    let token = cursor.peek_token()?;

    let rule = if token.escaped {
        if token.ch == '[' {
            LineRule::DisplayFormula(FormulaDelimiter::Brackets)
        } else {
            LineRule::Text
        }
    } else {
        match token.ch {
            '#' => LineRule::Comment,
            '^' => LineRule::Image,
            '!' => LineRule::Alert,
            '=' => LineRule::Heading,
            '\n' => LineRule::BlankLines,
            '-' if cursor.starts_with("->") => LineRule::Continuation,
            '-' if cursor.starts_with("- ") => LineRule::ListItem,
            '$' if cursor.starts_with("$$") => LineRule::DisplayFormula(FormulaDelimiter::Dollars),
            '~' if cursor.starts_with("~~~") => LineRule::CodeBlock,
            '%' => LineRule::EndOfBlock,
            _ => LineRule::Text,
        }
    };

    Some(rule)
}

pub fn inline_rule(cursor: &Cursor<'_>) -> Option<InlineRule> {
    let token = cursor.peek_token()?;

    let rule = match (token.escaped, token.ch) {
        (true, '(') => InlineRule::Formula(FormulaDelimiter::Parens),
        (false, '$') => InlineRule::Formula(FormulaDelimiter::Dollar),
        (false, '*') => InlineRule::Span(Variant::BoldfaceSpan),
        (false, '/') => InlineRule::Span(Variant::ItalicSpan),
        (false, '+') => InlineRule::Span(Variant::TypewriterSpan),
        (false, '\n') => InlineRule::Newline,
        _ => InlineRule::Text(token),
    };

    Some(rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(src: &str) -> Option<LineRule> {
        line_rule(&Cursor::new(src))
    }

    fn inline(src: &str) -> Option<InlineRule> {
        inline_rule(&Cursor::new(src))
    }

    #[test]
    fn line_start_markup() {
        assert_eq!(line("# comment"), Some(LineRule::Comment));
        assert_eq!(line("^a.png^"), Some(LineRule::Image));
        assert_eq!(line("!!! danger"), Some(LineRule::Alert));
        assert_eq!(line("== Title"), Some(LineRule::Heading));
        assert_eq!(line("\n\nx"), Some(LineRule::BlankLines));
        assert_eq!(line("->more"), Some(LineRule::Continuation));
        assert_eq!(line("- item"), Some(LineRule::ListItem));
        assert_eq!(
            line("$$x$$"),
            Some(LineRule::DisplayFormula(FormulaDelimiter::Dollars))
        );
        assert_eq!(
            line("\\[x\\]"),
            Some(LineRule::DisplayFormula(FormulaDelimiter::Brackets))
        );
        assert_eq!(line("~~~\ncode\n~~~"), Some(LineRule::CodeBlock));
        assert_eq!(line("%\n"), Some(LineRule::EndOfBlock));
        assert_eq!(line(""), None);
    }

    #[test]
    fn near_misses_are_text() {
        assert_eq!(line("-dash"), Some(LineRule::Text));
        assert_eq!(line("$x$ inline"), Some(LineRule::Text));
        assert_eq!(line("~tilde"), Some(LineRule::Text));
        assert_eq!(line("\\% literal"), Some(LineRule::Text));
        assert_eq!(line("\\# literal"), Some(LineRule::Text));
        assert_eq!(line("plain"), Some(LineRule::Text));
    }

    #[test]
    fn inline_markup() {
        assert_eq!(
            inline("$x$"),
            Some(InlineRule::Formula(FormulaDelimiter::Dollar))
        );
        assert_eq!(
            inline("\\(x\\)"),
            Some(InlineRule::Formula(FormulaDelimiter::Parens))
        );
        assert_eq!(inline("*"), Some(InlineRule::Span(Variant::BoldfaceSpan)));
        assert_eq!(inline("/"), Some(InlineRule::Span(Variant::ItalicSpan)));
        assert_eq!(inline("+"), Some(InlineRule::Span(Variant::TypewriterSpan)));
        assert_eq!(inline("\n"), Some(InlineRule::Newline));
    }

    #[test]
    fn escaped_markup_is_text() {
        for src in ["\\*", "\\/", "\\+", "\\$", "\\\\", "\\!"] {
            match inline(src) {
                Some(InlineRule::Text(token)) => {
                    assert!(token.escaped);
                    assert_eq!(token.ch, src.chars().nth(1).unwrap());
                }
                other => panic!("{src:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn delimiters() {
        assert_eq!(FormulaDelimiter::Brackets.close(), "\\]");
        assert_eq!(FormulaDelimiter::Parens.open(), "\\(");
    }
}
