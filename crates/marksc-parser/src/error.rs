use marksc_base::node::Variant;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Location in the preprocessed input. `line` and `column` are 1-based and count characters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub(crate) fn locate(input: &str, offset: usize) -> Self {
        let offset = offset.min(input.len());
        let before = &input[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;

        Self {
            offset,
            line,
            column,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Ways a document can break the grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("formula is missing its closing `{0}`")]
    UnterminatedFormula(&'static str),
    #[error("image path is missing its closing `^`")]
    UnterminatedImage,
    #[error("code block is missing its closing `~~~` line")]
    UnterminatedCode,
    #[error("{0} is never closed")]
    UnterminatedSpan(Variant),
    #[error("heading of depth {depth} inside a section of depth {enclosing} skips a level")]
    SkippedSectionLevel { depth: usize, enclosing: usize },
    #[error("end-of-block marker `%` must be alone on its line")]
    EndOfBlockNotAlone,
    #[error("end-of-block marker `%` without an open block")]
    EndOfBlockWithoutBlock,
    #[error("paragraph continues on a new line without `->`")]
    MissingContinuation,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("grammar violation at {position}: {violation}")]
    Grammar {
        violation: Violation,
        position: Position,
    },
    #[error("pop requested on an empty node stack")]
    StackUnderflow,
    #[error("internal consistency violation at {position}: {message}")]
    Internal { message: String, position: Position },
    #[error("more than {limit} nested nodes")]
    NestingTooDeep { limit: usize },
}

/// Coarse classification of a [`ParserError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Grammar,
    StackUnderflow,
    Internal,
    Limit,
}

impl ParserError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParserError::Grammar { .. } => ErrorKind::Grammar,
            ParserError::StackUnderflow => ErrorKind::StackUnderflow,
            ParserError::Internal { .. } => ErrorKind::Internal,
            ParserError::NestingTooDeep { .. } => ErrorKind::Limit,
        }
    }

    pub fn violation(&self) -> Option<&Violation> {
        if let ParserError::Grammar { violation, .. } = self {
            Some(violation)
        } else {
            None
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            ParserError::Grammar { position, .. } | ParserError::Internal { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_counts_lines_and_characters() {
        let input = "ab\nçd\nef";
        assert_eq!(
            Position::locate(input, 0),
            Position {
                offset: 0,
                line: 1,
                column: 1
            }
        );
        // 'd' sits after a two-byte character
        let d = input.find('d').unwrap();
        assert_eq!(Position::locate(input, d).line, 2);
        assert_eq!(Position::locate(input, d).column, 2);
        assert_eq!(Position::locate(input, input.len()).line, 3);
    }

    #[test]
    fn messages_name_the_problem() {
        let err = ParserError::Grammar {
            violation: Violation::UnterminatedSpan(Variant::BoldfaceSpan),
            position: Position::locate("x\n*y", 2),
        };
        assert_eq!(
            err.to_string(),
            "grammar violation at line 2, column 1: BoldfaceSpan is never closed"
        );
        assert_eq!(err.kind(), ErrorKind::Grammar);
        assert_eq!(
            ParserError::StackUnderflow.kind(),
            ErrorKind::StackUnderflow
        );
    }
}
