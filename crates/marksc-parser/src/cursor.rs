/// One logical character of input. A backslash and the character after it form a single escaped
/// token.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Token {
    pub ch: char,
    pub escaped: bool,
    /// Length in bytes of the token in the source.
    pub len: usize,
}

impl Token {
    /// True for the unescaped character `ch`.
    pub fn is(&self, ch: char) -> bool {
        !self.escaped && self.ch == ch
    }
}

/// Scan position over the preprocessed source.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn src(&self) -> &'a str {
        self.src
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn starts_with(&self, pattern: &str) -> bool {
        self.rest().starts_with(pattern)
    }

    pub fn peek_token(&self) -> Option<Token> {
        let mut chars = self.rest().chars();
        let first = chars.next()?;

        Some(match (first, chars.next()) {
            ('\\', Some(next)) => Token {
                ch: next,
                escaped: true,
                len: 1 + next.len_utf8(),
            },
            (ch, _) => Token {
                ch,
                escaped: false,
                len: ch.len_utf8(),
            },
        })
    }

    pub fn advance(&mut self, bytes: usize) {
        self.pos = (self.pos + bytes).min(self.src.len());
    }

    pub fn jump_to(&mut self, pos: usize) {
        self.pos = pos.min(self.src.len());
    }

    /// Consumes a run of `ch` and returns its length.
    pub fn eat_run(&mut self, ch: char) -> usize {
        let count = self.rest().chars().take_while(|c| *c == ch).count();
        self.advance(count * ch.len_utf8());
        count
    }

    /// Consumes spaces and tabs.
    pub fn skip_blanks(&mut self) {
        let count = self
            .rest()
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .count();
        self.advance(count);
    }

    /// Consumes the rest of the physical line, newline included.
    pub fn skip_line(&mut self) {
        match self.rest().find('\n') {
            Some(offset) => self.advance(offset + 1),
            None => self.jump_to(self.src.len()),
        }
    }

    /// Absolute offset of the next occurrence of `pattern` at or after `from`.
    pub fn find_from(&self, from: usize, pattern: &str) -> Option<usize> {
        self.src
            .get(from..)
            .and_then(|tail| tail.find(pattern))
            .map(|offset| from + offset)
    }

    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.src[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_are_single_tokens() {
        let cursor = Cursor::new("\\*x");
        assert_eq!(
            cursor.peek_token(),
            Some(Token {
                ch: '*',
                escaped: true,
                len: 2
            })
        );
        assert!(!cursor.peek_token().unwrap().is('*'));
    }

    #[test]
    fn trailing_backslash_is_literal() {
        let cursor = Cursor::new("\\");
        assert_eq!(
            cursor.peek_token(),
            Some(Token {
                ch: '\\',
                escaped: false,
                len: 1
            })
        );
    }

    #[test]
    fn multibyte_tokens() {
        let mut cursor = Cursor::new("é\\ü");
        let first = cursor.peek_token().unwrap();
        assert_eq!((first.ch, first.len), ('é', 2));
        cursor.advance(first.len);
        let second = cursor.peek_token().unwrap();
        assert_eq!((second.ch, second.escaped, second.len), ('ü', true, 3));
        cursor.advance(second.len);
        assert!(cursor.at_end());
        assert_eq!(cursor.peek_token(), None);
    }

    #[test]
    fn runs_blanks_and_lines() {
        let mut cursor = Cursor::new("=== \t Title\nnext");
        assert_eq!(cursor.eat_run('='), 3);
        cursor.skip_blanks();
        assert!(cursor.starts_with("Title"));
        cursor.skip_line();
        assert_eq!(cursor.rest(), "next");
        cursor.skip_line();
        assert!(cursor.at_end());
    }

    #[test]
    fn find_from_is_absolute() {
        let cursor = Cursor::new("$$a$$b$$");
        assert_eq!(cursor.find_from(2, "$$"), Some(3));
        assert_eq!(cursor.find_from(5, "$$"), Some(6));
        assert_eq!(cursor.find_from(7, "$$"), None);
        assert_eq!(cursor.find_from(42, "$$"), None);
    }
}
