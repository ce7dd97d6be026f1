use crate::cursor::Cursor;
use crate::error::{ParserError, Position, Violation};
use crate::options::ParserOptions;
use crate::rules::{inline_rule, line_rule, FormulaDelimiter, InlineRule, LineRule, Mode};
use crate::stack::NodeStack;
use marksc_base::node::{Node, Tree, Variant};

const SPANS: [Variant; 3] = [
    Variant::BoldfaceSpan,
    Variant::ItalicSpan,
    Variant::TypewriterSpan,
];

/// Nodes inline content is scoped to.
const INLINE_SCOPE: [Variant; 4] = [
    Variant::Paragraph,
    Variant::BoldfaceSpan,
    Variant::ItalicSpan,
    Variant::TypewriterSpan,
];

/// Parses a whole MarkSC document with the default options.
pub fn parse_document(input: &str) -> Result<Tree, ParserError> {
    parse_document_with(input, &ParserOptions::default())
}

pub fn parse_document_with(input: &str, options: &ParserOptions) -> Result<Tree, ParserError> {
    let src = strip_trailing_whitespace(input);
    DocParser::new(&src, options).run()
}

/// Removes trailing whitespace from every line. Leading whitespace is kept.
pub fn strip_trailing_whitespace(input: &str) -> String {
    input
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

struct DocParser<'a> {
    cursor: Cursor<'a>,
    stack: NodeStack,
    mode: Mode,
}

impl<'a> DocParser<'a> {
    fn new(src: &'a str, options: &ParserOptions) -> Self {
        Self {
            cursor: Cursor::new(src),
            stack: NodeStack::new(options.max_depth),
            mode: Mode::LineStart,
        }
    }

    fn run(mut self) -> Result<Tree, ParserError> {
        while !self.cursor.at_end() {
            match self.mode {
                Mode::LineStart => self.line_start()?,
                Mode::Inline => self.inline()?,
            }
        }

        self.close_until(&[Variant::Document])?;
        self.stack.pop()?;
        Ok(self.stack.into_tree())
    }

    fn line_start(&mut self) -> Result<(), ParserError> {
        let Some(rule) = line_rule(&self.cursor) else {
            return Ok(());
        };

        self.mode = Mode::Inline;
        match rule {
            LineRule::Comment => {
                self.cursor.skip_line();
                self.mode = Mode::LineStart;
                Ok(())
            }
            LineRule::Image => self.image(),
            LineRule::Alert => self.alert(),
            LineRule::Heading => self.heading(),
            LineRule::BlankLines => self.blank_lines(),
            LineRule::Continuation => {
                self.cursor.advance(2);
                Ok(())
            }
            LineRule::ListItem => self.list_item(),
            LineRule::DisplayFormula(delimiter) => self.display_formula(delimiter),
            LineRule::CodeBlock => self.code_block(),
            LineRule::EndOfBlock => self.end_of_block(),
            LineRule::Text => self.line_text(),
        }
    }

    fn inline(&mut self) -> Result<(), ParserError> {
        let Some(rule) = inline_rule(&self.cursor) else {
            return Ok(());
        };

        match rule {
            InlineRule::Formula(delimiter) => self.inline_formula(delimiter),
            InlineRule::Span(variant) => self.toggle_span(variant),
            InlineRule::Newline => {
                self.cursor.advance(1);
                self.mode = Mode::LineStart;
                Ok(())
            }
            InlineRule::Text(token) => {
                self.push_char(token.ch)?;
                self.cursor.advance(token.len);
                Ok(())
            }
        }
    }

    fn image(&mut self) -> Result<(), ParserError> {
        let start = self.cursor.pos();
        let end = self
            .cursor
            .find_from(start + 1, "^")
            .ok_or_else(|| self.violation_at(start, Violation::UnterminatedImage))?;
        let path = self.cursor.slice(start + 1, end);

        self.enter_block()?;
        self.stack.push(Node::image(path))?;
        self.stack.push(Node::new(Variant::Paragraph))?;

        self.cursor.jump_to(end + 1);
        self.cursor.skip_blanks();
        Ok(())
    }

    fn alert(&mut self) -> Result<(), ParserError> {
        self.enter_block()?;
        let level = self.cursor.eat_run('!');
        self.stack.push(Node::alert(level))?;
        self.stack.push(Node::new(Variant::Paragraph))?;

        self.cursor.skip_blanks();
        Ok(())
    }

    fn heading(&mut self) -> Result<(), ParserError> {
        let start = self.cursor.pos();
        let depth = self.cursor.eat_run('=');

        // Close sections until the innermost open one is shallower than the new heading.
        let enclosing = loop {
            match self.stack.innermost(&[Variant::Section]) {
                Some(section) => {
                    let section_depth = self.stack.tree()[section].depth().unwrap_or_default();
                    self.close_until_at(&[Variant::Section], start)?;
                    if section_depth < depth {
                        break section_depth;
                    }
                    self.stack.pop()?;
                }
                None => {
                    self.close_until_at(&[Variant::Document], start)?;
                    break 0;
                }
            }
        };

        if depth > enclosing + 1 {
            return Err(self.violation_at(
                start,
                Violation::SkippedSectionLevel { depth, enclosing },
            ));
        }

        self.stack.push(Node::new(Variant::Section))?;
        self.stack.push(Node::new(Variant::SectionTitle))?;
        self.stack.push(Node::new(Variant::Paragraph))?;

        self.cursor.skip_blanks();
        Ok(())
    }

    fn blank_lines(&mut self) -> Result<(), ParserError> {
        let start = self.cursor.pos();
        self.cursor.eat_run('\n');
        self.mode = Mode::LineStart;

        if self.stack.contains_any(&[Variant::Block]) {
            self.close_until_at(&[Variant::Block], start)
        } else if self.stack.top_node()?.variant != Variant::Document {
            self.open_block()
        } else {
            Ok(())
        }
    }

    fn list_item(&mut self) -> Result<(), ParserError> {
        if !self.stack.contains_any(&[Variant::ListContainer]) {
            if self
                .stack
                .contains_any(&[Variant::Boxed, Variant::Block])
            {
                self.close_until(&[Variant::Boxed, Variant::Block])?;
            } else {
                self.open_block()?;
            }
            self.stack.push(Node::new(Variant::ListContainer))?;
        } else {
            self.close_until(&[Variant::ListItem])?;
            self.stack.pop()?;
        }

        self.stack.push(Node::new(Variant::ListItem))?;
        self.stack.push(Node::new(Variant::Paragraph))?;

        self.cursor.advance(1);
        self.cursor.skip_blanks();
        Ok(())
    }

    fn display_formula(&mut self, delimiter: FormulaDelimiter) -> Result<(), ParserError> {
        if self.stack.contains_any(&[Variant::Formula]) {
            return self.close_until(&[Variant::Block]);
        }

        let latex = self.capture(delimiter)?;
        self.enter_block()?;
        self.leaf(Variant::Formula, latex)
    }

    fn inline_formula(&mut self, delimiter: FormulaDelimiter) -> Result<(), ParserError> {
        let latex = self.capture(delimiter)?;
        self.ensure_paragraph()?;
        self.close_until(&INLINE_SCOPE)?;
        self.leaf(Variant::FormulaSpan, latex)
    }

    fn code_block(&mut self) -> Result<(), ParserError> {
        let start = self.cursor.pos();
        let body = start + 3;
        let (end, resume) = self
            .code_end(body)
            .ok_or_else(|| self.violation_at(start, Violation::UnterminatedCode))?;
        let snippet = self.cursor.slice(body, end).to_string();

        self.enter_block()?;
        self.leaf(Variant::Code, snippet)?;

        self.cursor.jump_to(resume);
        self.mode = Mode::LineStart;
        Ok(())
    }

    /// Finds the `~~~` line closing a code block whose text starts at `from`. Returns where the
    /// snippet ends and where scanning resumes.
    fn code_end(&self, from: usize) -> Option<(usize, usize)> {
        let src = self.cursor.src();
        let mut search = from;

        loop {
            let at = self.cursor.find_from(search, "~~~")?;
            let after = at + 3;
            let line_start = at > 0 && src.as_bytes()[at - 1] == b'\n';

            if line_start {
                match src.as_bytes().get(after) {
                    None => return Some((at, after)),
                    Some(b'\n') => return Some((at, after + 1)),
                    Some(_) => {}
                }
            }
            search = at + 1;
        }
    }

    fn end_of_block(&mut self) -> Result<(), ParserError> {
        if !self.cursor.starts_with("%\n") {
            return Err(self.violation(Violation::EndOfBlockNotAlone));
        }
        if !self.stack.contains_any(&[Variant::Block]) {
            return Err(self.violation(Violation::EndOfBlockWithoutBlock));
        }

        self.close_until(&[Variant::Block])?;
        self.stack.pop()?;
        self.stack.push(Node::new(Variant::Block))?;

        self.cursor.advance(2);
        self.mode = Mode::LineStart;
        Ok(())
    }

    /// Ordinary text at the start of a line. The character is left for the in-line rules.
    fn line_text(&mut self) -> Result<(), ParserError> {
        if !self.stack.contains_any(&[Variant::Paragraph]) {
            return Ok(());
        }

        if self.stack.contains_any(&[Variant::SectionTitle]) {
            self.close_until(&[Variant::Section])?;
            self.stack.push(Node::new(Variant::Block))?;
            return Ok(());
        }

        Err(self.violation(Violation::MissingContinuation))
    }

    fn toggle_span(&mut self, variant: Variant) -> Result<(), ParserError> {
        if self.stack.contains_any(&[variant]) {
            self.close_until(&[variant])?;
            self.stack.pop()?;
        } else {
            self.ensure_paragraph()?;
            self.close_until(&INLINE_SCOPE)?;
            self.stack.push(Node::new(variant))?;
        }

        self.cursor.advance(1);
        Ok(())
    }

    fn push_char(&mut self, ch: char) -> Result<(), ParserError> {
        self.ensure_paragraph()?;

        let top = self.stack.top_node_mut()?;
        if top.variant == Variant::String {
            top.content.get_or_insert_with(String::new).push(ch);
            return Ok(());
        }

        if self.stack.contains_any(&[Variant::String]) {
            return Err(ParserError::Internal {
                message: "text leaf is open but not innermost".to_string(),
                position: self.position(self.cursor.pos()),
            });
        }

        self.stack.push(Node::new_string(ch.to_string()))?;
        Ok(())
    }

    /// Opens a node holding a single string leaf and closes both.
    fn leaf(&mut self, variant: Variant, text: String) -> Result<(), ParserError> {
        self.stack.push(Node::new(variant))?;
        self.stack.push(Node::new_string(text))?;
        self.stack.pop()?;
        self.stack.pop()?;
        Ok(())
    }

    /// Consumes a delimited formula and returns the text between the delimiters.
    fn capture(&mut self, delimiter: FormulaDelimiter) -> Result<String, ParserError> {
        let start = self.cursor.pos();
        let body = start + delimiter.open().len();
        let end = self
            .cursor
            .find_from(body, delimiter.close())
            .ok_or_else(|| {
                self.violation_at(start, Violation::UnterminatedFormula(delimiter.close()))
            })?;

        let text = self.cursor.slice(body, end).to_string();
        self.cursor.jump_to(end + delimiter.close().len());
        Ok(text)
    }

    fn ensure_paragraph(&mut self) -> Result<(), ParserError> {
        if self.stack.contains_any(&[Variant::Paragraph]) {
            return Ok(());
        }
        if !self.stack.contains_any(&[Variant::Block]) {
            self.open_block()?;
        }
        self.stack.push(Node::new(Variant::Paragraph))?;
        Ok(())
    }

    /// Makes the innermost open block the top, opening a block if there is none.
    fn enter_block(&mut self) -> Result<(), ParserError> {
        if self.stack.contains_any(&[Variant::Block]) {
            self.close_until(&[Variant::Block])
        } else {
            self.open_block()
        }
    }

    /// Opens a block directly below the innermost section, or below the document outside
    /// sections.
    fn open_block(&mut self) -> Result<(), ParserError> {
        self.close_until(&[Variant::Section, Variant::Document])?;
        self.stack.push(Node::new(Variant::Block))?;
        Ok(())
    }

    fn close_until(&mut self, targets: &[Variant]) -> Result<(), ParserError> {
        self.close_until_at(targets, self.cursor.pos())
    }

    /// Pops until the top matches `targets`. Spans may only be closed by their own delimiter,
    /// so closing one on the way is a grammar violation.
    fn close_until_at(&mut self, targets: &[Variant], offset: usize) -> Result<(), ParserError> {
        let unclosed = self
            .stack
            .open_above(targets)
            .find(|node| node.matches(&SPANS))
            .map(|node| node.variant);

        if let Some(span) = unclosed {
            return Err(self.violation_at(offset, Violation::UnterminatedSpan(span)));
        }

        self.stack.pop_until(targets)
    }

    fn position(&self, offset: usize) -> Position {
        Position::locate(self.cursor.src(), offset)
    }

    fn violation(&self, violation: Violation) -> ParserError {
        self.violation_at(self.cursor.pos(), violation)
    }

    fn violation_at(&self, offset: usize, violation: Violation) -> ParserError {
        ParserError::Grammar {
            violation,
            position: self.position(offset),
        }
    }
}
