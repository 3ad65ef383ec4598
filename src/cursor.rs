//! Forward-only scanner over one markup buffer.
//!
//! The cursor splits the buffer into literal runs, tags (`<...>`) and
//! reference constructs (`@[target]{content}`). It knows nothing about
//! nesting; pairing openers with closers is the tree builder's job.

use winnow::ascii::multispace0;
use winnow::combinator::delimited;
use winnow::prelude::*;
use winnow::token::{take_till, take_until};
use winnow::ModalResult;

use crate::error::{ParseError, ParseErrorKind};

/// Literal backslash-n left behind by line-wrapped source text.
const NEWLINE_ESCAPE: &str = "\\n";

/// Absolute byte range of a token, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Text {
        text: &'a str,
        span: Span,
    },
    /// `body` is everything between `<` and `>`, untrimmed.
    Tag {
        body: &'a str,
        span: Span,
    },
    Reference {
        target: &'a str,
        content: &'a str,
        span: Span,
    },
}

impl Token<'_> {
    pub fn span(&self) -> Span {
        match self {
            Token::Text { span, .. } | Token::Tag { span, .. } | Token::Reference { span, .. } => {
                *span
            }
        }
    }
}

pub struct Cursor<'a> {
    input: &'a str,
    offset: usize,
    failed: bool,
}

impl<'a> Cursor<'a> {
    /// `base` is the absolute offset of `src` within the text being parsed,
    /// so that spans and errors point into the caller's original string.
    pub fn new(src: &'a str, base: usize) -> Self {
        Self {
            input: src,
            offset: base,
            failed: false,
        }
    }

    /// Absolute offset of the next unread byte.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn eat<O>(&mut self, mut parser: impl FnMut(&mut &'a str) -> ModalResult<O>) -> Option<O> {
        let before = self.input;
        match parser(&mut self.input) {
            Ok(out) => {
                self.offset += before.len() - self.input.len();
                Some(out)
            }
            Err(_) => {
                self.input = before;
                None
            }
        }
    }

    fn literal(&mut self) -> Option<Token<'a>> {
        let start = self.offset;
        let text = self.eat(literal_run).unwrap_or_default();
        if text.is_empty() || text.trim_end() == NEWLINE_ESCAPE {
            return None;
        }
        Some(Token::Text {
            text,
            span: Span::new(start, self.offset),
        })
    }

    fn tag(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.offset;
        let body = self
            .eat(tag_body)
            .ok_or(ParseError::new(ParseErrorKind::UnterminatedTag, start))?;
        let span = Span::new(start, self.offset);
        self.eat(whitespace);
        Ok(Token::Tag { body, span })
    }

    fn reference(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.offset;
        let (target, content) = self
            .eat(reference_construct)
            .ok_or(ParseError::new(ParseErrorKind::MalformedReference, start))?;
        let span = Span::new(start, self.offset);
        self.eat(whitespace);
        Ok(Token::Reference {
            target: target.trim(),
            content: content.trim(),
            span,
        })
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.failed && !self.input.is_empty() {
            let token = if self.input.starts_with('<') {
                self.tag()
            } else if self.input.starts_with('@') {
                self.reference()
            } else {
                match self.literal() {
                    Some(token) => Ok(token),
                    None => continue,
                }
            };
            self.failed = token.is_err();
            return Some(token);
        }
        None
    }
}

fn literal_run<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_till(0.., ['<', '@']).parse_next(input)
}

fn tag_body<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    delimited('<', take_until(0.., '>'), '>').parse_next(input)
}

// `@[target]{content}`; neither part may run past the next `<`.
fn reference_construct<'i>(input: &mut &'i str) -> ModalResult<(&'i str, &'i str)> {
    (
        '@',
        delimited('[', take_till(0.., [']', '<']), ']'),
        multispace0,
        delimited('{', take_till(0.., ['}', '<']), '}'),
    )
        .map(|(_, target, _, content)| (target, content))
        .parse_next(input)
}

fn whitespace<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    multispace0(input)
}
