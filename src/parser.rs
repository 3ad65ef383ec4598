use crate::ast::*;
use crate::cursor::{Cursor, Span, Token};
use crate::error::{ParseError, ParseErrorKind};

/// Builds the tree for one piece of markup. The result is always rooted in a
/// synthetic `body` container; any error aborts the whole parse.
pub fn parse(text: &str) -> Result<Container, ParseError> {
    let lead = text.len() - text.trim_start().len();
    let children = parse_nodes(text.trim(), lead, 0)?;
    Ok(Container::root(children))
}

/// Deepest container nesting a document may use, not counting the root.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagForm {
    Open,
    Close,
    Void,
}

#[derive(Debug)]
struct TagHead<'a> {
    form: TagForm,
    label: &'a str,
    attributes: &'a str,
}

impl<'a> TagHead<'a> {
    fn read(body: &'a str, span: Span) -> Result<Self, ParseError> {
        let body = body.trim();
        let (form, rest) = if let Some(rest) = body.strip_prefix('/') {
            (TagForm::Close, rest)
        } else if let Some(rest) = body.strip_suffix('/') {
            (TagForm::Void, rest)
        } else {
            (TagForm::Open, body)
        };

        let rest = rest.trim();
        let (label, attributes) = match rest.split_once(char::is_whitespace) {
            Some((label, attributes)) => (label, attributes.trim()),
            None => (rest, ""),
        };
        if label.is_empty() {
            return Err(ParseError::new(ParseErrorKind::EmptyLabel, span.start));
        }

        let form = match form {
            TagForm::Open if is_always_void(label) => TagForm::Void,
            other => other,
        };
        Ok(TagHead {
            form,
            label,
            attributes,
        })
    }
}

/// `depth` counts the containers enclosing `src`.
fn parse_nodes(src: &str, base: usize, depth: usize) -> Result<Vec<Node>, ParseError> {
    let mut cursor = Cursor::new(src, base);
    let mut nodes = Vec::new();

    while let Some(token) = cursor.next() {
        match token? {
            Token::Text { text, .. } => nodes.push(Node::text(text)),
            Token::Reference {
                target, content, ..
            } => nodes.push(Node::reference(target, content)),
            Token::Tag { body, span } => {
                let head = TagHead::read(body, span)?;
                match head.form {
                    TagForm::Void => nodes.push(Node::void(head.label, head.attributes)),
                    TagForm::Close => {
                        return Err(ParseError::new(ParseErrorKind::UnmatchedTag, span.start));
                    }
                    TagForm::Open => {
                        if depth >= MAX_NESTING {
                            return Err(ParseError::new(
                                ParseErrorKind::NestingTooDeep,
                                span.start,
                            ));
                        }
                        let inner_start = cursor.offset();
                        let inner_end = find_closer(&mut cursor, head.label, span)?;
                        let inner = &src[inner_start - base..inner_end - base];
                        let children = parse_nodes(inner.trim_end(), inner_start, depth + 1)?;
                        nodes.push(Node::Container(Container::new(
                            head.label,
                            head.attributes,
                            children,
                        )));
                    }
                }
            }
        }
    }

    Ok(nodes)
}

/// Advances `cursor` past the closer matching an already consumed opener and
/// returns the offset of that closer's `<`. Openers with the same label
/// nest, so `<p>a<p>b</p>c</p>` closes on the second `</p>`.
fn find_closer(cursor: &mut Cursor<'_>, label: &str, opener: Span) -> Result<usize, ParseError> {
    let mut depth = 1usize;
    while let Some(token) = cursor.next() {
        let Token::Tag { body, span } = token? else {
            continue;
        };
        let head = TagHead::read(body, span)?;
        if head.label != label {
            continue;
        }
        match head.form {
            TagForm::Open => depth += 1,
            TagForm::Close => {
                depth -= 1;
                if depth == 0 {
                    return Ok(span.start);
                }
            }
            TagForm::Void => {}
        }
    }
    Err(ParseError::new(ParseErrorKind::UnmatchedTag, opener.start))
}
