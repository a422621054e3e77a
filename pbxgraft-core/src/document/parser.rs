//! Recursive-descent parser producing a span-annotated value tree.

use std::ops::Range;

use super::lexer::{Lexer, Token, TokenKind};
use super::ParseError;

/// A parsed property-list value. Spans are byte offsets into the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar { text: String, span: Range<usize> },
    /// `span` runs from the `(` to just past the `)`. `trailing_comma` is set
    /// when the last item is followed by a `,` (or there are no items), and
    /// `tail` is the offset just past the last item and its `,`.
    Array {
        items: Vec<Value>,
        span: Range<usize>,
        trailing_comma: bool,
        tail: usize,
    },
    /// `span` runs from the `{` to just past the `}`.
    Dict { fields: Vec<Field>, span: Range<usize> },
}

/// One `key = value;` pair of a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub key_span: Range<usize>,
    pub value: Value,
    /// Offset just past the terminating `;`.
    pub end: usize,
}

impl Value {
    pub fn span(&self) -> &Range<usize> {
        match self {
            Value::Scalar { span, .. } | Value::Array { span, .. } | Value::Dict { span, .. } => {
                span
            }
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Value::Dict { fields, .. } => Some(fields),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields()?
            .iter()
            .find(|f| f.key == key)
            .map(|f| &f.value)
    }
}

pub fn parse(src: &str) -> Result<Value, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    let mut parser = Parser {
        src,
        tokens: &tokens,
        pos: 0,
    };

    let root = parser.value()?;
    if !matches!(root, Value::Dict { .. }) {
        return Err(ParseError::at(src, root.span().start, "root is not a dictionary"));
    }
    if let Some(extra) = parser.peek() {
        return Err(ParseError::at(
            src,
            extra.span.start,
            "trailing content after root dictionary",
        ));
    }
    Ok(root)
}

struct Parser<'a> {
    src: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Result<&'a Token, ParseError> {
        let token = self
            .tokens
            .get(self.pos)
            .ok_or_else(|| ParseError::at(self.src, self.src.len(), "unexpected end of input"))?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<&'a Token, ParseError> {
        let token = self.bump()?;
        if token.kind != kind {
            return Err(ParseError::at(
                self.src,
                token.span.start,
                format!("expected {}", what),
            ));
        }
        Ok(token)
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        let token = self.bump()?;
        match &token.kind {
            TokenKind::Scalar(text) => Ok(Value::Scalar {
                text: text.clone(),
                span: token.span.clone(),
            }),
            TokenKind::OpenBrace => self.dict(token.span.start),
            TokenKind::OpenParen => self.array(token.span.start),
            _ => Err(ParseError::at(self.src, token.span.start, "expected a value")),
        }
    }

    fn dict(&mut self, start: usize) -> Result<Value, ParseError> {
        let mut fields = Vec::new();
        loop {
            let token = self.bump()?;
            let key = match &token.kind {
                TokenKind::CloseBrace => {
                    return Ok(Value::Dict {
                        fields,
                        span: start..token.span.end,
                    });
                }
                TokenKind::Scalar(key) => key.clone(),
                _ => {
                    return Err(ParseError::at(
                        self.src,
                        token.span.start,
                        "expected a key or `}`",
                    ));
                }
            };
            let key_span = token.span.clone();

            self.expect(TokenKind::Equals, "`=`")?;
            let value = self.value()?;
            let semi = self.expect(TokenKind::Semicolon, "`;`")?;

            fields.push(Field {
                key,
                key_span,
                value,
                end: semi.span.end,
            });
        }
    }

    fn array(&mut self, start: usize) -> Result<Value, ParseError> {
        let mut items = Vec::new();
        let mut tail = start + 1;
        loop {
            if let Some(token) = self.peek() {
                if token.kind == TokenKind::CloseParen {
                    self.pos += 1;
                    return Ok(Value::Array {
                        items,
                        span: start..token.span.end,
                        trailing_comma: true,
                        tail,
                    });
                }
            }

            let item = self.value()?;
            tail = item.span().end;
            items.push(item);

            let token = self.bump()?;
            match token.kind {
                TokenKind::Comma => tail = token.span.end,
                TokenKind::CloseParen => {
                    return Ok(Value::Array {
                        items,
                        span: start..token.span.end,
                        trailing_comma: false,
                        tail,
                    });
                }
                _ => {
                    return Err(ParseError::at(
                        self.src,
                        token.span.start,
                        "expected `,` or `)`",
                    ));
                }
            }
        }
    }
}
