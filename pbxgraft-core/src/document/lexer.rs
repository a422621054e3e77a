//! Tokenizer for the old-style (OpenStep) property list syntax used by
//! `project.pbxproj`.
//!
//! Comments are skipped. Every token keeps the byte range it came from so the
//! parser can hand exact offsets to callers that splice the original text.

use std::ops::Range;

use super::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    Equals,
    Semicolon,
    Comma,
    /// A bare word or a quoted string, already unescaped.
    Scalar(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_trivia()?;

        let start = self.pos;
        let Some(c) = self.rest().chars().next() else {
            return Ok(None);
        };

        let punct = match c {
            '{' => Some(TokenKind::OpenBrace),
            '}' => Some(TokenKind::CloseBrace),
            '(' => Some(TokenKind::OpenParen),
            ')' => Some(TokenKind::CloseParen),
            '=' => Some(TokenKind::Equals),
            ';' => Some(TokenKind::Semicolon),
            ',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = punct {
            self.pos += 1;
            return Ok(Some(Token {
                kind,
                span: start..self.pos,
            }));
        }

        if c == '"' || c == '\'' {
            let text = self.quoted(c)?;
            return Ok(Some(Token {
                kind: TokenKind::Scalar(text),
                span: start..self.pos,
            }));
        }

        if is_word_char(c) {
            let word = self.word();
            return Ok(Some(Token {
                kind: TokenKind::Scalar(word.to_string()),
                span: start..self.pos,
            }));
        }

        Err(ParseError::at(
            self.src,
            start,
            format!("unexpected character {:?}", c),
        ))
    }

    /// Skip whitespace, `/* block */` and `// line` comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            if trimmed.starts_with("/*") {
                let Some(end) = trimmed[2..].find("*/") else {
                    return Err(ParseError::at(self.src, self.pos, "unterminated comment"));
                };
                self.pos += end + 4;
            } else if trimmed.starts_with("//") {
                let end = trimmed.find('\n').unwrap_or(trimmed.len());
                self.pos += end;
            } else {
                return Ok(());
            }
        }
    }

    fn word(&mut self) -> &'a str {
        let rest = self.rest();
        let mut end = 0;
        for (i, c) in rest.char_indices() {
            // A block comment glued to a word ends the word.
            if !is_word_char(c) || rest[i..].starts_with("/*") {
                break;
            }
            end = i + c.len_utf8();
        }
        self.pos += end;
        &rest[..end]
    }

    fn quoted(&mut self, quote: char) -> Result<String, ParseError> {
        let start = self.pos;
        self.pos += 1;

        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    let Some((_, escaped)) = chars.next() else {
                        break;
                    };
                    out.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                }
                c if c == quote => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                c => out.push(c),
            }
        }

        Err(ParseError::at(self.src, start, "unterminated string"))
    }
}

/// Characters allowed in an unquoted scalar.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '+' | '/' | ':' | '.' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .tokenize()
            .expect("tokenize failed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn scalar(s: &str) -> TokenKind {
        TokenKind::Scalar(s.to_string())
    }

    #[test]
    fn test_record_line() {
        let src = "A1 /* Foo.swift */ = {isa = PBXFileReference; path = Foo.swift; };";
        assert_eq!(
            kinds(src),
            vec![
                scalar("A1"),
                TokenKind::Equals,
                TokenKind::OpenBrace,
                scalar("isa"),
                TokenKind::Equals,
                scalar("PBXFileReference"),
                TokenKind::Semicolon,
                scalar("path"),
                TokenKind::Equals,
                scalar("Foo.swift"),
                TokenKind::Semicolon,
                TokenKind::CloseBrace,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_header_comment_and_quoted() {
        let src = "// !$*UTF8*$!\n{ sourceTree = \"<group>\"; name = \"My \\\"App\\\"\"; }";
        assert_eq!(
            kinds(src),
            vec![
                TokenKind::OpenBrace,
                scalar("sourceTree"),
                TokenKind::Equals,
                scalar("<group>"),
                TokenKind::Semicolon,
                scalar("name"),
                TokenKind::Equals,
                scalar("My \"App\""),
                TokenKind::Semicolon,
                TokenKind::CloseBrace,
            ]
        );
    }

    #[test]
    fn test_spans_point_into_source() {
        let src = "  files = (\n\tB1 /* x */,\n);";
        let tokens = Lexer::new(src).tokenize().unwrap();
        let paren = tokens
            .iter()
            .find(|t| t.kind == TokenKind::CloseParen)
            .unwrap();
        assert_eq!(&src[paren.span.clone()], ")");
        assert_eq!(&src[tokens[0].span.clone()], "files");
    }

    #[test]
    fn test_word_stops_at_glued_comment() {
        assert_eq!(kinds("path/to/*c*/"), vec![scalar("path/to")]);
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = Lexer::new("{ a = \"oops; }").tokenize().unwrap_err();
        assert!(err.to_string().contains("unterminated string"));
    }
}
