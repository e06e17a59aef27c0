//! DDL lexer for tokenizing statement headers, column items and table options.
//!
//! Every token carries its byte span so the parser can slice clauses back out
//! of the source verbatim.

use alloc::string::String;
use alloc::vec::Vec;

use crate::scan::{is_ident_byte, word_end};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Start of the token in the input.
    pub start: usize,
    /// End (exclusive) of the token in the input.
    pub end: usize,
}

/// The different kinds of tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// An unquoted word (keyword or identifier), uppercased.
    Word(String),
    /// A double-quoted identifier; the text is available through the span.
    QuotedIdentifier,
    /// A string literal, including prefixed forms such as `X'00FF'`.
    StringLiteral,
    /// An unsigned numeric literal.
    Number,
    /// Left parenthesis
    LParen,
    /// Right parenthesis
    RParen,
    /// Comma
    Comma,
    /// Period
    Dot,
    /// Semicolon
    Semicolon,
    /// Plus sign
    Plus,
    /// Minus sign
    Minus,
    /// Any other character.
    Symbol(char),
    /// End of input
    Eof,
}

/// Errors that can occur during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    /// Unterminated string literal.
    #[error("Unterminated string literal starting at position {pos}")]
    UnterminatedString {
        /// Position where string started.
        pos: usize,
    },
    /// Unterminated quoted identifier.
    #[error("Unterminated quoted identifier starting at position {pos}")]
    UnterminatedIdentifier {
        /// Position where the identifier started.
        pos: usize,
    },
}

/// DDL lexer that produces tokens from input.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenize the whole input. The last token is always [`TokenKind::Eof`].
    ///
    /// # Errors
    ///
    /// Returns an error on an unterminated string or quoted identifier.
    pub fn tokenize(input: &'a str) -> Result<Vec<Token>, LexerError> {
        let mut lexer = Self::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Skip whitespace and comments.
    fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'-' && bytes.get(self.pos + 1) == Some(&b'-') {
                // Line comment
                self.pos += 2;
                while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else if b == b'/' && bytes.get(self.pos + 1) == Some(&b'*') {
                // Block comment
                self.pos += 2;
                while self.pos + 1 < bytes.len()
                    && !(bytes[self.pos] == b'*' && bytes[self.pos + 1] == b'/')
                {
                    self.pos += 1;
                }
                self.pos = (self.pos + 2).min(bytes.len());
            } else {
                break;
            }
        }
    }

    /// Produce the next token.
    ///
    /// # Errors
    ///
    /// Returns an error on an unterminated string or quoted identifier.
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace();

        let start = self.pos;
        let bytes = self.input.as_bytes();

        let Some(&b) = bytes.get(self.pos) else {
            return Ok(Token {
                kind: TokenKind::Eof,
                start,
                end: start,
            });
        };

        let kind = match b {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b',' => TokenKind::Comma,
            b'.' if !bytes.get(self.pos + 1).is_some_and(u8::is_ascii_digit) => TokenKind::Dot,
            b';' => TokenKind::Semicolon,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'\'' => return self.read_quoted(start, self.pos, b'\''),
            b'"' => return self.read_quoted(start, self.pos, b'"'),
            _ if b.is_ascii_digit() || b == b'.' => return Ok(self.read_number(start)),
            _ if is_ident_byte(b) => {
                let end = word_end(bytes, self.pos);
                // Prefixed string literals: X'..', G'..', N'..', UX'..'
                if bytes.get(end) == Some(&b'\'')
                    && matches!(
                        self.input[start..end].to_ascii_uppercase().as_str(),
                        "X" | "G" | "N" | "UX" | "BX"
                    )
                {
                    return self.read_quoted(start, end, b'\'');
                }
                self.pos = end;
                return Ok(Token {
                    kind: TokenKind::Word(self.input[start..end].to_ascii_uppercase()),
                    start,
                    end,
                });
            }
            _ => {
                let c = self.input[self.pos..].chars().next().unwrap_or('\u{fffd}');
                self.pos += c.len_utf8();
                return Ok(Token {
                    kind: TokenKind::Symbol(c),
                    start,
                    end: self.pos,
                });
            }
        };

        self.pos += 1;
        Ok(Token {
            kind,
            start,
            end: self.pos,
        })
    }

    /// Read a quoted span whose opening quote is at `quote_pos`.
    fn read_quoted(&mut self, start: usize, quote_pos: usize, quote: u8) -> Result<Token, LexerError> {
        let bytes = self.input.as_bytes();
        self.pos = quote_pos + 1;

        while self.pos < bytes.len() {
            if bytes[self.pos] == quote {
                // Check for escaped quote (doubled)
                if bytes.get(self.pos + 1) == Some(&quote) {
                    self.pos += 2;
                    continue;
                }
                self.pos += 1;
                let kind = if quote == b'"' {
                    TokenKind::QuotedIdentifier
                } else {
                    TokenKind::StringLiteral
                };
                return Ok(Token {
                    kind,
                    start,
                    end: self.pos,
                });
            }
            self.pos += 1;
        }

        if quote == b'"' {
            Err(LexerError::UnterminatedIdentifier { pos: start })
        } else {
            Err(LexerError::UnterminatedString { pos: start })
        }
    }

    fn read_number(&mut self, start: usize) -> Token {
        let bytes = self.input.as_bytes();
        let digits = |pos: &mut usize| {
            while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
                *pos += 1;
            }
        };

        digits(&mut self.pos);
        if bytes.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            digits(&mut self.pos);
        }
        // Exponent, only when digits follow
        if matches!(bytes.get(self.pos), Some(b'e' | b'E')) {
            let mut lookahead = self.pos + 1;
            if matches!(bytes.get(lookahead), Some(b'+' | b'-')) {
                lookahead += 1;
            }
            if bytes.get(lookahead).is_some_and(u8::is_ascii_digit) {
                self.pos = lookahead;
                digits(&mut self.pos);
            }
        }

        Token {
            kind: TokenKind::Number,
            start,
            end: self.pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::tokenize(input)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_words_are_uppercased() {
        assert_eq!(
            kinds("create Table app.account"),
            vec![
                TokenKind::Word("CREATE".into()),
                TokenKind::Word("TABLE".into()),
                TokenKind::Word("APP".into()),
                TokenKind::Dot,
                TokenKind::Word("ACCOUNT".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_size_with_unit() {
        assert_eq!(
            kinds("CLOB(1M)"),
            vec![
                TokenKind::Word("CLOB".into()),
                TokenKind::LParen,
                TokenKind::Number,
                TokenKind::Word("M".into()),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_literal_spans() {
        let input = "'it''s' \"Col,1\" -1.5e3 X'00FF'";
        let tokens = Lexer::tokenize(input).unwrap();
        let spans: Vec<&str> = tokens.iter().map(|t| &input[t.start..t.end]).collect();
        assert_eq!(spans, vec!["'it''s'", "\"Col,1\"", "-", "1.5e3", "X'00FF'", ""]);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[1].kind, TokenKind::QuotedIdentifier);
        assert_eq!(tokens[2].kind, TokenKind::Minus);
        assert_eq!(tokens[3].kind, TokenKind::Number);
        assert_eq!(tokens[4].kind, TokenKind::StringLiteral);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("A -- note\n INT /* x */ NOT NULL"),
            vec![
                TokenKind::Word("A".into()),
                TokenKind::Word("INT".into()),
                TokenKind::Word("NOT".into()),
                TokenKind::Word("NULL".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated() {
        assert_eq!(
            Lexer::tokenize("'abc"),
            Err(LexerError::UnterminatedString { pos: 0 })
        );
        assert_eq!(
            Lexer::tokenize("A \"abc"),
            Err(LexerError::UnterminatedIdentifier { pos: 2 })
        );
    }

    #[test]
    fn test_symbols() {
        assert_eq!(
            kinds("(),;=|"),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Symbol('='),
                TokenKind::Symbol('|'),
                TokenKind::Eof,
            ]
        );
    }
}
