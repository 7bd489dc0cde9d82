use std::fmt;
use std::ops::Range;

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// A single token with its byte span in the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Identifier(String),
    Number(i64),
    /// Verbatim text between a pair of double quotes. No escape processing.
    StringLiteral(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    /// The two-character range operator `..`.
    DotDot,
    Eof,
}

impl TokenKind {
    /// Short human-readable description, used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Identifier(_) => "an identifier",
            TokenKind::Number(_) => "a number",
            TokenKind::StringLiteral(_) => "a string literal",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Colon => "`:`",
            TokenKind::Comma => "`,`",
            TokenKind::DotDot => "`..`",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(name) => write!(f, "{}", name),
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::StringLiteral(s) => write!(f, "\"{}\"", s),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::DotDot => write!(f, ".."),
            TokenKind::Eof => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Lex errors
// ---------------------------------------------------------------------------

/// Tokenization-level failures. Structural violations are `ParseError`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A `"` was opened but the input ended before the closing quote.
    UnterminatedString { span: Range<usize> },
    /// A character that cannot start any token.
    UnexpectedCharacter { character: char, span: Range<usize> },
    /// A numeric literal that does not fit in an `i64`.
    InvalidNumber { span: Range<usize> },
}

impl LexError {
    pub fn span(&self) -> &Range<usize> {
        match self {
            LexError::UnterminatedString { span } => span,
            LexError::UnexpectedCharacter { span, .. } => span,
            LexError::InvalidNumber { span } => span,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnterminatedString { .. } => {
                write!(f, "unterminated string literal")
            }
            LexError::UnexpectedCharacter { character, .. } => {
                write!(f, "unexpected character `{}`", character)
            }
            LexError::InvalidNumber { .. } => {
                write!(f, "number literal out of range")
            }
        }
    }
}

impl std::error::Error for LexError {}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

/// A lazy tokenizer over an immutable source buffer.
///
/// Yields `Result<Token, LexError>` items; the final successful item is
/// always the `Eof` token. After yielding an error or `Eof` the iterator
/// is exhausted.
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            pos: 0,
            done: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\n' || c == '\r' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn scan_token(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        // Whitespace was skipped and EOF handled by the caller.
        let c = self.peek().unwrap();
        let kind = match c {
            '(' => self.punct(TokenKind::LParen),
            ')' => self.punct(TokenKind::RParen),
            '{' => self.punct(TokenKind::LBrace),
            '}' => self.punct(TokenKind::RBrace),
            '[' => self.punct(TokenKind::LBracket),
            ']' => self.punct(TokenKind::RBracket),
            ':' => self.punct(TokenKind::Colon),
            ',' => self.punct(TokenKind::Comma),
            '.' => {
                if self.peek_second() == Some('.') {
                    self.pos += 2;
                    TokenKind::DotDot
                } else {
                    self.pos += 1;
                    return Err(LexError::UnexpectedCharacter {
                        character: '.',
                        span: start..self.pos,
                    });
                }
            }
            '"' => return self.string(),
            '-' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                return self.number();
            }
            c if c.is_ascii_digit() => return self.number(),
            c if c.is_alphabetic() => self.identifier(),
            c => {
                self.bump();
                return Err(LexError::UnexpectedCharacter {
                    character: c,
                    span: start..self.pos,
                });
            }
        };
        Ok(Token {
            kind,
            span: start..self.pos,
        })
    }

    fn punct(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn identifier(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphabetic() || c == '-' || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        TokenKind::Identifier(self.source[start..self.pos].to_string())
    }

    fn number(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        // The digit scan stops at `.`, so `3..5` leaves `..` for the next
        // token and the longest-match rule for `DotDot` holds.
        let lexeme = &self.source[start..self.pos];
        let value = lexeme.parse::<i64>().map_err(|_| LexError::InvalidNumber {
            span: start..self.pos,
        })?;
        Ok(Token {
            kind: TokenKind::Number(value),
            span: start..self.pos,
        })
    }

    fn string(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        self.pos += 1; // opening quote
        let content_start = self.pos;
        loop {
            match self.peek() {
                Some('"') => break,
                Some(c) => self.pos += c.len_utf8(),
                None => {
                    return Err(LexError::UnterminatedString {
                        span: start..self.pos,
                    });
                }
            }
        }
        let content = self.source[content_start..self.pos].to_string();
        self.pos += 1; // closing quote
        Ok(Token {
            kind: TokenKind::StringLiteral(content),
            span: start..self.pos,
        })
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.skip_whitespace();
        if self.pos >= self.source.len() {
            self.done = true;
            return Some(Ok(Token {
                kind: TokenKind::Eof,
                span: self.source.len()..self.source.len(),
            }));
        }
        let result = self.scan_token();
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

/// Tokenize an entire source buffer.
///
/// The returned vector always ends with the `Eof` token, which is what the
/// parser relies on to stop without bounds checks.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{LexError, Token, TokenKind, tokenize};

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn number_literal() {
        assert_eq!(
            kinds("123"),
            vec![TokenKind::Number(123), TokenKind::Eof]
        );
    }

    #[test]
    fn negative_number_literal() {
        assert_eq!(
            kinds("-42"),
            vec![TokenKind::Number(-42), TokenKind::Eof]
        );
    }

    #[test]
    fn number_before_range_operator() {
        assert_eq!(
            kinds("3..5"),
            vec![
                TokenKind::Number(3),
                TokenKind::DotDot,
                TokenKind::Number(5),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn open_range_tokens() {
        assert_eq!(
            kinds("0.."),
            vec![TokenKind::Number(0), TokenKind::DotDot, TokenKind::Eof]
        );
    }

    #[test]
    fn identifier_with_dash_and_underscore() {
        assert_eq!(
            kinds("js-code_block"),
            vec![
                TokenKind::Identifier("js-code_block".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_literal() {
        assert_eq!(
            kinds(r#""this is a string literal""#),
            vec![
                TokenKind::StringLiteral("this is a string literal".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn multiline_string_literal_is_verbatim() {
        let source = "\"a multiline\n  string literal\"";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::StringLiteral("a multiline\n  string literal".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn backslash_is_stored_as_is() {
        assert_eq!(
            kinds(r#""a \n b""#),
            vec![
                TokenKind::StringLiteral(r"a \n b".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string() {
        let err = tokenize(r#"p { "abc"#).unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { span: 4..8 });
    }

    #[test]
    fn single_dot_is_rejected() {
        let err = tokenize("a: 1.5").unwrap_err();
        assert!(matches!(
            err,
            LexError::UnexpectedCharacter { character: '.', .. }
        ));
    }

    #[test]
    fn number_out_of_range() {
        let err = tokenize("99999999999999999999").unwrap_err();
        assert!(matches!(err, LexError::InvalidNumber { .. }));
    }

    #[test]
    fn punctuation_and_spans() {
        let tokens = tokenize("p(n: 1)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token {
                    kind: TokenKind::Identifier("p".to_string()),
                    span: 0..1,
                },
                Token {
                    kind: TokenKind::LParen,
                    span: 1..2,
                },
                Token {
                    kind: TokenKind::Identifier("n".to_string()),
                    span: 2..3,
                },
                Token {
                    kind: TokenKind::Colon,
                    span: 3..4,
                },
                Token {
                    kind: TokenKind::Number(1),
                    span: 5..6,
                },
                Token {
                    kind: TokenKind::RParen,
                    span: 6..7,
                },
                Token {
                    kind: TokenKind::Eof,
                    span: 7..7,
                },
            ]
        );
    }

    #[test]
    fn whitespace_is_only_a_separator() {
        assert_eq!(kinds("  \t\n  "), vec![TokenKind::Eof]);
        assert_eq!(kinds("a b"), kinds("a\n\tb"));
    }
}
