use std::ops::Range;

use crate::lexer::{self, Token, TokenKind};
use crate::node::{Arguments, ListItem, Node, NumberRange, Tag, Value};
use crate::parser::error::{ParseError, ParseErrorKind};

/// Blocks may nest this many levels before the parser refuses to recurse
/// further. Bounds stack growth on adversarial input.
const MAX_NESTING_DEPTH: usize = 128;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse source text into the ordered top-level nodes.
///
/// Collects as many diagnostics as it can: a malformed node is reported
/// and the parser resynchronizes at the next plausible node start.
/// Malformed input never yields an `Ok` tree.
pub(crate) fn parse_nodes(source: &str, file_id: usize) -> Result<Vec<Node>, Vec<ParseError>> {
    let tokens = match lexer::tokenize(source) {
        Ok(tokens) => tokens,
        Err(error) => return Err(vec![ParseError::from_lex(error, file_id)]),
    };
    ParseState::new(tokens, file_id).document()
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

struct ParseState {
    /// Token stream; the last element is always `Eof`.
    tokens: Vec<Token>,
    current: usize,
    file_id: usize,
    errors: Vec<ParseError>,
}

impl ParseState {
    fn new(tokens: Vec<Token>, file_id: usize) -> Self {
        ParseState {
            tokens,
            current: 0,
            file_id,
            errors: Vec::new(),
        }
    }

    fn document(mut self) -> Result<Vec<Node>, Vec<ParseError>> {
        let mut nodes = Vec::new();
        while !self.is_at_end() {
            match self.node(0) {
                Ok(node) => nodes.push(node),
                Err(error) => {
                    self.errors.push(error);
                    self.synchronize();
                }
            }
        }
        if self.errors.is_empty() {
            Ok(nodes)
        } else {
            // Encounter order is source order, so diagnostics come out
            // deterministically position-sorted.
            Err(self.errors)
        }
    }

    /// node ::= identifier arglist? block? | string
    fn node(&mut self, depth: usize) -> Result<Node, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::StringLiteral(text) => {
                self.advance();
                Ok(Node::Text(text))
            }
            TokenKind::Identifier(_) => self.tag(depth),
            _ => Err(self.unexpected("a tag name or string literal")),
        }
    }

    fn tag(&mut self, depth: usize) -> Result<Node, ParseError> {
        let (name, _) = self.expect_identifier("a tag name")?;
        let mut tag = Tag::new(name);
        if self.peek().kind == TokenKind::LParen {
            tag.arguments = self.arguments()?;
        }
        if self.peek().kind == TokenKind::LBrace {
            tag.children = self.block(depth)?;
        }
        Ok(Node::Tag(tag))
    }

    /// arglist ::= '(' (argument (',' argument)*)? ')'
    ///
    /// Trailing commas are rejected, and `()` is identical to omitting the
    /// parentheses entirely.
    fn arguments(&mut self) -> Result<Arguments, ParseError> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut arguments = Arguments::new();
        if self.peek().kind == TokenKind::RParen {
            self.advance();
            return Ok(arguments);
        }
        loop {
            let (name, name_span) = self.expect_identifier("an argument name")?;
            self.expect(TokenKind::Colon, "`:`")?;
            let value = self.value()?;
            if arguments.contains(&name) {
                return Err(ParseError::error(
                    ParseErrorKind::DuplicateArgument { name },
                    name_span,
                    self.file_id,
                ));
            }
            arguments.push(name, value);
            if self.peek().kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)` or `,`")?;
        Ok(arguments)
    }

    /// value ::= number | range | string | list
    fn value(&mut self) -> Result<Value, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Number(n) => {
                if self.next_is_dotdot() {
                    Ok(Value::Range(self.range()?))
                } else {
                    self.advance();
                    Ok(Value::Number(n))
                }
            }
            TokenKind::StringLiteral(text) => {
                self.advance();
                Ok(Value::String(text))
            }
            TokenKind::LBracket => Ok(Value::List(self.list()?)),
            TokenKind::DotDot => Err(self.invalid_range()),
            _ => Err(self.unexpected("a value")),
        }
    }

    /// range ::= number '..' number?
    ///
    /// An absent end means unbounded above. The parser does not check
    /// `end >= start`; that is a consumer decision.
    fn range(&mut self) -> Result<NumberRange, ParseError> {
        let start = match self.peek().kind.clone() {
            TokenKind::Number(n) => {
                self.advance();
                n
            }
            _ => return Err(self.unexpected("a number")),
        };
        self.expect(TokenKind::DotDot, "`..`")?;
        match self.peek().kind.clone() {
            TokenKind::Number(end) => {
                self.advance();
                Ok(NumberRange {
                    start,
                    end: Some(end),
                })
            }
            _ => Ok(NumberRange { start, end: None }),
        }
    }

    /// list ::= '[' (item (',' item)*)? ']'
    fn list(&mut self) -> Result<Vec<ListItem>, ParseError> {
        self.expect(TokenKind::LBracket, "`[`")?;
        let mut items = Vec::new();
        if self.peek().kind == TokenKind::RBracket {
            self.advance();
            return Ok(items);
        }
        loop {
            items.push(self.list_item()?);
            if self.peek().kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "`]` or `,`")?;
        Ok(items)
    }

    fn list_item(&mut self) -> Result<ListItem, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Number(n) => {
                if self.next_is_dotdot() {
                    Ok(ListItem::Range(self.range()?))
                } else {
                    self.advance();
                    Ok(ListItem::Number(n))
                }
            }
            TokenKind::DotDot => Err(self.invalid_range()),
            _ => Err(self.unexpected("a number or range")),
        }
    }

    /// block ::= '{' node* '}'
    fn block(&mut self, depth: usize) -> Result<Vec<Node>, ParseError> {
        let open = self.expect(TokenKind::LBrace, "`{`")?;
        if depth + 1 > MAX_NESTING_DEPTH {
            return Err(ParseError::error(
                ParseErrorKind::NestingTooDeep {
                    limit: MAX_NESTING_DEPTH,
                },
                open.span,
                self.file_id,
            ));
        }
        let mut children = Vec::new();
        while self.peek().kind != TokenKind::RBrace {
            if self.is_at_end() {
                return Err(self.unexpected("`}`"));
            }
            children.push(self.node(depth + 1)?);
        }
        self.expect(TokenKind::RBrace, "`}`")?;
        Ok(children)
    }

    /// Skip to the next plausible top-level node start so one malformed
    /// node yields one diagnostic instead of a cascade.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.peek().kind.clone() {
                TokenKind::LBrace => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RBrace => {
                    self.advance();
                    depth = depth.saturating_sub(1);
                }
                TokenKind::Identifier(_) | TokenKind::StringLiteral(_) if depth == 0 => {
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // -----------------------------------------------------------------
    // Token stream helpers
    // -----------------------------------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn next_is_dotdot(&self) -> bool {
        self.tokens
            .get(self.current + 1)
            .is_some_and(|t| t.kind == TokenKind::DotDot)
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if token.kind != TokenKind::Eof {
            self.current += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_identifier(
        &mut self,
        expected: &'static str,
    ) -> Result<(String, Range<usize>), ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Identifier(name) => {
                let span = self.peek().span.clone();
                self.advance();
                Ok((name, span))
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        let token = self.peek();
        let kind = if token.kind == TokenKind::Eof {
            ParseErrorKind::UnexpectedEof { expected }
        } else {
            ParseErrorKind::UnexpectedToken {
                expected,
                found: token.kind.clone(),
            }
        };
        ParseError::error(kind, token.span.clone(), self.file_id)
    }

    fn invalid_range(&self) -> ParseError {
        ParseError::error(
            ParseErrorKind::InvalidRange,
            self.peek().span.clone(),
            self.file_id,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
