pub mod lexer;
pub mod node;
pub mod parser;

use std::fmt;

use serde::Serialize;

pub use crate::node::{Arguments, ListItem, Node, NumberRange, Tag, Value};
pub use crate::parser::{ParseError, ParseErrorKind, Parser};

/// A parsed marq document.
///
/// Immutable after construction and owned by the caller; parsing never
/// touches shared state, so independent documents may be parsed in
/// parallel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Top-level nodes in source order.
    pub nodes: Vec<Node>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            writeln!(f, "{}", node)?;
        }
        Ok(())
    }
}

/// Parse an in-memory source buffer, using file ID 0.
///
/// The single ingestion API for embedders. Tools that report diagnostics
/// against several files should use [`Parser`] with their own file IDs.
pub fn parse(source: &str) -> Result<Document, Vec<ParseError>> {
    Parser::new(source.to_string(), 0).parse()
}
