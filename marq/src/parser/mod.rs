pub mod error;
mod grammar;

pub use error::{ParseError, ParseErrorKind};

use crate::Document;

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse the source text into a complete Document.
    ///
    /// On failure the diagnostics are ordered by source position and the
    /// collection is never empty.
    pub fn parse(&self) -> Result<Document, Vec<ParseError>> {
        let nodes = grammar::parse_nodes(&self.source, self.file_id)?;
        Ok(Document {
            nodes,
            source_id: self.file_id,
        })
    }
}
