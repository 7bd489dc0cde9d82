use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A single markup element.
///
/// A quoted string in node position is its own variant rather than a tag
/// with a reserved name, so text nodes can never collide with a
/// user-defined tag name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Node {
    Tag(Tag),
    /// Verbatim text captured from a string literal.
    Text(String),
}

/// A named tag: `name(arg: value, ...) { children }`.
///
/// Both the argument list and the block are optional in source; omitting
/// them is equivalent to writing `()` or `{}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    pub arguments: Arguments,
    pub children: Vec<Node>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            arguments: Arguments::new(),
            children: Vec::new(),
        }
    }
}

/// The named arguments of one tag.
///
/// Keys are unique (the parser rejects duplicates) and insertion order is
/// preserved for pretty-printing, but equality compares key/value pairs
/// without regard to order.
#[derive(Debug, Clone, Default)]
pub struct Arguments(Vec<(String, Value)>);

impl Arguments {
    pub fn new() -> Self {
        Arguments(Vec::new())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Append an argument. The caller is responsible for key uniqueness.
    pub fn push(&mut self, name: String, value: Value) {
        self.0.push((name, value));
    }

    /// Iterate pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for Arguments {
    /// Order-independent: `(a: 1, b: 2)` equals `(b: 2, a: 1)`.
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl Eq for Arguments {}

impl FromIterator<(String, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Arguments(iter.into_iter().collect())
    }
}

impl Serialize for Arguments {
    /// Serialized as a map in insertion order.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// An argument value. A closed union: new literal kinds are explicit
/// variant additions, never a silent schema change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Value {
    Number(i64),
    String(String),
    List(Vec<ListItem>),
    Range(NumberRange),
}

/// An element of a list literal. Lists hold numbers and ranges only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ListItem {
    Number(i64),
    Range(NumberRange),
}

/// A half-open-above numeric range `start..end`.
///
/// `end` absent means unbounded above. `end >= start` is deliberately not
/// enforced; the consumer decides what an empty range means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumberRange {
    pub start: i64,
    pub end: Option<i64>,
}

// ---------------------------------------------------------------------------
// Source regeneration
// ---------------------------------------------------------------------------
//
// The Display impls regenerate syntactically valid marq source. Re-parsing
// the output of any successfully parsed tree yields a structurally equal
// tree, which is what the round-trip tests rely on.

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Tag(tag) => write!(f, "{}", tag),
            // Text content is verbatim, so no escaping is needed (or
            // possible: an embedded quote is unrepresentable in v1).
            Node::Text(text) => write!(f, "\"{}\"", text),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.arguments.is_empty() {
            write!(f, "{}", self.arguments)?;
        }
        if !self.children.is_empty() {
            write!(f, " {{")?;
            for child in &self.children {
                write!(f, " {}", child)?;
            }
            write!(f, " }}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Range(range) => write!(f, "{}", range),
        }
    }
}

impl fmt::Display for ListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListItem::Number(n) => write!(f, "{}", n),
            ListItem::Range(range) => write!(f, "{}", range),
        }
    }
}

impl fmt::Display for NumberRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}..{}", self.start, end),
            None => write!(f, "{}..", self.start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Arguments, ListItem, Node, NumberRange, Tag, Value};

    #[test]
    fn argument_equality_ignores_order() {
        let forward: Arguments = vec![
            ("a".to_string(), Value::Number(1)),
            ("b".to_string(), Value::Number(2)),
        ]
        .into_iter()
        .collect();
        let backward: Arguments = vec![
            ("b".to_string(), Value::Number(2)),
            ("a".to_string(), Value::Number(1)),
        ]
        .into_iter()
        .collect();
        assert_eq!(forward, backward);
    }

    #[test]
    fn argument_equality_compares_values() {
        let left: Arguments =
            vec![("a".to_string(), Value::Number(1))].into_iter().collect();
        let right: Arguments =
            vec![("a".to_string(), Value::Number(2))].into_iter().collect();
        assert_ne!(left, right);
    }

    #[test]
    fn display_regenerates_source() {
        let node = Node::Tag(Tag {
            name: "code-block".to_string(),
            arguments: vec![
                (
                    "highlights".to_string(),
                    Value::List(vec![
                        ListItem::Number(1),
                        ListItem::Range(NumberRange {
                            start: 3,
                            end: Some(5),
                        }),
                    ]),
                ),
                ("lang".to_string(), Value::String("ts".to_string())),
            ]
            .into_iter()
            .collect(),
            children: vec![Node::Text("a js snippet".to_string())],
        });
        assert_eq!(
            node.to_string(),
            r#"code-block(highlights: [1, 3..5], lang: "ts") { "a js snippet" }"#
        );
    }

    #[test]
    fn open_range_display() {
        let range = NumberRange {
            start: 0,
            end: None,
        };
        assert_eq!(range.to_string(), "0..");
    }

    #[test]
    fn bare_tag_display_omits_parens_and_braces() {
        assert_eq!(Node::Tag(Tag::new("leaf")).to_string(), "leaf");
    }
}
