//! Node model and tag-aware parsing.
//!
//! A template file is split into an ordered sequence of nodes, each either
//! plain markup or a delimiter-inclusive embedded PHP block. Rendering the
//! sequence concatenates the payloads back in order, so with no further
//! transformation `render(parse(text)) == text`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::MinifyError;

/// The default embedded-region pattern: `<?php ... ?>`, case-insensitive,
/// spanning multiple lines, non-greedy between the markers.
static PHP_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<\?php[\s\S]+?\?>").unwrap());

/// A compiled delimiter pattern recognizing embedded regions.
#[derive(Debug, Clone)]
pub struct TagPattern {
    regex: Regex,
}

impl TagPattern {
    /// The standard `<?php ... ?>` pattern.
    pub fn php() -> Self {
        Self {
            regex: PHP_TAG.clone(),
        }
    }

    /// Build a pattern from an open/close marker pair. Markers are matched
    /// case-insensitively with a non-greedy, multi-line span between them.
    pub fn from_markers(open: &str, close: &str) -> Result<Self, MinifyError> {
        let source = format!(
            "(?is){}[\\s\\S]+?{}",
            regex::escape(open),
            regex::escape(close)
        );
        let regex = Regex::new(&source).map_err(MinifyError::Pattern)?;
        Ok(Self { regex })
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        Self::php()
    }
}

/// One span of a template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Plain markup, contributes to output unchanged except when minified.
    Text(String),
    /// A delimiter-inclusive embedded block, never altered by minification.
    Embedded(String),
}

impl Node {
    /// The raw payload, delimiters included for embedded nodes.
    pub fn payload(&self) -> &str {
        match self {
            Node::Text(s) | Node::Embedded(s) => s,
        }
    }
}

/// Ordered node list representing one file's full content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSequence {
    nodes: Vec<Node>,
}

impl NodeSequence {
    /// Split `text` into markup and embedded-region nodes. Every byte of the
    /// input lands in exactly one node, in input order.
    pub fn parse(text: &str, pattern: &TagPattern) -> Self {
        let mut nodes = Vec::new();
        let mut last = 0;

        for m in pattern.regex().find_iter(text) {
            if m.start() > last {
                nodes.push(Node::Text(text[last..m.start()].to_string()));
            }
            nodes.push(Node::Embedded(m.as_str().to_string()));
            last = m.end();
        }
        if last < text.len() {
            nodes.push(Node::Text(text[last..].to_string()));
        }

        Self { nodes }
    }

    /// Concatenate all payloads in order.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.nodes.iter().map(|n| n.payload().len()).sum());
        for node in &self.nodes {
            out.push_str(node.payload());
        }
        out
    }

    /// Insert a node at the front of the sequence.
    pub fn prepend(&mut self, node: Node) {
        self.nodes.insert(0, node);
    }

    /// Insert a node at position `index`, clamped to the sequence length.
    pub fn insert(&mut self, index: usize, node: Node) {
        let index = index.min(self.nodes.len());
        self.nodes.insert(index, node);
    }

    /// Push a node onto the end of the sequence.
    pub fn append(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Number of embedded nodes in the sequence.
    pub fn embedded_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Embedded(_)))
            .count()
    }

    /// The embedded payloads in sequence order.
    pub fn embedded_payloads(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Embedded(s) => Some(s.as_str()),
            Node::Text(_) => None,
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }
}
