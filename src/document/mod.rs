//! The parsed document tree that configuration is bound against.
//!
//! A document is parsed once into an immutable tree of [`Node`]s. Binding code never
//! holds nodes directly; it works with [`NodeRef`] handles, which may also point at a
//! node that does not exist (e.g. `root.get("missing")`). Such *undefined* handles
//! keep the mark of their parent so errors about them still point somewhere useful.

use std::fmt::{self, Display, Formatter};

use crate::{error::Result, path::LogicalPath, traits::FromNode};

mod toml_source;
mod yaml;

pub(crate) use toml_source::parse_toml;
pub(crate) use yaml::parse_yaml;



/// Position of a node in the source text.
///
/// For YAML documents the line is 1-based and the column 0-based, as reported by
/// the parser. Sources without position information use `@0:0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Mark {
    pub line: usize,
    pub column: usize,
}

impl Mark {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for Mark {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "@{}:{}", self.line, self.column)
    }
}


#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `~`, `null` or an empty value.
    Null,

    /// Scalar text, exactly as written (without quotes).
    Scalar(String),

    Sequence(Vec<Node>),

    /// Entries in document order. Duplicate keys are kept.
    Map(Vec<(Node, Node)>),
}


/// A single node of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    mark: Mark,
}

impl Node {
    pub fn new(kind: NodeKind, mark: Mark) -> Self {
        Self { kind, mark }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Returns a defined handle to this node.
    pub fn node_ref(&self) -> NodeRef<'_> {
        NodeRef {
            node: Some(self),
            mark: self.mark,
        }
    }

    /// Deserializes this node, treating it as the document root.
    pub fn bind<T: FromNode>(&self) -> Result<T> {
        T::from_node(self.node_ref(), &LogicalPath::root())
    }
}


/// Handle to a (possibly absent) node.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    node: Option<&'a Node>,
    mark: Mark,
}

impl<'a> NodeRef<'a> {
    /// A handle that points at nothing. `mark` is reported in errors about it.
    pub fn undefined(mark: Mark) -> Self {
        Self { node: None, mark }
    }

    pub fn node(&self) -> Option<&'a Node> {
        self.node
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub fn is_defined(&self) -> bool {
        self.node.is_some()
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind(), Some(NodeKind::Null))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind(), Some(NodeKind::Scalar(_)))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind(), Some(NodeKind::Sequence(_)))
    }

    pub fn is_map(&self) -> bool {
        matches!(self.kind(), Some(NodeKind::Map(_)))
    }

    fn kind(&self) -> Option<&'a NodeKind> {
        self.node.map(Node::kind)
    }

    /// Scalar text, if this is a scalar node.
    pub fn scalar(&self) -> Option<&'a str> {
        match self.kind() {
            Some(NodeKind::Scalar(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Number of children of a sequence or map; zero for anything else.
    pub fn len(&self) -> usize {
        match self.kind() {
            Some(NodeKind::Sequence(items)) => items.len(),
            Some(NodeKind::Map(entries)) => entries.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up the first map entry whose key is the scalar `key`.
    ///
    /// Returns an undefined handle (carrying this node's mark) when there is no such
    /// entry or when this is not a map.
    pub fn get(&self, key: &str) -> NodeRef<'a> {
        self.entries()
            .find(|(entry_key, _)| entry_key.scalar() == Some(key))
            .map(|(_, value)| value)
            .unwrap_or_else(|| NodeRef::undefined(self.mark))
    }

    /// Returns the `index`-th element of a sequence, or an undefined handle.
    pub fn at(&self, index: usize) -> NodeRef<'a> {
        match self.kind() {
            Some(NodeKind::Sequence(items)) => items
                .get(index)
                .map(Node::node_ref)
                .unwrap_or_else(|| NodeRef::undefined(self.mark)),
            _ => NodeRef::undefined(self.mark),
        }
    }

    /// Elements of a sequence in document order. Empty for anything else.
    pub fn items(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let items: &'a [Node] = match self.kind() {
            Some(NodeKind::Sequence(items)) => items,
            _ => &[],
        };

        items.iter().map(Node::node_ref)
    }

    /// `(key, value)` entries of a map in document order. Empty for anything else.
    pub fn entries(&self) -> impl Iterator<Item = (NodeRef<'a>, NodeRef<'a>)> + 'a {
        let entries: &'a [(Node, Node)] = match self.kind() {
            Some(NodeKind::Map(entries)) => entries,
            _ => &[],
        };

        entries
            .iter()
            .map(|(key, value)| (key.node_ref(), value.node_ref()))
    }
}
