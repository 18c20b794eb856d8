use crate::{
    document::{Node, NodeRef},
    field::Field,
    path::LogicalPath,
    traits::FromNode,
};


/// Binding context handed to [`Structured::from_simple`](crate::Structured::from_simple).
///
/// It is positioned on the structure's map node and remembers the logical path that
/// led there, so fields bound through it report paths like `/sources/0.2.0/sha256`.
#[derive(Debug, Clone)]
pub struct Simple<'a> {
    node: NodeRef<'a>,
    path: LogicalPath,
}

impl<'a> Simple<'a> {
    pub fn new(node: NodeRef<'a>, path: LogicalPath) -> Self {
        Self { node, path }
    }

    /// A context positioned on the document root.
    pub fn root(node: &'a Node) -> Self {
        Self::new(node.node_ref(), LogicalPath::root())
    }

    /// Binds `key` without a default: the key has to be present.
    pub fn bound<T: FromNode>(&self, key: &str) -> Field<'a, T> {
        Field::new(self.node.get(key), self.path.key(key), None)
    }

    /// Binds `key`, falling back to `default` when the key is absent.
    pub fn bound_or<T: FromNode>(&self, key: &str, default: impl Into<T>) -> Field<'a, T> {
        Field::new(self.node.get(key), self.path.key(key), Some(default.into()))
    }

    pub fn node(&self) -> NodeRef<'a> {
        self.node
    }

    pub fn path(&self) -> &LogicalPath {
        &self.path
    }
}
