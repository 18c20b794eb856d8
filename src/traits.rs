use crate::{document::NodeRef, error::Result, path::LogicalPath, simple::Simple};

/// Represents a type that can be deserialized from a document node.
///
/// Implementations check, in order, that the node is defined, that it has the shape
/// the type expects (scalar, sequence or map) and only then convert its content.
/// `path` is the logical path of `node`; it is only used to annotate errors.
pub trait FromNode: Sized {
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self>;
}


/// Represents a configuration structure whose fields are bound by key.
///
/// Implementing this trait is enough to make a type a [`FromNode`] target: it can be
/// bound at the document root, nested inside other structures, or used as the
/// element type of sequences and maps.
///
/// ```
/// use yaml_bound::{Result, Simple, Structured};
///
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// impl Structured for Server {
///     fn from_simple(simple: &Simple<'_>) -> Result<Self> {
///         Ok(Self {
///             host: simple.bound_or("host", "localhost").get()?,
///             port: simple.bound("port").add_rule_minimum(1u16, "").get()?,
///         })
///     }
/// }
///
/// let document = yaml_bound::from_str("port: 8080")?;
/// let server: Server = document.bind()?;
///
/// assert_eq!(server.host, "localhost");
/// assert_eq!(server.port, 8080);
/// # Ok::<(), yaml_bound::Error>(())
/// ```
pub trait Structured: Sized {
    /// Builds the structure. `simple` is positioned on the structure's own map node.
    fn from_simple(simple: &Simple<'_>) -> Result<Self>;
}
