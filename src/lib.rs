//! Strongly-typed configuration bound to YAML documents.
//!
//! A document is parsed once into an immutable tree ([`Node`]). Configuration types then
//! bind themselves to it: primitives, durations, strings, containers and enumerations
//! implement [`FromNode`] out of the box, and user structures implement [`Structured`],
//! binding each of their fields by key through [`Simple::bound`] / [`Simple::bound_or`].
//! Every field can carry a default value and a list of validation rules.
//!
//! Errors are raised the moment something does not fit, and always say
//! what went wrong, at which logical path (e.g. `/sources/0.2.0/sha256`) and where
//! in the document (`@line:column`).
//!
//! # Example
//! ```
//! use std::collections::BTreeMap;
//! use yaml_bound::{Result, Simple, Structured};
//!
//! struct Source {
//!     url: String,
//!     sha256: String,
//! }
//!
//! impl Structured for Source {
//!     fn from_simple(simple: &Simple<'_>) -> Result<Self> {
//!         Ok(Self {
//!             url: simple.bound("url").get()?,
//!             sha256: simple.bound("sha256").add_rule_length(64, 64, "").get()?,
//!         })
//!     }
//! }
//!
//! let document = yaml_bound::from_str("0.2.0:\n  url: https://example.com\n  sha256: abc\n")?;
//! let error = document.bind::<BTreeMap<String, Source>>().err().unwrap();
//!
//! assert_eq!(error.message(), "Validation failed for /0.2.0/sha256");
//! # Ok::<(), yaml_bound::Error>(())
//! ```

use std::{io::Read, path::Path};

use tracing::debug;

pub mod deserializer;
mod document;
pub mod duration;
mod error;
mod field;
mod loader;
mod path;
mod simple;
mod traits;

pub use deserializer::MultiMap;
pub use document::{Mark, Node, NodeKind, NodeRef};
pub use duration::{
    Days,
    DurationParser,
    Hours,
    Microseconds,
    Milliseconds,
    Minutes,
    Months,
    Nanoseconds,
    Seconds,
    TimeUnit,
    UnitDuration,
    Weeks,
    Years,
};
pub use error::{DurationError, Error, ErrorKind, Located, Result, SourceLocation};
pub use field::Field;
pub use loader::{
    default_configuration_file_path,
    load_from_default_path,
    load_from_path,
    LoadedConfiguration,
};
pub use path::LogicalPath;
pub use simple::Simple;
pub use traits::{FromNode, Structured};



/// Parses a YAML document from a string.
pub fn from_str(source: &str) -> Result<Node> {
    debug!("Loading YAML document from a string.");
    document::parse_yaml(source)
}

/// Parses a YAML document from a reader, consuming it to the end.
pub fn from_reader<R: Read>(mut reader: R) -> Result<Node> {
    let mut source = String::new();
    reader
        .read_to_string(&mut source)
        .map_err(|error| Error::read_file("<reader>", error))?;

    debug!("Loading YAML document from a reader ({} bytes).", source.len());
    document::parse_yaml(&source)
}

/// Parses a YAML document from a file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Node> {
    let path = path.as_ref();

    let source =
        std::fs::read_to_string(path).map_err(|error| Error::read_file(path, error))?;

    debug!("Loading YAML document from {}.", path.display());
    document::parse_yaml(&source)
}

/// Parses a TOML document into the same tree shape. Nodes carry no position (`@0:0`).
pub fn from_toml_str(source: &str) -> Result<Node> {
    debug!("Loading TOML document from a string.");
    document::parse_toml(source)
}
