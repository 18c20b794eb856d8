//! [`FromNode`] implementations for the supported target types.
//!
//! Scalar-like targets check that the node is defined (otherwise [`Error::MissingNode`])
//! and scalar-shaped (otherwise [`Error::InvalidNodeType`]) before attempting any
//! conversion, so a shape problem is never reported as a conversion problem.

use std::{path::PathBuf, str::FromStr};

use chrono::TimeDelta;
use strum::VariantNames;

use crate::{
    document::NodeRef,
    duration::{DurationParser, ParseableDuration, Period, UnitDuration},
    error::{Error, Result},
    path::LogicalPath,
    simple::Simple,
    traits::{FromNode, Structured},
};

mod containers;
mod scalars;

pub use containers::MultiMap;



/// Returns the scalar text of `node`, or the appropriate error if it is absent or
/// not a scalar. `what` names the target in the missing-node message.
pub fn expect_scalar<'a>(node: NodeRef<'a>, path: &LogicalPath, what: &str) -> Result<&'a str> {
    if !node.is_defined() {
        return Err(Error::missing_node(
            format!("Missing {what} node {path}"),
            path,
            node.mark(),
        ));
    }

    node.scalar().ok_or_else(|| {
        Error::invalid_node_type(format!("Invalid node type {path}"), path, node.mark())
    })
}

/// Checks that `node` is a defined map.
pub fn expect_map(node: NodeRef<'_>, path: &LogicalPath, what: &str) -> Result<()> {
    if !node.is_defined() {
        return Err(Error::missing_node(
            format!("Missing {what} node {path}"),
            path,
            node.mark(),
        ));
    }

    if !node.is_map() {
        return Err(Error::invalid_node_type(
            format!("Invalid node type {path}"),
            path,
            node.mark(),
        ));
    }

    Ok(())
}


/// Any scalar is representable as text, whatever it looks like.
impl FromNode for String {
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        expect_scalar(node, path, "basic type").map(str::to_string)
    }
}

impl FromNode for PathBuf {
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        expect_scalar(node, path, "basic type").map(PathBuf::from)
    }
}


/// A null node (`~`, `null`, empty value) is `None`; anything else must be a `T`.
///
/// An absent node is still a missing node; use a default of `None` for optional keys.
impl<T: FromNode> FromNode for Option<T> {
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        if !node.is_defined() {
            return Err(Error::missing_node(
                format!("Missing optional node {path}"),
                path,
                node.mark(),
            ));
        }

        if node.is_null() {
            return Ok(None);
        }

        T::from_node(node, path).map(Some)
    }
}


/// Structures bind their own fields against their map node.
impl<T: Structured> FromNode for T {
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        expect_map(node, path, "structured type")?;

        T::from_simple(&Simple::new(node, path.clone()))
    }
}



/// Parses a duration scalar: a bare integer in `D`'s own unit, or a compound
/// literal like `1d12h`.
pub fn deserialize_duration<D: ParseableDuration>(
    node: NodeRef<'_>,
    path: &LogicalPath,
) -> Result<D> {
    let text = expect_scalar(node, path, "duration")?;

    DurationParser::parse_literal(text)
        .map_err(|source| Error::invalid_duration(text, source, path, node.mark()))
}

impl<P: Period> FromNode for UnitDuration<P> {
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        deserialize_duration(node, path)
    }
}

impl FromNode for std::time::Duration {
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        deserialize_duration(node, path)
    }
}

impl FromNode for TimeDelta {
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        deserialize_duration(node, path)
    }
}



/// Deserializes an enumeration by the exact (case-sensitive) name of one of its variants.
///
/// Names come from [`strum::VariantNames`]; conversion uses [`FromStr`], which
/// `#[derive(strum::EnumString)]` provides. Usually invoked through [`named_enum!`](crate::named_enum).
pub fn deserialize_enum<T>(node: NodeRef<'_>, path: &LogicalPath) -> Result<T>
where
    T: FromStr + VariantNames,
{
    let text = expect_scalar(node, path, "basic type")?;

    if T::VARIANTS.contains(&text) {
        if let Ok(value) = T::from_str(text) {
            return Ok(value);
        }
    }

    let possible = T::VARIANTS
        .iter()
        .fold(String::new(), |names, name| format!("{names} {name}"));

    Err(Error::invalid_node(
        format!("Invalid enum value \"{text}\" (possible:{possible}) at {path}"),
        path,
        node.mark(),
    ))
}


/// Registers enumerations as [`FromNode`] targets.
///
/// The enums must implement [`FromStr`] and [`strum::VariantNames`], e.g. through
/// `#[derive(strum::EnumString, strum::VariantNames)]`.
///
/// ```
/// use yaml_bound::named_enum;
///
/// #[derive(Debug, PartialEq, strum::EnumString, strum::VariantNames)]
/// enum Level {
///     Debug,
///     Info,
/// }
///
/// named_enum!(Level);
///
/// let document = yaml_bound::from_str("Info")?;
/// assert_eq!(document.bind::<Level>()?, Level::Info);
/// # Ok::<(), yaml_bound::Error>(())
/// ```
#[macro_export]
macro_rules! named_enum {
    ($($enum_type:ty),+ $(,)?) => {
        $(
            impl $crate::FromNode for $enum_type {
                fn from_node(
                    node: $crate::NodeRef<'_>,
                    path: &$crate::LogicalPath,
                ) -> $crate::Result<Self> {
                    $crate::deserializer::deserialize_enum(node, path)
                }
            }
        )+
    };
}
