use toml::{Table, Value};
use tracing::trace;

use super::{Mark, Node, NodeKind};
use crate::error::{Error, Result};


fn float_to_text(value: f64) -> String {
    if value.is_nan() {
        ".nan".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() { ".inf" } else { "-.inf" }.to_string()
    } else {
        format!("{value:?}")
    }
}

fn node_from_value(value: Value) -> Node {
    let kind = match value {
        Value::String(text) => NodeKind::Scalar(text),
        Value::Integer(integer) => NodeKind::Scalar(integer.to_string()),
        Value::Float(float) => NodeKind::Scalar(float_to_text(float)),
        Value::Boolean(boolean) => NodeKind::Scalar(boolean.to_string()),
        Value::Datetime(datetime) => NodeKind::Scalar(datetime.to_string()),
        Value::Array(items) => NodeKind::Sequence(items.into_iter().map(node_from_value).collect()),
        Value::Table(table) => return node_from_table(table),
    };

    Node::new(kind, Mark::default())
}

fn node_from_table(table: Table) -> Node {
    let entries = table
        .into_iter()
        .map(|(key, value)| {
            (
                Node::new(NodeKind::Scalar(key), Mark::default()),
                node_from_value(value),
            )
        })
        .collect();

    Node::new(NodeKind::Map(entries), Mark::default())
}


/// Parses a TOML document into the same tree shape a YAML document produces.
///
/// TOML values carry no position information, so every node is marked `@0:0`.
pub(crate) fn parse_toml(source: &str) -> Result<Node> {
    trace!("Parsing TOML document ({} bytes).", source.len());

    let table = toml::from_str::<Table>(source).map_err(|error| {
        Error::parse(
            format!("Could not parse TOML document: {}", error.message()),
            Mark::default(),
        )
    })?;

    Ok(node_from_table(table))
}
