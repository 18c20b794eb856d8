use std::collections::HashMap;

use tracing::trace;
use yaml_rust2::{
    parser::{Event, MarkedEventReceiver, Parser},
    scanner::{Marker, TScalarStyle},
};

use super::{Mark, Node, NodeKind};
use crate::error::{Error, Result};


/// Collection currently being assembled while walking the event stream.
enum Frame {
    Sequence {
        items: Vec<Node>,
        mark: Mark,
        anchor: usize,
    },
    Map {
        entries: Vec<(Node, Node)>,
        pending_key: Option<Node>,
        mark: Mark,
        anchor: usize,
    },
}


/// Builds a [`Node`] tree (with marks) out of parser events.
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    anchors: HashMap<usize, Node>,
    root: Option<Node>,
}

impl TreeBuilder {
    fn insert(&mut self, node: Node, anchor: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }

        match self.stack.last_mut() {
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Map {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => entries.push((key, node)),
                None => *pending_key = Some(node),
            },
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
        }
    }

    fn finish(self) -> Node {
        self.root
            .unwrap_or_else(|| Node::new(NodeKind::Null, Mark::default()))
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, event: Event, marker: Marker) {
        let mark = Mark::new(marker.line(), marker.col());

        match event {
            Event::Scalar(text, style, anchor, ..) => {
                let kind = if style == TScalarStyle::Plain && is_null_literal(&text) {
                    NodeKind::Null
                } else {
                    NodeKind::Scalar(text)
                };

                self.insert(Node::new(kind, mark), anchor);
            }
            Event::SequenceStart(anchor, ..) => self.stack.push(Frame::Sequence {
                items: Vec::new(),
                mark,
                anchor,
            }),
            Event::MappingStart(anchor, ..) => self.stack.push(Frame::Map {
                entries: Vec::new(),
                pending_key: None,
                mark,
                anchor,
            }),
            Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Sequence {
                    items,
                    mark,
                    anchor,
                }) => self.insert(Node::new(NodeKind::Sequence(items), mark), anchor),
                Some(Frame::Map {
                    entries,
                    mark,
                    anchor,
                    ..
                }) => self.insert(Node::new(NodeKind::Map(entries), mark), anchor),
                None => {}
            },
            Event::Alias(anchor) => {
                let node = self
                    .anchors
                    .get(&anchor)
                    .cloned()
                    .unwrap_or_else(|| Node::new(NodeKind::Null, mark));

                self.insert(node, 0);
            }
            _ => {}
        }
    }
}


fn is_null_literal(text: &str) -> bool {
    matches!(text, "" | "~" | "null" | "Null" | "NULL")
}


/// Parses the first document of a YAML stream. An empty stream yields a null root.
pub(crate) fn parse_yaml(source: &str) -> Result<Node> {
    trace!("Parsing YAML document ({} bytes).", source.len());

    let mut builder = TreeBuilder::default();
    let mut parser = Parser::new_from_str(source);

    parser.load(&mut builder, false).map_err(|error| {
        let marker = error.marker();
        Error::parse(
            format!("Could not parse YAML document: {}", error.info()),
            Mark::new(marker.line(), marker.col()),
        )
    })?;

    Ok(builder.finish())
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn builds_nested_tree() {
        let root = parse_yaml("name: demo\nports:\n  - 80\n  - 443\nlimits: {cpu: 2}\n").unwrap();
        let root = root.node_ref();

        assert!(root.is_map());
        assert_eq!(root.get("name").scalar(), Some("demo"));
        assert_eq!(root.get("ports").at(1).scalar(), Some("443"));
        assert_eq!(root.get("limits").get("cpu").scalar(), Some("2"));
    }

    #[test]
    fn scalar_marks_follow_source_lines() {
        let root = parse_yaml("first: 1\nsecond: 2\n").unwrap();

        assert_eq!(root.node_ref().get("first").mark().line, 1);
        assert_eq!(root.node_ref().get("second").mark().line, 2);
    }

    #[test]
    fn plain_null_literals_are_null_but_quoted_ones_are_not() {
        let root = parse_yaml("a: ~\nb:\nc: null\nd: \"null\"\ne: ''\n").unwrap();
        let root = root.node_ref();

        assert!(root.get("a").is_null());
        assert!(root.get("b").is_null());
        assert!(root.get("c").is_null());
        assert_eq!(root.get("d").scalar(), Some("null"));
        assert_eq!(root.get("e").scalar(), Some(""));
    }

    #[test]
    fn aliases_resolve_to_anchored_nodes() {
        let root = parse_yaml("base: &base {retries: 3}\ncopy: *base\n").unwrap();

        assert_eq!(
            root.node_ref().get("copy").get("retries").scalar(),
            Some("3")
        );
    }

    #[test]
    fn empty_stream_is_null_root() {
        let root = parse_yaml("").unwrap();

        assert!(root.node_ref().is_null());
    }

    #[test]
    fn only_first_document_is_kept() {
        let root = parse_yaml("---\nvalue: 1\n---\nvalue: 2\n").unwrap();

        assert_eq!(root.node_ref().get("value").scalar(), Some("1"));
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        let error = parse_yaml("key: [1, 2\n").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Parse);
        assert!(error.message().starts_with("Could not parse YAML document"));
    }
}
