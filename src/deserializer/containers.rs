//! Sequence and map targets, from fixed arrays up to multi-maps.
//!
//! Elements are deserialized recursively through [`FromNode`], so any supported type
//! (including structured types) can be nested. Sequence elements extend the logical
//! path with `[i]`; map values extend it with the key text as written in the document.

use std::{
    borrow::Borrow,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    hash::{BuildHasher, Hash},
};

use indexmap::IndexMap;

use super::expect_map;
use crate::{
    document::{Mark, NodeRef},
    error::{Error, Result},
    path::LogicalPath,
    traits::FromNode,
};


/// Checks that `node` can be read as a sequence. A null node counts as an empty one.
fn expect_sequence(node: NodeRef<'_>, path: &LogicalPath, what: &str) -> Result<()> {
    if !node.is_defined() {
        return Err(Error::missing_node(
            format!("Missing {what} node {path}"),
            path,
            node.mark(),
        ));
    }

    if !node.is_sequence() && !node.is_null() {
        return Err(Error::invalid_node_type(
            format!("Invalid node type {path}, expected a sequence"),
            path,
            node.mark(),
        ));
    }

    Ok(())
}

/// Deserializes every element of a sequence node, in document order.
fn sequence_elements<'a, T: FromNode>(
    node: NodeRef<'a>,
    path: &'a LogicalPath,
) -> impl Iterator<Item = Result<(T, NodeRef<'a>, LogicalPath)>> + 'a {
    node.items().enumerate().map(move |(index, item)| {
        let item_path = path.index(index);
        let value = T::from_node(item, &item_path)?;

        Ok((value, item, item_path))
    })
}

/// Deserializes every `(key, value)` entry of a map node, in document order.
///
/// Keys are bound at the map's own path, values at the path extended by the key text.
fn map_entries<'a, K: FromNode, V: FromNode>(
    node: NodeRef<'a>,
    path: &'a LogicalPath,
) -> impl Iterator<Item = Result<(K, V, NodeRef<'a>)>> + 'a {
    node.entries().map(move |(key_node, value_node)| {
        let key = K::from_node(key_node, path)?;

        let value_path = match key_node.scalar() {
            Some(key_text) => path.key(key_text),
            None => path.clone(),
        };
        let value = V::from_node(value_node, &value_path)?;

        Ok((key, value, key_node))
    })
}

#[track_caller]
fn duplicate_key(key_node: NodeRef<'_>, path: &LogicalPath) -> Error {
    Error::invalid_node(
        format!(
            "Duplicate key \"{}\" in {path}",
            key_node.scalar().unwrap_or_default()
        ),
        path,
        key_node.mark(),
    )
}

#[track_caller]
fn duplicate_element(item_path: &LogicalPath, mark: Mark) -> Error {
    Error::invalid_node(format!("Duplicate element {item_path}"), item_path, mark)
}



impl<T: FromNode, const N: usize> FromNode for [T; N] {
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        if !node.is_defined() {
            return Err(Error::missing_node(
                format!("Missing array node {path}"),
                path,
                node.mark(),
            ));
        }

        if !node.is_sequence() {
            return Err(Error::invalid_node_type(
                format!("Invalid node type {path}, expected a sequence"),
                path,
                node.mark(),
            ));
        }

        let length_error = || {
            Error::invalid_node(
                format!(
                    "Expected sequence of length {N} at {path}, found {}",
                    node.len()
                ),
                path,
                node.mark(),
            )
        };

        if node.len() != N {
            return Err(length_error());
        }

        let elements = sequence_elements::<T>(node, path)
            .map(|element| element.map(|(value, ..)| value))
            .collect::<Result<Vec<T>>>()?;

        elements.try_into().map_err(|_| length_error())
    }
}


impl<T: FromNode> FromNode for Vec<T> {
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        expect_sequence(node, path, "sequence")?;

        sequence_elements::<T>(node, path)
            .map(|element| element.map(|(value, ..)| value))
            .collect()
    }
}

impl<T: FromNode> FromNode for VecDeque<T> {
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        Vec::<T>::from_node(node, path).map(VecDeque::from)
    }
}

impl<T: FromNode + Ord> FromNode for BTreeSet<T> {
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        expect_sequence(node, path, "set")?;

        let mut set = BTreeSet::new();
        for element in sequence_elements::<T>(node, path) {
            let (value, item, item_path) = element?;

            if !set.insert(value) {
                return Err(duplicate_element(&item_path, item.mark()));
            }
        }

        Ok(set)
    }
}

impl<T, S> FromNode for HashSet<T, S>
where
    T: FromNode + Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        expect_sequence(node, path, "set")?;

        let mut set = HashSet::with_capacity_and_hasher(node.len(), S::default());
        for element in sequence_elements::<T>(node, path) {
            let (value, item, item_path) = element?;

            if !set.insert(value) {
                return Err(duplicate_element(&item_path, item.mark()));
            }
        }

        Ok(set)
    }
}



impl<K, V, S> FromNode for HashMap<K, V, S>
where
    K: FromNode + Hash + Eq,
    V: FromNode,
    S: BuildHasher + Default,
{
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        expect_map(node, path, "map")?;

        let mut map = HashMap::with_capacity_and_hasher(node.len(), S::default());
        for entry in map_entries::<K, V>(node, path) {
            let (key, value, key_node) = entry?;

            if map.insert(key, value).is_some() {
                return Err(duplicate_key(key_node, path));
            }
        }

        Ok(map)
    }
}

impl<K, V> FromNode for BTreeMap<K, V>
where
    K: FromNode + Ord,
    V: FromNode,
{
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        expect_map(node, path, "map")?;

        let mut map = BTreeMap::new();
        for entry in map_entries::<K, V>(node, path) {
            let (key, value, key_node) = entry?;

            if map.insert(key, value).is_some() {
                return Err(duplicate_key(key_node, path));
            }
        }

        Ok(map)
    }
}

/// Keeps the entries in document order.
impl<K, V, S> FromNode for IndexMap<K, V, S>
where
    K: FromNode + Hash + Eq,
    V: FromNode,
    S: BuildHasher + Default,
{
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        expect_map(node, path, "map")?;

        let mut map = IndexMap::with_capacity_and_hasher(node.len(), S::default());
        for entry in map_entries::<K, V>(node, path) {
            let (key, value, key_node) = entry?;

            if map.insert(key, value).is_some() {
                return Err(duplicate_key(key_node, path));
            }
        }

        Ok(map)
    }
}



/// Map that keeps every entry in insertion order, including entries with equal keys.
///
/// This is the target for documents that deliberately repeat keys. Lookups are linear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiMap<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> MultiMap<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.entries.push((key, value));
    }

    /// Returns the first value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(entry_key, _)| <K as Borrow<Q>>::borrow(entry_key) == key)
            .map(|(_, value)| value)
    }

    /// Returns every value stored under `key`, in insertion order.
    ///
    /// The iterator borrows `key` as well, so it cannot outlive it.
    pub fn get_all<'a, Q>(&'a self, key: &'a Q) -> impl Iterator<Item = &'a V> + 'a
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .filter(move |(entry_key, _)| <K as Borrow<Q>>::borrow(entry_key) == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Number of entries, counting repeated keys once per entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }
}

impl<K, V> Default for MultiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for MultiMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<K, V> IntoIterator for MultiMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: FromNode, V: FromNode> FromNode for MultiMap<K, V> {
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        expect_map(node, path, "map")?;

        map_entries::<K, V>(node, path)
            .map(|entry| entry.map(|(key, value, _)| (key, value)))
            .collect()
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::{document::parse_yaml, error::ErrorKind};

    #[test]
    fn arrays_need_exact_length() {
        let root = parse_yaml("pair: [1, 2]\ntriple: [1, 2, 3]\nscalar: 1\n").unwrap();
        let root = root.node_ref();

        let pair = <[u8; 2]>::from_node(root.get("pair"), &LogicalPath::root().key("pair"));
        assert_eq!(pair.unwrap(), [1, 2]);

        let error = <[u8; 2]>::from_node(root.get("triple"), &LogicalPath::root().key("triple"))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidNode);
        assert!(error.message().contains("length 2"));

        let error = <[u8; 2]>::from_node(root.get("scalar"), &LogicalPath::root().key("scalar"))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidNodeType);
    }

    #[test]
    fn sequence_errors_carry_element_index() {
        let root = parse_yaml("ports: [80, http, 443]\n").unwrap();
        let path = LogicalPath::root().key("ports");

        let error = Vec::<u16>::from_node(root.node_ref().get("ports"), &path).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::BadConversion);
        assert_eq!(error.path().map(LogicalPath::as_str), Some("/ports[1]"));
    }

    #[test]
    fn null_is_an_empty_sequence() {
        let root = parse_yaml("empty:\n").unwrap();

        let values = Vec::<String>::from_node(root.node_ref().get("empty"), &LogicalPath::root());
        assert!(values.unwrap().is_empty());
    }

    #[test]
    fn sets_reject_duplicates() {
        let root = parse_yaml("tags: [a, b, a]\n").unwrap();
        let path = LogicalPath::root().key("tags");

        let error = BTreeSet::<String>::from_node(root.node_ref().get("tags"), &path).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidNode);
        assert_eq!(error.path().map(LogicalPath::as_str), Some("/tags[2]"));

        let error = HashSet::<String>::from_node(root.node_ref().get("tags"), &path).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidNode);
    }

    #[test]
    fn unique_maps_reject_duplicate_keys_but_multi_maps_keep_them() {
        let root = parse_yaml("mirror: a\nmirror: b\nother: c\n").unwrap();
        let root = root.node_ref();

        let error = HashMap::<String, String>::from_node(root, &LogicalPath::root()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidNode);
        assert!(error.message().contains("\"mirror\""));

        let map = MultiMap::<String, String>::from_node(root, &LogicalPath::root()).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("mirror").map(String::as_str), Some("a"));
        assert_eq!(
            map.get_all("mirror").cloned().collect::<Vec<_>>(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(!map.contains_key("absent"));
    }

    #[test]
    fn multi_map_lookups_outlive_a_temporary_key() {
        let mut map = MultiMap::new();
        map.insert("x".to_string(), 1);
        map.insert("y".to_string(), 2);
        map.insert("x".to_string(), 3);

        let first = map.get(&String::from("x"));
        let second = map.get(String::from("y").as_str());

        assert_eq!(first, Some(&1));
        assert_eq!(second, Some(&2));
        assert!(map.contains_key(&String::from("y")));
        assert_eq!(map.get_all("x").copied().collect::<Vec<_>>(), [1, 3]);
        assert_eq!(map.iter().count(), 3);
    }

    #[test]
    fn index_maps_keep_document_order() {
        let root = parse_yaml("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();

        let map = IndexMap::<String, u8>::from_node(root.node_ref(), &LogicalPath::root()).unwrap();
        let keys = map.keys().map(String::as_str).collect::<Vec<_>>();

        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn map_values_are_pathed_by_key_text() {
        let root = parse_yaml("limits:\n  cpu: 2\n  memory: lots\n").unwrap();
        let path = LogicalPath::root().key("limits");

        let error = BTreeMap::<String, u32>::from_node(root.node_ref().get("limits"), &path)
            .unwrap_err();

        assert_eq!(error.path().map(LogicalPath::as_str), Some("/limits/memory"));
    }

    #[test]
    fn maps_reject_sequences() {
        let root = parse_yaml("- a\n- b\n").unwrap();

        let error = BTreeMap::<String, String>::from_node(root.node_ref(), &LogicalPath::root())
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::InvalidNodeType);
    }
}
