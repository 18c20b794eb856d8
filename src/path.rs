use std::fmt::{self, Display, Formatter};


/// Slash-delimited trail of keys (and `[i]` indices) leading from the document root
/// to a node, e.g. `/sources/0.2.0/sha256` or `/servers[1]/port`.
///
/// The path is only used in diagnostics, never to look nodes up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LogicalPath(String);

impl LogicalPath {
    /// The empty path of the document root.
    pub fn root() -> Self {
        Self(String::new())
    }

    #[must_use = "function returns the extended path"]
    pub fn key(&self, key: &str) -> Self {
        Self(format!("{}/{}", self.0, key))
    }

    #[must_use = "function returns the extended path"]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for LogicalPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LogicalPath {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_and_indices_accumulate() {
        let path = LogicalPath::root()
            .key("sources")
            .key("0.2.0")
            .key("mirrors")
            .index(2);

        assert_eq!(path.as_str(), "/sources/0.2.0/mirrors[2]");
        assert!(!path.is_root());
        assert!(LogicalPath::root().is_root());
    }
}
