use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::{compute_tree_hash, Hash};

/// a snapshot: every tracked path mapped to the blob holding its content
///
/// paths are relative, '/'-separated, and unique (the map guarantees the
/// latter and keeps them sorted for hashing).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    entries: BTreeMap<String, Hash>,
}

impl Tree {
    /// create a new tree, validating paths
    pub fn new(entries: BTreeMap<String, Hash>) -> Result<Self> {
        for path in entries.keys() {
            validate_path(path)?;
        }
        Ok(Self { entries })
    }

    /// create an empty tree
    pub fn empty() -> Self {
        Self::default()
    }

    /// path -> blob mapping
    pub fn entries(&self) -> &BTreeMap<String, Hash> {
        &self.entries
    }

    /// consume and return entries
    pub fn into_entries(self) -> BTreeMap<String, Hash> {
        self.entries
    }

    /// blob for a path
    pub fn get(&self, path: &str) -> Option<&Hash> {
        self.entries.get(path)
    }

    /// is the path part of this snapshot
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// tracked paths in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|p| p.as_str())
    }

    /// number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// is tree empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// identity of this snapshot
    pub fn hash(&self) -> Hash {
        compute_tree_hash(self.entries.iter())
    }
}

/// validate a tracked path
///
/// relative, '/'-separated, no empty/`.`/`..` components, no NUL bytes
pub fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::InvalidPath("empty path".to_string()));
    }
    if path.contains('\0') {
        return Err(Error::InvalidPath(format!("path contains null byte: {}", path)));
    }
    if path.starts_with('/') || path.ends_with('/') {
        return Err(Error::InvalidPath(format!(
            "path cannot start or end with '/': {}",
            path
        )));
    }
    for component in path.split('/') {
        if component.is_empty() || component == "." || component == ".." {
            return Err(Error::InvalidPath(format!(
                "path has an empty, '.' or '..' component: {}",
                path
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::compute_blob_hash;

    fn tree_of(pairs: &[(&str, &[u8])]) -> Tree {
        let entries = pairs
            .iter()
            .map(|(p, c)| (p.to_string(), compute_blob_hash(c)))
            .collect();
        Tree::new(entries).unwrap()
    }

    #[test]
    fn test_tree_empty() {
        let tree = Tree::empty();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.hash(), Tree::empty().hash());
    }

    #[test]
    fn test_tree_get() {
        let tree = tree_of(&[("a.txt", b"a"), ("dir/b.txt", b"b")]);
        assert_eq!(tree.get("a.txt"), Some(&compute_blob_hash(b"a")));
        assert!(tree.contains("dir/b.txt"));
        assert!(tree.get("missing").is_none());
        assert_eq!(tree.paths().collect::<Vec<_>>(), vec!["a.txt", "dir/b.txt"]);
    }

    #[test]
    fn test_tree_hash_ignores_insertion_order() {
        let t1 = tree_of(&[("a", b"1"), ("b", b"2")]);
        let t2 = tree_of(&[("b", b"2"), ("a", b"1")]);
        assert_eq!(t1.hash(), t2.hash());
    }

    #[test]
    fn test_tree_hash_sees_content() {
        let t1 = tree_of(&[("a", b"1")]);
        let t2 = tree_of(&[("a", b"2")]);
        assert_ne!(t1.hash(), t2.hash());
        assert_ne!(t1.hash(), Tree::empty().hash());
    }

    #[test]
    fn test_invalid_paths() {
        assert!(validate_path("").is_err());
        assert!(validate_path("/abs").is_err());
        assert!(validate_path("trailing/").is_err());
        assert!(validate_path("double//slash").is_err());
        assert!(validate_path("with/./dot").is_err());
        assert!(validate_path("../escape").is_err());
        assert!(validate_path("nul\0").is_err());

        assert!(validate_path("file.txt").is_ok());
        assert!(validate_path("nested/dir/file.txt").is_ok());
        assert!(validate_path(".hidden").is_ok());
    }

    #[test]
    fn test_tree_rejects_invalid_path() {
        let mut entries = BTreeMap::new();
        entries.insert("../x".to_string(), Hash::ZERO);
        assert!(matches!(Tree::new(entries), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_tree_cbor_roundtrip() {
        let tree = tree_of(&[("a", b"1"), ("sub/b", b"2")]);

        let mut bytes = Vec::new();
        ciborium::into_writer(&tree, &mut bytes).unwrap();
        let parsed: Tree = ciborium::from_reader(&bytes[..]).unwrap();

        assert_eq!(tree, parsed);
        assert_eq!(tree.hash(), parsed.hash());
    }
}
