use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::hash::{compute_commit_hash, Hash};

/// a commit object pointing to a tree
///
/// `ancestors` is the eager, denormalized set of every commit reachable
/// through any parent link, filled in once when the commit is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// snapshot tree hash
    pub tree: Hash,
    /// parent commit hashes (empty for the root, 1 for linear, 2 for merge)
    pub parents: Vec<Hash>,
    /// unix timestamp (seconds since epoch)
    pub timestamp: i64,
    /// commit message
    pub message: String,
    /// transitive ancestors
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub ancestors: BTreeSet<Hash>,
}

impl Commit {
    /// create a new commit stamped with the current time
    pub fn new(tree: Hash, parents: Vec<Hash>, message: impl Into<String>) -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Self::with_timestamp(tree, parents, timestamp, message)
    }

    /// create a new commit with explicit timestamp
    pub fn with_timestamp(
        tree: Hash,
        parents: Vec<Hash>,
        timestamp: i64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tree,
            parents,
            timestamp,
            message: message.into(),
            ancestors: BTreeSet::new(),
        }
    }

    /// content identity: digest of (tree, message)
    pub fn id(&self) -> Hash {
        compute_commit_hash(&self.tree, &self.message)
    }

    /// first parent
    pub fn parent(&self) -> Option<&Hash> {
        self.parents.first()
    }

    /// second parent (merge commits only)
    pub fn second_parent(&self) -> Option<&Hash> {
        self.parents.get(1)
    }

    /// is this an initial commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// is this a merge commit (two parents)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// is `candidate` a proper ancestor of this commit
    pub fn is_ancestor(&self, candidate: &Hash) -> bool {
        self.ancestors.contains(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(byte: u8) -> Hash {
        Hash::from_bytes([byte; 32])
    }

    #[test]
    fn test_commit_new() {
        let c = Commit::new(Hash::ZERO, vec![], "message");
        assert_eq!(c.tree, Hash::ZERO);
        assert!(c.parents.is_empty());
        assert_eq!(c.message, "message");
        assert!(c.is_root());
        assert!(!c.is_merge());
        assert!(c.parent().is_none());
    }

    #[test]
    fn test_commit_merge() {
        let c = Commit::new(Hash::ZERO, vec![h(1), h(2)], "merge");
        assert!(c.is_merge());
        assert_eq!(c.parent(), Some(&h(1)));
        assert_eq!(c.second_parent(), Some(&h(2)));
    }

    #[test]
    fn test_commit_id_ignores_parents_and_time() {
        let a = Commit::with_timestamp(h(9), vec![h(1)], 10, "same");
        let b = Commit::with_timestamp(h(9), vec![h(2)], 20, "same");
        assert_eq!(a.id(), b.id());

        let c = Commit::with_timestamp(h(9), vec![h(1)], 10, "different");
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_is_ancestor() {
        let mut c = Commit::new(Hash::ZERO, vec![h(1)], "m");
        c.ancestors.insert(h(1));
        c.ancestors.insert(h(0));
        assert!(c.is_ancestor(&h(1)));
        assert!(c.is_ancestor(&h(0)));
        assert!(!c.is_ancestor(&h(7)));
    }

    #[test]
    fn test_commit_cbor_roundtrip() {
        let mut c = Commit::with_timestamp(Hash::ZERO, vec![h(1)], 1234567890, "message");
        c.ancestors.insert(h(1));

        let mut bytes = Vec::new();
        ciborium::into_writer(&c, &mut bytes).unwrap();

        let parsed: Commit = ciborium::from_reader(&bytes[..]).unwrap();
        assert_eq!(c, parsed);
    }
}
