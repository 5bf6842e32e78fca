use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::Error;

/// SHA-256 hash used for content addressing
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; 32]);

impl Hash {
    /// zero hash (useful as sentinel)
    pub const ZERO: Hash = Hash([0u8; 32]);

    /// length of the abbreviated form used in merge log lines
    pub const SHORT_LEN: usize = 7;

    /// create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// parse from hex string
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        let bytes = hex::decode(s).map_err(|_| Error::InvalidHashHex(s.to_string()))?;
        if bytes.len() != 32 {
            return Err(Error::InvalidHashHex(s.to_string()));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// get raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// abbreviated hex form
    pub fn short(&self) -> String {
        self.to_hex()[..Self::SHORT_LEN].to_string()
    }

    /// does the hex form start with the given (case-insensitive) prefix
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.to_hex().starts_with(&prefix.to_ascii_lowercase())
    }

    /// split into path components for object store
    /// returns (first 2 hex chars, remaining 62 hex chars)
    pub fn to_path_components(&self) -> (String, String) {
        let hex = self.to_hex();
        (hex[..2].to_string(), hex[2..].to_string())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..12])
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// compute blob hash: the digest of the raw content, nothing else
pub fn compute_blob_hash(content: &[u8]) -> Hash {
    Hash(Sha256::digest(content).into())
}

/// compute tree hash over path -> blob pairs
///
/// callers must pass entries sorted by path (a `BTreeMap` iterator does).
/// format:
///   tag: b"tree"
///   entry_count: 8 bytes LE
///   for each entry:
///     path_len: 8 bytes LE
///     path: bytes
///     blob: 32 bytes
pub fn compute_tree_hash<'a, I>(entries: I) -> Hash
where
    I: ExactSizeIterator<Item = (&'a String, &'a Hash)>,
{
    let mut hasher = Sha256::new();

    hasher.update(b"tree");
    hasher.update((entries.len() as u64).to_le_bytes());
    for (path, blob) in entries {
        hasher.update((path.len() as u64).to_le_bytes());
        hasher.update(path.as_bytes());
        hasher.update(blob.as_bytes());
    }

    Hash(hasher.finalize().into())
}

/// compute commit identity over (tree, message)
///
/// parents and timestamp are deliberately NOT part of the identity:
/// two commits with the same tree and message share one id.
/// format:
///   tag: b"commit"
///   tree: 32 bytes
///   message_len: 8 bytes LE
///   message: bytes
pub fn compute_commit_hash(tree: &Hash, message: &str) -> Hash {
    let mut hasher = Sha256::new();

    hasher.update(b"commit");
    hasher.update(tree.as_bytes());
    hasher.update((message.len() as u64).to_le_bytes());
    hasher.update(message.as_bytes());

    Hash(hasher.finalize().into())
}
