//! write-once, read-many object store
//!
//! objects live under `objects/{blobs,trees,commits}/xx/yyyy...`, keyed by
//! their identity hash. storing an object that already exists is a no-op.

pub mod blob;
pub mod commit;
pub mod tree;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs::write_atomic;
use crate::hash::Hash;
use crate::repo::Repo;

pub use blob::{blob_exists, blob_path, read_blob, write_blob};
pub use commit::{commit_exists, commit_path, read_commit, write_commit};
pub use tree::{read_tree, tree_exists, tree_path, write_tree};

/// path of an object inside one of the object directories
fn object_path(base: &Path, hash: &Hash) -> PathBuf {
    let (dir, file) = hash.to_path_components();
    base.join(dir).join(file)
}

/// store bytes under `hash` unless already present
///
/// returns true if the object was newly written
fn put_object(repo: &Repo, path: &Path, bytes: &[u8]) -> Result<bool> {
    // dedup: if object already exists, we're done
    if path.exists() {
        return Ok(false);
    }
    write_atomic(&repo.tmp_path(), path, bytes)?;
    Ok(true)
}

/// read the stored bytes of an object
fn get_object(path: &Path, hash: &Hash) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ObjectNotFound(*hash)
        } else {
            Error::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// zstd level for trees and commits (fast, reasonable ratio)
const ZSTD_LEVEL: i32 = 3;

/// serialize to cbor, then compress
fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut cbor_bytes = Vec::new();
    ciborium::into_writer(value, &mut cbor_bytes)?;

    zstd::encode_all(&cbor_bytes[..], ZSTD_LEVEL).map_err(|e| Error::Io {
        path: PathBuf::from("<zstd>"),
        source: e,
    })
}

/// decompress, then deserialize from cbor
fn decode<T: serde::de::DeserializeOwned>(path: &Path, compressed: &[u8]) -> Result<T> {
    let cbor_bytes = zstd::decode_all(compressed).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(ciborium::from_reader(&cbor_bytes[..])?)
}
