use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::repo::Repo;
use crate::types::Tree;

use super::{decode, encode, get_object, object_path, put_object};

/// write a tree to the object store
///
/// trees are serialized as CBOR, then zstd compressed.
/// the hash is the snapshot identity (digest over sorted path/blob pairs),
/// not the digest of the stored bytes.
pub fn write_tree(repo: &Repo, tree: &Tree) -> Result<Hash> {
    let hash = tree.hash();
    let path = tree_path(repo, &hash);

    // skip encoding entirely when the snapshot is already stored
    if path.exists() {
        return Ok(hash);
    }

    if put_object(repo, &path, &encode(tree)?)? {
        tracing::debug!(tree = %hash.short(), entries = tree.len(), "stored tree");
    }
    Ok(hash)
}

/// read a tree from the object store
pub fn read_tree(repo: &Repo, hash: &Hash) -> Result<Tree> {
    let path = tree_path(repo, hash);
    let compressed = get_object(&path, hash)?;
    let tree: Tree = decode(&path, &compressed)?;

    // verify hash
    if tree.hash() != *hash {
        return Err(Error::CorruptObject(*hash));
    }

    Ok(tree)
}

/// get the filesystem path to a tree object
pub fn tree_path(repo: &Repo, hash: &Hash) -> PathBuf {
    object_path(&repo.trees_path(), hash)
}

/// check if a tree exists in the object store
pub fn tree_exists(repo: &Repo, hash: &Hash) -> bool {
    tree_path(repo, hash).exists()
}
