use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::repo::Repo;
use crate::types::Commit;

use super::{decode, encode, get_object, object_path, put_object};

/// write a commit to the object store
///
/// commits are serialized as CBOR, then zstd compressed, and keyed by
/// `Commit::id`. because the id covers only (tree, message), a second commit
/// with the same tree and message but different parents maps onto the
/// already stored object; the stored object wins.
pub fn write_commit(repo: &Repo, commit: &Commit) -> Result<Hash> {
    let hash = commit.id();
    let path = commit_path(repo, &hash);

    if path.exists() {
        let existing = read_commit(repo, &hash)?;
        if existing.parents != commit.parents {
            tracing::warn!(
                commit = %hash.short(),
                "commit identity collides with a stored commit that has different parents; keeping the stored one"
            );
        }
        return Ok(hash);
    }

    put_object(repo, &path, &encode(commit)?)?;
    tracing::debug!(commit = %hash.short(), parents = commit.parents.len(), "stored commit");
    Ok(hash)
}

/// read a commit from the object store
pub fn read_commit(repo: &Repo, hash: &Hash) -> Result<Commit> {
    let path = commit_path(repo, hash);
    let compressed = get_object(&path, hash)?;
    let commit: Commit = decode(&path, &compressed)?;

    // verify hash
    if commit.id() != *hash {
        return Err(Error::CorruptObject(*hash));
    }

    Ok(commit)
}

/// get the filesystem path to a commit object
pub fn commit_path(repo: &Repo, hash: &Hash) -> PathBuf {
    object_path(&repo.commits_path(), hash)
}

/// check if a commit exists in the object store
pub fn commit_exists(repo: &Repo, hash: &Hash) -> bool {
    commit_path(repo, hash).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::REPO_DIR;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(&dir.path().join(REPO_DIR)).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_write_and_read_commit() {
        let (_dir, repo) = test_repo();

        let commit = Commit::with_timestamp(Hash::ZERO, vec![], 1234567890, "test commit");

        let hash = write_commit(&repo, &commit).unwrap();
        assert_eq!(hash, commit.id());
        assert!(commit_exists(&repo, &hash));

        let read = read_commit(&repo, &hash).unwrap();
        assert_eq!(commit, read);
    }

    #[test]
    fn test_commit_deduplication() {
        let (_dir, repo) = test_repo();

        let commit = Commit::with_timestamp(Hash::ZERO, vec![], 1234567890, "test");

        let h1 = write_commit(&repo, &commit).unwrap();
        let h2 = write_commit(&repo, &commit).unwrap();

        assert_eq!(h1, h2);
    }

    #[test]
    fn test_colliding_commit_keeps_stored_object() {
        let (_dir, repo) = test_repo();

        let p1 = Hash::from_bytes([1; 32]);
        let p2 = Hash::from_bytes([2; 32]);
        let first = Commit::with_timestamp(Hash::ZERO, vec![p1], 1, "same");
        let second = Commit::with_timestamp(Hash::ZERO, vec![p2], 2, "same");

        let h1 = write_commit(&repo, &first).unwrap();
        let h2 = write_commit(&repo, &second).unwrap();
        assert_eq!(h1, h2);

        let stored = read_commit(&repo, &h1).unwrap();
        assert_eq!(stored.parents, vec![p1]);
    }

    #[test]
    fn test_merge_commit() {
        let (_dir, repo) = test_repo();

        let p1 = Hash::from_bytes([1; 32]);
        let p2 = Hash::from_bytes([2; 32]);
        let mut commit = Commit::with_timestamp(Hash::ZERO, vec![p1, p2], 1234567890, "merge");
        commit.ancestors.extend([p1, p2]);

        let hash = write_commit(&repo, &commit).unwrap();
        let read = read_commit(&repo, &hash).unwrap();

        assert!(read.is_merge());
        assert_eq!(read.ancestors.len(), 2);
    }

    #[test]
    fn test_read_nonexistent_commit() {
        let (_dir, repo) = test_repo();

        let result = read_commit(&repo, &Hash::from_bytes([0x22; 32]));
        assert!(matches!(result, Err(Error::ObjectNotFound(_))));
    }
}
