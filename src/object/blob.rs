use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::hash::{compute_blob_hash, Hash};
use crate::repo::Repo;

use super::{get_object, object_path, put_object};

/// write a blob to the object store
///
/// blobs are stored raw; the hash is the digest of the content.
/// writing identical content twice stores a single copy.
pub fn write_blob(repo: &Repo, content: &[u8]) -> Result<Hash> {
    let hash = compute_blob_hash(content);
    if put_object(repo, &blob_path(repo, &hash), content)? {
        tracing::debug!(blob = %hash.short(), size = content.len(), "stored blob");
    }
    Ok(hash)
}

/// read blob content, verifying it against its hash
pub fn read_blob(repo: &Repo, hash: &Hash) -> Result<Vec<u8>> {
    let content = get_object(&blob_path(repo, hash), hash)?;
    if compute_blob_hash(&content) != *hash {
        return Err(Error::CorruptObject(*hash));
    }
    Ok(content)
}

/// get the filesystem path to a blob
pub fn blob_path(repo: &Repo, hash: &Hash) -> PathBuf {
    object_path(&repo.blobs_path(), hash)
}

/// check if a blob exists in the object store
pub fn blob_exists(repo: &Repo, hash: &Hash) -> bool {
    blob_path(repo, hash).exists()
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
    fn test_write_and_read_blob() {
        let (_dir, repo) = test_repo();

        let hash = write_blob(&repo, b"hello world").unwrap();
        assert!(blob_exists(&repo, &hash));
        assert_eq!(read_blob(&repo, &hash).unwrap(), b"hello world");
    }

    #[test]
    fn test_blob_deduplication() {
        let (_dir, repo) = test_repo();

        let h1 = write_blob(&repo, b"same").unwrap();
        let h2 = write_blob(&repo, b"same").unwrap();
        assert_eq!(h1, h2);

        // exactly one stored copy
        let (dir, _) = h1.to_path_components();
        let count = std::fs::read_dir(repo.blobs_path().join(dir)).unwrap().count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_empty_blob() {
        let (_dir, repo) = test_repo();

        let hash = write_blob(&repo, b"").unwrap();
        assert!(read_blob(&repo, &hash).unwrap().is_empty());
    }

    #[test]
    fn test_blob_path_structure() {
        let (_dir, repo) = test_repo();

        let hash = write_blob(&repo, b"x").unwrap();
        let path = blob_path(&repo, &hash);
        let hex = hash.to_hex();
        assert!(path.ends_with(format!("{}/{}", &hex[..2], &hex[2..])));
    }

    #[test]
    fn test_read_nonexistent_blob() {
        let (_dir, repo) = test_repo();

        let result = read_blob(&repo, &Hash::ZERO);
        assert!(matches!(result, Err(Error::ObjectNotFound(_))));
    }

    #[test]
    fn test_read_corrupt_blob() {
        let (_dir, repo) = test_repo();

        let hash = write_blob(&repo, b"original").unwrap();
        std::fs::write(blob_path(&repo, &hash), b"tampered").unwrap();

        let result = read_blob(&repo, &hash);
        assert!(matches!(result, Err(Error::CorruptObject(_))));
    }
}
