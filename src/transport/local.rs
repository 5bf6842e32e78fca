//! object transfer between two repositories on the same filesystem

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, IoResultExt, Result};
use crate::fs::write_atomic;
use crate::hash::Hash;
use crate::object::{blob_path, commit_path, read_commit, read_tree, tree_path};
use crate::repo::Repo;

/// objects to transfer, grouped by kind
#[derive(Debug, Default, Clone)]
pub struct ObjectSet {
    pub blobs: Vec<Hash>,
    pub trees: Vec<Hash>,
    pub commits: Vec<Hash>,
}

impl ObjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty() && self.trees.is_empty() && self.commits.is_empty()
    }

    pub fn total_count(&self) -> usize {
        self.blobs.len() + self.trees.len() + self.commits.len()
    }
}

/// transfer statistics
#[derive(Debug, Default, Clone)]
pub struct TransferStats {
    pub copied: usize,
    pub hardlinked: usize,
    pub skipped: usize,
    pub bytes_transferred: u64,
}

/// open the repository directory a remote points at
pub fn open_remote(path: &Path) -> Result<Repo> {
    if !path.is_dir() {
        return Err(Error::RemoteUnreachable(path.to_path_buf()));
    }
    Repo::open(path).map_err(|e| match e {
        Error::NoRepo(p) => Error::RemoteUnreachable(p),
        other => other,
    })
}

/// every object reachable from `head` that `dst` does not already hold
///
/// a commit present in `dst` is assumed to arrive with its whole history,
/// so the walk stops there.
pub fn collect_missing(src: &Repo, dst: &Repo, head: &Hash) -> Result<ObjectSet> {
    let mut objects = ObjectSet::new();
    let mut visited = HashSet::new();
    let mut stack = vec![*head];

    while let Some(hash) = stack.pop() {
        if !visited.insert(hash) || commit_path(dst, &hash).exists() {
            continue;
        }
        objects.commits.push(hash);

        let commit = read_commit(src, &hash)?;
        if visited.insert(commit.tree) && !tree_path(dst, &commit.tree).exists() {
            objects.trees.push(commit.tree);
            for blob in read_tree(src, &commit.tree)?.entries().values() {
                if visited.insert(*blob) && !blob_path(dst, blob).exists() {
                    objects.blobs.push(*blob);
                }
            }
        }
        stack.extend(commit.parents.iter().copied());
    }

    Ok(objects)
}

/// copy objects from `src` to `dst`, commits last
pub fn copy_objects(src: &Repo, dst: &Repo, objects: &ObjectSet) -> Result<TransferStats> {
    let mut stats = TransferStats::default();

    for hash in &objects.blobs {
        copy_object(dst, blob_path(src, hash), blob_path(dst, hash), &mut stats)?;
    }
    for hash in &objects.trees {
        copy_object(dst, tree_path(src, hash), tree_path(dst, hash), &mut stats)?;
    }
    for hash in &objects.commits {
        copy_object(dst, commit_path(src, hash), commit_path(dst, hash), &mut stats)?;
    }

    tracing::debug!(
        copied = stats.copied,
        hardlinked = stats.hardlinked,
        skipped = stats.skipped,
        bytes = stats.bytes_transferred,
        "transferred objects"
    );
    Ok(stats)
}

fn copy_object(dst: &Repo, src_path: PathBuf, dst_path: PathBuf, stats: &mut TransferStats) -> Result<()> {
    if dst_path.exists() {
        stats.skipped += 1;
        return Ok(());
    }

    if let Some(parent) = dst_path.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }

    // objects are immutable, so sharing an inode is safe
    if fs::hard_link(&src_path, &dst_path).is_ok() {
        stats.hardlinked += 1;
    } else {
        let content = fs::read(&src_path).with_path(&src_path)?;
        stats.bytes_transferred += content.len() as u64;
        write_atomic(&dst.tmp_path(), &dst_path, &content)?;
        stats.copied += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{commit_exists, read_blob};
    use crate::ops::{add, commit, init};
    use tempfile::tempdir;

    #[test]
    fn test_open_remote_missing() {
        let dir = tempdir().unwrap();
        let result = open_remote(&dir.path().join("nowhere/.twig"));
        assert!(matches!(result, Err(Error::RemoteUnreachable(_))));

        // a directory that is not a repository
        let result = open_remote(dir.path());
        assert!(matches!(result, Err(Error::RemoteUnreachable(_))));
    }

    #[test]
    fn test_collect_and_copy() {
        let src_dir = tempdir().unwrap();
        let dst_dir = tempdir().unwrap();
        let mut src = init(src_dir.path()).unwrap();
        let dst = init(dst_dir.path()).unwrap();

        src.workspace.write("f", b"content").unwrap();
        add(&mut src, "f").unwrap();
        let head = commit(&mut src, "add f").unwrap();

        let missing = collect_missing(&src.repo, &dst.repo, &head).unwrap();
        // root commit and empty tree are shared by every repository
        assert_eq!(missing.commits, vec![head]);
        assert_eq!(missing.trees.len(), 1);
        assert_eq!(missing.blobs.len(), 1);
        assert_eq!(missing.total_count(), 3);

        let stats = copy_objects(&src.repo, &dst.repo, &missing).unwrap();
        assert_eq!(stats.copied + stats.hardlinked, 3);
        assert!(commit_exists(&dst.repo, &head));
        assert_eq!(read_blob(&dst.repo, &missing.blobs[0]).unwrap(), b"content");

        assert!(collect_missing(&src.repo, &dst.repo, &head).unwrap().is_empty());
    }
}
