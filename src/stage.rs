//! the staging area: pending additions and removals on top of the last commit

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::branch::{validate_branch_name, Branch};
use crate::error::{Error, Result};
use crate::fs::{read_record, remove_record, write_record};
use crate::hash::Hash;
use crate::object::{read_commit, read_tree, write_blob, write_tree};
use crate::repo::Repo;
use crate::types::{validate_path, Tree};
use crate::workspace::Workspace;

/// pending changes for one branch
///
/// a path is never both in `staged` and in `removed`. removing a tracked
/// path keeps its `tracked` entry so that re-adding it simply unmarks it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingArea {
    staged: BTreeMap<String, Hash>,
    removed: BTreeSet<String>,
    tracked: BTreeMap<String, Hash>,
}

impl StagingArea {
    /// a clean stage tracking exactly `tree`
    pub fn from_snapshot(tree: &Tree) -> Self {
        Self {
            staged: BTreeMap::new(),
            removed: BTreeSet::new(),
            tracked: tree.entries().clone(),
        }
    }

    /// stage `content` as the next version of `path`
    ///
    /// a path marked for removal is unmarked instead. content identical to
    /// the tracked version drops any pending addition.
    pub fn stage(&mut self, repo: &Repo, path: &str, content: &[u8]) -> Result<()> {
        validate_path(path)?;

        if self.removed.remove(path) {
            tracing::debug!(path, "unmarked removal");
            return Ok(());
        }

        let hash = write_blob(repo, content)?;
        if self.tracked.get(path) == Some(&hash) {
            self.staged.remove(path);
            tracing::debug!(path, "content matches last commit, nothing staged");
        } else {
            self.staged.insert(path.to_string(), hash);
            tracing::debug!(path, blob = %hash.short(), "staged");
        }
        Ok(())
    }

    /// stage an already stored blob, bypassing the removal shortcut
    pub(crate) fn stage_blob(&mut self, path: &str, hash: Hash) {
        self.removed.remove(path);
        if self.tracked.get(path) == Some(&hash) {
            self.staged.remove(path);
        } else {
            self.staged.insert(path.to_string(), hash);
        }
    }

    /// drop a pending addition and, for a tracked path, mark it for removal
    /// and delete the working copy
    pub fn unstage_and_remove(&mut self, path: &str, workspace: &Workspace) -> Result<()> {
        validate_path(path)?;

        let was_staged = self.staged.remove(path).is_some();
        let is_tracked = self.tracked.contains_key(path);

        if !was_staged && !is_tracked {
            return Err(Error::NothingToRemove(path.to_string()));
        }

        if is_tracked {
            self.removed.insert(path.to_string());
            workspace.remove(path)?;
            tracing::debug!(path, "marked for removal");
        } else {
            tracing::debug!(path, "unstaged");
        }
        Ok(())
    }

    /// no pending additions and no pending removals
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.removed.is_empty()
    }

    pub fn staged(&self) -> &BTreeMap<String, Hash> {
        &self.staged
    }

    pub fn removed(&self) -> &BTreeSet<String> {
        &self.removed
    }

    pub fn tracked(&self) -> &BTreeMap<String, Hash> {
        &self.tracked
    }

    pub fn is_tracked(&self, path: &str) -> bool {
        self.tracked.contains_key(path)
    }

    /// the tree the next commit would record
    pub fn snapshot(&self) -> Result<Tree> {
        let mut entries = self.tracked.clone();
        entries.extend(self.staged.iter().map(|(p, h)| (p.clone(), *h)));
        for path in &self.removed {
            entries.remove(path);
        }
        Tree::new(entries)
    }

    /// persist the next snapshot and make it the tracked state
    pub fn fold_into_snapshot(&mut self, repo: &Repo) -> Result<Hash> {
        let tree = self.snapshot()?;
        let hash = write_tree(repo, &tree)?;
        self.reset_to(&tree);
        Ok(hash)
    }

    /// discard pending changes and track `tree`
    pub fn reset_to(&mut self, tree: &Tree) {
        *self = Self::from_snapshot(tree);
    }
}

/// read a branch's stage record, if one was written
pub fn read_stage(repo: &Repo, name: &str) -> Result<Option<StagingArea>> {
    read_record(&stage_path(repo, name)?)
}

/// a branch's stage, or a clean one tracking its head when none is stored
pub fn load_stage(repo: &Repo, branch: &Branch) -> Result<StagingArea> {
    match read_stage(repo, &branch.name)? {
        Some(stage) => Ok(stage),
        None => {
            let commit = read_commit(repo, &branch.head)?;
            Ok(StagingArea::from_snapshot(&read_tree(repo, &commit.tree)?))
        }
    }
}

pub fn write_stage(repo: &Repo, name: &str, stage: &StagingArea) -> Result<()> {
    write_record(&repo.tmp_path(), &stage_path(repo, name)?, stage)
}

/// returns false if the branch had no stage record
pub fn delete_stage(repo: &Repo, name: &str) -> Result<bool> {
    remove_record(&stage_path(repo, name)?)
}

fn stage_path(repo: &Repo, name: &str) -> Result<PathBuf> {
    validate_branch_name(name)?;
    Ok(repo.stage_path().join(name))
}
