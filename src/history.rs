//! the global registry of every commit ever created or fetched

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fs::{read_record, write_record};
use crate::hash::Hash;
use crate::object::read_commit;
use crate::repo::Repo;
use crate::types::Commit;

/// commit ids known to this repository, independent of branches
///
/// grows monotonically; nothing is ever removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    commits: BTreeSet<Hash>,
}

impl History {
    /// load the history record (empty if none has been written yet)
    pub fn load(repo: &Repo) -> Result<Self> {
        Ok(read_record(&repo.history_path())?.unwrap_or_default())
    }

    /// persist the history record
    pub fn save(&self, repo: &Repo) -> Result<()> {
        write_record(&repo.tmp_path(), &repo.history_path(), self)
    }

    /// register a commit; returns false if it was already known
    pub fn insert(&mut self, commit: Hash) -> bool {
        self.commits.insert(commit)
    }

    pub fn contains(&self, commit: &Hash) -> bool {
        self.commits.contains(commit)
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// commit ids in hash order
    pub fn iter(&self) -> impl Iterator<Item = &Hash> {
        self.commits.iter()
    }

    /// resolve an abbreviated commit id
    ///
    /// the prefix must match exactly one known commit.
    pub fn resolve_prefix(&self, prefix: &str) -> Result<Hash> {
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::CommitNotFound(prefix.to_string()));
        }

        let mut matches = self.commits.iter().filter(|h| h.has_prefix(prefix));
        match (matches.next(), matches.next()) {
            (Some(hash), None) => Ok(*hash),
            (Some(_), Some(_)) => Err(Error::AmbiguousCommit(prefix.to_string())),
            (None, _) => Err(Error::CommitNotFound(prefix.to_string())),
        }
    }

    /// load every known commit
    pub fn load_commits(&self, repo: &Repo) -> Result<Vec<(Hash, Commit)>> {
        self.commits
            .iter()
            .map(|hash| Ok((*hash, read_commit(repo, hash)?)))
            .collect()
    }

    /// ids of commits whose message contains `needle`
    pub fn find_by_message(&self, repo: &Repo, needle: &str) -> Result<Vec<Hash>> {
        let mut found = Vec::new();
        for hash in &self.commits {
            if read_commit(repo, hash)?.message.contains(needle) {
                found.push(*hash);
            }
        }
        Ok(found)
    }
}
