//! the immutable commit DAG: creation, ancestry queries, first-parent walks

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::history::History;
use crate::object::{read_commit, write_commit, write_tree};
use crate::repo::Repo;
use crate::types::{Commit, Tree};

/// message of the root commit written by `init`
pub const INITIAL_MESSAGE: &str = "initial commit";

/// create, persist, and register a commit
///
/// fails with `EmptyMessage` on a blank message, and with `NothingToCommit`
/// when a non-merge commit would snapshot exactly its parent's tree.
/// the new commit's ancestor set is the union of each parent and that
/// parent's own ancestor set.
pub fn create_commit(
    repo: &Repo,
    history: &mut History,
    tree: Hash,
    message: &str,
    parent: Option<&Hash>,
    second_parent: Option<&Hash>,
) -> Result<(Hash, Commit)> {
    if message.trim().is_empty() {
        return Err(Error::EmptyMessage);
    }

    let mut parents = Vec::new();
    let mut ancestors = BTreeSet::new();

    if let Some(parent) = parent {
        let parent_commit = read_commit(repo, parent)?;
        if second_parent.is_none() && parent_commit.tree == tree {
            return Err(Error::NothingToCommit);
        }
        ancestors.insert(*parent);
        ancestors.extend(parent_commit.ancestors);
        parents.push(*parent);
    }

    if let Some(second) = second_parent {
        let second_commit = read_commit(repo, second)?;
        ancestors.insert(*second);
        ancestors.extend(second_commit.ancestors);
        parents.push(*second);
    }

    let mut commit = Commit::new(tree, parents, message);
    commit.ancestors = ancestors;

    let hash = write_commit(repo, &commit)?;
    history.insert(hash);

    tracing::debug!(
        commit = %hash.short(),
        tree = %tree.short(),
        ancestors = commit.ancestors.len(),
        "created commit"
    );
    Ok((hash, commit))
}

/// write the empty root commit every repository starts from
pub fn create_initial_commit(repo: &Repo, history: &mut History) -> Result<(Hash, Commit)> {
    let tree = write_tree(repo, &Tree::empty())?;
    create_commit(repo, history, tree, INITIAL_MESSAGE, None, None)
}

/// every commit reachable from `commit` through parent links (excluding itself)
pub fn ancestors_of(repo: &Repo, commit: &Hash) -> Result<BTreeSet<Hash>> {
    Ok(read_commit(repo, commit)?.ancestors)
}

/// is `candidate` a proper ancestor of `commit`
pub fn is_ancestor(repo: &Repo, candidate: &Hash, commit: &Hash) -> Result<bool> {
    Ok(read_commit(repo, commit)?.is_ancestor(candidate))
}

/// lazy walk along first-parent links, ending at the root
///
/// a clone continues from the same position as the walk it was cloned
/// from; call `walk_first_parent` again to start a fresh pass.
#[derive(Clone)]
pub struct FirstParentWalk<'a> {
    repo: &'a Repo,
    next: Option<Hash>,
}

/// walk from `start` back to the root following only first parents
pub fn walk_first_parent(repo: &Repo, start: Hash) -> FirstParentWalk<'_> {
    FirstParentWalk {
        repo,
        next: Some(start),
    }
}

impl Iterator for FirstParentWalk<'_> {
    type Item = Result<(Hash, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let hash = self.next.take()?;
        match read_commit(self.repo, &hash) {
            Ok(commit) => {
                self.next = commit.parent().copied();
                Some(Ok((hash, commit)))
            }
            // stop after reporting the error
            Err(e) => Some(Err(e)),
        }
    }
}
