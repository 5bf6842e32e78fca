//! per-invocation state: loaded at the start of a command, saved at the end

use std::path::Path;

use crate::branch::{read_branch, read_head, write_branch, write_head, Branch};
use crate::error::Result;
use crate::hash::Hash;
use crate::history::History;
use crate::object::{read_commit, read_tree};
use crate::repo::Repo;
use crate::stage::{load_stage, write_stage, StagingArea};
use crate::types::{Commit, Tree};
use crate::workspace::Workspace;

/// everything one command mutates
///
/// operations work on the in-memory state and the working tree; nothing
/// reaches the repository's mutable records until `save`.
pub struct Session {
    pub repo: Repo,
    pub workspace: Workspace,
    pub branch: Branch,
    pub stage: StagingArea,
    pub history: History,
}

impl Session {
    /// load the repository belonging to `work_dir`
    pub fn open(work_dir: &Path) -> Result<Self> {
        let workspace = Workspace::new(work_dir);
        let repo = Repo::open(&workspace.repo_path())?;
        let workspace = workspace.with_ignore(repo.config().ignore_patterns()?);

        let branch = read_branch(&repo, &read_head(&repo)?)?;
        let stage = load_stage(&repo, &branch)?;
        let history = History::load(&repo)?;

        tracing::debug!(branch = %branch.name, head = %branch.head.short(), "opened session");
        Ok(Self {
            repo,
            workspace,
            branch,
            stage,
            history,
        })
    }

    /// persist stage, history, branch record, and the active branch name
    pub fn save(&self) -> Result<()> {
        write_stage(&self.repo, &self.branch.name, &self.stage)?;
        self.history.save(&self.repo)?;
        write_branch(&self.repo, &self.branch)?;
        write_head(&self.repo, &self.branch.name)
    }

    pub fn head(&self) -> Hash {
        self.branch.head
    }

    pub fn head_commit(&self) -> Result<Commit> {
        read_commit(&self.repo, &self.branch.head)
    }

    pub fn head_tree(&self) -> Result<Tree> {
        self.tree_of(&self.branch.head)
    }

    /// snapshot recorded by `commit`
    pub fn tree_of(&self, commit: &Hash) -> Result<Tree> {
        read_tree(&self.repo, &read_commit(&self.repo, commit)?.tree)
    }

    /// load another branch by name
    pub fn read_branch(&self, name: &str) -> Result<Branch> {
        read_branch(&self.repo, name)
    }

    /// make `branch` active with `stage`, first writing back the branch
    /// being left
    pub(crate) fn switch_to(&mut self, branch: Branch, stage: StagingArea) -> Result<()> {
        write_stage(&self.repo, &self.branch.name, &self.stage)?;
        write_branch(&self.repo, &self.branch)?;
        self.branch = branch;
        self.stage = stage;
        Ok(())
    }
}
