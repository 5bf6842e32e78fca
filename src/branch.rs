//! named, mutable pointers into the commit graph

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, IoResultExt, Result};
use crate::fs::{read_record, remove_record, write_atomic, write_record};
use crate::hash::Hash;
use crate::repo::Repo;

/// a branch: its head plus every commit the branch has ever been advanced to
///
/// `commits` is append-only and is not pruned when histories diverge;
/// for a linear branch the head is its last element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub head: Hash,
    pub commits: Vec<Hash>,
}

impl Branch {
    /// a fresh branch whose only commit is `head`
    pub fn new(name: impl Into<String>, head: Hash) -> Self {
        Self {
            name: name.into(),
            head,
            commits: vec![head],
        }
    }

    /// a new branch sharing this branch's head and ancestry list
    pub fn fork(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            head: self.head,
            commits: self.commits.clone(),
        }
    }

    /// move the head to `commit`, recording it in the ancestry list
    pub fn advance(&mut self, commit: Hash) {
        self.commits.push(commit);
        self.head = commit;
    }

    /// take over another branch's head and ancestry list, keeping our name
    pub fn copy_from(&mut self, other: &Branch) {
        self.head = other.head;
        self.commits = other.commits.clone();
    }

    /// has this branch ever pointed at `commit`
    pub fn contains(&self, commit: &Hash) -> bool {
        self.commits.contains(commit)
    }

    /// first position of `commit` in the ancestry list
    pub fn position(&self, commit: &Hash) -> Option<usize> {
        self.commits.iter().position(|c| c == commit)
    }

    /// number of entries in the ancestry list
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// never true for a branch built through `Branch::new`
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// persist a branch record (create or update)
pub fn write_branch(repo: &Repo, branch: &Branch) -> Result<()> {
    validate_branch_name(&branch.name)?;
    write_record(&repo.tmp_path(), &branch_path(repo, &branch.name), branch)
}

/// read a branch record
pub fn read_branch(repo: &Repo, name: &str) -> Result<Branch> {
    validate_branch_name(name)?;
    read_record(&branch_path(repo, name))?.ok_or_else(|| Error::UnknownBranch(name.to_string()))
}

/// check if a branch exists
pub fn branch_exists(repo: &Repo, name: &str) -> bool {
    validate_branch_name(name).is_ok() && branch_path(repo, name).is_file()
}

/// create a branch pointing at `from`'s head, inheriting its ancestry
pub fn create_branch(repo: &Repo, name: &str, from: &Branch) -> Result<Branch> {
    validate_branch_name(name)?;
    if branch_exists(repo, name) {
        return Err(Error::BranchExists(name.to_string()));
    }
    let branch = from.fork(name);
    write_branch(repo, &branch)?;
    tracing::debug!(branch = name, head = %branch.head.short(), "created branch");
    Ok(branch)
}

/// delete a branch record; the active branch can never be deleted
pub fn delete_branch(repo: &Repo, name: &str, active: &str) -> Result<()> {
    if name == active {
        return Err(Error::ActiveBranchDeletion(name.to_string()));
    }
    validate_branch_name(name)?;
    if !remove_record(&branch_path(repo, name))? {
        return Err(Error::UnknownBranch(name.to_string()));
    }
    tracing::debug!(branch = name, "deleted branch");
    Ok(())
}

/// advance a stored branch to `commit`
pub fn advance_branch(repo: &Repo, name: &str, commit: Hash) -> Result<Branch> {
    let mut branch = read_branch(repo, name)?;
    branch.advance(commit);
    write_branch(repo, &branch)?;
    Ok(branch)
}

/// list all branches, sorted
pub fn list_branches(repo: &Repo) -> Result<Vec<String>> {
    let dir = repo.branches_path();
    let mut names = Vec::new();

    if dir.exists() {
        collect_branches(&dir, &dir, &mut names)?;
    }

    names.sort();
    Ok(names)
}

/// name of the active branch
pub fn read_head(repo: &Repo) -> Result<String> {
    let path = repo.head_path();
    let content = fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NoRepo(repo.path().to_path_buf())
        } else {
            Error::Io {
                path: path.clone(),
                source: e,
            }
        }
    })?;
    Ok(content.trim().to_string())
}

/// record the active branch
pub fn write_head(repo: &Repo, name: &str) -> Result<()> {
    validate_branch_name(name)?;
    write_atomic(&repo.tmp_path(), &repo.head_path(), format!("{}\n", name).as_bytes())
}

/// get filesystem path for a branch
fn branch_path(repo: &Repo, name: &str) -> PathBuf {
    repo.branches_path().join(name)
}

/// recursively collect branch names from directory
fn collect_branches(base: &Path, dir: &Path, names: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir).with_path(dir)? {
        let entry = entry.with_path(dir)?;
        let path = entry.path();

        if path.is_dir() {
            collect_branches(base, &path, names)?;
        } else if path.is_file() {
            // compute branch name relative to base
            if let Ok(rel) = path.strip_prefix(base) {
                let name = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                names.push(name);
            }
        }
    }
    Ok(())
}

/// validate branch name
///
/// slashes are allowed so fetched branches can live at `remote/branch`
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidBranchName("empty branch name".to_string()));
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err(Error::InvalidBranchName(format!(
            "branch name cannot start or end with '/': {}",
            name
        )));
    }

    if name.contains("//") {
        return Err(Error::InvalidBranchName(format!(
            "branch name cannot contain '//': {}",
            name
        )));
    }

    if name.contains('\0') || name.contains(char::is_whitespace) {
        return Err(Error::InvalidBranchName(format!(
            "branch name cannot contain whitespace or null bytes: {:?}",
            name
        )));
    }

    // check for path traversal
    for component in name.split('/') {
        if component == "." || component == ".." {
            return Err(Error::InvalidBranchName(format!(
                "branch name cannot contain '.' or '..': {}",
                name
            )));
        }
    }

    Ok(())
}
