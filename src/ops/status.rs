use std::collections::BTreeMap;
use std::fmt;

use crate::branch::list_branches;
use crate::error::Result;
use crate::session::Session;

/// how a working file differs from what the next commit would record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modification {
    Modified,
    Deleted,
}

impl fmt::Display for Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modification::Modified => write!(f, "modified"),
            Modification::Deleted => write!(f, "deleted"),
        }
    }
}

/// snapshot of the repository and working tree state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub current_branch: String,
    pub branches: Vec<String>,
    pub staged: Vec<String>,
    pub removed: Vec<String>,
    /// sorted by path
    pub modifications: Vec<(String, Modification)>,
    pub untracked: Vec<String>,
}

/// compare branches, stage, and working tree
pub fn status(session: &Session) -> Result<StatusReport> {
    let stage = &session.stage;
    let ws = &session.workspace;

    let mut modifications = BTreeMap::new();

    for (path, hash) in stage.staged() {
        match ws.digest_of(path)? {
            None => {
                modifications.insert(path.clone(), Modification::Deleted);
            }
            Some(digest) if digest != *hash => {
                modifications.insert(path.clone(), Modification::Modified);
            }
            Some(_) => {}
        }
    }

    for (path, hash) in stage.tracked() {
        if stage.staged().contains_key(path) || stage.removed().contains(path) {
            continue;
        }
        match ws.digest_of(path)? {
            None => {
                modifications.insert(path.clone(), Modification::Deleted);
            }
            Some(digest) if digest != *hash => {
                modifications.insert(path.clone(), Modification::Modified);
            }
            Some(_) => {}
        }
    }

    let untracked = ws
        .files()?
        .into_iter()
        .filter(|p| {
            !stage.staged().contains_key(p)
                && (!stage.is_tracked(p) || stage.removed().contains(p))
        })
        .collect();

    Ok(StatusReport {
        current_branch: session.branch.name.clone(),
        branches: list_branches(&session.repo)?,
        staged: stage.staged().keys().cloned().collect(),
        removed: stage.removed().iter().cloned().collect(),
        modifications: modifications.into_iter().collect(),
        untracked,
    })
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Branches ===")?;
        for name in &self.branches {
            if *name == self.current_branch {
                writeln!(f, "*{}", name)?;
            } else {
                writeln!(f, "{}", name)?;
            }
        }
        writeln!(f)?;

        writeln!(f, "=== Staged Files ===")?;
        for path in &self.staged {
            writeln!(f, "{}", path)?;
        }
        writeln!(f)?;

        writeln!(f, "=== Removed Files ===")?;
        for path in &self.removed {
            writeln!(f, "{}", path)?;
        }
        writeln!(f)?;

        writeln!(f, "=== Modifications Not Staged For Commit ===")?;
        for (path, kind) in &self.modifications {
            writeln!(f, "{} ({})", path, kind)?;
        }
        writeln!(f)?;

        writeln!(f, "=== Untracked Files ===")?;
        for path in &self.untracked {
            writeln!(f, "{}", path)?;
        }
        writeln!(f)
    }
}
