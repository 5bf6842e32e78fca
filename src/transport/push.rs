//! push: send the active branch to a remote

use crate::branch::{read_branch, write_branch, Branch};
use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::history::History;
use crate::session::Session;
use crate::stage::{write_stage, StagingArea};
use crate::transport::local::{collect_missing, copy_objects, open_remote, TransferStats};

/// result of a push
#[derive(Debug, Clone)]
pub struct PushResult {
    pub head: Hash,
    pub stats: TransferStats,
}

/// make the remote's `branch` point at our head
///
/// the remote branch must not hold commits we lack: its head has to be our
/// head or one of its ancestors. the remote working tree is left alone.
pub fn push(session: &Session, remote: &str, branch: &str) -> Result<PushResult> {
    let path = session
        .repo
        .config()
        .get_remote(remote)
        .map(|r| r.path.clone())
        .ok_or_else(|| Error::RemoteNotFound(remote.to_string()))?;
    let dst = open_remote(&path)?;

    let head = session.head();
    match read_branch(&dst, branch) {
        Ok(existing) => {
            if existing.head != head && !session.head_commit()?.is_ancestor(&existing.head) {
                return Err(Error::PullRequired);
            }
        }
        Err(Error::UnknownBranch(_)) => {}
        Err(e) => return Err(e),
    }

    let missing = collect_missing(&session.repo, &dst, &head)?;
    let stats = copy_objects(&session.repo, &dst, &missing)?;

    let mut history = History::load(&dst)?;
    for commit in &missing.commits {
        history.insert(*commit);
    }
    history.save(&dst)?;

    let pushed = Branch {
        name: branch.to_string(),
        head,
        commits: session.branch.commits.clone(),
    };
    write_branch(&dst, &pushed)?;
    write_stage(&dst, branch, &StagingArea::from_snapshot(&session.head_tree()?))?;

    tracing::info!(remote, branch, head = %head.short(), objects = missing.total_count(), "pushed");
    Ok(PushResult { head, stats })
}
