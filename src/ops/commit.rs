use crate::error::{Error, Result};
use crate::graph::create_commit;
use crate::hash::Hash;
use crate::object::write_tree;
use crate::session::Session;

/// record the staged snapshot as a new commit on the active branch
pub fn commit(session: &mut Session, message: &str) -> Result<Hash> {
    if message.trim().is_empty() {
        return Err(Error::EmptyMessage);
    }
    if session.stage.is_clean() {
        return Err(Error::NothingToCommit);
    }

    // same steps as `fold_into_snapshot`, but the stage is only reset once
    // the commit exists
    let tree = session.stage.snapshot()?;
    let head = session.head();
    let tree_hash = write_tree(&session.repo, &tree)?;
    let (hash, _) = create_commit(
        &session.repo,
        &mut session.history,
        tree_hash,
        message,
        Some(&head),
        None,
    )?;

    session.stage.reset_to(&tree);
    session.branch.advance(hash);
    tracing::debug!(branch = %session.branch.name, head = %hash.short(), "advanced branch");
    Ok(hash)
}
