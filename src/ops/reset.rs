use crate::error::Result;
use crate::hash::Hash;
use crate::ops::checkout::{check_untracked_in_the_way, replace_working_tree};
use crate::session::Session;

/// move the active branch to an arbitrary commit and check it out
///
/// the commit is appended to the branch's ancestry list and the stage is
/// cleared.
pub fn reset(session: &mut Session, prefix: &str) -> Result<Hash> {
    let commit = session.history.resolve_prefix(prefix)?;
    let tree = session.tree_of(&commit)?;

    check_untracked_in_the_way(session, &tree)?;
    replace_working_tree(session, &tree)?;

    session.stage.reset_to(&tree);
    session.branch.advance(commit);
    tracing::debug!(branch = %session.branch.name, head = %commit.short(), "reset branch");
    Ok(commit)
}
