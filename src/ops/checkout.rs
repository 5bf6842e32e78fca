use crate::error::{Error, Result};
use crate::object::read_blob;
use crate::session::Session;
use crate::stage::StagingArea;
use crate::types::Tree;

/// restore `path` from the head commit; staging is untouched
pub fn checkout_file(session: &Session, path: &str) -> Result<()> {
    let tree = session.head_tree()?;
    restore_file(session, &tree, path)
}

/// restore `path` from the commit named by an unambiguous id prefix
pub fn checkout_file_at(session: &Session, prefix: &str, path: &str) -> Result<()> {
    let commit = session.history.resolve_prefix(prefix)?;
    let tree = session.tree_of(&commit)?;
    restore_file(session, &tree, path)
}

/// switch to another branch, rewriting the working tree to its head
///
/// files tracked here but absent there are deleted; both branches are
/// left with a clean stage.
pub fn checkout_branch(session: &mut Session, name: &str) -> Result<()> {
    let target = session.read_branch(name)?;
    if target.name == session.branch.name {
        return Err(Error::AlreadyOnBranch(name.to_string()));
    }

    let tree = session.tree_of(&target.head)?;
    check_untracked_in_the_way(session, &tree)?;
    replace_working_tree(session, &tree)?;

    let current = session.head_tree()?;
    session.stage.reset_to(&current);
    session.switch_to(target, StagingArea::from_snapshot(&tree))?;

    tracing::debug!(branch = name, head = %session.head().short(), "checked out branch");
    Ok(())
}

fn restore_file(session: &Session, tree: &Tree, path: &str) -> Result<()> {
    let blob = tree
        .get(path)
        .ok_or_else(|| Error::FileNotInCommit(path.to_string()))?;
    let content = read_blob(&session.repo, blob)?;
    session.workspace.write(path, &content)
}

/// fail if writing `target` would clobber a working file this branch does
/// not track
pub(crate) fn check_untracked_in_the_way(session: &Session, target: &Tree) -> Result<()> {
    for (path, hash) in target.entries() {
        if session.stage.is_tracked(path) {
            continue;
        }
        match session.workspace.digest_of(path)? {
            Some(digest) if digest != *hash => {
                return Err(Error::UntrackedFileInTheWay(path.clone()));
            }
            _ => {}
        }
    }
    Ok(())
}

/// make the working tree match `target` for every path either side tracks
pub(crate) fn replace_working_tree(session: &Session, target: &Tree) -> Result<()> {
    for (path, hash) in target.entries() {
        if session.workspace.digest_of(path)?.as_ref() == Some(hash) {
            continue;
        }
        let content = read_blob(&session.repo, hash)?;
        session.workspace.write(path, &content)?;
    }

    for path in session.stage.tracked().keys() {
        if !target.contains(path) {
            session.workspace.remove(path)?;
        }
    }
    Ok(())
}
