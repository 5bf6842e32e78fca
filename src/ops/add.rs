use crate::error::Result;
use crate::session::Session;

/// stage the working copy of `path`
pub fn add(session: &mut Session, path: &str) -> Result<()> {
    let content = session.workspace.read(path)?;
    session.stage.stage(&session.repo, path, &content)
}

/// unstage `path`; a tracked path is also marked removed and deleted
pub fn rm(session: &mut Session, path: &str) -> Result<()> {
    session.stage.unstage_and_remove(path, &session.workspace)
}
