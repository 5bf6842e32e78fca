use crate::branch::{self, Branch};
use crate::error::Result;
use crate::session::Session;
use crate::stage::{delete_stage, write_stage, StagingArea};

/// create a branch at the active head, with a clean stage
///
/// the active branch does not change.
pub fn create_branch(session: &Session, name: &str) -> Result<Branch> {
    let created = branch::create_branch(&session.repo, name, &session.branch)?;
    let stage = StagingArea::from_snapshot(&session.head_tree()?);
    write_stage(&session.repo, name, &stage)?;
    Ok(created)
}

/// delete a branch record and its stage; commits are untouched
pub fn remove_branch(session: &Session, name: &str) -> Result<()> {
    branch::delete_branch(&session.repo, name, &session.branch.name)?;
    delete_stage(&session.repo, name)?;
    Ok(())
}
