//! named remotes stored in config.toml

use std::path::Path;

use crate::branch::{delete_branch, list_branches};
use crate::error::{Error, Result};
use crate::session::Session;
use crate::stage::delete_stage;

/// register a remote repository directory under `name`
///
/// the path is not checked until the remote is used.
pub fn add_remote(session: &mut Session, name: &str, path: &Path) -> Result<()> {
    session.repo.config_mut().add_remote(name, path)?;
    session.repo.save_config()?;
    tracing::debug!(remote = name, path = %path.display(), "added remote");
    Ok(())
}

/// forget a remote, along with every branch fetched from it
pub fn remove_remote(session: &mut Session, name: &str) -> Result<()> {
    if session.repo.config().get_remote(name).is_none() {
        return Err(Error::RemoteNotFound(name.to_string()));
    }

    let prefix = format!("{}/", name);
    let fetched: Vec<String> = list_branches(&session.repo)?
        .into_iter()
        .filter(|b| b.starts_with(&prefix))
        .collect();
    if fetched.contains(&session.branch.name) {
        return Err(Error::ActiveBranchDeletion(session.branch.name.clone()));
    }

    for branch in &fetched {
        delete_branch(&session.repo, branch, &session.branch.name)?;
        delete_stage(&session.repo, branch)?;
    }

    session.repo.config_mut().remove_remote(name)?;
    session.repo.save_config()?;
    tracing::debug!(remote = name, branches = fetched.len(), "removed remote");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::{branch_exists, write_branch, Branch};
    use crate::ops::init;
    use crate::repo::Repo;
    use tempfile::tempdir;

    #[test]
    fn test_add_and_remove_remote() {
        let dir = tempdir().unwrap();
        let mut session = init(dir.path()).unwrap();

        add_remote(&mut session, "origin", Path::new("/srv/other/.twig")).unwrap();
        assert!(matches!(
            add_remote(&mut session, "origin", Path::new("/elsewhere/.twig")),
            Err(Error::RemoteExists(_))
        ));

        // persisted in config.toml
        let reopened = Repo::open(session.repo.path()).unwrap();
        assert!(reopened.config().get_remote("origin").is_some());

        write_branch(&session.repo, &Branch::new("origin/master", session.head())).unwrap();
        write_branch(&session.repo, &Branch::new("originals", session.head())).unwrap();

        remove_remote(&mut session, "origin").unwrap();
        assert!(session.repo.config().remotes.is_empty());
        assert!(!branch_exists(&session.repo, "origin/master"));
        assert!(branch_exists(&session.repo, "originals"));

        assert!(matches!(
            remove_remote(&mut session, "origin"),
            Err(Error::RemoteNotFound(_))
        ));
    }
}
