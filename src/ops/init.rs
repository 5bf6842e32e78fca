use std::path::Path;

use crate::branch::{write_branch, write_head, Branch};
use crate::config::Config;
use crate::error::Result;
use crate::graph::create_initial_commit;
use crate::history::History;
use crate::repo::Repo;
use crate::session::Session;
use crate::stage::StagingArea;
use crate::types::Tree;
use crate::workspace::Workspace;

/// create a repository in `work_dir` with the default configuration
pub fn init(work_dir: &Path) -> Result<Session> {
    init_with_config(work_dir, Config::default())
}

/// create a repository in `work_dir`
///
/// writes the root commit, the default branch pointing at it, a clean
/// stage, and a history holding only the root.
pub fn init_with_config(work_dir: &Path, config: Config) -> Result<Session> {
    let workspace = Workspace::new(work_dir);
    // compile ignore patterns before anything touches the disk
    let ignore = config.ignore_patterns()?;
    let repo = Repo::init_with_config(&workspace.repo_path(), config)?;
    let workspace = workspace.with_ignore(ignore);

    let mut history = History::default();
    let (root, _) = create_initial_commit(&repo, &mut history)?;

    let branch = Branch::new(repo.config().default_branch.clone(), root);
    write_branch(&repo, &branch)?;
    write_head(&repo, &branch.name)?;

    let session = Session {
        repo,
        workspace,
        branch,
        stage: StagingArea::from_snapshot(&Tree::empty()),
        history,
    };
    session.save()?;

    tracing::info!(
        path = %session.repo.path().display(),
        branch = %session.branch.name,
        "initialized empty repository"
    );
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::graph::INITIAL_MESSAGE;
    use tempfile::tempdir;

    #[test]
    fn test_init() {
        let dir = tempdir().unwrap();
        let session = init(dir.path()).unwrap();

        assert_eq!(session.branch.name, "master");
        assert_eq!(session.branch.commits, vec![session.head()]);
        assert!(session.stage.is_clean());
        assert_eq!(session.history.len(), 1);

        let root = session.head_commit().unwrap();
        assert!(root.is_root());
        assert_eq!(root.message, INITIAL_MESSAGE);
        assert!(session.head_tree().unwrap().is_empty());

        let reopened = Session::open(dir.path()).unwrap();
        assert_eq!(reopened.head(), session.head());
    }

    #[test]
    fn test_init_twice() {
        let dir = tempdir().unwrap();
        init(dir.path()).unwrap();
        assert!(matches!(init(dir.path()), Err(Error::RepoExists(_))));
    }

    #[test]
    fn test_init_custom_default_branch() {
        let dir = tempdir().unwrap();
        let config = Config {
            default_branch: "main".to_string(),
            ..Config::default()
        };
        let session = init_with_config(dir.path(), config).unwrap();
        assert_eq!(session.branch.name, "main");
    }

    #[test]
    fn test_root_commits_share_identity() {
        // identity covers only tree and message
        let a = tempdir().unwrap();
        let b = tempdir().unwrap();
        assert_eq!(init(a.path()).unwrap().head(), init(b.path()).unwrap().head());
    }
}
