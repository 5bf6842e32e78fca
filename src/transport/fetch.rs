//! fetch and pull: bring a remote branch into this repository

use crate::branch::{read_branch, write_branch, Branch};
use crate::error::{Error, Result};
use crate::history::History;
use crate::object::commit_exists;
use crate::ops::{merge, MergeOutcome};
use crate::session::Session;
use crate::stage::{write_stage, StagingArea};
use crate::transport::local::{collect_missing, copy_objects, open_remote, TransferStats};

/// result of a fetch
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// local name of the fetched branch, `remote/branch`
    pub branch: Branch,
    pub stats: TransferStats,
}

/// copy a remote branch into the local branch `remote/branch`
///
/// remote commits that are now stored locally join the local history, which
/// is saved together with the branch record. fetching into the active branch
/// is refused: check out another branch first.
pub fn fetch(session: &mut Session, remote: &str, branch: &str) -> Result<FetchResult> {
    let path = session
        .repo
        .config()
        .get_remote(remote)
        .map(|r| r.path.clone())
        .ok_or_else(|| Error::RemoteNotFound(remote.to_string()))?;
    let src = open_remote(&path)?;

    let name = format!("{}/{}", remote, branch);
    let theirs = match read_branch(&src, branch) {
        Ok(b) => b,
        Err(Error::UnknownBranch(_)) => return Err(Error::RemoteBranchNotFound(name)),
        Err(e) => return Err(e),
    };
    if session.branch.name == name {
        return Err(Error::FetchIntoActiveBranch(name));
    }

    let missing = collect_missing(&src, &session.repo, &theirs.head)?;
    let stats = copy_objects(&src, &session.repo, &missing)?;

    let remote_history = History::load(&src)?;
    for commit in remote_history.iter() {
        if commit_exists(&session.repo, commit) {
            session.history.insert(*commit);
        }
    }
    for commit in &missing.commits {
        session.history.insert(*commit);
    }
    // the branch record must never name commits the saved history lacks
    session.history.save(&session.repo)?;

    let local = Branch {
        name,
        head: theirs.head,
        commits: theirs.commits,
    };
    write_branch(&session.repo, &local)?;
    let tree = session.tree_of(&local.head)?;
    write_stage(&session.repo, &local.name, &StagingArea::from_snapshot(&tree))?;

    tracing::info!(branch = %local.name, head = %local.head.short(), objects = missing.total_count(), "fetched");
    Ok(FetchResult {
        branch: local,
        stats,
    })
}

/// fetch `remote/branch`, then merge it into the active branch
pub fn pull(session: &mut Session, remote: &str, branch: &str) -> Result<MergeOutcome> {
    let fetched = fetch(session, remote, branch)?;
    merge(session, &fetched.branch.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Hash;
    use crate::ops::{add, checkout_branch, commit, init};
    use crate::transport::add_remote;
    use tempfile::tempdir;

    fn commit_file(session: &mut Session, path: &str, content: &str) -> Hash {
        session.workspace.write(path, content.as_bytes()).unwrap();
        add(session, path).unwrap();
        commit(session, &format!("write {}", path)).unwrap()
    }

    #[test]
    fn test_fetch_creates_remote_branch() {
        let local_dir = tempdir().unwrap();
        let remote_dir = tempdir().unwrap();
        let mut local = init(local_dir.path()).unwrap();
        let mut remote = init(remote_dir.path()).unwrap();
        add_remote(&mut local, "origin", remote.repo.path()).unwrap();

        let theirs = commit_file(&mut remote, "r", "remote file");
        remote.save().unwrap();

        let result = fetch(&mut local, "origin", "master").unwrap();
        assert_eq!(result.branch.name, "origin/master");
        assert_eq!(result.branch.head, theirs);

        let stored = read_branch(&local.repo, "origin/master").unwrap();
        assert_eq!(stored.commits, remote.branch.commits);
        assert!(local.history.contains(&theirs));
        // the working tree and the active branch are untouched
        assert!(!local.workspace.exists("r"));
        assert_eq!(local.branch.name, "master");
    }

    #[test]
    fn test_fetch_errors() {
        let local_dir = tempdir().unwrap();
        let remote_dir = tempdir().unwrap();
        let mut local = init(local_dir.path()).unwrap();
        let remote = init(remote_dir.path()).unwrap();
        add_remote(&mut local, "origin", remote.repo.path()).unwrap();

        assert!(matches!(
            fetch(&mut local, "origin", "nope"),
            Err(Error::RemoteBranchNotFound(_))
        ));
        assert!(matches!(
            fetch(&mut local, "upstream", "master"),
            Err(Error::RemoteNotFound(_))
        ));
    }

    #[test]
    fn test_failed_pull_keeps_fetched_history() {
        let local_dir = tempdir().unwrap();
        let remote_dir = tempdir().unwrap();
        let mut local = init(local_dir.path()).unwrap();
        let mut remote = init(remote_dir.path()).unwrap();
        add_remote(&mut local, "origin", remote.repo.path()).unwrap();
        local.save().unwrap();

        let theirs = commit_file(&mut remote, "r", "remote file");
        remote.save().unwrap();

        // an untracked local `r` blocks the merge half
        local.workspace.write("r", b"local scratch").unwrap();
        assert!(matches!(
            pull(&mut local, "origin", "master"),
            Err(Error::UntrackedFileInTheWay(_))
        ));
        drop(local);

        let mut reopened = Session::open(local_dir.path()).unwrap();
        assert!(reopened.history.contains(&theirs));
        assert_eq!(
            reopened.history.resolve_prefix(&theirs.short()).unwrap(),
            theirs
        );

        reopened.workspace.remove("r").unwrap();
        let outcome = merge(&mut reopened, "origin/master").unwrap();
        assert_eq!(outcome, MergeOutcome::FastForward { head: theirs });
    }

    #[test]
    fn test_fetch_into_active_branch_refused() {
        let local_dir = tempdir().unwrap();
        let remote_dir = tempdir().unwrap();
        let mut local = init(local_dir.path()).unwrap();
        let mut remote = init(remote_dir.path()).unwrap();
        add_remote(&mut local, "origin", remote.repo.path()).unwrap();

        let first = commit_file(&mut remote, "r", "one");
        remote.save().unwrap();
        fetch(&mut local, "origin", "master").unwrap();
        checkout_branch(&mut local, "origin/master").unwrap();

        commit_file(&mut remote, "r2", "two");
        remote.save().unwrap();
        assert!(matches!(
            fetch(&mut local, "origin", "master"),
            Err(Error::FetchIntoActiveBranch(_))
        ));
        local.save().unwrap();

        // nothing half-applied: the stored branch still matches the session
        let stored = read_branch(&local.repo, "origin/master").unwrap();
        assert_eq!(stored.head, first);
        assert_eq!(local.head(), first);

        // fetching from another branch picks up the new commit
        checkout_branch(&mut local, "master").unwrap();
        let result = fetch(&mut local, "origin", "master").unwrap();
        assert_eq!(result.branch.head, remote.head());
    }

    #[test]
    fn test_pull_fast_forwards() {
        let local_dir = tempdir().unwrap();
        let remote_dir = tempdir().unwrap();
        let mut local = init(local_dir.path()).unwrap();
        let mut remote = init(remote_dir.path()).unwrap();
        add_remote(&mut local, "origin", remote.repo.path()).unwrap();

        let theirs = commit_file(&mut remote, "r", "remote file");
        remote.save().unwrap();

        let outcome = pull(&mut local, "origin", "master").unwrap();
        assert_eq!(outcome, MergeOutcome::FastForward { head: theirs });
        assert_eq!(local.workspace.read("r").unwrap(), b"remote file");
    }

    #[test]
    fn test_pull_merges_diverged_history() {
        let local_dir = tempdir().unwrap();
        let remote_dir = tempdir().unwrap();
        let mut local = init(local_dir.path()).unwrap();
        let mut remote = init(remote_dir.path()).unwrap();
        add_remote(&mut local, "origin", remote.repo.path()).unwrap();

        commit_file(&mut remote, "r", "remote file");
        remote.save().unwrap();
        commit_file(&mut local, "l", "local file");

        let outcome = pull(&mut local, "origin", "master").unwrap();
        assert!(matches!(outcome, MergeOutcome::Merged { conflict: false, .. }));

        let merged = local.head_commit().unwrap();
        assert_eq!(merged.message, "Merged origin/master into master.");
        let tree = local.head_tree().unwrap();
        assert_eq!(tree.paths().collect::<Vec<_>>(), vec!["l", "r"]);
    }
}
