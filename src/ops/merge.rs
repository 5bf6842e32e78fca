//! merging another branch into the active one
//!
//! the merge base comes from walking both branches' ancestry lists, not
//! from a textbook lowest-common-ancestor search. with several merge bases
//! the chosen one is the candidate closest to the current head, measured
//! along parent links.

use std::collections::BTreeSet;

use crate::branch::Branch;
use crate::error::{Error, Result};
use crate::graph::create_commit;
use crate::hash::Hash;
use crate::object::{read_blob, read_commit, write_blob};
use crate::ops::checkout::{check_untracked_in_the_way, replace_working_tree};
use crate::repo::Repo;
use crate::session::Session;
use crate::stage::load_stage;
use crate::types::Tree;

/// how a merge finished; conflicts are not errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// the active branch only moved forward to `head`
    FastForward { head: Hash },
    /// a two-parent commit was created
    Merged { commit: Hash, conflict: bool },
}

/// what to do with one path during a three-way merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// stage the target branch's version
    Take(Hash),
    /// stop tracking the path
    Remove,
    /// both sides changed it differently
    Conflict {
        current: Option<Hash>,
        target: Option<Hash>,
    },
}

/// merge branch `name` into the active branch
pub fn merge(session: &mut Session, name: &str) -> Result<MergeOutcome> {
    if !session.stage.is_clean() {
        return Err(Error::UncommittedChanges);
    }
    let target = session.read_branch(name)?;
    if target.name == session.branch.name {
        return Err(Error::MergeWithSelf);
    }

    let target_tree = session.tree_of(&target.head)?;
    check_untracked_in_the_way(session, &target_tree)?;

    let split = find_split_point(&session.repo, &session.branch, &target)?;
    tracing::debug!(split = %split.short(), target = name, "found split point");

    if split == session.head() {
        replace_working_tree(session, &target_tree)?;
        session.stage = load_stage(&session.repo, &target)?;
        session.branch.copy_from(&target);
        tracing::info!(branch = %session.branch.name, head = %target.head.short(), "fast-forwarded");
        return Ok(MergeOutcome::FastForward { head: target.head });
    }
    if split == target.head {
        return Err(Error::AlreadyUpToDate);
    }

    let split_tree = session.tree_of(&split)?;
    let current_tree = session.head_tree()?;
    let plan = plan_merge(&split_tree, &current_tree, &target_tree);

    let mut conflict = false;
    for (path, action) in &plan {
        tracing::debug!(path = %path, ?action, "merge action");
        match *action {
            MergeAction::Take(hash) => {
                let content = read_blob(&session.repo, &hash)?;
                session.workspace.write(path, &content)?;
                session.stage.stage_blob(path, hash);
            }
            MergeAction::Remove => {
                session.stage.unstage_and_remove(path, &session.workspace)?;
            }
            MergeAction::Conflict { current, target } => {
                let content = conflict_markers(&session.repo, current, target)?;
                session.workspace.write(path, &content)?;
                let hash = write_blob(&session.repo, &content)?;
                session.stage.stage_blob(path, hash);
                conflict = true;
            }
        }
    }

    let tree = session.stage.fold_into_snapshot(&session.repo)?;
    let message = format!("Merged {} into {}.", target.name, session.branch.name);
    let head = session.head();
    let (commit, _) = create_commit(
        &session.repo,
        &mut session.history,
        tree,
        &message,
        Some(&head),
        Some(&target.head),
    )?;
    session.branch.advance(commit);

    tracing::info!(commit = %commit.short(), conflict, "{}", message);
    Ok(MergeOutcome::Merged { commit, conflict })
}

/// classify every path any of the three snapshots mentions
///
/// paths needing no change are omitted.
pub fn plan_merge(split: &Tree, current: &Tree, target: &Tree) -> Vec<(String, MergeAction)> {
    let paths: BTreeSet<&str> = split
        .paths()
        .chain(current.paths())
        .chain(target.paths())
        .collect();

    let mut plan = Vec::new();
    for path in paths {
        let s = split.get(path);
        let c = current.get(path);
        let t = target.get(path);

        let action = if c == t || s == t {
            None
        } else if s == c {
            Some(match t {
                Some(hash) => MergeAction::Take(*hash),
                None => MergeAction::Remove,
            })
        } else {
            Some(MergeAction::Conflict {
                current: c.copied(),
                target: t.copied(),
            })
        };

        if let Some(action) = action {
            plan.push((path.to_string(), action));
        }
    }
    plan
}

/// both versions between markers; an absent side is empty
fn conflict_markers(repo: &Repo, current: Option<Hash>, target: Option<Hash>) -> Result<Vec<u8>> {
    let side = |hash: Option<Hash>| match hash {
        Some(h) => read_blob(repo, &h),
        None => Ok(Vec::new()),
    };

    let mut content = b"<<<<<<< HEAD\n".to_vec();
    content.extend(side(current)?);
    content.extend_from_slice(b"=======\n");
    content.extend(side(target)?);
    content.extend_from_slice(b">>>>>>>\n");
    Ok(content)
}

/// the commit both branches diverged from
///
/// walks the two ancestry lists in step. matching positions move the split
/// point forward; past the divergence, a commit one branch holds that the
/// other head descends from becomes a candidate, and the candidate nearest
/// the current head wins.
pub fn find_split_point(repo: &Repo, current: &Branch, target: &Branch) -> Result<Hash> {
    let mut split = current.commits.first().copied().unwrap_or(current.head);
    let mut min_distance = usize::MAX;

    let current_head = read_commit(repo, &current.head)?;
    let target_head = read_commit(repo, &target.head)?;

    let shared = current.len().min(target.len());
    for i in 1..shared {
        let ours = current.commits[i];
        let theirs = target.commits[i];

        if ours == theirs {
            split = ours;
            continue;
        }

        if target_head.is_ancestor(&ours) {
            let d = distance(repo, &ours, current.head, current, target)?;
            if d < min_distance {
                split = ours;
                min_distance = d;
            }
        }
        if current_head.is_ancestor(&theirs) {
            let d = distance(repo, &theirs, current.head, current, target)?;
            if d < min_distance {
                split = theirs;
                min_distance = d;
            }
        }
    }
    Ok(split)
}

/// steps from `to` back to `from`, preferring second parents
///
/// once both commits sit on the same ancestry list the remaining distance
/// is their gap on it. unreachable pairs cost more than any real path.
fn distance(repo: &Repo, from: &Hash, to: Hash, current: &Branch, target: &Branch) -> Result<usize> {
    let unreachable = current.len() + target.len();
    let mut to = to;
    let mut steps = 0;

    loop {
        let list = if current.contains(&to) { current } else { target };
        if let Some(from_pos) = list.position(from) {
            return Ok(match list.position(&to) {
                Some(to_pos) if to_pos >= from_pos => steps + (to_pos - from_pos),
                _ => steps + unreachable,
            });
        }

        let commit = read_commit(repo, &to)?;
        match commit.second_parent().or(commit.parent()) {
            Some(next) => {
                to = *next;
                steps += 1;
            }
            None => return Ok(steps + unreachable),
        }
    }
}
