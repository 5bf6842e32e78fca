use std::fmt;

use chrono::{DateTime, Local};

use crate::error::{Error, Result};
use crate::graph::walk_first_parent;
use crate::hash::Hash;
use crate::session::Session;
use crate::types::Commit;

/// commit with its hash for log output
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub hash: Hash,
    pub commit: Commit,
}

/// history of the active branch, newest first, following first parents
pub fn log(session: &Session) -> Result<Vec<LogEntry>> {
    walk_first_parent(&session.repo, session.head())
        .map(|r| r.map(|(hash, commit)| LogEntry { hash, commit }))
        .collect()
}

/// every commit this repository knows about, in id order
pub fn global_log(session: &Session) -> Result<Vec<LogEntry>> {
    Ok(session
        .history
        .load_commits(&session.repo)?
        .into_iter()
        .map(|(hash, commit)| LogEntry { hash, commit })
        .collect())
}

/// ids of commits whose message contains `needle`
pub fn find(session: &Session, needle: &str) -> Result<Vec<Hash>> {
    let found = session.history.find_by_message(&session.repo, needle)?;
    if found.is_empty() {
        return Err(Error::NoCommitWithMessage(needle.to_string()));
    }
    Ok(found)
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===")?;
        writeln!(f, "commit {}", self.hash)?;
        if let (Some(first), Some(second)) = (self.commit.parent(), self.commit.second_parent()) {
            writeln!(f, "Merge: {} {}", first.short(), second.short())?;
        }
        writeln!(f, "Date: {}", format_timestamp(self.commit.timestamp))?;
        writeln!(f, "{}", self.commit.message)?;
        writeln!(f)
    }
}

/// e.g. "Thu Nov 9 20:00:05 2017 -0800", in local time
fn format_timestamp(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string(),
        None => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::INITIAL_MESSAGE;
    use crate::ops::{add, commit, init};
    use tempfile::tempdir;

    fn session_with_commits(messages: &[&str]) -> (tempfile::TempDir, Session, Vec<Hash>) {
        let dir = tempdir().unwrap();
        let mut session = init(dir.path()).unwrap();
        let mut ids = vec![session.head()];
        for (i, message) in messages.iter().enumerate() {
            session
                .workspace
                .write("f.txt", format!("v{}", i).as_bytes())
                .unwrap();
            add(&mut session, "f.txt").unwrap();
            ids.push(commit(&mut session, message).unwrap());
        }
        (dir, session, ids)
    }

    #[test]
    fn test_log_newest_first() {
        let (_dir, session, ids) = session_with_commits(&["first", "second"]);

        let entries = log(&session).unwrap();
        let hashes: Vec<Hash> = entries.iter().map(|e| e.hash).collect();
        assert_eq!(hashes, vec![ids[2], ids[1], ids[0]]);
        assert_eq!(entries[2].commit.message, INITIAL_MESSAGE);
    }

    #[test]
    fn test_global_log_includes_everything() {
        let (_dir, session, ids) = session_with_commits(&["a", "b", "c"]);

        let entries = global_log(&session).unwrap();
        assert_eq!(entries.len(), ids.len());
        for id in &ids {
            assert!(entries.iter().any(|e| e.hash == *id));
        }
    }

    #[test]
    fn test_find() {
        let (_dir, session, ids) = session_with_commits(&["fix bug", "add feature", "fix typo"]);

        let mut found = find(&session, "fix").unwrap();
        found.sort();
        let mut expected = vec![ids[1], ids[3]];
        expected.sort();
        assert_eq!(found, expected);

        assert!(matches!(
            find(&session, "nothing like this"),
            Err(Error::NoCommitWithMessage(_))
        ));
    }

    #[test]
    fn test_display_format() {
        let commit = Commit::with_timestamp(Hash::ZERO, vec![], 0, "hello");
        let entry = LogEntry {
            hash: commit.id(),
            commit,
        };
        let text = entry.to_string();

        assert!(text.starts_with(&format!("===\ncommit {}\nDate: ", entry.hash)));
        assert!(text.ends_with("\nhello\n\n"));
        assert!(!text.contains("Merge:"));
    }

    #[test]
    fn test_display_merge_line() {
        let a = Hash::from_bytes([0xaa; 32]);
        let b = Hash::from_bytes([0xbb; 32]);
        let commit = Commit::with_timestamp(Hash::ZERO, vec![a, b], 0, "merged");
        let entry = LogEntry {
            hash: commit.id(),
            commit,
        };

        assert!(entry.to_string().contains("\nMerge: aaaaaaa bbbbbbb\n"));
    }
}
