//! twig - a single-user, local version control engine
//!
//! a content-addressed object store with an immutable commit graph on top,
//! a per-branch staging area, named branches, and a three-way merge.
//!
//! # Core concepts
//!
//! - **Blob**: the bytes of one file version, stored raw
//! - **Tree**: a snapshot mapping tracked paths to blobs (CBOR + zstd)
//! - **Commit**: a tree plus message, timestamp, up to two parents, and the
//!   full set of its ancestors (CBOR + zstd)
//! - **Branch**: a named head plus every commit the branch has pointed at
//! - **Stage**: pending additions and removals for the next commit
//!
//! # Hash format
//!
//! blob hash = SHA256(content)
//!
//! tree hash = SHA256("tree" | entry_count | (path_len | path | blob_hash)...)
//!
//! commit hash = SHA256("commit" | tree_hash | message_len | message)
//!
//! parents and timestamp are not part of a commit's identity: two commits
//! with the same tree and message share one id, and the first one stored wins.
//!
//! # Example usage
//!
//! ```no_run
//! use twig::{ops, Session};
//! use std::path::Path;
//!
//! let mut session = ops::init(Path::new("/path/to/work")).unwrap();
//! session.workspace.write("hello.txt", b"hello").unwrap();
//! ops::add(&mut session, "hello.txt").unwrap();
//! ops::commit(&mut session, "say hello").unwrap();
//! session.save().unwrap();
//!
//! // later, in another process
//! let session = Session::open(Path::new("/path/to/work")).unwrap();
//! for entry in ops::log(&session).unwrap() {
//!     print!("{}", entry);
//! }
//! ```

mod branch;
mod config;
mod error;
mod graph;
mod hash;
mod history;
mod object;
mod repo;
mod session;
mod stage;
mod workspace;

pub mod fs;
pub mod ops;
pub mod transport;
pub mod types;

pub use branch::{
    advance_branch, branch_exists, create_branch, delete_branch, list_branches, read_branch,
    read_head, validate_branch_name, write_branch, write_head, Branch,
};
pub use config::{Config, Remote, DEFAULT_BRANCH};
pub use error::{Error, ErrorKind, Result};
pub use graph::{
    ancestors_of, create_commit, create_initial_commit, is_ancestor, walk_first_parent,
    FirstParentWalk, INITIAL_MESSAGE,
};
pub use hash::{compute_blob_hash, compute_commit_hash, compute_tree_hash, Hash};
pub use history::History;
pub use object::{
    blob_exists, commit_exists, read_blob, read_commit, read_tree, tree_exists, write_blob,
    write_commit, write_tree,
};
pub use repo::{Repo, REPO_DIR};
pub use session::Session;
pub use stage::{delete_stage, load_stage, read_stage, write_stage, StagingArea};
pub use types::{Commit, Tree};
pub use workspace::Workspace;
