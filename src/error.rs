use std::path::PathBuf;

use crate::Hash;

/// error type for twig operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not in an initialized twig directory: {0}")]
    NoRepo(PathBuf),

    #[error("a twig repository already exists at {0}")]
    RepoExists(PathBuf),

    #[error("object not found: {0}")]
    ObjectNotFound(Hash),

    #[error("corrupt object: hash mismatch for {0}")]
    CorruptObject(Hash),

    #[error("no commit with id {0} exists")]
    CommitNotFound(String),

    #[error("commit id prefix {0} is ambiguous")]
    AmbiguousCommit(String),

    #[error("found no commit with message containing {0:?}")]
    NoCommitWithMessage(String),

    #[error("no such branch exists: {0}")]
    UnknownBranch(String),

    #[error("a branch with that name already exists: {0}")]
    BranchExists(String),

    #[error("cannot remove the current branch: {0}")]
    ActiveBranchDeletion(String),

    #[error("cannot fetch into the current branch: {0}")]
    FetchIntoActiveBranch(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("no need to checkout the current branch: {0}")]
    AlreadyOnBranch(String),

    #[error("please enter a commit message")]
    EmptyMessage,

    #[error("no changes added to the commit")]
    NothingToCommit,

    #[error("no reason to remove the file: {0}")]
    NothingToRemove(String),

    #[error("file does not exist: {0}")]
    FileNotFound(String),

    #[error("file does not exist in that commit: {0}")]
    FileNotInCommit(String),

    #[error("you have uncommitted changes")]
    UncommittedChanges,

    #[error("cannot merge a branch with itself")]
    MergeWithSelf,

    #[error("given branch is an ancestor of the current branch")]
    AlreadyUpToDate,

    #[error("there is an untracked file in the way; delete it, or add and commit it first: {0}")]
    UntrackedFileInTheWay(String),

    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    #[error("a remote with that name already exists: {0}")]
    RemoteExists(String),

    #[error("remote directory not found: {0}")]
    RemoteUnreachable(PathBuf),

    #[error("that remote does not have that branch: {0}")]
    RemoteBranchNotFound(String),

    #[error("please pull down remote changes before pushing")]
    PullRequired,

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid hash hex: {0}")]
    InvalidHashHex(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cbor serialization error: {0}")]
    CborEncode(#[from] ciborium::ser::Error<std::io::Error>),

    #[error("cbor deserialization error: {0}")]
    CborDecode(#[from] ciborium::de::Error<std::io::Error>),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("invalid ignore pattern: {0}")]
    IgnorePattern(#[from] glob::PatternError),
}

/// coarse classification of errors, used by callers that only need to know
/// whether a failure was a missing thing, a refused precondition, or a
/// working tree that would have been clobbered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PreconditionFailed,
    WorkingTreeConflict,
    Storage,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoRepo(_)
            | Error::ObjectNotFound(_)
            | Error::CommitNotFound(_)
            | Error::NoCommitWithMessage(_)
            | Error::UnknownBranch(_)
            | Error::FileNotFound(_)
            | Error::FileNotInCommit(_)
            | Error::RemoteNotFound(_)
            | Error::RemoteUnreachable(_)
            | Error::RemoteBranchNotFound(_) => ErrorKind::NotFound,

            Error::RepoExists(_)
            | Error::AmbiguousCommit(_)
            | Error::BranchExists(_)
            | Error::ActiveBranchDeletion(_)
            | Error::FetchIntoActiveBranch(_)
            | Error::InvalidBranchName(_)
            | Error::AlreadyOnBranch(_)
            | Error::EmptyMessage
            | Error::NothingToCommit
            | Error::NothingToRemove(_)
            | Error::UncommittedChanges
            | Error::MergeWithSelf
            | Error::AlreadyUpToDate
            | Error::RemoteExists(_)
            | Error::PullRequired
            | Error::InvalidPath(_)
            | Error::InvalidHashHex(_)
            | Error::IgnorePattern(_) => ErrorKind::PreconditionFailed,

            Error::UntrackedFileInTheWay(_) => ErrorKind::WorkingTreeConflict,

            Error::CorruptObject(_)
            | Error::Io { .. }
            | Error::CborEncode(_)
            | Error::CborDecode(_)
            | Error::Config(_)
            | Error::ConfigSerialize(_) => ErrorKind::Storage,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
