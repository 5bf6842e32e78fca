//! remotes: other repositories reachable through the local filesystem

mod fetch;
pub mod local;
mod push;
mod remote;

pub use fetch::{fetch, pull, FetchResult};
pub use local::{collect_missing, copy_objects, open_remote, ObjectSet, TransferStats};
pub use push::{push, PushResult};
pub use remote::{add_remote, remove_remote};
