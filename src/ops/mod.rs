//! high-level operations on a twig session, one per user command

mod add;
mod branch;
mod checkout;
mod commit;
mod init;
mod log;
mod merge;
mod reset;
mod status;

pub use add::{add, rm};
pub use branch::{create_branch, remove_branch};
pub use checkout::{checkout_branch, checkout_file, checkout_file_at};
pub use commit::commit;
pub use init::{init, init_with_config};
pub use log::{find, global_log, log, LogEntry};
pub use merge::{find_split_point, merge, plan_merge, MergeAction, MergeOutcome};
pub use reset::reset;
pub use status::{status, Modification, StatusReport};
