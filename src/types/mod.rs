mod commit;
mod tree;

pub use commit::Commit;
pub use tree::{validate_path, Tree};
