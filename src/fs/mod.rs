mod atomic;
mod record;

pub use atomic::{fsync_dir, write_atomic};
pub use record::{read_record, remove_record, write_record};
