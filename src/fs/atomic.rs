use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{IoResultExt, Result};

/// write bytes to `dest` atomically: temp -> fsync -> rename -> fsync parent
///
/// the temp file is created in `tmp_dir`, which must live on the same
/// filesystem as `dest` for the rename to be atomic.
pub fn write_atomic(tmp_dir: &Path, dest: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }
    fs::create_dir_all(tmp_dir).with_path(tmp_dir)?;

    let tmp_path = tmp_dir.join(uuid::Uuid::new_v4().to_string());
    {
        let mut tmp_file = File::create(&tmp_path).with_path(&tmp_path)?;
        tmp_file.write_all(bytes).with_path(&tmp_path)?;
        tmp_file.sync_all().with_path(&tmp_path)?;
    }

    fs::rename(&tmp_path, dest).with_path(dest)?;

    if let Some(parent) = dest.parent() {
        fsync_dir(parent)?;
    }

    Ok(())
}

/// fsync a directory so a rename into it is durable
pub fn fsync_dir(path: &Path) -> Result<()> {
    let dir = File::open(path).with_path(path)?;
    dir.sync_all().with_path(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_creates_parents() {
        let dir = tempdir().unwrap();
        let tmp = dir.path().join("tmp");
        let dest = dir.path().join("a/b/c.bin");

        write_atomic(&tmp, &dest, b"payload").unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"payload");
        // temp file was renamed away
        assert_eq!(fs::read_dir(&tmp).unwrap().count(), 0);
    }

    #[test]
    fn test_write_atomic_replaces() {
        let dir = tempdir().unwrap();
        let tmp = dir.path().join("tmp");
        let dest = dir.path().join("file");

        write_atomic(&tmp, &dest, b"one").unwrap();
        write_atomic(&tmp, &dest, b"two").unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"two");
    }
}
