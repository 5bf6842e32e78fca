//! CBOR records for the mutable parts of a repository (branches, stages, history)

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::fs::write_atomic;

/// read a CBOR record, `None` if the file does not exist
pub fn read_record<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let value: T = ciborium::from_reader(&bytes[..])?;
    Ok(Some(value))
}

/// write a CBOR record atomically
pub fn write_record<T: Serialize>(tmp_dir: &Path, path: &Path, value: &T) -> Result<()> {
    let mut bytes = Vec::new();
    ciborium::into_writer(value, &mut bytes)?;
    write_atomic(tmp_dir, path, &bytes)
}

/// remove a record; returns false if it did not exist
pub fn remove_record(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn test_record_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rec");

        let mut value = BTreeMap::new();
        value.insert("k".to_string(), vec![1u32, 2, 3]);

        write_record(&dir.path().join("tmp"), &path, &value).unwrap();
        let read: Option<BTreeMap<String, Vec<u32>>> = read_record(&path).unwrap();
        assert_eq!(read, Some(value));
    }

    #[test]
    fn test_missing_record() {
        let dir = tempdir().unwrap();
        let read: Option<String> = read_record(&dir.path().join("absent")).unwrap();
        assert!(read.is_none());
        assert!(!remove_record(&dir.path().join("absent")).unwrap());
    }

    #[test]
    fn test_remove_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rec");
        write_record(&dir.path().join("tmp"), &path, &"x").unwrap();
        assert!(remove_record(&path).unwrap());
        assert!(!path.exists());
    }
}
