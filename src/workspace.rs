//! the user's working directory: plain files addressed by tracked path

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};
use crate::hash::{compute_blob_hash, Hash};
use crate::repo::REPO_DIR;
use crate::types::validate_path;

/// a working tree rooted at `root`, with the repository in `root/.twig`
pub struct Workspace {
    root: PathBuf,
    ignore: Vec<glob::Pattern>,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore: Vec::new(),
        }
    }

    /// paths matching any of `patterns` are never listed
    pub fn with_ignore(mut self, patterns: Vec<glob::Pattern>) -> Self {
        self.ignore = patterns;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// the repository directory belonging to this working tree
    pub fn repo_path(&self) -> PathBuf {
        self.root.join(REPO_DIR)
    }

    /// on-disk location of a tracked path
    pub fn path_of(&self, path: &str) -> Result<PathBuf> {
        validate_path(path)?;
        if path.split('/').next() == Some(REPO_DIR) {
            return Err(Error::InvalidPath(format!("path inside the repository: {}", path)));
        }
        Ok(self.root.join(path))
    }

    pub fn exists(&self, path: &str) -> bool {
        self.path_of(path).map(|p| p.is_file()).unwrap_or(false)
    }

    /// file content; `FileNotFound` if absent
    pub fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.path_of(path)?;
        fs::read(&full).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_string())
            } else {
                Error::Io {
                    path: full,
                    source: e,
                }
            }
        })
    }

    /// overwrite (or create) a file, creating parent directories
    pub fn write(&self, path: &str, content: &[u8]) -> Result<()> {
        let full = self.path_of(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        fs::write(&full, content).with_path(&full)
    }

    /// delete a file if present; returns whether anything was removed
    pub fn remove(&self, path: &str) -> Result<bool> {
        let full = self.path_of(path)?;
        match fs::remove_file(&full) {
            Ok(()) => {
                self.prune_empty_dirs(&full);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::Io {
                path: full,
                source: e,
            }),
        }
    }

    /// blob identity of the file's current content, `None` if absent
    pub fn digest_of(&self, path: &str) -> Result<Option<Hash>> {
        match self.read(path) {
            Ok(content) => Ok(Some(compute_blob_hash(&content))),
            Err(Error::FileNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// every plain file in the working tree, as sorted relative paths
    ///
    /// the repository directory and ignored paths are skipped.
    pub fn files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| !(e.depth() == 1 && e.file_name() == REPO_DIR));

        for entry in walker {
            let entry = entry.map_err(|e| Error::Io {
                path: self.root.clone(),
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walkdir error")),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let path = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if self.is_ignored(&path) || validate_path(&path).is_err() {
                continue;
            }
            files.push(path);
        }

        files.sort();
        Ok(files)
    }

    fn is_ignored(&self, path: &str) -> bool {
        self.ignore.iter().any(|p| p.matches(path))
    }

    // best effort: leave directories that still hold something
    fn prune_empty_dirs(&self, removed: &Path) {
        let mut dir = removed.parent();
        while let Some(d) = dir {
            if d == self.root || fs::remove_dir(d).is_err() {
                break;
            }
            dir = d.parent();
        }
    }
}
