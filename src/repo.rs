use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, IoResultExt, Result};

/// name of the repository directory inside a working tree
pub const REPO_DIR: &str = ".twig";

const CONFIG_FILE: &str = "config.toml";

// directories created by init, relative to the repository
const LAYOUT: &[&str] = &[
    "objects/blobs",
    "objects/trees",
    "objects/commits",
    "branches",
    "stage",
    "tmp",
];

/// a twig repository directory (the `.twig` directory, not the working tree)
///
/// one process at a time: there is no locking, concurrent invocations
/// against the same repository are unsafe.
pub struct Repo {
    path: PathBuf,
    config: Config,
}

impl Repo {
    /// initialize a new repository at the given path
    pub fn init(path: &Path) -> Result<Self> {
        Self::init_with_config(path, Config::default())
    }

    /// initialize a new repository with an explicit configuration
    pub fn init_with_config(path: &Path, config: Config) -> Result<Self> {
        let repo = Self {
            path: path.to_path_buf(),
            config,
        };
        if repo.config_path().exists() {
            return Err(Error::RepoExists(repo.path));
        }

        for dir in LAYOUT {
            let full = repo.path.join(dir);
            std::fs::create_dir_all(&full).with_path(&full)?;
        }
        repo.save_config()?;
        Ok(repo)
    }

    /// open an existing repository; `NoRepo` unless `config.toml` is present
    pub fn open(path: &Path) -> Result<Self> {
        let config_path = path.join(CONFIG_FILE);
        if !config_path.is_file() {
            return Err(Error::NoRepo(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            config: Config::load(&config_path)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// changes stay in memory until `save_config`
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn save_config(&self) -> Result<()> {
        self.config.save(&self.config_path())
    }

    pub fn config_path(&self) -> PathBuf {
        self.path.join(CONFIG_FILE)
    }

    pub fn objects_path(&self) -> PathBuf {
        self.path.join("objects")
    }

    /// raw file contents, sharded by the first hash byte
    pub fn blobs_path(&self) -> PathBuf {
        self.objects_path().join("blobs")
    }

    pub fn trees_path(&self) -> PathBuf {
        self.objects_path().join("trees")
    }

    pub fn commits_path(&self) -> PathBuf {
        self.objects_path().join("commits")
    }

    /// one CBOR record per branch, nested for names like `origin/master`
    pub fn branches_path(&self) -> PathBuf {
        self.path.join("branches")
    }

    /// path to per-branch staging records
    pub fn stage_path(&self) -> PathBuf {
        self.path.join("stage")
    }

    /// path to the global history record
    pub fn history_path(&self) -> PathBuf {
        self.path.join("history")
    }

    /// path to the file naming the active branch
    pub fn head_path(&self) -> PathBuf {
        self.path.join("HEAD")
    }

    /// staging ground for atomic writes; must share a filesystem with the rest
    pub fn tmp_path(&self) -> PathBuf {
        self.path.join("tmp")
    }
}
