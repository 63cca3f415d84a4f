//! Platform-aware data storage directory management
//!
//! ## Platform Paths
//!
//! | Type | Windows | macOS | Linux |
//! |------|---------|-------|-------|
//! | Data | `%APPDATA%\Sysmetric\` | `~/Library/Application Support/Sysmetric/` | `$XDG_DATA_HOME/sysmetric/` |
//!
//! `SYSMETRIC_DATA_DIR` overrides the platform default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use super::config::{AppConfig, StorageBackend};
use super::constants::{APP_DOT_FOLDER, APP_NAME, ENV_DATA_DIR};
use crate::utils::file::expand_path;

/// Data subdirectories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSubdir {
    Duckdb,
    Debug,
}

impl DataSubdir {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DataSubdir::Duckdb => "duckdb",
            DataSubdir::Debug => "debug",
        }
    }
}

/// Application storage manager
#[derive(Debug, Clone)]
pub struct AppStorage {
    data_dir: PathBuf,
}

impl AppStorage {
    /// Initialize storage with platform-appropriate data directory
    pub async fn init(config: &AppConfig) -> Result<Self> {
        let data_dir = Self::resolve_data_dir();

        let duckdb = config.database.backend == StorageBackend::Duckdb;
        Self::ensure_directories(&data_dir, duckdb, config.debug).await?;

        // Canonicalize after creation so the path exists
        let data_dir = data_dir.canonicalize().unwrap_or(data_dir);

        tracing::debug!(data_dir = %data_dir.display(), "Storage initialized");

        if config.debug {
            let debug_path = data_dir.join(DataSubdir::Debug.as_str());
            tracing::warn!(path = %debug_path.display(), "Debug mode enabled");
        }

        Ok(Self { data_dir })
    }

    /// Resolve data directory from env var or platform default
    pub fn resolve_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            return expand_path(&dir);
        }

        if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            return proj_dirs.data_dir().to_path_buf();
        }

        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        cwd.join(APP_DOT_FOLDER)
    }

    async fn ensure_directories(data_dir: &Path, duckdb: bool, debug: bool) -> Result<()> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let subdirs = [(DataSubdir::Duckdb, duckdb), (DataSubdir::Debug, debug)];
        for (subdir, wanted) in subdirs {
            if !wanted {
                continue;
            }
            let path = data_dir.join(subdir.as_str());
            tokio::fs::create_dir_all(&path).await.with_context(|| {
                format!(
                    "Failed to create {} directory: {}",
                    subdir.as_str(),
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get path to a subdirectory (canonicalized)
    pub fn subdir(&self, subdir: DataSubdir) -> PathBuf {
        let path = self.data_dir.join(subdir.as_str());
        path.canonicalize().unwrap_or(path)
    }

    /// Get path to a file within a subdirectory
    pub fn subdir_path(&self, subdir: DataSubdir, filename: &str) -> PathBuf {
        self.data_dir.join(subdir.as_str()).join(filename)
    }

    /// Create AppStorage for testing with a specific data directory
    #[cfg(test)]
    pub fn init_for_test(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_subdir_as_str() {
        assert_eq!(DataSubdir::Duckdb.as_str(), "duckdb");
        assert_eq!(DataSubdir::Debug.as_str(), "debug");
    }

    #[test]
    fn test_subdir_path() {
        let storage = AppStorage::init_for_test(PathBuf::from("/data"));
        assert_eq!(storage.data_dir(), Path::new("/data"));
        assert_eq!(
            storage.subdir_path(DataSubdir::Debug, "telegraf.jsonl"),
            PathBuf::from("/data/debug/telegraf.jsonl")
        );
    }

    #[tokio::test]
    async fn test_ensure_directories_debug_only_when_enabled() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("data");

        AppStorage::ensure_directories(&root, true, false)
            .await
            .unwrap();
        assert!(root.join("duckdb").is_dir());
        assert!(!root.join("debug").exists());

        AppStorage::ensure_directories(&root, true, true)
            .await
            .unwrap();
        assert!(root.join("debug").is_dir());
    }

    #[tokio::test]
    async fn test_ensure_directories_memory_backend() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("data");

        AppStorage::ensure_directories(&root, false, false)
            .await
            .unwrap();
        assert!(root.is_dir());
        assert!(!root.join("duckdb").exists());
    }

    #[test]
    fn test_resolve_data_dir_fallback() {
        // SAFETY: no other test touches this variable
        unsafe { std::env::remove_var(ENV_DATA_DIR) };
        let path = AppStorage::resolve_data_dir();
        assert!(!path.as_os_str().is_empty());
    }
}
