use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::CatalogCacheConfig;
use crate::domain::metrics::{HOST_TAG, TagFilter, TagFilterMode};
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_CATALOG_CACHE_MAX_ENTRIES,
    DEFAULT_CATALOG_CACHE_TTL_SECS, DEFAULT_HOST, DEFAULT_PORT,
};

// =============================================================================
// Storage Backend Enum
// =============================================================================

/// Where samples and catalogs are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    Duckdb,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::Duckdb => write!(f, "duckdb"),
        }
    }
}

// =============================================================================
// File Config Structs (JSON config file sections)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Ingest configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct IngestFileConfig {
    pub reserved_tags: Option<Vec<String>>,
    pub tag_filter: Option<TagFilterMode>,
}

/// Catalog cache configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CatalogCacheFileConfig {
    pub max_entries: Option<u64>,
    pub ttl_secs: Option<u64>,
}

/// Database configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    /// Storage backend: duckdb (default) or memory
    pub backend: Option<StorageBackend>,
    pub catalog_cache: Option<CatalogCacheFileConfig>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub ingest: Option<IngestFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(ingest) = other.ingest {
            let current = self.ingest.get_or_insert_with(IngestFileConfig::default);
            if ingest.reserved_tags.is_some() {
                tracing::trace!(reserved_tags = ?ingest.reserved_tags, "Merging ingest.reserved_tags");
                current.reserved_tags = ingest.reserved_tags;
            }
            if ingest.tag_filter.is_some() {
                tracing::trace!(tag_filter = ?ingest.tag_filter, "Merging ingest.tag_filter");
                current.tag_filter = ingest.tag_filter;
            }
        }

        if let Some(database) = other.database {
            let current = self.database.get_or_insert_with(DatabaseFileConfig::default);
            if database.backend.is_some() {
                tracing::trace!(backend = ?database.backend, "Merging database.backend");
                current.backend = database.backend;
            }
            if let Some(cache) = database.catalog_cache {
                let current_cache = current
                    .catalog_cache
                    .get_or_insert_with(CatalogCacheFileConfig::default);
                if cache.max_entries.is_some() {
                    tracing::trace!(max_entries = ?cache.max_entries, "Merging database.catalog_cache.max_entries");
                    current_cache.max_entries = cache.max_entries;
                }
                if cache.ttl_secs.is_some() {
                    tracing::trace!(ttl_secs = ?cache.ttl_secs, "Merging database.catalog_cache.ttl_secs");
                    current_cache.ttl_secs = cache.ttl_secs;
                }
            }
        }

        if other.debug.is_some() {
            tracing::trace!(debug = ?other.debug, "Merging debug");
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Ingest configuration
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub reserved_tags: Vec<String>,
    pub tag_filter: TagFilterMode,
}

impl IngestConfig {
    pub fn tag_filter(&self) -> TagFilter {
        TagFilter::new(self.tag_filter, self.reserved_tags.iter().cloned())
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    /// `None` when the cache is disabled (max_entries = 0)
    pub catalog_cache: Option<CatalogCacheConfig>,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ingest: IngestConfig,
    pub database: DatabaseConfig,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.sysmetric/sysmetric.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.sysmetric/sysmetric.json) - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::from_layers(cli, file_config);
        config.validate()?;

        tracing::debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }

    /// Layer defaults -> file config -> CLI/env overrides
    fn from_layers(cli: &CliConfig, file_config: FileConfig) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_ingest = file_config.ingest.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_cache = file_database.catalog_cache.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let reserved_tags = cli
            .reserved_tags
            .clone()
            .or(file_ingest.reserved_tags)
            .unwrap_or_else(|| vec![HOST_TAG.to_string()])
            .into_iter()
            .map(|t| t.trim().to_string())
            .collect();

        let tag_filter = cli
            .tag_filter
            .or(file_ingest.tag_filter)
            .unwrap_or_default();

        let backend = cli.storage.or(file_database.backend).unwrap_or_default();

        let max_entries = cli
            .catalog_cache_max_entries
            .or(file_cache.max_entries)
            .unwrap_or(DEFAULT_CATALOG_CACHE_MAX_ENTRIES);
        let ttl_secs = file_cache
            .ttl_secs
            .unwrap_or(DEFAULT_CATALOG_CACHE_TTL_SECS);
        let catalog_cache = (max_entries > 0).then(|| CatalogCacheConfig {
            max_entries,
            ttl: Duration::from_secs(ttl_secs),
        });

        // debug: CLI flag enables, otherwise file config
        let debug = cli.debug || file_config.debug.unwrap_or(false);

        Self {
            server: ServerConfig { host, port },
            ingest: IngestConfig {
                reserved_tags,
                tag_filter,
            },
            database: DatabaseConfig {
                backend,
                catalog_cache,
            },
            debug,
        }
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port 0 would bind a random port Telegraf cannot be pointed at
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.ingest.reserved_tags.is_empty() {
            anyhow::bail!("Configuration error: ingest.reserved_tags must not be empty");
        }
        if self.ingest.reserved_tags.iter().any(|t| t.is_empty()) {
            anyhow::bail!("Configuration error: ingest.reserved_tags must not contain empty keys");
        }

        if let Some(cache) = &self.database.catalog_cache
            && cache.ttl.is_zero()
        {
            anyhow::bail!(
                "Configuration error: database.catalog_cache.ttl_secs must be greater than 0"
            );
        }

        Ok(())
    }
}

/// Get the profile config path (~/.sysmetric/sysmetric.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}
