use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::config::StorageBackend;
use super::constants::{
    ENV_CATALOG_CACHE_MAX_ENTRIES, ENV_CONFIG, ENV_DEBUG, ENV_HOST, ENV_PORT, ENV_RESERVED_TAGS,
    ENV_STORAGE_BACKEND, ENV_TAG_FILTER,
};
use crate::domain::metrics::TagFilterMode;

#[derive(Parser)]
#[command(name = "sysmetric")]
#[command(version, about = "Telegraf system metric collector", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug mode (writes accepted Telegraf payloads to debug folder)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Metric storage backend (memory or duckdb)
    #[arg(long, global = true, env = ENV_STORAGE_BACKEND, value_parser = parse_storage_backend)]
    pub storage: Option<StorageBackend>,

    /// Reserved tag keys, comma separated (default: host)
    #[arg(long, global = true, env = ENV_RESERVED_TAGS, value_delimiter = ',')]
    pub reserved_tags: Option<Vec<String>>,

    /// Tag filter mode (exclude or include)
    #[arg(long, global = true, env = ENV_TAG_FILTER, value_parser = parse_tag_filter)]
    pub tag_filter: Option<TagFilterMode>,

    /// Maximum catalog cache entries (0 disables the cache)
    #[arg(long, global = true, env = ENV_CATALOG_CACHE_MAX_ENTRIES)]
    pub catalog_cache_max_entries: Option<u64>,
}

/// Parse storage backend from CLI/env string
fn parse_storage_backend(s: &str) -> Result<StorageBackend, String> {
    match s.to_lowercase().as_str() {
        "memory" => Ok(StorageBackend::Memory),
        "duckdb" => Ok(StorageBackend::Duckdb),
        _ => Err(format!(
            "Invalid storage backend '{}'. Valid options: memory, duckdb",
            s
        )),
    }
}

/// Parse tag filter mode from CLI/env string
fn parse_tag_filter(s: &str) -> Result<TagFilterMode, String> {
    match s.to_lowercase().as_str() {
        "exclude" => Ok(TagFilterMode::Exclude),
        "include" => Ok(TagFilterMode::Include),
        _ => Err(format!(
            "Invalid tag filter '{}'. Valid options: exclude, include",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub storage: Option<StorageBackend>,
    pub reserved_tags: Option<Vec<String>>,
    pub tag_filter: Option<TagFilterMode>,
    pub catalog_cache_max_entries: Option<u64>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        debug: cli.debug,
        config: cli.config,
        storage: cli.storage,
        reserved_tags: cli.reserved_tags,
        tag_filter: cli.tag_filter,
        catalog_cache_max_entries: cli.catalog_cache_max_entries,
    };
    (config, cli.command)
}
