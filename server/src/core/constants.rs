// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "Sysmetric";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "sysmetric";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".sysmetric";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "sysmetric.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "SYSMETRIC_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "SYSMETRIC_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "SYSMETRIC_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "SYSMETRIC_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "SYSMETRIC_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8081;

/// Maximum accepted request body (after decompression)
pub const DEFAULT_BODY_LIMIT: usize = 16 * 1024 * 1024;

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "SYSMETRIC_DATA_DIR";

/// Environment variable for storage backend (memory or duckdb)
pub const ENV_STORAGE_BACKEND: &str = "SYSMETRIC_STORAGE_BACKEND";

// =============================================================================
// Environment Variables - Ingest
// =============================================================================

/// Environment variable for reserved tag keys (comma separated)
pub const ENV_RESERVED_TAGS: &str = "SYSMETRIC_RESERVED_TAGS";

/// Environment variable for tag filter mode (exclude or include)
pub const ENV_TAG_FILTER: &str = "SYSMETRIC_TAG_FILTER";

// =============================================================================
// Telegraf Ingestion
// =============================================================================

/// Header carrying the submitting application's name
pub const APPLICATION_NAME_HEADER: &str = "Application-Name";

/// Debug capture file for accepted Telegraf payloads
pub const DEBUG_TELEGRAF_FILE: &str = "telegraf.jsonl";

// =============================================================================
// DuckDB Database
// =============================================================================

/// DuckDB database filename
pub const DUCKDB_DB_FILENAME: &str = "sysmetric.duckdb";

/// DuckDB checkpoint interval in seconds (5 minutes)
pub const DUCKDB_CHECKPOINT_INTERVAL_SECS: u64 = 300;

/// DuckDB query timeout in seconds
pub const DUCKDB_QUERY_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Catalog Cache
// =============================================================================

/// Environment variable for catalog cache size (0 disables the cache)
pub const ENV_CATALOG_CACHE_MAX_ENTRIES: &str = "SYSMETRIC_CATALOG_CACHE_MAX_ENTRIES";

/// Default catalog cache size
pub const DEFAULT_CATALOG_CACHE_MAX_ENTRIES: u64 = 100_000;

/// Default catalog cache entry lifetime in seconds
pub const DEFAULT_CATALOG_CACHE_TTL_SECS: u64 = 3600;

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum time to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
