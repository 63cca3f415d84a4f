//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, CliConfig};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::MetricsBackend;
use crate::domain::IngestService;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub backend: Arc<MetricsBackend>,
    pub ingest: IngestService,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config).await?;
        Self::start_server(app).await
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init(&config).await?;

        let backend = Arc::new(
            MetricsBackend::init(&config.database, &storage)
                .await
                .context("Failed to initialize metric storage")?,
        );

        let filter = Arc::new(config.ingest.tag_filter());
        tracing::debug!(
            mode = %filter.mode(),
            reserved = ?filter.reserved().collect::<Vec<_>>(),
            "Tag filter configured"
        );

        let sinks = backend.sinks(config.database.catalog_cache);
        let ingest = IngestService::new(filter, sinks);
        let shutdown = ShutdownService::new(Arc::clone(&backend));

        Ok(Self {
            shutdown,
            config,
            storage,
            backend,
            ingest,
        })
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        banner::print_banner(&app.config, &app.storage.data_dir().display().to_string());

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    pub async fn start_background_tasks(&self) {
        if let Some(handle) = self
            .backend
            .start_checkpoint_task(self.shutdown.subscribe())
        {
            self.shutdown.register(handle).await;
        }

        tracing::debug!(backend = self.backend.name(), "Background tasks started");
    }
}
