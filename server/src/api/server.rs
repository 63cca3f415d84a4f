//! API server initialization

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware;
use super::routes::{health, telegraf};
use crate::core::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::core::storage::DataSubdir;
use crate::domain::IngestService;

/// Full router: Telegraf ingestion, health, 404 fallback.
///
/// Gzip request bodies are inflated before the JSON extractor sees them and
/// the body limit applies to the inflated size.
pub fn build_router(ingest: IngestService, debug_path: Option<PathBuf>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::health))
        .merge(telegraf::routes(ingest, debug_path))
        .fallback(middleware::handle_404)
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        .layer(RequestDecompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let app = self.app;
        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(
            host.parse()
                .with_context(|| format!("Invalid server host: {}", host))?,
            port,
        );

        // Directory is created by AppStorage when debug is on
        let debug_path = app
            .config
            .debug
            .then(|| app.storage.subdir(DataSubdir::Debug));

        let router = build_router(app.ingest.clone(), debug_path);

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!(%addr, "Listening for Telegraf batches");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::core::constants::APPLICATION_NAME_HEADER;
    use crate::data::{MemoryBackend, MetricsBackend};
    use crate::domain::metrics::{SampleValue, Tag, TagFilter};

    const CPU_BATCH: &str = r#"{"metrics":[{"name":"cpu","tags":{"host":"h1","region":"us"},"fields":{"usage":42,"idle":57.5,"state":"ok"},"timestamp":1000}]}"#;

    fn memory_router(debug_path: Option<PathBuf>) -> (Router, Arc<MemoryBackend>) {
        let memory = Arc::new(MemoryBackend::new());
        let backend = MetricsBackend::Memory(Arc::clone(&memory));
        let ingest = IngestService::new(Arc::new(TagFilter::default()), backend.sinks(None));
        (build_router(ingest, debug_path), memory)
    }

    fn telegraf_request(application_name: Option<&str>, body: impl Into<Body>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/telegraf")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(name) = application_name {
            builder = builder.header(APPLICATION_NAME_HEADER, name);
        }
        builder.body(body.into()).unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    /// Gzip member holding one stored (uncompressed) deflate block
    fn gzip_stored(data: &[u8]) -> Vec<u8> {
        fn crc32(data: &[u8]) -> u32 {
            let mut crc = 0xFFFF_FFFFu32;
            for &byte in data {
                crc ^= byte as u32;
                for _ in 0..8 {
                    let mask = (crc & 1).wrapping_neg();
                    crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
                }
            }
            !crc
        }

        let len = data.len() as u16;
        let mut out = vec![0x1f, 0x8b, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0xff];
        out.push(0x01);
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&(!len).to_le_bytes());
        out.extend_from_slice(data);
        out.extend_from_slice(&crc32(data).to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = memory_router(None);
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_telegraf_accepts_batch() {
        let (router, memory) = memory_router(None);
        let response = router
            .oneshot(telegraf_request(Some("billing"), CPU_BATCH))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.is_empty());

        let long = memory.store.long_samples();
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].application_name, "billing");
        assert_eq!(long[0].record.host, "h1");
        assert_eq!(long[0].record.field_name, "usage");
        assert_eq!(long[0].record.timestamp_millis, 1_000_000);
        assert_eq!(&*long[0].record.tags, &[Tag::new("region", "us")]);
        assert_eq!(long[0].value, 42);

        let double = memory.store.double_samples();
        assert_eq!(double.len(), 1);
        assert_eq!(double[0].record.value, SampleValue::Float(57.5));

        assert_eq!(memory.data_types.len(), 2);
        assert_eq!(memory.tags.len(), 2);
    }

    #[tokio::test]
    async fn test_telegraf_accepts_gzip_body() {
        let (router, memory) = memory_router(None);
        let mut request = telegraf_request(Some("billing"), gzip_stored(CPU_BATCH.as_bytes()));
        request
            .headers_mut()
            .insert(header::CONTENT_ENCODING, "gzip".parse().unwrap());

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(memory.store.len(), 2);
    }

    #[tokio::test]
    async fn test_telegraf_missing_application_name() {
        let (router, memory) = memory_router(None);
        let response = router
            .oneshot(telegraf_request(None, CPU_BATCH))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["code"], "MISSING_APPLICATION_NAME");
        assert!(memory.store.is_empty());
    }

    #[tokio::test]
    async fn test_telegraf_malformed_json() {
        let (router, memory) = memory_router(None);
        let response = router
            .oneshot(telegraf_request(Some("billing"), r#"{"metrics":[{"name":"cpu""#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(memory.store.is_empty());
        assert!(memory.data_types.is_empty());
    }

    #[tokio::test]
    async fn test_telegraf_validation_lists_every_error() {
        let (router, memory) = memory_router(None);
        let body = r#"{"metrics":[
            {"name":"","tags":{},"fields":{"v":1},"timestamp":1},
            {"name":"mem","tags":{},"fields":{"v":1},"timestamp":-5}
        ]}"#;
        let response = router
            .oneshot(telegraf_request(Some("bad name!"), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(
            fields,
            vec!["application_name", "metrics[0].name", "metrics[1].timestamp"]
        );
        assert!(memory.store.is_empty());
        assert!(memory.tags.is_empty());
    }

    #[tokio::test]
    async fn test_telegraf_skips_integers_wider_than_i64() {
        let (router, memory) = memory_router(None);
        let body = r#"{"metrics":[{"name":"net","tags":{"host":"h1"},"fields":{"bytes":18446744073709551616,"packets":100000000000000000000,"errors":3},"timestamp":1}]}"#;
        let response = router
            .oneshot(telegraf_request(Some("billing"), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(memory.store.double_samples().is_empty());
        let long = memory.store.long_samples();
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].record.field_name, "errors");
        assert_eq!(memory.data_types.len(), 1);
    }

    #[tokio::test]
    async fn test_telegraf_empty_batch() {
        let (router, memory) = memory_router(None);
        let response = router
            .oneshot(telegraf_request(Some("billing"), r#"{"metrics":[]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(memory.store.is_empty());
        assert!(memory.data_types.is_empty());
    }

    #[tokio::test]
    async fn test_telegraf_debug_capture() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (router, _) = memory_router(Some(temp_dir.path().to_path_buf()));

        let response = router
            .oneshot(telegraf_request(Some("billing"), CPU_BATCH))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content =
            std::fs::read_to_string(temp_dir.path().join("telegraf.jsonl")).unwrap();
        let entry: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(entry["application_name"], "billing");
        assert_eq!(entry["data"]["metrics"][0]["name"], "cpu");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (router, _) = memory_router(None);
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/write")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_telegraf_rejects_get() {
        let (router, _) = memory_router(None);
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/telegraf")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
