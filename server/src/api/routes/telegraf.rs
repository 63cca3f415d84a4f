//! Telegraf HTTP output endpoint

use std::path::PathBuf;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;

use crate::api::extractors::{ApplicationName, JsonBody};
use crate::api::types::ApiError;
use crate::core::constants::DEBUG_TELEGRAF_FILE;
use crate::domain::IngestService;
use crate::domain::metrics::TelegrafBatch;
use crate::utils::debug::write_debug;

#[derive(Clone)]
pub struct TelegrafState {
    pub ingest: IngestService,
    pub debug_path: Option<PathBuf>,
}

pub fn routes(ingest: IngestService, debug_path: Option<PathBuf>) -> Router {
    Router::new()
        .route("/telegraf", post(collect))
        .with_state(TelegrafState { ingest, debug_path })
}

/// Accept one Telegraf JSON batch. Responds 200 with an empty body.
pub async fn collect(
    State(state): State<TelegrafState>,
    application_name: ApplicationName,
    JsonBody(batch): JsonBody<TelegrafBatch>,
) -> Result<StatusCode, ApiError> {
    state.ingest.ingest(&application_name, &batch).await?;

    if let Some(ref path) = state.debug_path {
        write_debug(path, DEBUG_TELEGRAF_FILE, &application_name, &batch).await;
    }

    Ok(StatusCode::OK)
}
