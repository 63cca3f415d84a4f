//! Domain logic

pub mod metrics;

pub use metrics::IngestService;
