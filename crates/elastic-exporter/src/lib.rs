// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Elasticsearch exporter assembly
//!
//! Turns an already-parsed exporter configuration into ready-to-run logs,
//! metrics and traces exporters for a bulk-indexing backend.
//!
//! This crate provides:
//! - Conservative per-signal defaults
//! - Migration of deprecated settings, reported as warnings
//! - Static vs. per-record (data stream) index resolution
//! - Translation of retry, queue and batcher settings into pipeline options
//! - Endpoint and transport setting validation
//!
//! # Overview
//!
//! The crate does NOT talk to Elasticsearch and does NOT encode documents.
//! Both happen behind the [`Pusher`] collaborator.
//!
//! ```text
//! Config --> migrate --> TransportConfig --> IndexTarget --> PipelineOptions --> Exporter
//!               |                                                                  |
//!               +-- Deprecation warnings (tracing WARN)                  Pusher::push_*
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use elastic_exporter::{Config, ExporterFactory, ExporterSettings};
//!
//! let config = Config::from_yaml("endpoints: [\"http://localhost:9200\"]")?;
//! let factory = ExporterFactory::new(my_bulk_pusher);
//!
//! let logs = factory.create_logs(&config, &ExporterSettings::from_env())?;
//! logs.start()?;
//! logs.push(batch)?;
//! logs.shutdown()?;
//! ```

pub mod config;
pub mod error;
pub mod factory;
pub mod index;
pub mod pipeline;
pub mod signal;
pub mod transport;

pub use config::{BatcherEnabled, Config, ConfigError, Deprecation, MappingMode};
pub use error::{ExporterError, PushError};
pub use factory::{
    Exporter, ExporterFactory, ExporterSettings, LogsExporter, MetricsExporter, Pusher,
    TracesExporter,
};
pub use index::{IndexTarget, RecordAttributes};
pub use pipeline::{Lifecycle, PipelineOptions};
pub use signal::Signal;
pub use transport::{RetryPolicy, TransportConfig};
