// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Exporter configuration.
//!
//! The configuration is deserialized from the host's already-parsed
//! document (YAML in practice). Every section carries defaults, so a
//! document only needs the keys it overrides:
//!
//! ```yaml
//! endpoints: ["https://es.example.com:9200"]
//! logs_index: app-logs
//! metrics_dynamic_index:
//!   enabled: false
//! retry:
//!   max_retries: 5
//!   initial_interval: 250ms
//! batcher:
//!   enabled: true
//!   flush_timeout: 10s
//! ```

pub mod defaults;
pub mod deprecated;

pub use defaults::with_default_config;
pub use deprecated::{migrate, Deprecation, Migration};

use crate::signal::Signal;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Configuration parsing errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Top-level exporter configuration.
///
/// One value per exporter instance. Built from defaults, optionally
/// overridden by the user, then migrated and assembled once.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Backend addresses, tried in order.
    pub endpoints: Vec<String>,

    /// Legacy single backend address, used when `endpoints` is empty.
    pub endpoint: String,

    /// Deprecated: overrides `logs_index` and `traces_index` when non-empty.
    pub index: String,

    pub logs_index: String,
    pub logs_dynamic_index: DynamicIndexSetting,

    pub metrics_index: String,
    pub metrics_dynamic_index: DynamicIndexSetting,

    pub traces_index: String,
    pub traces_dynamic_index: DynamicIndexSetting,

    pub retry: RetrySettings,
    pub mapping: MappingSettings,
    pub batcher: BatcherSettings,
    pub sending_queue: QueueSettings,

    /// Legacy flush control, honoured only while the batcher is unset.
    pub flush: FlushSettings,

    pub telemetry: TelemetrySettings,
    pub logstash_format: LogstashFormatSettings,

    /// HTTP request timeout for bulk requests.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// HTTP body compression.
    pub compression: Compression,
}

impl Config {
    /// Parse configuration from a YAML string, filling unset keys with defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Effective mapping mode.
    pub fn mapping_mode(&self) -> MappingMode {
        self.mapping.mode
    }

    /// Signal-specific static index name, ignoring the legacy `index` option.
    pub fn signal_index(&self, signal: Signal) -> &str {
        match signal {
            Signal::Logs => &self.logs_index,
            Signal::Metrics => &self.metrics_index,
            Signal::Traces => &self.traces_index,
        }
    }

    /// Signal-specific dynamic index toggle.
    pub fn dynamic_index(&self, signal: Signal) -> DynamicIndexSetting {
        match signal {
            Signal::Logs => self.logs_dynamic_index,
            Signal::Metrics => self.metrics_dynamic_index,
            Signal::Traces => self.traces_dynamic_index,
        }
    }
}

/// Per-signal dynamic index toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DynamicIndexSetting {
    pub enabled: bool,
}

impl DynamicIndexSetting {
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

/// Retry policy handed to the bulk indexer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    pub enabled: bool,

    /// Maximum number of retries. Zero means "transport default".
    pub max_retries: u32,

    /// Deprecated: number of attempts including the first one.
    pub max_requests: u32,

    #[serde(with = "humantime_serde")]
    pub initial_interval: Duration,

    #[serde(with = "humantime_serde")]
    pub max_interval: Duration,

    /// HTTP status codes that trigger a retry.
    pub retry_on_status: Vec<u16>,
}

/// Document mapping policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingSettings {
    pub mode: MappingMode,

    /// Flatten dotted attribute keys into nested objects.
    pub dedot: bool,

    /// Deprecated: deduplication is always performed.
    pub dedup: Option<bool>,
}

/// Document mapping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingMode {
    #[default]
    #[serde(alias = "no", alias = "")]
    None,
    Ecs,
    Raw,
    Otel,
    #[serde(rename = "bodymap")]
    BodyMap,
}

impl MappingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingMode::None => "none",
            MappingMode::Ecs => "ecs",
            MappingMode::Raw => "raw",
            MappingMode::Otel => "otel",
            MappingMode::BodyMap => "bodymap",
        }
    }
}

/// Tri-state batcher toggle.
///
/// `Unset` keeps the asynchronous bulk indexer path; `Enabled` and
/// `Disabled` both mean the batcher was configured explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<bool>")]
pub enum BatcherEnabled {
    #[default]
    Unset,
    Enabled,
    Disabled,
}

impl BatcherEnabled {
    /// True when the user set `batcher.enabled` to either value.
    pub fn is_set(&self) -> bool {
        !matches!(self, BatcherEnabled::Unset)
    }

    /// The explicit value, if any.
    pub fn value(&self) -> Option<bool> {
        match self {
            BatcherEnabled::Unset => None,
            BatcherEnabled::Enabled => Some(true),
            BatcherEnabled::Disabled => Some(false),
        }
    }
}

impl From<Option<bool>> for BatcherEnabled {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => BatcherEnabled::Unset,
            Some(true) => BatcherEnabled::Enabled,
            Some(false) => BatcherEnabled::Disabled,
        }
    }
}

/// Batcher settings, applied only when `enabled` is set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatcherSettings {
    pub enabled: BatcherEnabled,

    #[serde(with = "humantime_serde")]
    pub flush_timeout: Duration,

    pub min_size_items: usize,

    /// Zero means no upper bound.
    pub max_size_items: usize,
}

/// Sending queue settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueSettings {
    pub enabled: bool,
    pub num_consumers: usize,
    pub queue_size: usize,
}

/// Legacy flush thresholds of the asynchronous bulk indexer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlushSettings {
    pub bytes: usize,

    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

/// Diagnostic toggles. No effect on what is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetrySettings {
    pub log_request_body: bool,
    pub log_response_body: bool,
}

/// Logstash-style index naming: a date suffix derived from each record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogstashFormatSettings {
    pub enabled: bool,
    pub prefix_separator: String,
    /// strftime-style format of the date suffix.
    pub date_format: String,
}

/// HTTP body compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
    #[default]
    Gzip,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_YAML: &str = r#"
endpoints:
  - "http://es-1:9200"
  - "http://es-2:9200"
index: legacy
logs_index: app-logs
logs_dynamic_index:
  enabled: true
metrics_dynamic_index:
  enabled: false
retry:
  enabled: true
  max_requests: 4
  initial_interval: 250ms
  max_interval: 30s
  retry_on_status: [429, 503]
mapping:
  mode: ecs
  dedot: false
  dedup: true
batcher:
  enabled: false
  flush_timeout: 5s
  min_size_items: 100
  max_size_items: 1000
sending_queue:
  enabled: true
  num_consumers: 4
  queue_size: 50
flush:
  bytes: 1024
  interval: 1s
telemetry:
  log_request_body: true
timeout: 10s
compression: none
"#;

    #[test]
    fn test_config_parse_empty_document_yields_defaults() {
        let config = Config::from_yaml("{}").expect("parse empty yaml");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_parse_all_fields() {
        let config = Config::from_yaml(FULL_YAML).expect("parse full yaml");

        assert_eq!(config.endpoints, vec!["http://es-1:9200", "http://es-2:9200"]);
        assert_eq!(config.index, "legacy");
        assert_eq!(config.logs_index, "app-logs");
        assert!(config.logs_dynamic_index.enabled);
        assert!(!config.metrics_dynamic_index.enabled);
        // untouched keys keep their defaults
        assert_eq!(config.traces_index, "traces-generic-default");

        assert_eq!(config.retry.max_requests, 4);
        assert_eq!(config.retry.initial_interval, Duration::from_millis(250));
        assert_eq!(config.retry.max_interval, Duration::from_secs(30));
        assert_eq!(config.retry.retry_on_status, vec![429, 503]);

        assert_eq!(config.mapping_mode(), MappingMode::Ecs);
        assert!(!config.mapping.dedot);
        assert_eq!(config.mapping.dedup, Some(true));

        assert_eq!(config.batcher.enabled, BatcherEnabled::Disabled);
        assert_eq!(config.batcher.flush_timeout, Duration::from_secs(5));
        assert_eq!(config.batcher.min_size_items, 100);
        assert_eq!(config.batcher.max_size_items, 1000);

        assert!(config.sending_queue.enabled);
        assert_eq!(config.sending_queue.num_consumers, 4);
        assert_eq!(config.flush.bytes, 1024);
        assert_eq!(config.flush.interval, Duration::from_secs(1));
        assert!(config.telemetry.log_request_body);
        assert!(!config.telemetry.log_response_body);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.compression, Compression::None);
    }

    #[test]
    fn test_batcher_enabled_tri_state() {
        let unset = Config::from_yaml("batcher: {}").expect("parse");
        assert_eq!(unset.batcher.enabled, BatcherEnabled::Unset);

        let null = Config::from_yaml("batcher:\n  enabled: null").expect("parse");
        assert_eq!(null.batcher.enabled, BatcherEnabled::Unset);

        let on = Config::from_yaml("batcher:\n  enabled: true").expect("parse");
        assert_eq!(on.batcher.enabled, BatcherEnabled::Enabled);
        assert_eq!(on.batcher.enabled.value(), Some(true));
        assert!(on.batcher.enabled.is_set());
    }

    #[test]
    fn test_mapping_mode_aliases() {
        let no = Config::from_yaml("mapping:\n  mode: \"no\"").expect("parse");
        assert_eq!(no.mapping_mode(), MappingMode::None);

        let body = Config::from_yaml("mapping:\n  mode: bodymap").expect("parse");
        assert_eq!(body.mapping_mode(), MappingMode::BodyMap);
        assert_eq!(body.mapping_mode().as_str(), "bodymap");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Config::from_yaml("indexx: nope").unwrap_err();
        assert!(err.to_string().contains("indexx"));
    }

    #[test]
    fn test_signal_accessors() {
        let config = Config::default();
        assert_eq!(config.signal_index(Signal::Logs), "logs-generic-default");
        assert_eq!(config.signal_index(Signal::Metrics), "metrics-generic-default");
        assert!(config.dynamic_index(Signal::Metrics).enabled);
        assert!(!config.dynamic_index(Signal::Traces).enabled);
    }
}
