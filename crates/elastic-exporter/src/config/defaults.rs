// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Default configuration values.

use super::{
    BatcherEnabled, BatcherSettings, Compression, Config, DynamicIndexSetting, FlushSettings,
    LogstashFormatSettings, MappingMode, MappingSettings, QueueSettings, RetrySettings,
    TelemetrySettings,
};
use std::time::Duration;

pub const DEFAULT_LOGS_INDEX: &str = "logs-generic-default";
pub const DEFAULT_METRICS_INDEX: &str = "metrics-generic-default";
pub const DEFAULT_TRACES_INDEX: &str = "traces-generic-default";

/// HTTP 429.
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(90);
pub const DEFAULT_FLUSH_BYTES: usize = 5_000_000;
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_BATCH_FLUSH_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BATCH_MIN_SIZE_ITEMS: usize = 5000;
pub const DEFAULT_QUEUE_CONSUMERS: usize = 10;
pub const DEFAULT_QUEUE_SIZE: usize = 1000;

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            endpoint: String::new(),
            index: String::new(),
            logs_index: DEFAULT_LOGS_INDEX.to_string(),
            logs_dynamic_index: DynamicIndexSetting::disabled(),
            metrics_index: DEFAULT_METRICS_INDEX.to_string(),
            // per-record routing pays off mostly for metrics
            metrics_dynamic_index: DynamicIndexSetting::enabled(),
            traces_index: DEFAULT_TRACES_INDEX.to_string(),
            traces_dynamic_index: DynamicIndexSetting::disabled(),
            retry: RetrySettings::default(),
            mapping: MappingSettings::default(),
            batcher: BatcherSettings::default(),
            sending_queue: QueueSettings::default(),
            flush: FlushSettings::default(),
            telemetry: TelemetrySettings::default(),
            logstash_format: LogstashFormatSettings::default(),
            timeout: DEFAULT_HTTP_TIMEOUT,
            compression: Compression::Gzip,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            // resolved to the transport default when the exporter is built
            max_retries: 0,
            max_requests: 0,
            initial_interval: Duration::from_millis(100),
            max_interval: Duration::from_secs(60),
            retry_on_status: vec![STATUS_TOO_MANY_REQUESTS],
        }
    }
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self {
            mode: MappingMode::None,
            dedot: true,
            dedup: None,
        }
    }
}

impl Default for BatcherSettings {
    fn default() -> Self {
        Self {
            enabled: BatcherEnabled::Unset,
            flush_timeout: DEFAULT_BATCH_FLUSH_TIMEOUT,
            min_size_items: DEFAULT_BATCH_MIN_SIZE_ITEMS,
            max_size_items: 0,
        }
    }
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            num_consumers: DEFAULT_QUEUE_CONSUMERS,
            queue_size: DEFAULT_QUEUE_SIZE,
        }
    }
}

impl Default for FlushSettings {
    fn default() -> Self {
        Self {
            bytes: DEFAULT_FLUSH_BYTES,
            interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

impl Default for LogstashFormatSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            prefix_separator: "-".to_string(),
            date_format: "%Y.%m.%d".to_string(),
        }
    }
}

/// Create the default configuration.
pub fn create_default_config() -> Config {
    Config::default()
}

/// Create the default configuration and apply each override in order.
///
/// ```
/// use elastic_exporter::config::with_default_config;
///
/// let config = with_default_config([|cfg: &mut elastic_exporter::Config| {
///     cfg.endpoints = vec!["http://localhost:9200".into()];
/// }]);
/// assert_eq!(config.endpoints.len(), 1);
/// ```
pub fn with_default_config<I, F>(overrides: I) -> Config
where
    I: IntoIterator<Item = F>,
    F: FnOnce(&mut Config),
{
    let mut config = create_default_config();
    for apply in overrides {
        apply(&mut config);
    }
    config
}
