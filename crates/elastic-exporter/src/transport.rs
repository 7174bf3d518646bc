// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Settings handed to the bulk indexer transport.
//!
//! Building a [`TransportConfig`] is the only step of exporter construction
//! that can fail: endpoints must resolve to at least one http(s) URL and
//! the queue, retry, batcher and logstash settings must be usable.

use crate::config::{
    Compression, Config, FlushSettings, MappingSettings, QueueSettings, RetrySettings,
    TelemetrySettings,
};
use crate::error::ExporterError;
use crate::factory::ExporterSettings;
use chrono::format::{Item, StrftimeItems};
use std::time::Duration;
use url::Url;

/// Retries used by the bulk indexer when `retry.max_retries` is zero.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Effective retry policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub enabled: bool,
    /// Retries after the first attempt. Always zero when disabled.
    pub max_retries: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub retry_on_status: Vec<u16>,
}

impl RetryPolicy {
    pub fn from_settings(settings: &RetrySettings) -> Result<Self, ExporterError> {
        if settings.initial_interval > settings.max_interval {
            return Err(ExporterError::Invalid(format!(
                "retry initial_interval ({:?}) exceeds max_interval ({:?})",
                settings.initial_interval, settings.max_interval
            )));
        }

        let max_retries = match (settings.enabled, settings.max_retries) {
            (false, _) => 0,
            (true, 0) => DEFAULT_MAX_RETRIES,
            (true, n) => n,
        };

        Ok(Self {
            enabled: settings.enabled,
            max_retries,
            initial_interval: settings.initial_interval,
            max_interval: settings.max_interval,
            retry_on_status: settings.retry_on_status.clone(),
        })
    }

    /// Whether a response with `status` is retried.
    pub fn should_retry(&self, status: u16) -> bool {
        self.enabled && self.retry_on_status.contains(&status)
    }

    /// Exponential backoff before retry number `attempt` (0-based), capped
    /// at `max_interval`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.initial_interval
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_interval)
    }
}

/// Fully validated transport settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub endpoints: Vec<Url>,
    pub timeout: Duration,
    pub compression: Compression,
    pub retry: RetryPolicy,
    pub queue: QueueSettings,

    /// Legacy flush thresholds. `None` when the batcher is configured,
    /// since flushing is then driven by the batcher.
    pub flush: Option<FlushSettings>,

    pub mapping: MappingSettings,
    pub telemetry: TelemetrySettings,
}

impl TransportConfig {
    /// Validate `config` and resolve the endpoints.
    pub fn from_config(
        config: &Config,
        settings: &ExporterSettings,
    ) -> Result<Self, ExporterError> {
        let endpoints = resolve_endpoints(config, settings)?;
        let retry = RetryPolicy::from_settings(&config.retry)?;
        validate_queue(&config.sending_queue)?;
        validate_batcher(config)?;
        if config.logstash_format.enabled {
            validate_date_format(&config.logstash_format.date_format)?;
        }

        let flush = (!config.batcher.enabled.is_set()).then(|| config.flush.clone());

        Ok(Self {
            endpoints,
            timeout: config.timeout,
            compression: config.compression,
            retry,
            queue: config.sending_queue.clone(),
            flush,
            mapping: config.mapping.clone(),
            telemetry: config.telemetry,
        })
    }
}

/// Pick the endpoint list: `endpoints`, then legacy `endpoint`, then the
/// host defaults. Every entry must be an http(s) URL.
fn resolve_endpoints(
    config: &Config,
    settings: &ExporterSettings,
) -> Result<Vec<Url>, ExporterError> {
    let raw: Vec<&str> = if !config.endpoints.is_empty() {
        config.endpoints.iter().map(String::as_str).collect()
    } else if !config.endpoint.is_empty() {
        vec![config.endpoint.as_str()]
    } else {
        settings
            .default_endpoints
            .iter()
            .map(String::as_str)
            .collect()
    };

    if raw.is_empty() {
        return Err(ExporterError::NoEndpoints);
    }

    raw.into_iter().map(parse_endpoint).collect()
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ExporterError> {
    let url = Url::parse(endpoint).map_err(|source| ExporterError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ExporterError::UnsupportedScheme {
            endpoint: endpoint.to_string(),
            scheme: scheme.to_string(),
        }),
    }
}

fn validate_queue(queue: &QueueSettings) -> Result<(), ExporterError> {
    if !queue.enabled {
        return Ok(());
    }
    if queue.num_consumers == 0 {
        return Err(ExporterError::Invalid(
            "sending_queue num_consumers must be positive".into(),
        ));
    }
    if queue.queue_size == 0 {
        return Err(ExporterError::Invalid(
            "sending_queue queue_size must be positive".into(),
        ));
    }
    Ok(())
}

fn validate_batcher(config: &Config) -> Result<(), ExporterError> {
    let batcher = &config.batcher;
    if batcher.enabled.is_set()
        && batcher.max_size_items != 0
        && batcher.max_size_items < batcher.min_size_items
    {
        return Err(ExporterError::Invalid(format!(
            "batcher max_size_items ({}) must be zero or at least min_size_items ({})",
            batcher.max_size_items, batcher.min_size_items
        )));
    }
    Ok(())
}

fn validate_date_format(format: &str) -> Result<(), ExporterError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ExporterError::Invalid(format!(
            "logstash_format date_format {:?} is not a valid strftime format",
            format
        )));
    }
    Ok(())
}
