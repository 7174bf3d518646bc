// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Exporter construction.
//!
//! [`ExporterFactory`] is the composition root: for each signal it migrates
//! the configuration, validates the transport settings, resolves the index
//! target, assembles the pipeline options and binds everything to the
//! [`Pusher`] collaborator.

use crate::config::{migrate, Config, Deprecation, Migration};
use crate::error::{ExporterError, PushError};
use crate::index::{IndexTarget, Resolution};
use crate::pipeline::{Lifecycle, PipelineOptions};
use crate::signal::Signal;
use crate::transport::TransportConfig;
use std::ops::Deref;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Environment variable holding comma-separated fallback endpoints.
pub const ENDPOINT_ENV: &str = "ELASTICSEARCH_URL";

/// Host default for the generic send timeout.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings supplied by the host at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterSettings {
    /// Endpoints used when the configuration names none.
    pub default_endpoints: Vec<String>,

    /// Generic send timeout applied while the batcher is unset.
    pub send_timeout: Duration,
}

impl Default for ExporterSettings {
    fn default() -> Self {
        Self {
            default_endpoints: Vec::new(),
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }
}

impl ExporterSettings {
    /// Default settings with fallback endpoints read from `ELASTICSEARCH_URL`.
    pub fn from_env() -> Self {
        let default_endpoints = std::env::var(ENDPOINT_ENV)
            .map(|raw| parse_endpoint_list(&raw))
            .unwrap_or_default();

        Self {
            default_endpoints,
            ..Default::default()
        }
    }
}

/// Split a comma-separated endpoint list, dropping blank entries.
pub fn parse_endpoint_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

/// Push callback collaborator.
///
/// Receives batches from the host pipeline together with the target of the
/// exporter they were handed to; encoding and the bulk request itself
/// happen behind this trait.
pub trait Pusher: Lifecycle + 'static {
    type Logs;
    type Metrics;
    type Traces;

    fn push_logs(&self, target: &IndexTarget, logs: Self::Logs) -> Result<(), PushError>;

    fn push_metrics(&self, target: &IndexTarget, metrics: Self::Metrics) -> Result<(), PushError>;

    fn push_traces(&self, target: &IndexTarget, traces: Self::Traces) -> Result<(), PushError>;
}

const STATE_CREATED: u8 = 0;
const STATE_STARTING: u8 = 1;
const STATE_STARTED: u8 = 2;
const STATE_STOPPING: u8 = 3;
const STATE_SHUT_DOWN: u8 = 4;

/// An assembled exporter, frozen after construction.
pub struct Exporter<P: Pusher> {
    signal: Signal,
    config: Config,
    target: IndexTarget,
    options: PipelineOptions,
    transport: TransportConfig,
    warnings: Vec<Deprecation>,
    pusher: Arc<P>,
    state: AtomicU8,
}

impl<P: Pusher> Exporter<P> {
    pub fn signal(&self) -> Signal {
        self.signal
    }

    /// The migrated configuration this exporter was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn target(&self) -> &IndexTarget {
        &self.target
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// Deprecations logged while this exporter was built.
    pub fn warnings(&self) -> &[Deprecation] {
        &self.warnings
    }

    pub fn is_started(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_STARTED
    }

    /// Run the start hook. Fails after shutdown, including a shutdown that
    /// lands while the hook is still running.
    pub fn start(&self) -> Result<(), PushError> {
        match self.state.compare_exchange(
            STATE_CREATED,
            STATE_STARTING,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => {}
            Err(STATE_STARTING | STATE_STARTED) => return Ok(()),
            Err(_) => return Err(PushError::ShutDown),
        }

        if let Err(e) = self.options.start() {
            // a concurrent shutdown keeps its claim
            let _ = self.state.compare_exchange(
                STATE_STARTING,
                STATE_CREATED,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
            return Err(e);
        }

        self.state
            .compare_exchange(
                STATE_STARTING,
                STATE_STARTED,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|_| PushError::ShutDown)?;
        tracing::info!(signal = %self.signal, index = %self.target.static_name, "exporter started");
        Ok(())
    }

    /// Run the shutdown hook. Calling it without a prior start is allowed;
    /// once it has succeeded further calls are no-ops. A failed hook leaves
    /// the exporter as it was so the shutdown can be retried.
    pub fn shutdown(&self) -> Result<(), PushError> {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            if matches!(current, STATE_STOPPING | STATE_SHUT_DOWN) {
                return Ok(());
            }
            match self.state.compare_exchange_weak(
                current,
                STATE_STOPPING,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }

        if let Err(e) = self.options.shutdown() {
            // an interrupted start has already given up on its claim
            let previous = if current == STATE_STARTING {
                STATE_CREATED
            } else {
                current
            };
            self.state.store(previous, Ordering::Release);
            tracing::warn!(signal = %self.signal, error = %e, "exporter shutdown failed");
            return Err(e);
        }

        self.state.store(STATE_SHUT_DOWN, Ordering::Release);
        tracing::info!(signal = %self.signal, "exporter shut down");
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), PushError> {
        match self.state.load(Ordering::Acquire) {
            STATE_STARTED => Ok(()),
            STATE_STOPPING | STATE_SHUT_DOWN => Err(PushError::ShutDown),
            _ => Err(PushError::NotStarted),
        }
    }
}

/// Exporter for logs.
pub struct LogsExporter<P: Pusher>(Exporter<P>);

/// Exporter for metrics.
pub struct MetricsExporter<P: Pusher>(Exporter<P>);

/// Exporter for traces.
pub struct TracesExporter<P: Pusher>(Exporter<P>);

impl<P: Pusher> LogsExporter<P> {
    pub fn push(&self, logs: P::Logs) -> Result<(), PushError> {
        self.0.ensure_running()?;
        self.0.pusher.push_logs(&self.0.target, logs)
    }
}

impl<P: Pusher> MetricsExporter<P> {
    pub fn push(&self, metrics: P::Metrics) -> Result<(), PushError> {
        self.0.ensure_running()?;
        self.0.pusher.push_metrics(&self.0.target, metrics)
    }
}

impl<P: Pusher> TracesExporter<P> {
    pub fn push(&self, traces: P::Traces) -> Result<(), PushError> {
        self.0.ensure_running()?;
        self.0.pusher.push_traces(&self.0.target, traces)
    }
}

impl<P: Pusher> Deref for LogsExporter<P> {
    type Target = Exporter<P>;

    fn deref(&self) -> &Exporter<P> {
        &self.0
    }
}

impl<P: Pusher> Deref for MetricsExporter<P> {
    type Target = Exporter<P>;

    fn deref(&self) -> &Exporter<P> {
        &self.0
    }
}

impl<P: Pusher> Deref for TracesExporter<P> {
    type Target = Exporter<P>;

    fn deref(&self) -> &Exporter<P> {
        &self.0
    }
}

/// Builds signal exporters bound to one push collaborator.
pub struct ExporterFactory<P: Pusher> {
    pusher: Arc<P>,
}

impl<P: Pusher> Clone for ExporterFactory<P> {
    fn clone(&self) -> Self {
        Self {
            pusher: Arc::clone(&self.pusher),
        }
    }
}

impl<P: Pusher> ExporterFactory<P> {
    pub fn new(pusher: P) -> Self {
        Self::from_shared(Arc::new(pusher))
    }

    pub fn from_shared(pusher: Arc<P>) -> Self {
        Self { pusher }
    }

    /// The default configuration exporters start from.
    pub fn create_default_config(&self) -> Config {
        Config::default()
    }

    /// Create a logs exporter. Logs are indexed directly.
    pub fn create_logs(
        &self,
        config: &Config,
        settings: &ExporterSettings,
    ) -> Result<LogsExporter<P>, ExporterError> {
        self.build(Signal::Logs, config, settings).map(LogsExporter)
    }

    pub fn create_metrics(
        &self,
        config: &Config,
        settings: &ExporterSettings,
    ) -> Result<MetricsExporter<P>, ExporterError> {
        self.build(Signal::Metrics, config, settings).map(MetricsExporter)
    }

    pub fn create_traces(
        &self,
        config: &Config,
        settings: &ExporterSettings,
    ) -> Result<TracesExporter<P>, ExporterError> {
        self.build(Signal::Traces, config, settings).map(TracesExporter)
    }

    fn build(
        &self,
        signal: Signal,
        config: &Config,
        settings: &ExporterSettings,
    ) -> Result<Exporter<P>, ExporterError> {
        let Migration {
            config,
            warnings: migration_warnings,
        } = migrate(config.clone());

        // fails before anything is logged
        let transport = TransportConfig::from_config(&config, settings)?;

        let Resolution {
            target,
            deprecation,
        } = IndexTarget::resolve(signal, &config);

        let warnings: Vec<Deprecation> =
            deprecation.into_iter().chain(migration_warnings).collect();
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        let lifecycle: Arc<dyn Lifecycle> = self.pusher.clone();
        let options = PipelineOptions::assemble(&config, settings.send_timeout, lifecycle);

        tracing::debug!(
            %signal,
            index = %target.static_name,
            dynamic = target.uses_dynamic_resolution,
            batcher = ?options.batcher.as_ref().map(|b| b.enabled),
            send_timeout = ?options.send_timeout,
            endpoints = transport.endpoints.len(),
            "exporter assembled"
        );

        Ok(Exporter {
            signal,
            config,
            target,
            options,
            transport,
            warnings,
            pusher: Arc::clone(&self.pusher),
            state: AtomicU8::new(STATE_CREATED),
        })
    }
}
