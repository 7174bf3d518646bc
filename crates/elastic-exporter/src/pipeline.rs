// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pipeline option assembly.
//!
//! Translates the normalized configuration into the options the host
//! pipeline applies around the exporter: capabilities, sending queue,
//! optional batcher, send timeout and lifecycle hooks.

use crate::config::{BatcherSettings, Config, QueueSettings};
use crate::error::PushError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Start/shutdown hooks invoked by the host pipeline.
pub trait Lifecycle: Send + Sync {
    fn start(&self) -> Result<(), PushError> {
        Ok(())
    }

    fn shutdown(&self) -> Result<(), PushError> {
        Ok(())
    }
}

/// Consumer capabilities declared to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The exporter modifies the data it is handed.
    pub mutates_data: bool,
}

/// Batcher options for an explicitly configured batcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatcherOptions {
    pub enabled: bool,
    pub flush_timeout: Duration,
    pub min_size_items: usize,
    pub max_size_items: usize,
}

impl BatcherOptions {
    /// Options for `settings`, or `None` when the batcher is unset.
    pub fn from_settings(settings: &BatcherSettings) -> Option<Self> {
        settings.enabled.value().map(|enabled| Self {
            enabled,
            flush_timeout: settings.flush_timeout,
            min_size_items: settings.min_size_items,
            max_size_items: settings.max_size_items,
        })
    }
}

/// Concrete option set handed to the host pipeline.
#[derive(Clone)]
pub struct PipelineOptions {
    pub capabilities: Capabilities,
    pub queue: QueueSettings,
    pub batcher: Option<BatcherOptions>,

    /// Generic per-send timeout. Zero disables it.
    pub send_timeout: Duration,

    lifecycle: Arc<dyn Lifecycle>,
}

impl PipelineOptions {
    /// Assemble the options for `config`.
    ///
    /// An explicitly set batcher (enabled or disabled) disables the generic
    /// send timeout: the bulk indexer enforces its own deadline and the
    /// generic one could cancel long bulk requests. With the batcher unset
    /// the host timeout stays, so handing data to the background workers
    /// cannot block forever.
    pub fn assemble(
        config: &Config,
        host_timeout: Duration,
        lifecycle: Arc<dyn Lifecycle>,
    ) -> Self {
        let batcher = BatcherOptions::from_settings(&config.batcher);
        let send_timeout = if batcher.is_some() {
            Duration::ZERO
        } else {
            host_timeout
        };

        Self {
            capabilities: Capabilities { mutates_data: true },
            queue: config.sending_queue.clone(),
            batcher,
            send_timeout,
            lifecycle,
        }
    }

    /// Whether the generic send timeout applies.
    pub fn timeout_enabled(&self) -> bool {
        !self.send_timeout.is_zero()
    }

    /// Run the start hook.
    pub fn start(&self) -> Result<(), PushError> {
        self.lifecycle.start()
    }

    /// Run the shutdown hook.
    pub fn shutdown(&self) -> Result<(), PushError> {
        self.lifecycle.shutdown()
    }
}

impl fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("capabilities", &self.capabilities)
            .field("queue", &self.queue)
            .field("batcher", &self.batcher)
            .field("send_timeout", &self.send_timeout)
            .finish_non_exhaustive()
    }
}
