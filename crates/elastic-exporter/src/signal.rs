// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Telemetry signal types handled by the exporter.

use std::fmt;

/// A telemetry signal type.
///
/// Each signal gets its own exporter instance, index settings and
/// data stream type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Logs,
    Metrics,
    Traces,
}

impl Signal {
    /// All signal types, in construction order.
    pub const ALL: [Signal; 3] = [Signal::Logs, Signal::Metrics, Signal::Traces];

    /// Data stream type name (`logs`, `metrics`, `traces`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Logs => "logs",
            Signal::Metrics => "metrics",
            Signal::Traces => "traces",
        }
    }

    /// Whether the deprecated top-level `index` option applies to this signal.
    ///
    /// Only logs and traces ever honoured it. New signal types must not be
    /// added here.
    pub fn accepts_legacy_index(&self) -> bool {
        matches!(self, Signal::Logs | Signal::Traces)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
