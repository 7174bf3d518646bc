// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Index target resolution.
//!
//! Each signal writes either to one static index or, with dynamic indexing,
//! to a data stream derived per record:
//!
//! ```text
//! Config ---> IndexTarget::resolve(signal) ---> IndexTarget
//!                                                   |
//!   record attributes + timestamp -----> index_for() ---> "metrics-nginx-prod"
//! ```

use crate::config::{Config, Deprecation};
use crate::signal::Signal;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use std::hash::BuildHasher;

pub const DATASET_KEY: &str = "data_stream.dataset";
pub const NAMESPACE_KEY: &str = "data_stream.namespace";
pub const TYPE_KEY: &str = "data_stream.type";

pub const DEFAULT_DATASET: &str = "generic";
pub const DEFAULT_NAMESPACE: &str = "default";

/// Data stream name components are capped to this many bytes.
const MAX_COMPONENT_LEN: usize = 100;

/// Read access to the attributes of a record.
///
/// Implemented for string maps and for slices of them; a slice is searched
/// in order, so pass `[record, scope, resource]` to get record-first
/// precedence.
pub trait RecordAttributes {
    fn get(&self, key: &str) -> Option<&str>;
}

impl<S: BuildHasher> RecordAttributes for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

impl RecordAttributes for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }
}

impl<T: RecordAttributes> RecordAttributes for [T] {
    fn get(&self, key: &str) -> Option<&str> {
        self.iter().find_map(|attrs| attrs.get(key))
    }
}

/// Logstash date suffix settings carried by a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogstashFormat {
    pub separator: String,
    pub date_format: String,
}

/// Effective indexing target of one signal exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTarget {
    pub signal: Signal,

    /// Derive the destination per record.
    pub uses_dynamic_resolution: bool,

    /// Destination of every record when not dynamic, fallback otherwise.
    pub static_name: String,

    /// Date suffix, when logstash format is enabled.
    pub logstash: Option<LogstashFormat>,
}

/// Output of [`IndexTarget::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub target: IndexTarget,
    /// Set when the deprecated top-level `index` option was applied.
    pub deprecation: Option<Deprecation>,
}

impl IndexTarget {
    /// Resolve the target of `signal`.
    ///
    /// A non-empty legacy `index` replaces the static name of logs and
    /// traces; metrics always use `metrics_index`. The dynamic toggle is
    /// independent of that override.
    pub fn resolve(signal: Signal, config: &Config) -> Resolution {
        let legacy = !config.index.is_empty() && signal.accepts_legacy_index();

        let static_name = if legacy {
            config.index.clone()
        } else {
            config.signal_index(signal).to_string()
        };

        let logstash = config
            .logstash_format
            .enabled
            .then(|| LogstashFormat {
                separator: config.logstash_format.prefix_separator.clone(),
                date_format: config.logstash_format.date_format.clone(),
            });

        Resolution {
            target: IndexTarget {
                signal,
                uses_dynamic_resolution: config.dynamic_index(signal).enabled,
                static_name,
                logstash,
            },
            deprecation: legacy.then_some(Deprecation::LegacyIndex),
        }
    }

    /// Destination index of a single record.
    ///
    /// With dynamic resolution, records carrying `data_stream.dataset` or
    /// `data_stream.namespace` go to `{signal}-{dataset}-{namespace}`; the
    /// missing component takes its default. Records carrying neither fall
    /// back to the static name. An unusable logstash date format leaves the
    /// date suffix off entirely.
    pub fn index_for<A>(&self, attributes: &A, timestamp: DateTime<Utc>) -> String
    where
        A: RecordAttributes + ?Sized,
    {
        let mut index = self
            .data_stream_for(attributes)
            .unwrap_or_else(|| self.static_name.clone());

        if let Some(logstash) = &self.logstash {
            let mut date = String::new();
            if write!(date, "{}", timestamp.format(&logstash.date_format)).is_ok() {
                index.push_str(&logstash.separator);
                index.push_str(&date);
            } else {
                tracing::warn!(
                    format = %logstash.date_format,
                    %index,
                    "invalid logstash date format, indexing without date suffix"
                );
            }
        }

        index
    }

    fn data_stream_for<A>(&self, attributes: &A) -> Option<String>
    where
        A: RecordAttributes + ?Sized,
    {
        if !self.uses_dynamic_resolution {
            return None;
        }

        let dataset = attributes.get(DATASET_KEY);
        let namespace = attributes.get(NAMESPACE_KEY);
        if dataset.is_none() && namespace.is_none() {
            return None;
        }

        if let Some(kind) = attributes.get(TYPE_KEY) {
            if kind != self.signal.as_str() {
                tracing::debug!(
                    signal = %self.signal,
                    data_stream_type = kind,
                    "ignoring data_stream.type not matching the signal"
                );
            }
        }

        let dataset = sanitize(dataset.unwrap_or(DEFAULT_DATASET), DEFAULT_DATASET);
        let namespace = sanitize(namespace.unwrap_or(DEFAULT_NAMESPACE), DEFAULT_NAMESPACE);
        Some(format!("{}-{}-{}", self.signal, dataset, namespace))
    }
}

/// Make a data stream name component valid: lowercase, no separators or
/// reserved characters, bounded length.
fn sanitize(raw: &str, fallback: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| match c {
            '\\' | '/' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' | ',' | '#' | ':' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect();

    if out.len() > MAX_COMPONENT_LEN {
        let mut cut = MAX_COMPONENT_LEN;
        while !out.is_char_boundary(cut) {
            cut -= 1;
        }
        out.truncate(cut);
    }

    if out.is_empty() {
        fallback.to_string()
    } else {
        out
    }
}
