// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types.
//!
//! Deprecated settings never produce errors; see
//! [`Deprecation`](crate::config::Deprecation).

use thiserror::Error;

/// Exporter construction errors.
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("No endpoint configured: set `endpoints`, `endpoint` or ELASTICSEARCH_URL")]
    NoEndpoints,

    #[error("Invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid endpoint {endpoint:?}: unsupported scheme {scheme:?}, expected http or https")]
    UnsupportedScheme { endpoint: String, scheme: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors returned by the push callback collaborator and lifecycle hooks.
#[derive(Debug, Error)]
pub enum PushError {
    #[error("Exporter not started")]
    NotStarted,

    #[error("Exporter already shut down")]
    ShutDown,

    #[error("Transport error: {0}")]
    Transport(String),
}
