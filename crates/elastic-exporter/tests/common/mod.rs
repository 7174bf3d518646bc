// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared helpers for exporter integration tests.

#![allow(dead_code)]

use elastic_exporter::{IndexTarget, Lifecycle, PushError, Pusher};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::Registry;

/// Pusher that accepts everything.
#[derive(Debug, Default)]
pub struct NopPusher;

impl Lifecycle for NopPusher {}

impl Pusher for NopPusher {
    type Logs = ();
    type Metrics = ();
    type Traces = ();

    fn push_logs(&self, _target: &IndexTarget, _logs: ()) -> Result<(), PushError> {
        Ok(())
    }

    fn push_metrics(&self, _target: &IndexTarget, _metrics: ()) -> Result<(), PushError> {
        Ok(())
    }

    fn push_traces(&self, _target: &IndexTarget, _traces: ()) -> Result<(), PushError> {
        Ok(())
    }
}

/// Layer recording the message of every WARN event.
#[derive(Clone, Default)]
struct WarnCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl<S: Subscriber> Layer<S> for WarnCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::WARN {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.messages.lock().unwrap().push(visitor.0);
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

/// Run `f` with a subscriber capturing WARN messages.
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let capture = WarnCapture::default();
    let subscriber = Registry::default().with(capture.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    let messages = capture.messages.lock().unwrap().clone();
    (out, messages)
}
