//! Where channel lifecycle signals and decode failures are reported.

use std::sync::{Arc, Mutex};

use alert_stream::{DecodeError, StreamError};
use tracing::{error, info, warn};

/// Receives push-channel signals that do not produce alerts.
///
/// None of these calls may block; they run on the pipeline task between
/// alert handling steps.
pub trait Diagnostics: Send + Sync {
    /// The push channel connected.
    fn channel_opened(&self);

    /// The server closed the push channel.
    fn channel_closed(&self);

    /// The push channel failed.
    fn channel_errored(&self, error: &StreamError);

    /// A message was dropped because it did not decode.
    fn decode_failed(&self, error: &DecodeError);
}

/// Reports everything through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn channel_opened(&self) {
        info!("Alert channel opened");
    }

    fn channel_closed(&self) {
        warn!("Alert channel closed; queued alerts will still be shown");
    }

    fn channel_errored(&self, error: &StreamError) {
        error!("Alert channel error: {}", error);
    }

    fn decode_failed(&self, error: &DecodeError) {
        warn!("Dropped undecodable alert message: {}", error);
    }
}

/// A diagnostics signal captured by [`RecordingDiagnostics`].
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    Opened,
    Closed,
    Errored(String),
    DecodeFailed(DecodeError),
}

/// Keeps every signal in a shared log. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingDiagnostics {
    events: Arc<Mutex<Vec<DiagnosticEvent>>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the signals received so far.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn push(&self, event: DiagnosticEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn channel_opened(&self) {
        self.push(DiagnosticEvent::Opened);
    }

    fn channel_closed(&self) {
        self.push(DiagnosticEvent::Closed);
    }

    fn channel_errored(&self, error: &StreamError) {
        self.push(DiagnosticEvent::Errored(error.to_string()));
    }

    fn decode_failed(&self, error: &DecodeError) {
        self.push(DiagnosticEvent::DecodeFailed(error.clone()));
    }
}
