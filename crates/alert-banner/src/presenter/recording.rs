//! Recording presenter - remembers every call, for tests and demos.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::time::Instant;

use super::{Dismissal, Presentation, PresentationId, Presenter, PresenterError};
use alert_stream::Alert;

/// One call made on a [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    Show {
        id: PresentationId,
        alert: Alert,
        at: Instant,
    },
    Clear {
        id: PresentationId,
        dismissal: Dismissal,
        at: Instant,
    },
}

/// A presenter that records calls into a shared log.
///
/// Clones share the same log, so a test can keep one clone while the
/// pipeline owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    calls: Arc<Mutex<Vec<PresenterCall>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every call so far.
    pub fn calls(&self) -> Vec<PresenterCall> {
        self.lock().clone()
    }

    /// Alerts shown so far, in display order.
    pub fn shown(&self) -> Vec<Alert> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                PresenterCall::Show { alert, .. } => Some(alert.clone()),
                PresenterCall::Clear { .. } => None,
            })
            .collect()
    }

    /// Whether an alert is on screen according to the call log.
    pub fn is_showing(&self) -> bool {
        matches!(self.lock().last(), Some(PresenterCall::Show { .. }))
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PresenterCall>> {
        // A panicked test thread must not hide the log from the others
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Presenter for RecordingPresenter {
    fn show(&mut self, presentation: &Presentation) -> Result<(), PresenterError> {
        self.lock().push(PresenterCall::Show {
            id: presentation.id,
            alert: presentation.alert.clone(),
            at: Instant::now(),
        });
        Ok(())
    }

    fn clear(
        &mut self,
        presentation: &Presentation,
        dismissal: Dismissal,
    ) -> Result<(), PresenterError> {
        self.lock().push(PresenterCall::Clear {
            id: presentation.id,
            dismissal,
            at: Instant::now(),
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "RecordingPresenter"
    }
}
