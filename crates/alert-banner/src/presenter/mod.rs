//! The seam between the controller and whatever puts alerts on screen.

mod console;
mod recording;

use std::fmt;

use alert_stream::Alert;
use thiserror::Error;
use tokio::time::Instant;

pub use console::ConsolePresenter;
pub use recording::{PresenterCall, RecordingPresenter};

/// Identifies one display of one alert.
///
/// Ids increase monotonically within a controller, so a dismissal carrying an
/// old id can never act on a later presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PresentationId(pub(crate) u64);

impl PresentationId {
    /// The raw sequence number.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PresentationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An alert currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub id: PresentationId,
    pub alert: Alert,
    /// When the alert went on screen.
    pub shown_at: Instant,
    /// When the display window runs out.
    pub deadline: Instant,
}

/// Why a presentation left the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    /// The operator acknowledged it.
    Acknowledged,
    /// The display window elapsed.
    TimedOut,
    /// The session is shutting down.
    SessionEnded,
}

impl fmt::Display for Dismissal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Acknowledged => "acknowledged",
            Self::TimedOut => "timed out",
            Self::SessionEnded => "session ended",
        })
    }
}

/// Errors a presenter can report. The controller logs them and moves on.
#[derive(Debug, Error)]
pub enum PresenterError {
    /// Writing to the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The display surface is gone.
    #[error("display unavailable: {0}")]
    Unavailable(String),
}

/// Something that can put an alert in front of the operator.
///
/// Calls are made from the single task that owns the controller, never
/// concurrently. `show` and `clear` alternate strictly: every `show` is
/// followed by exactly one `clear` for the same presentation before the next
/// `show`.
pub trait Presenter: Send {
    /// Put a presentation on screen.
    fn show(&mut self, presentation: &Presentation) -> Result<(), PresenterError>;

    /// Take a presentation off screen.
    fn clear(
        &mut self,
        presentation: &Presentation,
        dismissal: Dismissal,
    ) -> Result<(), PresenterError>;

    /// Get a human-readable name for this presenter.
    fn name(&self) -> &str;
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn show(&mut self, presentation: &Presentation) -> Result<(), PresenterError> {
        (**self).show(presentation)
    }

    fn clear(
        &mut self,
        presentation: &Presentation,
        dismissal: Dismissal,
    ) -> Result<(), PresenterError> {
        (**self).clear(presentation, dismissal)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
