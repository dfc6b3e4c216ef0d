//! Ordered, one-at-a-time presentation of fire alerts.
//!
//! Alerts from the push channel go into a FIFO queue and are shown to the
//! operator one at a time. Each stays on screen until the operator
//! acknowledges it or its display window runs out, and the next one goes up
//! immediately. No alert is skipped, dropped, or shown out of order,
//! however fast they arrive.
//!
//! - [`AlertQueue`] - the unbounded FIFO buffer
//! - [`PresentationController`] - the `Idle` / `Displaying` state machine
//! - [`AlertPipeline`] - runs the controller on one task and feeds it
//! - [`Presenter`] - the trait a display surface implements
//! - [`Diagnostics`] - where lifecycle signals and decode failures go
//!
//! # Example
//!
//! ```no_run
//! use alert_banner::{AlertPipeline, BannerConfig, ConsolePresenter};
//! use alert_stream::{AlertClient, StreamConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AlertClient::connect(StreamConfig::default()).await?;
//! let events = alert_stream::subscribe(&client).await?;
//!
//! let (pipeline, handle) =
//!     AlertPipeline::new(ConsolePresenter::stdout(None), BannerConfig::default());
//!
//! // Hand `handle` to whatever reads operator input
//! let _ = handle.acknowledge_current();
//!
//! pipeline.run(events).await;
//! # Ok(())
//! # }
//! ```

mod controller;
mod diagnostics;
pub mod format;
mod pipeline;
mod presenter;
mod queue;

pub use controller::{PresentationController, PresentationState, Transition};
pub use diagnostics::{DiagnosticEvent, Diagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use pipeline::{
    AlertPipeline, BannerConfig, BannerHandle, BannerStatus, ChannelState, PipelineError,
    PipelineSummary, DEFAULT_DISPLAY_WINDOW,
};
pub use presenter::{
    ConsolePresenter, Dismissal, Presentation, PresentationId, Presenter, PresenterCall,
    PresenterError, RecordingPresenter,
};
pub use queue::AlertQueue;

// Re-export the alert model for convenience
pub use alert_stream::{Alert, Building, ChannelEvent};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
