//! Drives the presentation controller from the push channel, operator
//! acknowledgments and the display timer.
//!
//! A single task owns the controller. Everything else talks to it through a
//! [`BannerHandle`]: acknowledgments go in over a channel, status comes out
//! over a `watch`. Nothing outside the task mutates the queue or the state.

use std::future::Future;
use std::time::Duration;

use alert_stream::ChannelEvent;
use futures::{Stream, StreamExt};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::controller::PresentationController;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::presenter::{Presentation, PresentationId, Presenter};

/// Default display window (60 seconds).
pub const DEFAULT_DISPLAY_WINDOW: Duration = Duration::from_secs(60);

/// Configuration for the alert pipeline.
#[derive(Debug, Clone)]
pub struct BannerConfig {
    /// How long an alert stays on screen without acknowledgment.
    /// Default: 60 seconds.
    pub display_window: Duration,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            display_window: DEFAULT_DISPLAY_WINDOW,
        }
    }
}

impl BannerConfig {
    /// Create a config with the given display window.
    pub fn with_display_window(display_window: Duration) -> Self {
        Self { display_window }
    }
}

/// Connection state of the push channel as seen by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    #[default]
    Connecting,
    Open,
    Closed,
    Failed,
}

/// Snapshot of the pipeline, published after every event it handles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BannerStatus {
    /// The alert on screen, if any.
    pub current: Option<Presentation>,
    /// Alerts waiting behind it.
    pub pending: usize,
    pub channel: ChannelState,
}

/// Errors from talking to the pipeline through a handle.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The pipeline task is no longer running.
    #[error("alert pipeline has stopped")]
    Stopped,
}

/// What the pipeline did over its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineSummary {
    /// Alerts that went on screen.
    pub displayed: u64,
    /// Alerts still queued when the session ended.
    pub dropped: usize,
}

/// Cloneable handle for acknowledging alerts and watching the banner.
#[derive(Debug, Clone)]
pub struct BannerHandle {
    acks: mpsc::UnboundedSender<PresentationId>,
    status: watch::Receiver<BannerStatus>,
}

impl BannerHandle {
    /// Acknowledge presentation `id`.
    ///
    /// Acknowledging a presentation that is no longer on screen does nothing.
    pub fn acknowledge(&self, id: PresentationId) -> Result<(), PipelineError> {
        self.acks.send(id).map_err(|_| PipelineError::Stopped)
    }

    /// Acknowledge whatever is on screen right now.
    ///
    /// Returns the id that was acknowledged, or `None` if nothing was shown.
    pub fn acknowledge_current(&self) -> Result<Option<PresentationId>, PipelineError> {
        let current = self.status.borrow().current.as_ref().map(|p| p.id);
        if let Some(id) = current {
            self.acknowledge(id)?;
        }
        Ok(current)
    }

    /// Latest published status.
    pub fn status(&self) -> BannerStatus {
        self.status.borrow().clone()
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> watch::Receiver<BannerStatus> {
        self.status.clone()
    }
}

/// The alert delivery pipeline for one operator session.
pub struct AlertPipeline<P: Presenter, D: Diagnostics = TracingDiagnostics> {
    controller: PresentationController<P>,
    diagnostics: D,
    acks: mpsc::UnboundedReceiver<PresentationId>,
    status: watch::Sender<BannerStatus>,
    channel: ChannelState,
}

impl<P: Presenter> AlertPipeline<P> {
    /// Create a pipeline that reports diagnostics through `tracing`.
    pub fn new(presenter: P, config: BannerConfig) -> (Self, BannerHandle) {
        Self::with_diagnostics(presenter, TracingDiagnostics, config)
    }
}

impl<P: Presenter, D: Diagnostics> AlertPipeline<P, D> {
    /// Create a pipeline with a custom diagnostics sink.
    pub fn with_diagnostics(
        presenter: P,
        diagnostics: D,
        config: BannerConfig,
    ) -> (Self, BannerHandle) {
        let (ack_tx, ack_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(BannerStatus::default());

        let pipeline = Self {
            controller: PresentationController::new(presenter, config.display_window),
            diagnostics,
            acks: ack_rx,
            status: status_tx,
            channel: ChannelState::Connecting,
        };
        let handle = BannerHandle {
            acks: ack_tx,
            status: status_rx,
        };

        (pipeline, handle)
    }

    /// Get a reference to the controller.
    pub fn controller(&self) -> &PresentationController<P> {
        &self.controller
    }

    /// Run until the process ends.
    ///
    /// The session has no natural end: after the channel closes, queued
    /// alerts are still shown and acknowledgments still accepted.
    pub async fn run<S>(self, events: S) -> PipelineSummary
    where
        S: Stream<Item = ChannelEvent>,
    {
        self.run_with_shutdown(events, std::future::pending()).await
    }

    /// Run until `shutdown_signal` completes.
    ///
    /// On shutdown the current alert is cleared from the screen and
    /// anything still queued is dropped.
    pub async fn run_with_shutdown<S, F>(mut self, events: S, shutdown_signal: F) -> PipelineSummary
    where
        S: Stream<Item = ChannelEvent>,
        F: Future<Output = ()>,
    {
        info!(
            presenter = self.controller.presenter().name(),
            display_window = ?self.controller.display_window(),
            "Starting alert pipeline"
        );

        tokio::pin!(events);
        tokio::pin!(shutdown_signal);

        let mut channel_live = true;
        let mut acks_open = true;
        self.publish_status();

        loop {
            // Rebuilt every iteration from the current state, so a timer
            // for a dismissed presentation is simply never polled again
            let deadline = self.controller.deadline();
            let timer = async move {
                match deadline {
                    Some(deadline) => sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                biased;

                () = &mut shutdown_signal => {
                    info!("Shutdown signal received, stopping alert pipeline");
                    break;
                }

                () = timer => {
                    let transition = self.controller.expire(Instant::now());
                    debug!(?transition, "Display window elapsed");
                }

                ack = self.acks.recv(), if acks_open => {
                    match ack {
                        Some(id) => {
                            let transition = self.controller.acknowledge(id, Instant::now());
                            debug!(?transition, "Operator acknowledged {}", id);
                        }
                        None => {
                            debug!("All banner handles dropped");
                            acks_open = false;
                        }
                    }
                }

                event = events.next(), if channel_live => {
                    match event {
                        Some(event) => {
                            if event.is_terminal() {
                                channel_live = false;
                            }
                            self.handle_event(event);
                        }
                        None => {
                            channel_live = false;
                            if matches!(self.channel, ChannelState::Connecting | ChannelState::Open) {
                                self.channel = ChannelState::Closed;
                                self.diagnostics.channel_closed();
                            }
                        }
                    }
                }
            }

            self.publish_status();
        }

        let dropped = self.controller.close();
        self.publish_status();

        PipelineSummary {
            displayed: self.controller.displayed(),
            dropped,
        }
    }

    /// Run until Ctrl+C is pressed.
    #[cfg(feature = "signal")]
    pub async fn run_until_stopped<S>(self, events: S) -> PipelineSummary
    where
        S: Stream<Item = ChannelEvent>,
    {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        };
        self.run_with_shutdown(events, shutdown).await
    }

    fn handle_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Opened => {
                self.channel = ChannelState::Open;
                self.diagnostics.channel_opened();
            }
            ChannelEvent::Alert(alert) => {
                let transition = self.controller.enqueue(alert, Instant::now());
                debug!(?transition, "Alert received");
            }
            ChannelEvent::Rejected(error) => {
                self.diagnostics.decode_failed(&error);
            }
            ChannelEvent::Closed => {
                self.channel = ChannelState::Closed;
                self.diagnostics.channel_closed();
            }
            ChannelEvent::Errored(error) => {
                self.channel = ChannelState::Failed;
                self.diagnostics.channel_errored(&error);
            }
        }
    }

    fn publish_status(&self) {
        self.status.send_replace(BannerStatus {
            current: self.controller.current().cloned(),
            pending: self.controller.pending(),
            channel: self.channel,
        });
    }
}
