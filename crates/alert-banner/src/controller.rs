//! Presentation state machine.
//!
//! The controller shows one alert at a time. An alert leaves the screen when
//! the operator acknowledges it or its display window runs out, whichever
//! comes first. Either way the controller immediately looks at the queue
//! again and shows the next alert, or goes idle.
//!
//! The controller never reads the clock. Every operation takes `now`, which
//! keeps it deterministic and lets the runtime decide what time means.

use std::time::Duration;

use alert_stream::Alert;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::presenter::{Dismissal, Presentation, PresentationId, Presenter};
use crate::queue::AlertQueue;

/// What the controller is doing.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationState {
    /// Nothing on screen and nothing queued.
    Idle,
    /// One alert on screen until its deadline.
    Displaying(Presentation),
}

impl PresentationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// The effect of one controller operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Idle -> Displaying on the first arrival.
    Displayed(PresentationId),
    /// The alert was appended behind the current presentation.
    Queued { pending: usize },
    /// A presentation was dismissed and the next queued alert went up.
    Advanced {
        dismissed: PresentationId,
        next: PresentationId,
    },
    /// A presentation was dismissed and the queue was empty.
    Idled { dismissed: PresentationId },
    /// Nothing changed (stale or repeated dismissal, early timer).
    Ignored,
}

/// Owns the alert queue and the presentation state for one session.
pub struct PresentationController<P: Presenter> {
    queue: AlertQueue,
    state: PresentationState,
    presenter: P,
    display_window: Duration,
    next_id: u64,
    displayed: u64,
}

impl<P: Presenter> PresentationController<P> {
    /// Create an idle controller.
    pub fn new(presenter: P, display_window: Duration) -> Self {
        Self {
            queue: AlertQueue::new(),
            state: PresentationState::Idle,
            presenter,
            display_window,
            next_id: 1,
            displayed: 0,
        }
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    /// The presentation on screen, if any.
    pub fn current(&self) -> Option<&Presentation> {
        match &self.state {
            PresentationState::Displaying(presentation) => Some(presentation),
            PresentationState::Idle => None,
        }
    }

    /// When the current presentation times out.
    pub fn deadline(&self) -> Option<Instant> {
        self.current().map(|p| p.deadline)
    }

    /// Alerts waiting behind the current presentation.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Alerts that have gone on screen so far.
    pub fn displayed(&self) -> u64 {
        self.displayed
    }

    pub fn display_window(&self) -> Duration {
        self.display_window
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Accept a newly arrived alert.
    ///
    /// Only an arrival onto an empty queue while idle puts something on
    /// screen. Later arrivals wait until the current presentation ends.
    pub fn enqueue(&mut self, alert: Alert, now: Instant) -> Transition {
        let first_arrival = self.queue.enqueue(alert);

        if first_arrival && self.state.is_idle() {
            if let Some(id) = self.display_next(now) {
                return Transition::Displayed(id);
            }
        }

        let pending = self.queue.len();
        debug!(pending, "Alert queued behind current presentation");
        Transition::Queued { pending }
    }

    /// The operator acknowledged presentation `id`.
    pub fn acknowledge(&mut self, id: PresentationId, now: Instant) -> Transition {
        self.dismiss(id, Dismissal::Acknowledged, now)
    }

    /// The display timer fired at `now`.
    ///
    /// Dismisses the current presentation only if its deadline has passed,
    /// so a timer armed for an earlier presentation cannot cut a later one
    /// short.
    pub fn expire(&mut self, now: Instant) -> Transition {
        match self.current() {
            Some(presentation) if now >= presentation.deadline => {
                let id = presentation.id;
                self.dismiss(id, Dismissal::TimedOut, now)
            }
            _ => Transition::Ignored,
        }
    }

    /// End the session: clear the screen and drop anything still queued.
    ///
    /// Returns how many queued alerts were never shown.
    pub fn close(&mut self) -> usize {
        if let PresentationState::Displaying(presentation) =
            std::mem::replace(&mut self.state, PresentationState::Idle)
        {
            if let Err(e) = self.presenter.clear(&presentation, Dismissal::SessionEnded) {
                warn!("Presenter failed to clear {}: {}", presentation.id, e);
            }
        }

        let dropped = self.queue.clear();
        if dropped > 0 {
            warn!(dropped, "Session ended with alerts still queued");
        }
        dropped
    }

    fn dismiss(&mut self, id: PresentationId, dismissal: Dismissal, now: Instant) -> Transition {
        let presentation = match std::mem::replace(&mut self.state, PresentationState::Idle) {
            PresentationState::Displaying(presentation) if presentation.id == id => presentation,
            other => {
                self.state = other;
                debug!("Ignoring dismissal of {} ({}): not on screen", id, dismissal);
                return Transition::Ignored;
            }
        };

        if let Err(e) = self.presenter.clear(&presentation, dismissal) {
            warn!("Presenter failed to clear {}: {}", id, e);
        }
        info!(
            building = %presentation.alert.building(),
            floor = presentation.alert.floor(),
            "Alert {} {}",
            id,
            dismissal
        );

        match self.display_next(now) {
            Some(next) => Transition::Advanced {
                dismissed: id,
                next,
            },
            None => Transition::Idled { dismissed: id },
        }
    }

    /// Show the head of the queue, if there is one.
    fn display_next(&mut self, now: Instant) -> Option<PresentationId> {
        let alert = self.queue.dequeue()?;
        let id = PresentationId(self.next_id);
        self.next_id += 1;

        let presentation = Presentation {
            id,
            alert,
            shown_at: now,
            deadline: now + self.display_window,
        };

        if let Err(e) = self.presenter.show(&presentation) {
            warn!("Presenter failed to show {}: {}", id, e);
        }
        info!(
            building = %presentation.alert.building(),
            floor = presentation.alert.floor(),
            pending = self.queue.len(),
            "Displaying alert {}",
            id
        );

        self.displayed += 1;
        self.state = PresentationState::Displaying(presentation);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::{PresenterCall, RecordingPresenter};
    use alert_stream::Building;
    use chrono::DateTime;

    const WINDOW: Duration = Duration::from_secs(60);

    fn alert(building: Building, floor: i64, secs: u32) -> Alert {
        let ts = format!("2025-08-06T14:00:{secs:02}+03:00");
        Alert::new(building, floor, DateTime::parse_from_rfc3339(&ts).unwrap()).unwrap()
    }

    fn controller() -> (PresentationController<RecordingPresenter>, RecordingPresenter) {
        let presenter = RecordingPresenter::new();
        (
            PresentationController::new(presenter.clone(), WINDOW),
            presenter,
        )
    }

    #[test]
    fn test_starts_idle() {
        let (controller, _) = controller();
        assert!(controller.state().is_idle());
        assert_eq!(controller.deadline(), None);
        assert_eq!(controller.pending(), 0);
    }

    #[test]
    fn test_first_arrival_wakes_controller() {
        let (mut controller, presenter) = controller();
        let t0 = Instant::now();

        let transition = controller.enqueue(alert(Building::A, 1, 1), t0);
        assert!(matches!(transition, Transition::Displayed(_)));
        assert_eq!(controller.deadline(), Some(t0 + WINDOW));
        assert_eq!(controller.pending(), 0);
        assert!(presenter.is_showing());
    }

    #[test]
    fn test_later_arrivals_only_queue() {
        let (mut controller, presenter) = controller();
        let t0 = Instant::now();

        controller.enqueue(alert(Building::A, 1, 1), t0);
        let current = controller.current().cloned();

        let transition = controller.enqueue(alert(Building::A, 1, 2), t0);
        assert_eq!(transition, Transition::Queued { pending: 1 });
        assert_eq!(controller.current().cloned(), current);
        assert_eq!(presenter.calls().len(), 1);
    }

    #[test]
    fn test_timeout_chains_without_gap() {
        let (mut controller, presenter) = controller();
        let t0 = Instant::now();

        let Transition::Displayed(first) = controller.enqueue(alert(Building::A, 1, 1), t0) else {
            panic!("expected display");
        };
        controller.enqueue(alert(Building::B, 3, 2), t0);

        let t1 = t0 + WINDOW;
        let transition = controller.expire(t1);
        let Transition::Advanced { dismissed, next } = transition else {
            panic!("expected advance, got {transition:?}");
        };
        assert_eq!(dismissed, first);
        let current = controller.current().unwrap();
        assert_eq!(current.id, next);
        assert_eq!(current.shown_at, t1);
        assert_eq!(current.alert.building(), Building::B);

        let calls = presenter.calls();
        assert!(matches!(calls[1], PresenterCall::Clear { dismissal: Dismissal::TimedOut, .. }));
        assert!(matches!(calls[2], PresenterCall::Show { .. }));
    }

    #[test]
    fn test_early_timer_is_ignored() {
        let (mut controller, _) = controller();
        let t0 = Instant::now();
        controller.enqueue(alert(Building::A, 1, 1), t0);

        assert_eq!(controller.expire(t0 + WINDOW / 2), Transition::Ignored);
        assert!(controller.current().is_some());
    }

    #[test]
    fn test_acknowledge_is_idempotent() {
        let (mut controller, presenter) = controller();
        let t0 = Instant::now();

        let Transition::Displayed(id) = controller.enqueue(alert(Building::C, 2, 1), t0) else {
            panic!("expected display");
        };
        let t1 = t0 + Duration::from_secs(2);

        assert_eq!(
            controller.acknowledge(id, t1),
            Transition::Idled { dismissed: id }
        );
        let calls_after_first = presenter.calls();

        assert_eq!(controller.acknowledge(id, t1), Transition::Ignored);
        assert_eq!(controller.expire(t0 + WINDOW), Transition::Ignored);
        assert!(controller.state().is_idle());
        assert_eq!(presenter.calls(), calls_after_first);
    }

    #[test]
    fn test_stale_ack_does_not_dismiss_next_alert() {
        let (mut controller, _) = controller();
        let t0 = Instant::now();

        let Transition::Displayed(first) = controller.enqueue(alert(Building::A, 1, 1), t0) else {
            panic!("expected display");
        };
        controller.enqueue(alert(Building::A, 2, 2), t0);

        let Transition::Advanced { next, .. } = controller.acknowledge(first, t0) else {
            panic!("expected advance");
        };
        assert_eq!(controller.acknowledge(first, t0), Transition::Ignored);
        assert_eq!(controller.current().map(|p| p.id), Some(next));
    }

    #[test]
    fn test_close_clears_screen_and_queue() {
        let (mut controller, presenter) = controller();
        let t0 = Instant::now();
        controller.enqueue(alert(Building::A, 1, 1), t0);
        controller.enqueue(alert(Building::A, 1, 2), t0);
        controller.enqueue(alert(Building::A, 1, 3), t0);

        assert_eq!(controller.close(), 2);
        assert!(controller.state().is_idle());
        assert!(matches!(
            presenter.calls().last(),
            Some(PresenterCall::Clear {
                dismissal: Dismissal::SessionEnded,
                ..
            })
        ));
    }

    #[test]
    fn test_ids_increase() {
        let (mut controller, _) = controller();
        let t0 = Instant::now();
        let Transition::Displayed(a) = controller.enqueue(alert(Building::A, 1, 1), t0) else {
            panic!("expected display");
        };
        controller.acknowledge(a, t0);
        let Transition::Displayed(b) = controller.enqueue(alert(Building::A, 1, 2), t0) else {
            panic!("expected display");
        };
        assert!(b > a);
        assert_eq!(controller.displayed(), 2);
    }
}
