//! FIFO buffer of alerts waiting to be displayed.

use std::collections::VecDeque;

use alert_stream::Alert;

/// Alerts awaiting display, in arrival order.
///
/// Appends only at the tail and removes only from the head. The queue is
/// unbounded: an alert is never dropped to make room.
#[derive(Debug, Default)]
pub struct AlertQueue {
    items: VecDeque<Alert>,
}

impl AlertQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an alert at the tail.
    ///
    /// Returns `true` when the queue went from empty to non-empty, which is
    /// the only arrival that should wake an idle consumer.
    pub fn enqueue(&mut self, alert: Alert) -> bool {
        let was_empty = self.items.is_empty();
        self.items.push_back(alert);
        was_empty
    }

    /// The alert that would be dequeued next.
    pub fn peek_front(&self) -> Option<&Alert> {
        self.items.front()
    }

    /// Remove and return the oldest alert.
    pub fn dequeue(&mut self) -> Option<Alert> {
        self.items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of alerts awaiting display.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Drop every pending alert, returning how many there were.
    pub(crate) fn clear(&mut self) -> usize {
        let count = self.items.len();
        self.items.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_stream::Building;
    use chrono::DateTime;

    fn alert(building: Building, floor: i64, ts: &str) -> Alert {
        Alert::new(building, floor, DateTime::parse_from_rfc3339(ts).unwrap()).unwrap()
    }

    #[test]
    fn test_enqueue_reports_first_arrival_only() {
        let mut queue = AlertQueue::new();
        assert!(queue.enqueue(alert(Building::A, 1, "2025-08-06T10:00:00Z")));
        assert!(!queue.enqueue(alert(Building::A, 1, "2025-08-06T10:00:01Z")));
        assert_eq!(queue.len(), 2);

        queue.dequeue();
        queue.dequeue();
        assert!(queue.is_empty());
        assert!(queue.enqueue(alert(Building::B, 2, "2025-08-06T10:00:02Z")));
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = AlertQueue::new();
        let first = alert(Building::A, 1, "2025-08-06T10:00:00Z");
        let second = alert(Building::C, 4, "2025-08-06T10:00:01Z");
        queue.enqueue(first.clone());
        queue.enqueue(second.clone());

        assert_eq!(queue.peek_front(), Some(&first));
        assert_eq!(queue.dequeue(), Some(first));
        assert_eq!(queue.dequeue(), Some(second));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn test_identical_alerts_are_kept() {
        let mut queue = AlertQueue::new();
        let a = alert(Building::A, 1, "2025-08-06T10:00:00Z");
        queue.enqueue(a.clone());
        queue.enqueue(a);
        assert_eq!(queue.len(), 2);
    }
}
