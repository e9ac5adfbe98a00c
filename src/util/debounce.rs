// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Deadline-based value coalescing.
//!
//! The UI loop polls a `Debouncer` every frame instead of relying on a
//! background timer. The first value pushed into an empty window arms a
//! deadline; later pushes replace the pending value without moving the
//! deadline, so the committed value trails the live one by at most one window.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Queue `value`, replacing whatever is pending in the current window.
    pub fn push(&mut self, value: T, now: Instant) {
        let deadline = match self.pending.take() {
            Some((_, deadline)) => deadline,
            None => now + self.window,
        };
        self.pending = Some((value, deadline));
    }

    /// Take the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Drop the pending value without delivering it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(50);

    #[test]
    fn test_poll_waits_for_deadline() {
        let start = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.push(1, start);

        assert_eq!(d.poll(start + Duration::from_millis(10)), None);
        assert_eq!(d.poll(start + WINDOW), Some(1));
        assert_eq!(d.deadline(), None);
    }

    #[test]
    fn test_last_value_in_window_wins() {
        let start = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.push(1, start);
        d.push(2, start + Duration::from_millis(20));
        d.push(3, start + Duration::from_millis(40));

        // Deadline was armed by the first push only.
        assert_eq!(d.deadline(), Some(start + WINDOW));
        assert_eq!(d.poll(start + WINDOW), Some(3));
    }

    #[test]
    fn test_cancel_drops_pending() {
        let start = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.push("a", start);
        d.cancel();
        assert_eq!(d.deadline(), None);
        assert_eq!(d.poll(start + WINDOW * 2), None);

        // A push after cancel arms a fresh window.
        d.push("b", start + WINDOW);
        assert_eq!(d.deadline(), Some(start + WINDOW * 2));
    }
}
