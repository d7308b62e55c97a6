//! One-shot timers owned by widgets.
//!
//! Widgets arm timers for transient state (button press flash, alert
//! clearing) by queueing a [`TimerRequest`] on the tree; the runtime moves
//! requests into the fixed-size [`TimerPool`] and delivers expiry as a
//! `Timer` input event to the owning widget. The pool holds one pending
//! timer per widget; re-arming replaces the deadline.

use std::time::Instant;

use crate::widget::WidgetId;

/// Number of concurrently armed timers. Spending a slot per transient
/// widget state keeps the pool small; exhaustion drops the newest request
/// with a warning.
const POOL_SLOTS: usize = 10;

/// A widget's wish to be poked `after_ms` milliseconds from now.
pub(crate) struct TimerRequest {
    pub widget: WidgetId,
    pub after_ms: u64,
}

#[derive(Clone, Copy)]
struct Timer {
    widget: WidgetId,
    deadline: Instant,
}

pub(crate) struct TimerPool {
    slots: [Option<Timer>; POOL_SLOTS],
}

impl TimerPool {
    pub fn new() -> Self {
        Self {
            slots: [None; POOL_SLOTS],
        }
    }

    /// Arms a timer, replacing a pending one for the same widget.
    pub fn arm(&mut self, widget: WidgetId, deadline: Instant) {
        if let Some(timer) = self.slots.iter_mut().flatten().find(|t| t.widget == widget) {
            timer.deadline = deadline;
            return;
        }

        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => *slot = Some(Timer { widget, deadline }),
            None => warn!("Timer pool exhausted, dropping timer for {widget:?}"),
        }
    }

    /// Earliest pending deadline, used as the backend poll timeout.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots.iter().flatten().map(|t| t.deadline).min()
    }

    /// Takes the earliest timer that expired at or before `now`, if any.
    /// One expiry per call; the poll loop dispatches one event at a time.
    pub fn pop_expired(&mut self, now: Instant) -> Option<WidgetId> {
        let expired = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|t| (i, t.deadline)))
            .filter(|(_, deadline)| *deadline <= now)
            .min_by_key(|(_, deadline)| *deadline)?;

        self.slots[expired.0].take().map(|t| t.widget)
    }
}
