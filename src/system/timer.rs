//! One-shot timers for the watchface task
//!
//! The watchface task owns the queue and awaits [`TimerQueue::next_deadline`]; the animator only
//! ever keeps one timer pending, so a single slot is enough.

use animface::{animation::TimerSlot, Scheduler, TimerHandle};
use embassy_time::Instant;

pub struct TimerQueue {
    slot: TimerSlot,
}

impl TimerQueue {
    pub const fn new() -> Self {
        Self {
            slot: TimerSlot::new(),
        }
    }

    /// Deadline of the pending timer
    pub fn next_deadline(&self) -> Option<Instant> {
        self.slot.deadline().map(Instant::from_millis)
    }

    /// Take the pending timer if its deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<TimerHandle> {
        self.slot.take_due(now.as_millis())
    }
}

impl Scheduler for TimerQueue {
    fn schedule_once(&mut self, delay_ms: u32) -> TimerHandle {
        self.slot.schedule(Instant::now().as_millis(), delay_ms)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.slot.cancel(handle);
    }
}
