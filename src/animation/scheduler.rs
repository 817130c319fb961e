//! One-shot timer abstraction

/// Token for a scheduled one-shot timer.
///
/// The host hands the token back when the timer elapses, the animator compares it against the
/// timer it is waiting for and drops anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerHandle(u32);

impl TimerHandle {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Host timer service.
///
/// Implementations only record the request; firing happens when the host loop sees the deadline
/// pass and calls back into the owner of the handle.
pub trait Scheduler {
    /// Register a timer that fires once after `delay_ms` milliseconds.
    fn schedule_once(&mut self, delay_ms: u32) -> TimerHandle;

    /// Cancel a timer. Cancelling a timer that already fired or was cancelled does nothing.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Single pending one-shot timer on a millisecond clock.
///
/// Hosts with a monotonic clock back their [`Scheduler`] with this: arm with the current time,
/// sleep until [`TimerSlot::deadline`], then collect the handle with [`TimerSlot::take_due`].
#[derive(Debug, Default)]
pub struct TimerSlot {
    next_id: u32,
    pending: Option<(TimerHandle, u64)>,
}

impl TimerSlot {
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            pending: None,
        }
    }

    /// Arm a timer due `delay_ms` after `now_ms`. A timer still pending is dropped.
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u32) -> TimerHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = TimerHandle::new(self.next_id);

        if let Some((replaced, _)) = self.pending {
            warn!("timer {} replaced before it fired", replaced.id());
        }
        self.pending = Some((handle, now_ms.saturating_add(delay_ms.into())));

        handle
    }

    /// Deadline of the pending timer in milliseconds.
    pub fn deadline(&self) -> Option<u64> {
        self.pending.map(|(_, at)| at)
    }

    /// Take the pending timer if its deadline is not after `now_ms`.
    pub fn take_due(&mut self, now_ms: u64) -> Option<TimerHandle> {
        match self.pending {
            Some((handle, at)) if at <= now_ms => {
                self.pending = None;
                Some(handle)
            }
            _ => None,
        }
    }

    /// Disarm `handle`. Other handles leave the pending timer alone.
    pub fn cancel(&mut self, handle: TimerHandle) {
        if matches!(self.pending, Some((pending, _)) if pending == handle) {
            self.pending = None;
        }
    }
}
