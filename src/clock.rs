//! Time keeping
//!
//! The watch has no RTC backup, so wall time is a reference point (build time at boot) plus the
//! uptime elapsed since that reference was taken. Uptime is passed in by the caller in
//! milliseconds, which keeps this module free of the timer driver.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Timelike, Utc};

const MS_PER_MINUTE: u32 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeReference {
    /// Local clock time at the reference point
    time: NaiveDateTime,
    /// Uptime at the reference point
    uptime_ms: u64,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            time: DateTime::<Utc>::UNIX_EPOCH.naive_utc(),
            uptime_ms: 0,
        }
    }
}

impl TimeReference {
    /// Create new time reference from local clock time
    pub fn from_datetime(time: NaiveDateTime, uptime_ms: u64) -> Self {
        Self { time, uptime_ms }
    }

    /// Create new time reference from a UTC epoch and an offset to local time
    pub fn from_epoch(epoch_secs: i64, utc_offset_secs: i32, uptime_ms: u64) -> Option<Self> {
        let local = epoch_secs.checked_add(utc_offset_secs.into())?;
        let time = DateTime::from_timestamp(local, 0)?.naive_utc();
        Some(Self { time, uptime_ms })
    }
}

#[derive(Debug, Default)]
pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(reference: TimeReference) -> Self {
        Self { reference }
    }

    /// Local time at `uptime_ms`
    pub fn get_time(&self, uptime_ms: u64) -> NaiveDateTime {
        let elapsed = uptime_ms.saturating_sub(self.reference.uptime_ms);
        let elapsed = TimeDelta::try_milliseconds(elapsed as i64).unwrap_or(TimeDelta::zero());
        self.reference
            .time
            .checked_add_signed(elapsed)
            .unwrap_or(self.reference.time)
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        debug!("clock reference updated");
        self.reference = reference;
    }
}

/// Milliseconds from `now` to the start of the next minute, always in `1..=60_000`.
pub fn ms_until_next_minute(now: NaiveDateTime) -> u32 {
    // Leap seconds report nanoseconds past 1_000_000_000.
    let nanos = now.nanosecond().min(999_999_999);
    let into_minute = now.second() * 1_000 + nanos / 1_000_000;
    MS_PER_MINUTE - into_minute.min(MS_PER_MINUTE - 1)
}
