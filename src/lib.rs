//! Animated watchface for the PineTime.
//!
//! The portable part of the firmware: playback of bundled bitmap sequences driven by one-shot
//! timers, the wall clock and the watchface drawing. Everything here is `no_std` and free of
//! hardware access, the firmware binary (`firmware` feature) wires it to embassy and the LCD.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible in the other modules.
#[macro_use]
mod fmt;

pub mod animation;
pub mod clock;
pub mod settings;
pub mod ui;

pub use animation::{
    AnimationError, AnimatorState, ErrorReporter, FireOutcome, FrameAnimator, FrameBuffer,
    FrameSequence, FrameStep, ResourceId, ResourceTable, Scheduler, SequenceDecoder, TimerHandle,
};
pub use clock::TimeManager;
pub use settings::{ClockStyle, WatchfaceConfig};
pub use ui::{default_watchface::DefaultWatchface, WatchFace, WatchFaceState};
