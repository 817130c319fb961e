//! Frame animator
//!
//! State machine for timer-driven sequence playback:
//!
//! ```text
//! Idle --start--> Playing --frame decoded--> Playing
//!                 Playing --end of frames--> AtEnd  (cursor rewound, no timer)
//!                 AtEnd   --start/replay---> Playing
//! any --stop--> Idle
//! ```
//!
//! At most one timer is pending at any time; a new one is only scheduled from the handler of
//! the previous one. A fire that does not match the pending handle is dropped, so timers the host
//! queued before a `stop` or a swap never reach the decoder.

use super::{
    resource::{load_sequence, ResourceStore},
    AnimationError, ErrorReporter, FrameBuffer, FrameSequence, FrameStep, ResourceId, Scheduler,
    SequenceDecoder, TimerHandle,
};

use embedded_graphics::pixelcolor::Rgb565;

/// Delay of the first frame after a start, one tick to let the host loop run once.
pub const FIRST_FRAME_DELAY_MS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnimatorState {
    /// Nothing bound.
    Idle,
    /// A timer is pending for the next frame.
    Playing,
    /// The sequence ran out or failed; the cursor is back on the first frame.
    AtEnd,
}

/// What a timer fire did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FireOutcome {
    /// The fire did not belong to the pending timer.
    Ignored,
    /// A new frame is in the buffer and the next timer is armed.
    FrameReady,
    /// End of the sequence.
    Finished,
    /// A frame failed to decode, the error went to the reporter.
    Failed,
}

struct Playback<'a, D: SequenceDecoder> {
    decoder: D,
    buffer: FrameBuffer<'a, D::Color>,
}

/// Plays a [`SequenceDecoder`] into a [`FrameBuffer`] on one-shot timers.
pub struct FrameAnimator<'a, D, S, R>
where
    D: SequenceDecoder,
    S: Scheduler,
    R: ErrorReporter,
{
    scheduler: S,
    reporter: R,
    playback: Option<Playback<'a, D>>,
    pending: Option<TimerHandle>,
    state: AnimatorState,
}

impl<'a, D, S, R> FrameAnimator<'a, D, S, R>
where
    D: SequenceDecoder,
    S: Scheduler,
    R: ErrorReporter,
{
    pub fn new(scheduler: S, reporter: R) -> Self {
        Self {
            scheduler,
            reporter,
            playback: None,
            pending: None,
            state: AnimatorState::Idle,
        }
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    /// Handle of the timer the animator waits for.
    pub fn pending(&self) -> Option<TimerHandle> {
        self.pending
    }

    /// The bound frame buffer, if any.
    pub fn frame(&self) -> Option<&FrameBuffer<'a, D::Color>> {
        self.playback.as_ref().map(|playback| &playback.buffer)
    }

    pub fn frame_mut(&mut self) -> Option<&mut FrameBuffer<'a, D::Color>> {
        self.playback.as_mut().map(|playback| &mut playback.buffer)
    }

    pub fn decoder(&self) -> Option<&D> {
        self.playback.as_ref().map(|playback| &playback.decoder)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Bind `decoder` and `buffer` and schedule the first frame.
    ///
    /// A previous animation is stopped and dropped first. Fails without touching the animator
    /// when the buffer is not exactly one frame large.
    pub fn start(
        &mut self,
        decoder: D,
        buffer: FrameBuffer<'a, D::Color>,
    ) -> Result<(), AnimationError> {
        let expected = decoder.frame_size();
        if buffer.width() != expected.width || buffer.height() != expected.height {
            return Err(AnimationError::BufferMismatch {
                expected_width: expected.width,
                expected_height: expected.height,
                actual_width: buffer.width(),
                actual_height: buffer.height(),
            });
        }

        if self.stop().is_some() {
            debug!("replacing running animation");
        }

        self.playback = Some(Playback { decoder, buffer });
        self.arm(FIRST_FRAME_DELAY_MS);
        info!("animation started ({}x{})", expected.width, expected.height);
        Ok(())
    }

    /// Play the bound sequence again after it reached its end.
    ///
    /// Does nothing while playing.
    pub fn replay(&mut self) -> Result<(), AnimationError> {
        match self.state {
            AnimatorState::Idle => Err(AnimationError::NotLoaded),
            AnimatorState::Playing => Ok(()),
            AnimatorState::AtEnd => {
                self.arm(FIRST_FRAME_DELAY_MS);
                debug!("animation replaying");
                Ok(())
            }
        }
    }

    /// Handle an elapsed timer.
    pub fn on_timer_fire(&mut self, handle: TimerHandle) -> FireOutcome {
        if self.pending != Some(handle) {
            trace!("ignoring stale timer {}", handle.id());
            return FireOutcome::Ignored;
        }
        self.pending = None;

        let Some(playback) = self.playback.as_mut() else {
            self.state = AnimatorState::Idle;
            return FireOutcome::Ignored;
        };

        match playback.decoder.decode_next_frame(&mut playback.buffer) {
            Ok(FrameStep::Advanced { delay_ms }) => {
                playback.buffer.mark_dirty();
                self.arm(delay_ms);
                FireOutcome::FrameReady
            }
            Ok(FrameStep::Finished) => {
                // Rewind only. Playback stays parked until start or replay.
                playback.decoder.restart();
                self.state = AnimatorState::AtEnd;
                debug!("animation reached its end");
                FireOutcome::Finished
            }
            Err(err) => {
                playback.decoder.restart();
                self.state = AnimatorState::AtEnd;
                warn!("animation stopped on corrupt frame: {}", err);
                self.reporter.report(AnimationError::Decode(err));
                FireOutcome::Failed
            }
        }
    }

    /// Cancel the pending timer and hand back the decoder and buffer.
    ///
    /// Returns `None` when nothing was bound, a second stop is a no-op.
    pub fn stop(&mut self) -> Option<(D, FrameBuffer<'a, D::Color>)> {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        self.state = AnimatorState::Idle;

        let playback = self.playback.take()?;
        debug!("animation stopped");
        Some((playback.decoder, playback.buffer))
    }

    fn arm(&mut self, delay_ms: u32) {
        debug_assert!(self.pending.is_none());
        self.pending = Some(self.scheduler.schedule_once(delay_ms));
        self.state = AnimatorState::Playing;
    }
}

impl<'a, S, R> FrameAnimator<'a, FrameSequence<'a>, S, R>
where
    S: Scheduler,
    R: ErrorReporter,
{
    /// Open resource `id` from `store`, wrap `storage` as its frame buffer and start playing.
    ///
    /// On failure the animator is left as it was.
    pub fn load<T>(
        &mut self,
        store: &T,
        id: ResourceId,
        storage: &'a mut [Rgb565],
    ) -> Result<(), AnimationError>
    where
        T: ResourceStore<'a> + ?Sized,
    {
        let sequence = load_sequence(store, id).inspect_err(|err| {
            warn!("could not load animation: {}", err);
        })?;
        let buffer = FrameBuffer::new(storage, sequence.frame_size())?;
        self.start(sequence, buffer)
    }
}
