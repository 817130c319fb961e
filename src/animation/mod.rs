//! Bitmap sequence playback
//!
//! A [`FrameAnimator`] decodes one frame at a time from a [`SequenceDecoder`] into a
//! [`FrameBuffer`] and re-arms a one-shot timer through an injected [`Scheduler`] with the
//! delay the decoder asks for. When the sequence runs out the cursor is rewound, but playback
//! only resumes once the owner calls [`FrameAnimator::start`] or [`FrameAnimator::replay`].

pub mod animator;
pub mod buffer;
pub mod resource;
pub mod scheduler;
pub mod sequence;

pub use animator::{AnimatorState, FireOutcome, FrameAnimator, FIRST_FRAME_DELAY_MS};
pub use buffer::{BufferError, FrameBuffer};
pub use resource::{load_sequence, ResourceId, ResourceStore, ResourceTable};
pub use scheduler::{Scheduler, TimerHandle, TimerSlot};
pub use sequence::{
    CorruptionKind, DecodeError, FrameSequence, FrameStep, SequenceDecoder, SequenceError,
};

/// Errors surfaced by the animator, either synchronously or through an [`ErrorReporter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnimationError {
    /// The sequence resource is missing or its header is malformed.
    #[error("resource {id} could not be loaded: {source}")]
    ResourceLoad {
        id: ResourceId,
        #[source]
        source: SequenceError,
    },
    /// The frame buffer does not have the frame size of the sequence.
    #[error("frame buffer is {actual_width}x{actual_height}, sequence frames are {expected_width}x{expected_height}")]
    BufferMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    /// Pixel storage could not back a frame buffer.
    #[error(transparent)]
    Buffer(#[from] BufferError),
    /// A frame failed to decode mid-sequence.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// No sequence is bound to the animator.
    #[error("no animation loaded")]
    NotLoaded,
}

/// Sink for errors raised while handling a timer, which has no caller to return them to.
pub trait ErrorReporter {
    fn report(&mut self, error: AnimationError);
}

impl<F> ErrorReporter for F
where
    F: FnMut(AnimationError),
{
    fn report(&mut self, error: AnimationError) {
        self(error)
    }
}
