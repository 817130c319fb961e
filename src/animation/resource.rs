//! Bundled resources

use core::fmt;

use super::{sequence::SequenceError, AnimationError, FrameSequence};

/// Identifier of a bundled resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResourceId(pub u16);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lookup of raw resource data by id.
pub trait ResourceStore<'a> {
    fn resource(&self, id: ResourceId) -> Option<&'a [u8]>;
}

/// Resources compiled into the firmware image.
#[derive(Debug, Clone, Copy)]
pub struct ResourceTable<'a> {
    entries: &'a [(ResourceId, &'a [u8])],
}

impl<'a> ResourceTable<'a> {
    pub const fn new(entries: &'a [(ResourceId, &'a [u8])]) -> Self {
        Self { entries }
    }
}

impl<'a> ResourceStore<'a> for ResourceTable<'a> {
    fn resource(&self, id: ResourceId) -> Option<&'a [u8]> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, data)| *data)
    }
}

/// Open the bitmap sequence stored under `id`.
pub fn load_sequence<'a, R>(store: &R, id: ResourceId) -> Result<FrameSequence<'a>, AnimationError>
where
    R: ResourceStore<'a> + ?Sized,
{
    let sequence = store
        .resource(id)
        .ok_or(SequenceError::Missing)
        .and_then(FrameSequence::new)
        .map_err(|source| AnimationError::ResourceLoad { id, source })?;

    debug!(
        "loaded sequence {:?}: {} frames",
        id,
        sequence.frame_count()
    );
    Ok(sequence)
}
