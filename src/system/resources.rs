//! Assets bundled into the firmware image

use animface::{ResourceId, ResourceTable};

/// Bouncing ball, 98x98 pixels
pub const RESOURCE_ID_ANIMATION: ResourceId = ResourceId(1);

const ANIMATION: &[u8] = include_bytes!("../../assets/animation.fseq");

pub static RESOURCES: ResourceTable<'static> =
    ResourceTable::new(&[(RESOURCE_ID_ANIMATION, ANIMATION)]);
