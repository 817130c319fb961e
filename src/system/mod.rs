pub(crate) mod config;
pub(crate) mod resources;
pub(crate) mod timer;
