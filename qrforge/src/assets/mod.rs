//! Overlay font sources and on-disk asset persistence.

pub(crate) mod font;
pub(crate) mod writer;
