//! Style inputs: color parsing, validated configuration and the shared pixel geometry.

pub(crate) mod color;
pub(crate) mod config;
pub(crate) mod geometry;
