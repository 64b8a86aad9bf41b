//! Byte encodings of rendered output: PNG and the base64 preview form.

pub(crate) mod png;
pub(crate) mod preview;
