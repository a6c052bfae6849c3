//! Archive page parsing: byte decoding, markup extraction, and date headers.

mod consts;
pub mod date;
pub mod encoding;
pub mod page;
