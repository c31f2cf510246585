//! RFC 7049 binary codec for the value tree.
//!
//! The encoder emits definite-length items only; the decoder additionally
//! accepts indefinite-length strings, arrays, and objects from third-party
//! encoders.

mod constants;
mod decoder;
mod encoder;

pub use constants::{major_type_of, MajorType};
pub use decoder::CborDecoder;
pub use encoder::CborEncoder;
