//! Binary buffer utilities for json-grip codecs.

mod writer;

pub use writer::Writer;
