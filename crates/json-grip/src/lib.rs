//! In-memory JSON document model with a mutable path-handle API and a
//! binary CBOR (RFC 7049) codec.
//!
//! A [`Json`] handle navigates and builds trees with index/key chaining;
//! missing intermediate containers are created on demand. The same tree
//! serializes to compact or pretty text and to CBOR bytes, and both forms
//! decode back losslessly.
//!
//! # Example
//!
//! ```
//! use json_grip::Json;
//!
//! let mut doc = Json::new();
//! doc.at(1)?.key("one")?.set(2)?;
//! assert_eq!(doc.dump(None), "[null,{\"one\":2}]");
//!
//! let bytes = doc.to_cbor();
//! let (decoded, consumed) = Json::from_cbor(&bytes)?;
//! assert_eq!(consumed, bytes.len());
//! assert!(doc.structural_eq(&decoded));
//! # Ok::<(), json_grip::Error>(())
//! ```

mod error;
mod handle;
mod iter;
mod number;
mod parse;
mod value;

pub mod cbor;

pub use error::{Error, Result};
pub use handle::{FromJson, Json};
pub use iter::JsonIter;
pub use number::{is_double_precision, Number, NumberKind};
pub use value::{node, JsonArray, JsonObject, JsonValue, Node, ValueType};
