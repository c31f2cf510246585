//! Lazy iteration over a handle's value.

use crate::error::{Error, Result};
use crate::handle::{Json, Selector};
use crate::value::{JsonValue, Node};

/// Iterator produced by [`Json::iter`].
///
/// Over an array it yields one located handle per element in index order;
/// mutation through a yielded handle writes into the underlying array. Over
/// any other value it yields exactly one handle: the value itself. An
/// unresolvable slot yields nothing.
pub struct JsonIter {
    array: Option<ArrayCursor>,
    single: Option<Json>,
}

struct ArrayCursor {
    node: Node,
    pos: usize,
}

impl JsonIter {
    pub(crate) fn new(value: Option<Node>) -> Self {
        match value {
            None => JsonIter {
                array: None,
                single: None,
            },
            Some(n) => {
                let array_len = match &*n.borrow() {
                    JsonValue::Array(a) => Some(a.len()),
                    _ => None,
                };
                match array_len {
                    Some(0) => JsonIter {
                        array: None,
                        single: None,
                    },
                    Some(_) => JsonIter {
                        array: Some(ArrayCursor { node: n, pos: 0 }),
                        single: None,
                    },
                    None => JsonIter {
                        array: None,
                        single: Some(Json::wrapping(n)),
                    },
                }
            }
        }
    }

    /// Handle for the element the next call to [`Iterator::next`] would
    /// yield. Reports an error once the sequence is exhausted.
    pub fn current(&self) -> Result<Json> {
        if let Some(json) = &self.single {
            return Ok(json.clone());
        }
        if let Some(cursor) = &self.array {
            let len = match &*cursor.node.borrow() {
                JsonValue::Array(a) => a.len(),
                _ => 0,
            };
            if cursor.pos < len {
                return Ok(Json::located(
                    cursor.node.clone(),
                    Selector::Index(cursor.pos),
                ));
            }
        }
        Err(Error::InvalidIterator(
            "the iterator already reached the end".to_owned(),
        ))
    }
}

impl Iterator for JsonIter {
    type Item = Json;

    fn next(&mut self) -> Option<Json> {
        if let Some(json) = self.single.take() {
            return Some(json);
        }
        let cursor = self.array.as_mut()?;
        let len = match &*cursor.node.borrow() {
            JsonValue::Array(a) => a.len(),
            _ => 0,
        };
        if cursor.pos < len {
            let handle = Json::located(cursor.node.clone(), Selector::Index(cursor.pos));
            cursor.pos += 1;
            Some(handle)
        } else {
            None
        }
    }
}
