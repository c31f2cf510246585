//! The path-handle proxy: the mutable navigation and assignment surface.

use crate::cbor::CborDecoder;
use crate::error::{Error, Result};
use crate::iter::JsonIter;
use crate::parse;
use crate::value::{node, JsonArray, JsonObject, JsonValue, Node, ValueType};

/// Selector identifying one logical slot inside a parent container.
#[derive(Debug, Clone)]
pub(crate) enum Selector {
    Index(usize),
    Key(String),
}

/// A mutable handle over a JSON tree.
///
/// A handle is either a *root* (depth 0), directly holding a value, or
/// *located* (depth ≥ 1), holding a parent container plus one selector. A
/// located handle resolves its selector on every access; the slot it names
/// may not exist yet. Indexing into an absent or null slot upgrades it to an
/// empty array or object as the selector requires (autovivification).
///
/// Cloning a handle shares the underlying tree. [`Json::copy`] is the only
/// operation that produces an independent deep clone.
///
/// # Example
///
/// ```
/// use json_grip::Json;
///
/// let mut doc = Json::new();
/// doc.at(1)?.key("one")?.set(2)?;
/// assert_eq!(doc.dump(None), "[null,{\"one\":2}]");
/// # Ok::<(), json_grip::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Json {
    depth: usize,
    data: Option<Node>,
    selector: Option<Selector>,
}

impl Json {
    /// Creates an empty root handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a root handle over an empty array.
    pub fn array() -> Self {
        Self::wrapping(node(JsonValue::Array(JsonArray::new())))
    }

    /// Creates a root handle over an empty object.
    pub fn object() -> Self {
        Self::wrapping(node(JsonValue::Object(JsonObject::new())))
    }

    /// Creates a root handle over `value`.
    pub fn from_value(value: JsonValue) -> Self {
        Self::wrapping(node(value))
    }

    pub(crate) fn wrapping(data: Node) -> Self {
        Json {
            depth: 0,
            data: Some(data),
            selector: None,
        }
    }

    pub(crate) fn located(parent: Node, selector: Selector) -> Self {
        Json {
            depth: 1,
            data: Some(parent),
            selector: Some(selector),
        }
    }

    /// Parses a JSON text into a tree. The top-level value must be an array
    /// or an object.
    pub fn parse(input: &str) -> Result<Json> {
        Ok(Self::wrapping(parse::parse_text(input)?))
    }

    /// Parses a UTF-8 JSON byte buffer into a tree.
    pub fn parse_bytes(input: &[u8]) -> Result<Json> {
        Ok(Self::wrapping(parse::parse_slice(input)?))
    }

    /// Decodes one CBOR item, returning the tree and the number of bytes
    /// consumed, so concatenated items can be decoded in sequence.
    pub fn from_cbor(input: &[u8]) -> Result<(Json, usize)> {
        let mut decoder = CborDecoder::new();
        let (value, consumed) = decoder.decode(input)?;
        Ok((Self::wrapping(node(value)), consumed))
    }

    /// Encodes the resolved value as CBOR. An empty handle yields no bytes.
    pub fn to_cbor(&self) -> Vec<u8> {
        match self.resolved() {
            Some(n) => n.borrow().to_cbor(),
            None => Vec::new(),
        }
    }

    /// Child handle for array index `index`.
    ///
    /// The current slot must resolve to an array, or to absent/null, in
    /// which case it is upgraded to an empty array first.
    pub fn at(&mut self, index: usize) -> Result<Json> {
        let parent = self.step_container(true)?;
        Ok(Json {
            depth: self.depth + 1,
            data: Some(parent),
            selector: Some(Selector::Index(index)),
        })
    }

    /// Child handle for object key `key`.
    ///
    /// The current slot must resolve to an object, or to absent/null, in
    /// which case it is upgraded to an empty object first.
    pub fn key(&mut self, key: &str) -> Result<Json> {
        let parent = self.step_container(false)?;
        Ok(Json {
            depth: self.depth + 1,
            data: Some(parent),
            selector: Some(Selector::Key(key.to_owned())),
        })
    }

    /// Overwrites the resolved slot with a scalar.
    ///
    /// When the slot already holds a value of the same variant the node is
    /// updated in place, so aliases of the node observe the new value.
    /// Otherwise the slot's node is replaced.
    pub fn set<T: Into<JsonValue>>(&mut self, value: T) -> Result<()> {
        let value = value.into();
        let existing = if self.depth == 0 {
            self.data.clone()
        } else {
            self.current_value()?
        };
        match existing {
            Some(n) => {
                let same_variant =
                    std::mem::discriminant(&*n.borrow()) == std::mem::discriminant(&value);
                if same_variant {
                    *n.borrow_mut() = value;
                    Ok(())
                } else {
                    self.fill_current_slot(Some(node(value)))
                }
            }
            None => self.fill_current_slot(Some(node(value))),
        }
    }

    /// Points the resolved slot at `other`'s subtree without copying.
    ///
    /// The subtree is aliased afterwards: mutation through either handle is
    /// visible through the other. Use [`Json::copy`] first for an
    /// independent assignment.
    pub fn assign(&mut self, other: &Json) -> Result<()> {
        let value = other.current_value()?;
        self.fill_current_slot(value)
    }

    /// Reads the resolved slot as `T`. An absent slot reads as null, so
    /// scalar reads on it report a type error.
    pub fn get<T: FromJson>(&self) -> Result<T> {
        match self.current_value()? {
            Some(n) => T::from_json(&n.borrow()),
            None => T::from_json(&JsonValue::Null),
        }
    }

    /// Appends `value` to the resolved array, upgrading an absent or null
    /// slot to an empty array first. The appended subtree is aliased, not
    /// copied.
    pub fn push_back(&mut self, value: impl Into<Json>) -> Result<()> {
        let value = value.into();
        let item = value.current_value()?;
        let target = self.resolve_array_for_append()?;
        let result = match &mut *target.borrow_mut() {
            JsonValue::Array(a) => {
                a.push(item);
                Ok(())
            }
            other => Err(Error::Other(format!(
                "push_back target resolved to a {}",
                other.type_name()
            ))),
        };
        result
    }

    /// Removes `key` from the resolved object. Returns `false` when the key
    /// is absent or the slot is not an object.
    pub fn erase_key(&mut self, key: &str) -> bool {
        match self.resolved() {
            Some(n) => match &mut *n.borrow_mut() {
                JsonValue::Object(o) => o.erase(key),
                _ => false,
            },
            None => false,
        }
    }

    /// Removes the entry at `index` from the resolved array. Returns
    /// `false` when the index is past the end or the slot is not an array.
    pub fn erase_index(&mut self, index: usize) -> bool {
        match self.resolved() {
            Some(n) => match &mut *n.borrow_mut() {
                JsonValue::Array(a) => a.erase(index),
                _ => false,
            },
            None => false,
        }
    }

    /// Number of elements of the resolved array or object; 0 for anything
    /// else.
    pub fn size(&self) -> usize {
        match self.resolved() {
            Some(n) => match &*n.borrow() {
                JsonValue::Array(a) => a.len(),
                JsonValue::Object(o) => o.len(),
                _ => 0,
            },
            None => 0,
        }
    }

    /// Whether the resolved object contains `key`. `false` for non-objects.
    pub fn has_key(&self, key: &str) -> bool {
        match self.resolved() {
            Some(n) => match &*n.borrow() {
                JsonValue::Object(o) => o.has_key(key),
                _ => false,
            },
            None => false,
        }
    }

    /// Variant tag of the resolved slot; an absent slot is null.
    pub fn get_type(&self) -> ValueType {
        match self.resolved() {
            Some(n) => n.borrow().value_type(),
            None => ValueType::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        self.get_type() == ValueType::Null
    }

    pub fn is_boolean(&self) -> bool {
        self.get_type() == ValueType::Boolean
    }

    pub fn is_number(&self) -> bool {
        self.get_type() == ValueType::Number
    }

    pub fn is_string(&self) -> bool {
        self.get_type() == ValueType::String
    }

    pub fn is_array(&self) -> bool {
        self.get_type() == ValueType::Array
    }

    pub fn is_object(&self) -> bool {
        self.get_type() == ValueType::Object
    }

    pub fn is_structured(&self) -> bool {
        matches!(self.get_type(), ValueType::Array | ValueType::Object)
    }

    /// Whether the resolved value has no content of its own. Null, booleans,
    /// and numbers are never empty; an unresolvable slot is.
    pub fn is_empty(&self) -> bool {
        match self.resolved() {
            Some(n) => n.borrow().is_empty(),
            None => true,
        }
    }

    /// Resets this handle to an empty root, detaching it from any tree.
    pub fn clear(&mut self) {
        *self = Json::new();
    }

    /// Deep clone of the resolved value, wrapped in a fresh root handle.
    pub fn copy(&self) -> Json {
        match self.resolved() {
            Some(n) => Self::wrapping(node(n.borrow().deep_copy())),
            None => Json::new(),
        }
    }

    /// Textual form of the resolved value. `None` renders compact text,
    /// `Some(width)` pretty text with `width` spaces per nesting level. An
    /// empty root dumps as `{}`; an absent located slot dumps as `null`.
    pub fn dump(&self, indent: Option<usize>) -> String {
        match self.resolved() {
            Some(n) => match indent {
                None => n.borrow().dump(),
                Some(width) => n.borrow().dump_pretty(width, 0),
            },
            None => {
                if self.depth != 0 {
                    "null".to_owned()
                } else {
                    "{}".to_owned()
                }
            }
        }
    }

    /// Deep equality with `other`, ignoring object key order.
    pub fn structural_eq(&self, other: &Json) -> bool {
        match (self.resolved(), other.resolved()) {
            (None, None) => true,
            (Some(a), Some(b)) => a.borrow().structural_eq(&b.borrow()),
            (None, Some(b)) => matches!(&*b.borrow(), JsonValue::Null),
            (Some(a), None) => matches!(&*a.borrow(), JsonValue::Null),
        }
    }

    /// Lazy sequence of handles over the resolved value: one per array
    /// element in index order, or the value itself exactly once for
    /// anything that is not an array.
    pub fn iter(&self) -> JsonIter {
        JsonIter::new(self.resolved())
    }

    /// Resolves the current slot: the root value, or the selector applied
    /// to the parent container. A located handle whose parent and selector
    /// shapes disagree is an internal defect.
    fn current_value(&self) -> Result<Option<Node>> {
        if self.depth == 0 {
            return Ok(self.data.clone());
        }
        let parent = match &self.data {
            Some(p) => p,
            None => {
                return Err(Error::Other(format!(
                    "located handle without a parent, depth = {}",
                    self.depth
                )))
            }
        };
        match &self.selector {
            Some(Selector::Index(i)) => match &*parent.borrow() {
                JsonValue::Array(a) => Ok(a.get_at(*i)),
                other => Err(Error::Other(format!(
                    "index selector over a {}",
                    other.type_name()
                ))),
            },
            Some(Selector::Key(k)) => match &*parent.borrow() {
                JsonValue::Object(o) => Ok(o.get(k)),
                other => Err(Error::Other(format!(
                    "key selector over a {}",
                    other.type_name()
                ))),
            },
            None => Err(Error::Other(format!(
                "located handle without a selector, depth = {}",
                self.depth
            ))),
        }
    }

    fn resolved(&self) -> Option<Node> {
        self.current_value().ok().flatten()
    }

    /// Writes `slot` into the location this handle names: the root value
    /// for a root handle, the selected slot of the parent otherwise.
    fn fill_current_slot(&mut self, slot: Option<Node>) -> Result<()> {
        if self.depth == 0 {
            self.data = slot;
            return Ok(());
        }
        let parent = match &self.data {
            Some(p) => p.clone(),
            None => {
                return Err(Error::Other(format!(
                    "located handle without a parent, depth = {}",
                    self.depth
                )))
            }
        };
        match &self.selector {
            Some(Selector::Index(i)) => match &mut *parent.borrow_mut() {
                JsonValue::Array(a) => {
                    a.set_at(*i, slot);
                    Ok(())
                }
                other => Err(Error::Other(format!(
                    "index selector over a {}",
                    other.type_name()
                ))),
            },
            Some(Selector::Key(k)) => match &mut *parent.borrow_mut() {
                JsonValue::Object(o) => {
                    o.set(k.clone(), slot.unwrap_or_else(|| node(JsonValue::Null)));
                    Ok(())
                }
                other => Err(Error::Other(format!(
                    "key selector over a {}",
                    other.type_name()
                ))),
            },
            None => Err(Error::Other(format!(
                "located handle without a selector, depth = {}",
                self.depth
            ))),
        }
    }

    /// Resolves the current slot to the container a child selector needs,
    /// upgrading absent/null in place. A slot of any other shape is a type
    /// error.
    fn step_container(&mut self, want_array: bool) -> Result<Node> {
        let current = if self.depth == 0 {
            self.data.clone()
        } else {
            self.current_value()?
        };
        match current {
            Some(n) => {
                if matches!(&*n.borrow(), JsonValue::Null) {
                    let fresh = self.fresh_container(want_array)?;
                    return Ok(fresh);
                }
                let matches_kind = matches!(
                    (&*n.borrow(), want_array),
                    (JsonValue::Array(_), true) | (JsonValue::Object(_), false)
                );
                if matches_kind {
                    Ok(n)
                } else {
                    Err(Error::Type(format!(
                        "cannot use {} with a {}",
                        if want_array {
                            "an array index"
                        } else {
                            "an object key"
                        },
                        n.borrow().type_name()
                    )))
                }
            }
            None => self.fresh_container(want_array),
        }
    }

    fn fresh_container(&mut self, want_array: bool) -> Result<Node> {
        let fresh = node(if want_array {
            JsonValue::Array(JsonArray::new())
        } else {
            JsonValue::Object(JsonObject::new())
        });
        self.fill_current_slot(Some(fresh.clone()))?;
        Ok(fresh)
    }

    /// Resolves the current slot to an array for appending, upgrading
    /// absent/null to an empty array.
    fn resolve_array_for_append(&mut self) -> Result<Node> {
        let current = if self.depth == 0 {
            self.data.clone()
        } else {
            self.current_value()?
        };
        match current {
            Some(n) => {
                if matches!(&*n.borrow(), JsonValue::Array(_)) {
                    return Ok(n);
                }
                if matches!(&*n.borrow(), JsonValue::Null) {
                    return self.fresh_container(true);
                }
                Err(Error::Type(format!(
                    "cannot use push_back() with a {}",
                    n.borrow().type_name()
                )))
            }
            None => self.fresh_container(true),
        }
    }
}

impl<'a> IntoIterator for &'a Json {
    type Item = Json;
    type IntoIter = JsonIter;

    fn into_iter(self) -> JsonIter {
        self.iter()
    }
}

/// Typed extraction from a [`JsonValue`], used by [`Json::get`].
///
/// Integer reads go through the number's unsigned 64-bit raw form and
/// truncate to the requested width.
pub trait FromJson: Sized {
    fn from_json(value: &JsonValue) -> Result<Self>;
}

impl FromJson for bool {
    fn from_json(value: &JsonValue) -> Result<Self> {
        match value {
            JsonValue::Boolean(b) => Ok(*b),
            other => Err(Error::Type(format!(
                "type must be boolean, but is {}",
                other.type_name()
            ))),
        }
    }
}

impl FromJson for String {
    fn from_json(value: &JsonValue) -> Result<Self> {
        match value {
            JsonValue::String(s) => Ok(s.clone()),
            other => Err(Error::Type(format!(
                "type must be string, but is {}",
                other.type_name()
            ))),
        }
    }
}

impl FromJson for f64 {
    fn from_json(value: &JsonValue) -> Result<Self> {
        match value {
            JsonValue::Number(n) => Ok(n.as_f64()),
            other => Err(Error::Type(format!(
                "type must be number, but is {}",
                other.type_name()
            ))),
        }
    }
}

impl FromJson for f32 {
    fn from_json(value: &JsonValue) -> Result<Self> {
        f64::from_json(value).map(|v| v as f32)
    }
}

macro_rules! from_json_integer {
    ($($ty:ty),*) => {
        $(impl FromJson for $ty {
            fn from_json(value: &JsonValue) -> Result<Self> {
                match value {
                    JsonValue::Number(n) => Ok(n.as_u64() as $ty),
                    other => Err(Error::Type(format!(
                        "type must be number, but is {}",
                        other.type_name()
                    ))),
                }
            }
        })*
    };
}

from_json_integer!(u8, u16, u32, u64, i8, i16, i32, i64);

macro_rules! json_from_scalar {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Json {
            fn from(v: $ty) -> Json {
                Json::from_value(v.into())
            }
        })*
    };
}

json_from_scalar!(bool, f32, f64, i8, i16, i32, i64, u8, u16, u32, u64, &str, String);

impl<T: Into<JsonValue>> From<Vec<T>> for Json {
    fn from(items: Vec<T>) -> Json {
        let mut arr = JsonArray::new();
        for item in items {
            arr.push(Some(node(item.into())));
        }
        Json::from_value(JsonValue::Array(arr))
    }
}

/// Collects key-value pairs into an object root. Later pairs overwrite
/// earlier ones with the same key.
impl<K: Into<String>, V: Into<JsonValue>> FromIterator<(K, V)> for Json {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Json {
        let mut obj = JsonObject::new();
        for (key, value) in pairs {
            obj.set(key, node(value.into()));
        }
        Json::from_value(JsonValue::Object(obj))
    }
}
