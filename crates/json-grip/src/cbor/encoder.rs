//! `CborEncoder` — writes a value tree as definite-length CBOR.

use json_grip_buffers::Writer;

use super::constants::{
    DOUBLE_PRECISION_PREFIX, FALSE_CODE, MAJOR_ARRAY, MAJOR_NEGATIVE, MAJOR_OBJECT, MAJOR_STRING,
    MAJOR_UNSIGNED, NULL_CODE, SINGLE_PRECISION_PREFIX, TRUE_CODE,
};
use crate::number::{is_double_precision, NumberKind};
use crate::value::JsonValue;

/// CBOR encoder over a growable binary writer.
///
/// Integers and lengths use the minimal width tier that fits. Floats are
/// written in single precision when the classifier judges single precision
/// sufficient, double precision otherwise. Containers are always
/// definite-length.
pub struct CborEncoder {
    pub writer: Writer,
}

impl Default for CborEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CborEncoder {
    pub fn new() -> Self {
        CborEncoder {
            writer: Writer::new(),
        }
    }

    pub fn with_writer(writer: Writer) -> Self {
        CborEncoder { writer }
    }

    /// Encodes one value and returns its bytes.
    pub fn encode(&mut self, value: &JsonValue) -> Vec<u8> {
        self.writer.reset();
        self.write_any(value);
        self.writer.flush()
    }

    pub fn write_any(&mut self, value: &JsonValue) {
        match value {
            JsonValue::Null => self.write_null(),
            JsonValue::Boolean(b) => self.write_boolean(*b),
            JsonValue::Number(n) => match n.kind() {
                NumberKind::Unsigned => self.write_u_integer(n.as_u64()),
                NumberKind::Signed => self.write_integer(n.as_i64()),
                NumberKind::Float => self.write_float(n.as_f64()),
            },
            JsonValue::String(s) => self.write_str(s),
            JsonValue::Array(a) => {
                self.write_arr_hdr(a.len() as u64);
                for slot in a.slots() {
                    match slot {
                        Some(n) => self.write_any(&n.borrow()),
                        None => self.write_null(),
                    }
                }
            }
            JsonValue::Object(o) => {
                self.write_obj_hdr(o.len() as u64);
                for (key, value) in o.entries() {
                    self.write_str(key);
                    self.write_any(&value.borrow());
                }
            }
        }
    }

    pub fn write_null(&mut self) {
        self.writer.u8(NULL_CODE);
    }

    pub fn write_boolean(&mut self, b: bool) {
        self.writer.u8(if b { TRUE_CODE } else { FALSE_CODE });
    }

    pub fn write_integer(&mut self, int: i64) {
        if int >= 0 {
            self.write_u_integer(int as u64);
        } else {
            self.write_n_integer(int);
        }
    }

    pub fn write_u_integer(&mut self, uint: u64) {
        self.write_major(MAJOR_UNSIGNED, uint);
    }

    /// Writes a negative integer as `-1 - n` under major type 1.
    pub fn write_n_integer(&mut self, int: i64) {
        let magnitude = (-1i64).wrapping_sub(int) as u64;
        self.write_major(MAJOR_NEGATIVE, magnitude);
    }

    pub fn write_float(&mut self, float: f64) {
        if is_double_precision(float) {
            self.writer.u8f64(DOUBLE_PRECISION_PREFIX, float);
        } else {
            self.writer.u8f32(SINGLE_PRECISION_PREFIX, float as f32);
        }
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_str_hdr(s.len() as u64);
        self.writer.utf8(s);
    }

    pub fn write_str_hdr(&mut self, length: u64) {
        self.write_major(MAJOR_STRING, length);
    }

    pub fn write_arr_hdr(&mut self, length: u64) {
        self.write_major(MAJOR_ARRAY, length);
    }

    pub fn write_obj_hdr(&mut self, length: u64) {
        self.write_major(MAJOR_OBJECT, length);
    }

    /// Shared value/length prefix: the minimal ladder tier that fits `n`.
    fn write_major(&mut self, base: u8, n: u64) {
        if n <= 0x17 {
            self.writer.u8(base | n as u8);
        } else if n <= 0xff {
            self.writer.u8(base | 0x18);
            self.writer.u8(n as u8);
        } else if n <= 0xffff {
            self.writer.u8u16(base | 0x19, n as u16);
        } else if n <= 0xffff_ffff {
            self.writer.u8u32(base | 0x1a, n as u32);
        } else {
            self.writer.u8u64(base | 0x1b, n);
        }
    }
}
