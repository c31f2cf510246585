//! `CborDecoder` — reads one CBOR item into a value tree, reporting how
//! many bytes it consumed.

use super::constants::{
    major_type_of, MajorType, BREAK_STOP_CODE, DOUBLE_PRECISION_PREFIX, HALF_PRECISION_PREFIX,
    INDEFINITE_STRING, MAJOR_ARRAY, MAJOR_NEGATIVE, MAJOR_OBJECT, SINGLE_PRECISION_PREFIX,
};
use crate::error::{Error, Result};
use crate::number::Number;
use crate::value::{node, JsonArray, JsonObject, JsonValue};

/// CBOR decoder with a byte cursor.
///
/// Accepts everything the encoder emits plus indefinite-length strings,
/// arrays, and objects. A malformed or truncated item fails as a whole; no
/// partial tree is produced.
pub struct CborDecoder {
    data: Vec<u8>,
    x: usize,
}

impl Default for CborDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CborDecoder {
    pub fn new() -> Self {
        CborDecoder {
            data: Vec::new(),
            x: 0,
        }
    }

    /// Decodes one item from `input`, returning the value and the number of
    /// bytes it consumed so a stream of concatenated items can be walked.
    pub fn decode(&mut self, input: &[u8]) -> Result<(JsonValue, usize)> {
        self.data = input.to_vec();
        self.x = 0;
        let value = self.read_any()?;
        Ok((value, self.x))
    }

    fn read_any(&mut self) -> Result<JsonValue> {
        let lead = self.peek()?;
        match major_type_of(lead) {
            MajorType::UnsignedInteger => {
                Ok(JsonValue::Number(Number::from_u64(self.read_unsigned()?)))
            }
            MajorType::NegativeInteger => {
                Ok(JsonValue::Number(Number::from_i64(self.read_negative()?)))
            }
            MajorType::String => Ok(JsonValue::String(self.read_string()?)),
            MajorType::Array => self.read_array(),
            MajorType::Object => self.read_object(),
            MajorType::False => {
                self.x += 1;
                Ok(JsonValue::Boolean(false))
            }
            MajorType::True => {
                self.x += 1;
                Ok(JsonValue::Boolean(true))
            }
            MajorType::Null => {
                self.x += 1;
                Ok(JsonValue::Null)
            }
            MajorType::Float => Ok(JsonValue::Number(Number::from_f64(self.read_float()?))),
            MajorType::Unknown => Err(Error::Parse(format!(
                "unknown lead byte 0x{lead:02x} at offset {}",
                self.x
            ))),
        }
    }

    #[inline]
    fn check(&self, n: usize) -> Result<()> {
        if self.x + n > self.data.len() {
            Err(Error::Parse("unexpected end of input".to_owned()))
        } else {
            Ok(())
        }
    }

    #[inline]
    fn peek(&self) -> Result<u8> {
        self.check(1)?;
        Ok(self.data[self.x])
    }

    #[inline]
    fn u8(&mut self) -> Result<u8> {
        self.check(1)?;
        let v = self.data[self.x];
        self.x += 1;
        Ok(v)
    }

    #[inline]
    fn u16(&mut self) -> Result<u16> {
        self.check(2)?;
        let v = u16::from_be_bytes([self.data[self.x], self.data[self.x + 1]]);
        self.x += 2;
        Ok(v)
    }

    #[inline]
    fn u32(&mut self) -> Result<u32> {
        self.check(4)?;
        let v = u32::from_be_bytes([
            self.data[self.x],
            self.data[self.x + 1],
            self.data[self.x + 2],
            self.data[self.x + 3],
        ]);
        self.x += 4;
        Ok(v)
    }

    #[inline]
    fn u64(&mut self) -> Result<u64> {
        self.check(8)?;
        let v = u64::from_be_bytes([
            self.data[self.x],
            self.data[self.x + 1],
            self.data[self.x + 2],
            self.data[self.x + 3],
            self.data[self.x + 4],
            self.data[self.x + 5],
            self.data[self.x + 6],
            self.data[self.x + 7],
        ]);
        self.x += 8;
        Ok(v)
    }

    #[inline]
    fn f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.u32()?))
    }

    #[inline]
    fn f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.u64()?))
    }

    #[inline]
    fn utf8(&mut self, len: usize) -> Result<String> {
        self.check(len)?;
        let s = std::str::from_utf8(&self.data[self.x..self.x + len])
            .map_err(|_| Error::Parse("invalid utf-8 in string".to_owned()))?
            .to_owned();
        self.x += len;
        Ok(s)
    }

    fn read_unsigned(&mut self) -> Result<u64> {
        let lead = self.u8()?;
        match lead {
            0x00..=0x17 => Ok(lead as u64),
            0x18 => Ok(self.u8()? as u64),
            0x19 => Ok(self.u16()? as u64),
            0x1a => Ok(self.u32()? as u64),
            0x1b => self.u64(),
            _ => Err(Error::Parse(format!(
                "invalid unsigned integer lead byte 0x{lead:02x}"
            ))),
        }
    }

    fn read_negative(&mut self) -> Result<i64> {
        let lead = self.u8()?;
        let magnitude = match lead {
            0x20..=0x37 => (lead - MAJOR_NEGATIVE) as u64,
            0x38 => self.u8()? as u64,
            0x39 => self.u16()? as u64,
            0x3a => self.u32()? as u64,
            0x3b => self.u64()?,
            _ => {
                return Err(Error::Parse(format!(
                    "invalid negative integer lead byte 0x{lead:02x}"
                )))
            }
        };
        if magnitude > i64::MAX as u64 {
            return Err(Error::Parse(
                "negative integer magnitude exceeds the 64-bit signed range".to_owned(),
            ));
        }
        Ok(-1 - magnitude as i64)
    }

    fn read_string(&mut self) -> Result<String> {
        let lead = self.u8()?;
        match lead {
            0x60..=0x77 => {
                let len = (lead & 0x1f) as usize;
                self.utf8(len)
            }
            0x78 => {
                let len = self.u8()? as usize;
                self.utf8(len)
            }
            0x79 => {
                let len = self.u16()? as usize;
                self.utf8(len)
            }
            0x7a => {
                let len = self.u32()? as usize;
                self.utf8(len)
            }
            0x7b => {
                let len = self.u64()? as usize;
                self.utf8(len)
            }
            INDEFINITE_STRING => {
                // chunks until the break code, concatenated
                let mut s = String::new();
                while self.peek()? != BREAK_STOP_CODE {
                    s.push_str(&self.read_string()?);
                }
                self.x += 1;
                Ok(s)
            }
            _ => Err(Error::Parse(format!(
                "invalid string lead byte 0x{lead:02x}"
            ))),
        }
    }

    fn read_array(&mut self) -> Result<JsonValue> {
        let mut arr = JsonArray::new();
        match self.read_container_size(MAJOR_ARRAY)? {
            None => {
                while self.peek()? != BREAK_STOP_CODE {
                    arr.push(Some(node(self.read_any()?)));
                }
                self.x += 1;
            }
            Some(count) => {
                for _ in 0..count {
                    arr.push(Some(node(self.read_any()?)));
                }
            }
        }
        Ok(JsonValue::Array(arr))
    }

    fn read_object(&mut self) -> Result<JsonValue> {
        let mut obj = JsonObject::new();
        match self.read_container_size(MAJOR_OBJECT)? {
            None => {
                while self.peek()? != BREAK_STOP_CODE {
                    let key = self.read_string()?;
                    obj.set(key, node(self.read_any()?));
                }
                self.x += 1;
            }
            Some(count) => {
                for _ in 0..count {
                    let key = self.read_string()?;
                    obj.set(key, node(self.read_any()?));
                }
            }
        }
        Ok(JsonValue::Object(obj))
    }

    /// Reads a container length prefix. `None` means indefinite length.
    fn read_container_size(&mut self, base: u8) -> Result<Option<usize>> {
        let lead = self.u8()?;
        match lead.wrapping_sub(base) {
            info @ 0x00..=0x17 => Ok(Some(info as usize)),
            0x18 => Ok(Some(self.u8()? as usize)),
            0x19 => Ok(Some(self.u16()? as usize)),
            0x1a => Ok(Some(self.u32()? as usize)),
            0x1b => Ok(Some(self.u64()? as usize)),
            0x1f => Ok(None),
            _ => Err(Error::Parse(format!(
                "invalid container lead byte 0x{lead:02x}"
            ))),
        }
    }

    fn read_float(&mut self) -> Result<f64> {
        let lead = self.u8()?;
        match lead {
            HALF_PRECISION_PREFIX => Ok(decode_half(self.u16()?)),
            SINGLE_PRECISION_PREFIX => Ok(self.f32()? as f64),
            DOUBLE_PRECISION_PREFIX => self.f64(),
            _ => Err(Error::Parse(format!(
                "invalid float lead byte 0x{lead:02x}"
            ))),
        }
    }
}

/// Expands an IEEE 754 half-precision value to double precision.
///
/// Exponent 0 is the subnormal range (`mant × 2⁻²⁴`), exponent 31 encodes
/// infinities and NaN, everything between is normal (`(mant + 1024) ×
/// 2^(exp − 25)`). The sign bit is applied last.
fn decode_half(half: u16) -> f64 {
    let exp = (half >> 10) & 0x1f;
    let mant = (half & 0x3ff) as f64;
    let value = match exp {
        0 => mant * 2f64.powi(-24),
        31 => {
            if mant == 0.0 {
                f64::INFINITY
            } else {
                f64::NAN
            }
        }
        _ => (mant + 1024.0) * 2f64.powi(exp as i32 - 25),
    };
    if half & 0x8000 != 0 {
        -value
    } else {
        value
    }
}
