//! JSON number with three raw representations kept in sync.

/// Which of the three raw representations is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Unsigned,
    Signed,
    Float,
}

/// A JSON number.
///
/// The unsigned/signed readings share one 64-bit storage word and the
/// floating reading is kept alongside it, so reading a number through any
/// accessor is cheap and reading through the accessor that matches
/// [`NumberKind`] is lossless. The discriminant always reflects the last
/// value written.
#[derive(Debug, Clone, Copy)]
pub struct Number {
    kind: NumberKind,
    /// Shared storage for the unsigned and signed readings.
    bits: u64,
    float: f64,
}

impl Number {
    pub fn from_u64(value: u64) -> Self {
        Number {
            kind: NumberKind::Unsigned,
            bits: value,
            float: value as f64,
        }
    }

    pub fn from_i64(value: i64) -> Self {
        Number {
            kind: if value < 0 {
                NumberKind::Signed
            } else {
                NumberKind::Unsigned
            },
            bits: value as u64,
            float: value as f64,
        }
    }

    /// Builds a number from a floating value, classifying it as unsigned,
    /// signed, or float.
    ///
    /// A value whose distance to the nearest integer toward zero is below
    /// the double-precision machine epsilon is treated as integral; the sign
    /// then picks the integer kind. Everything else keeps its fractional
    /// part and is a float.
    pub fn from_f64(value: f64) -> Self {
        if value > 0.0 {
            let integer = value.floor();
            if value - integer >= f64::EPSILON {
                return Number {
                    kind: NumberKind::Float,
                    bits: value as u64,
                    float: value,
                };
            }
        } else if value < 0.0 {
            let integer = value.ceil();
            if integer - value >= f64::EPSILON {
                return Number {
                    kind: NumberKind::Float,
                    bits: value as i64 as u64,
                    float: value,
                };
            }
        } else {
            // zero (and the non-comparable degenerate inputs)
            return Number {
                kind: NumberKind::Unsigned,
                bits: value as u64,
                float: value,
            };
        }

        if value < 0.0 {
            Number {
                kind: NumberKind::Signed,
                bits: value as i64 as u64,
                float: value,
            }
        } else {
            Number {
                kind: NumberKind::Unsigned,
                bits: value as u64,
                float: value,
            }
        }
    }

    pub fn kind(&self) -> NumberKind {
        self.kind
    }

    pub fn is_unsigned(&self) -> bool {
        self.kind == NumberKind::Unsigned
    }

    pub fn is_signed(&self) -> bool {
        self.kind == NumberKind::Signed
    }

    pub fn is_float(&self) -> bool {
        self.kind == NumberKind::Float
    }

    pub fn as_u64(&self) -> u64 {
        self.bits
    }

    pub fn as_i64(&self) -> i64 {
        self.bits as i64
    }

    pub fn as_f64(&self) -> f64 {
        self.float
    }

    /// Renders the authoritative representation as text.
    pub fn dump(&self) -> String {
        match self.kind {
            NumberKind::Signed => (self.bits as i64).to_string(),
            NumberKind::Unsigned => self.bits.to_string(),
            NumberKind::Float => self.float.to_string(),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && match self.kind {
                NumberKind::Float => self.float == other.float,
                _ => self.bits == other.bits,
            }
    }
}

/// Decides whether a float survives a round trip through single precision.
///
/// Returns `true` when the value needs the full double width: either its
/// fractional part is too small for single precision to represent, or its
/// magnitude exceeds the single-precision range. Values with a fractional
/// part that single precision can carry return `false`. Integral values also
/// return `false`; callers only ask this question for numbers classified as
/// floats, which always carry a fraction.
pub fn is_double_precision(value: f64) -> bool {
    if value > 0.0 {
        let integer = value.floor();
        if value - integer >= f64::EPSILON {
            if value - integer < f32::EPSILON as f64 {
                return true;
            }
            return value > f32::MAX as f64;
        }
        return false;
    }

    if value < 0.0 {
        let integer = value.ceil();
        if integer - value >= f64::EPSILON {
            if integer - value < f32::EPSILON as f64 {
                return true;
            }
            return value < -(f32::MAX as f64);
        }
    }
    false
}
