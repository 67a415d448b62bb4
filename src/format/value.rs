//! Decoded metadata values.
//!
//! Every namespace (EXIF, IPTC, XMP, frame header) produces the same
//! [`Value`] type so callers can treat lookups uniformly.

use std::fmt;

use serde::Serialize;

/// A decoded tag value.
///
/// Variants mirror the TIFF field types. Rationals are materialised as the
/// quotient of numerator and denominator, with no guard against a zero
/// denominator (the result is infinite or NaN).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Byte(u8),
    Short(u16),
    Long(u32),
    Rational(f64),
    SByte(i8),
    SShort(i16),
    SLong(i32),
    SRational(f64),
    Float(f32),
    Double(f64),
    /// Count > 1: one element per value, in storage order
    Sequence(Vec<Value>),
    Text(String),
}

impl Value {
    /// Unsigned integer view of Byte, Short and Long values.
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Value::Byte(v) => Some(v as u32),
            Value::Short(v) => Some(v as u32),
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Floating point view of any numeric scalar.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Byte(v) => Some(v as f64),
            Value::Short(v) => Some(v as f64),
            Value::Long(v) => Some(v as f64),
            Value::SByte(v) => Some(v as f64),
            Value::SShort(v) => Some(v as f64),
            Value::SLong(v) => Some(v as f64),
            Value::Rational(v) | Value::SRational(v) | Value::Double(v) => Some(v),
            Value::Float(v) => Some(v as f64),
            Value::Sequence(_) | Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Raw bytes of a Byte scalar or a sequence of Bytes.
    pub fn as_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Value::Byte(b) => Some(vec![*b]),
            Value::Sequence(items) => items
                .iter()
                .map(|item| match item {
                    Value::Byte(b) => Some(*b),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    /// Short name of the variant, used by the `inspect` listing.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Long(_) => "long",
            Value::Rational(_) => "rational",
            Value::SByte(_) => "sbyte",
            Value::SShort(_) => "sshort",
            Value::SLong(_) => "slong",
            Value::SRational(_) => "srational",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Sequence(_) => "sequence",
            Value::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::SByte(v) => write!(f, "{}", v),
            Value::SShort(v) => write!(f, "{}", v),
            Value::SLong(v) => write!(f, "{}", v),
            Value::Rational(v) | Value::SRational(v) | Value::Double(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}
